use chrono::{DateTime, Utc};

/// Render a minute count as the "Hh Mm" display string used everywhere a
/// duration is shown.
pub fn format_minutes(minutes: i64) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// "August 25, 2025" — sessions, moods, profile join date.
pub fn format_date_long(date: DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// "Aug 25, 2025" — goal completion dates.
pub fn format_date_short(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// "Aug 25" — trend chart axis labels.
pub fn format_day_label(date: DateTime<Utc>) -> String {
    date.format("%b %-d").to_string()
}
