use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::services::format::{format_date_long, format_minutes};

/// Five ordinal mood levels. `mood_value` in the record is always the 1:1
/// numeric mapping of this type (5 = Excellent .. 1 = Struggling).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "mood_type", rename_all = "lowercase")]
pub enum MoodType {
    Excellent,
    Good,
    Okay,
    Down,
    Struggling,
}

impl MoodType {
    pub fn value(&self) -> i32 {
        match self {
            Self::Excellent => 5,
            Self::Good => 4,
            Self::Okay => 3,
            Self::Down => 2,
            Self::Struggling => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Okay => "Okay",
            Self::Down => "Down",
            Self::Struggling => "Struggling",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Excellent => "😊",
            Self::Good => "🙂",
            Self::Okay => "😐",
            Self::Down => "😔",
            Self::Struggling => "😢",
        }
    }

    /// Resolve a client mood-picker slug.
    pub fn from_level(level: &str) -> Option<Self> {
        match level {
            "very-happy" => Some(Self::Excellent),
            "happy" => Some(Self::Good),
            "neutral" => Some(Self::Okay),
            "sad" => Some(Self::Down),
            "very-sad" => Some(Self::Struggling),
            _ => None,
        }
    }

    /// Label for a rounded average mood value; anything outside 1..=5
    /// (including the no-entries zero) reads as "No data".
    pub fn label_for_value(value: i64) -> &'static str {
        match value {
            1 => "Struggling",
            2 => "Down",
            3 => "Okay",
            4 => "Good",
            5 => "Excellent",
            _ => "No data",
        }
    }
}

impl std::fmt::Display for MoodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Mood {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mood_type: MoodType,
    pub mood_value: i32,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    /// Same-day screen-time total in minutes, snapshotted at creation time.
    pub screen_time_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMoodRequest {
    /// Mood-picker slug: very-happy | happy | neutral | sad | very-sad
    pub mood_level: String,

    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMoodRequest {
    pub mood_level: Option<String>,

    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub note: Option<String>,
}

/// Display shape consumed by the mood page.
#[derive(Debug, Serialize)]
pub struct MoodView {
    pub id: Uuid,
    pub emoji: &'static str,
    pub label: &'static str,
    pub formatted_date: String,
    pub note: String,
    pub total_screen_time: String,
}

impl From<&Mood> for MoodView {
    fn from(m: &Mood) -> Self {
        Self {
            id: m.id,
            emoji: m.mood_type.emoji(),
            label: m.mood_type.label(),
            formatted_date: format_date_long(m.date),
            note: m
                .notes
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "No note added.".into()),
            total_screen_time: format_minutes(m.screen_time_minutes as i64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_slugs_map_to_type_and_value() {
        let cases = [
            ("very-happy", MoodType::Excellent, 5),
            ("happy", MoodType::Good, 4),
            ("neutral", MoodType::Okay, 3),
            ("sad", MoodType::Down, 2),
            ("very-sad", MoodType::Struggling, 1),
        ];
        for (slug, expected, value) in cases {
            let mood = MoodType::from_level(slug).unwrap();
            assert_eq!(mood, expected);
            assert_eq!(mood.value(), value);
        }
        assert_eq!(MoodType::from_level("ecstatic"), None);
    }

    #[test]
    fn average_labels_cover_range_and_fall_back() {
        assert_eq!(MoodType::label_for_value(1), "Struggling");
        assert_eq!(MoodType::label_for_value(5), "Excellent");
        assert_eq!(MoodType::label_for_value(0), "No data");
        assert_eq!(MoodType::label_for_value(6), "No data");
    }
}
