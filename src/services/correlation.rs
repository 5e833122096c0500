//! Mood correlator: mood-type vs screen-time relationships over the fixed
//! 30-day mood window.

use serde::Serialize;

use crate::models::mood::{Mood, MoodType};
use crate::services::format::format_minutes;
use crate::services::Insight;

#[derive(Debug, Clone, Serialize)]
pub struct MoodCorrelation {
    pub mood_type: MoodType,
    pub average_screen_time: f64,
    pub count: i64,
}

/// Average same-day screen time per mood type, grouped in first-encounter
/// order so ties resolve deterministically downstream.
pub fn correlate(moods: &[Mood]) -> Vec<MoodCorrelation> {
    let mut groups: Vec<(MoodType, i64, i64)> = Vec::new();
    for mood in moods {
        match groups.iter_mut().find(|(t, _, _)| *t == mood.mood_type) {
            Some((_, total, count)) => {
                *total += mood.screen_time_minutes as i64;
                *count += 1;
            }
            None => groups.push((mood.mood_type, mood.screen_time_minutes as i64, 1)),
        }
    }
    groups
        .into_iter()
        .map(|(mood_type, total, count)| MoodCorrelation {
            mood_type,
            average_screen_time: total as f64 / count as f64,
            count,
        })
        .collect()
}

/// The single textual insight the mood page shows: which mood goes with the
/// least screen time. Nothing is emitted without mood data.
pub fn lowest_screen_time_insight(correlations: &[MoodCorrelation]) -> Option<Insight> {
    let lowest = correlations.iter().reduce(|min, cur| {
        if cur.average_screen_time < min.average_screen_time {
            cur
        } else {
            min
        }
    })?;

    Some(Insight {
        icon: "💡".into(),
        title: "Pattern Detected".into(),
        description: format!(
            "You tend to feel {} on days with lower screen time (avg {}).",
            lowest.mood_type,
            format_minutes(lowest.average_screen_time.round() as i64)
        ),
    })
}
