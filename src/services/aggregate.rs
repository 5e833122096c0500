//! Session aggregator: windowed sums and groupings over logged sessions.
//!
//! Grouping order is first-encounter order of the input, which makes every
//! tie-break deterministic: the earliest-seen category wins `most_used`, the
//! earliest-seen session wins `longest_session`.

use chrono::{DateTime, Utc};

use crate::models::category::Category;
use crate::models::session::Session;

const SECS_PER_DAY: i64 = 86_400;

pub fn sum_duration(sessions: &[Session]) -> i64 {
    sessions.iter().map(|s| s.duration_minutes as i64).sum()
}

/// Bucket session durations into per-day hour totals over a trailing window.
/// Index 0 is the oldest day, the last index is the reference day. The day
/// delta is the whole-day floor of `reference - session.date`, so sessions
/// outside `[reference - window + 1 day, reference]` are dropped, including
/// ones dated after the reference. Each bucket is rounded to one decimal.
pub fn bucket_by_day_offset(
    sessions: &[Session],
    window_days: i64,
    reference: DateTime<Utc>,
) -> Vec<f64> {
    if window_days <= 0 {
        return Vec::new();
    }
    let mut buckets = vec![0.0_f64; window_days as usize];
    for session in sessions {
        let days_ago = (reference - session.date).num_seconds().div_euclid(SECS_PER_DAY);
        if (0..window_days).contains(&days_ago) {
            buckets[(window_days - 1 - days_ago) as usize] += session.duration_minutes as f64 / 60.0;
        }
    }
    buckets.iter().map(|h| (h * 10.0).round() / 10.0).collect()
}

/// Total minutes per category, in first-encounter order.
pub fn category_totals(sessions: &[Session]) -> Vec<(Category, i64)> {
    let mut totals: Vec<(Category, i64)> = Vec::new();
    for session in sessions {
        match totals.iter_mut().find(|(c, _)| *c == session.category) {
            Some((_, total)) => *total += session.duration_minutes as i64,
            None => totals.push((session.category, session.duration_minutes as i64)),
        }
    }
    totals
}

/// Per-category share of total minutes, each rounded independently to the
/// nearest integer (the shares need not sum to exactly 100).
pub fn category_percentages(totals: &[(Category, i64)]) -> Vec<i64> {
    let total: i64 = totals.iter().map(|(_, t)| t).sum();
    totals
        .iter()
        .map(|(_, t)| {
            if total > 0 {
                (*t as f64 / total as f64 * 100.0).round() as i64
            } else {
                0
            }
        })
        .collect()
}

pub fn most_used_category(sessions: &[Session]) -> Option<Category> {
    category_totals(sessions)
        .into_iter()
        .reduce(|max, cur| if cur.1 > max.1 { cur } else { max })
        .map(|(category, _)| category)
}

pub fn longest_session(sessions: &[Session]) -> Option<&Session> {
    sessions.iter().reduce(|max, s| {
        if s.duration_minutes > max.duration_minutes {
            s
        } else {
            max
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn session(category: Category, duration: i32, date: DateTime<Utc>) -> Session {
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            category,
            duration_minutes: duration,
            date,
            notes: None,
            created_at: date,
            updated_at: date,
        }
    }

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 25, 18, 0, 0).unwrap()
    }

    #[test]
    fn empty_window_is_all_zeros() {
        assert_eq!(
            bucket_by_day_offset(&[], 7, reference()),
            vec![0.0; 7]
        );
    }

    #[test]
    fn single_session_today_fills_last_bucket() {
        let sessions = vec![session(Category::Work, 120, reference())];
        assert_eq!(bucket_by_day_offset(&sessions, 1, reference()), vec![2.0]);
    }

    #[test]
    fn buckets_order_oldest_first() {
        let now = reference();
        let sessions = vec![
            session(Category::Work, 60, now),
            session(Category::Gaming, 90, now - Duration::days(2)),
            session(Category::Study, 30, now - Duration::days(2)),
        ];
        let buckets = bucket_by_day_offset(&sessions, 3, now);
        assert_eq!(buckets, vec![2.0, 0.0, 1.0]);
    }

    #[test]
    fn sessions_outside_window_are_dropped() {
        let now = reference();
        let sessions = vec![
            session(Category::Work, 600, now - Duration::days(7)),
            session(Category::Work, 600, now + Duration::hours(2)),
            session(Category::Work, 60, now),
        ];
        assert_eq!(
            bucket_by_day_offset(&sessions, 7, now),
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn day_delta_uses_whole_day_floor() {
        let now = reference();
        // 20 hours ago is still day 0 of the trailing window
        let sessions = vec![session(Category::Work, 60, now - Duration::hours(20))];
        assert_eq!(bucket_by_day_offset(&sessions, 2, now), vec![0.0, 1.0]);
    }

    #[test]
    fn bucket_hours_round_to_one_decimal() {
        let sessions = vec![
            session(Category::Work, 25, reference()),
            session(Category::Work, 20, reference()),
        ];
        // 45 minutes = 0.75h → 0.8
        assert_eq!(bucket_by_day_offset(&sessions, 1, reference()), vec![0.8]);
    }

    #[test]
    fn totals_keep_first_encounter_order() {
        let now = reference();
        let sessions = vec![
            session(Category::Gaming, 30, now),
            session(Category::Work, 120, now),
            session(Category::Gaming, 45, now),
        ];
        assert_eq!(
            category_totals(&sessions),
            vec![(Category::Gaming, 75), (Category::Work, 120)]
        );
    }

    #[test]
    fn percentages_round_independently() {
        let totals = vec![
            (Category::Work, 100),
            (Category::Gaming, 100),
            (Category::Study, 100),
        ];
        // three thirds each round to 33; sum 99 is acceptable
        assert_eq!(category_percentages(&totals), vec![33, 33, 33]);
        assert_eq!(category_percentages(&[]), Vec::<i64>::new());
    }

    #[test]
    fn most_used_category_tie_goes_to_first_seen() {
        let now = reference();
        assert_eq!(most_used_category(&[]), None);

        let sessions = vec![
            session(Category::Study, 60, now),
            session(Category::Gaming, 60, now),
            session(Category::Work, 90, now),
        ];
        assert_eq!(most_used_category(&sessions), Some(Category::Work));

        let tied = vec![
            session(Category::Study, 60, now),
            session(Category::Gaming, 60, now),
        ];
        assert_eq!(most_used_category(&tied), Some(Category::Study));
    }

    #[test]
    fn longest_session_tie_goes_to_first_seen() {
        let now = reference();
        assert!(longest_session(&[]).is_none());

        let sessions = vec![
            session(Category::Study, 90, now),
            session(Category::Gaming, 90, now),
            session(Category::Work, 30, now),
        ];
        let longest = longest_session(&sessions).unwrap();
        assert_eq!(longest.category, Category::Study);
    }

    #[test]
    fn sum_duration_totals_minutes() {
        let now = reference();
        let sessions = vec![
            session(Category::Work, 30, now),
            session(Category::Gaming, 45, now),
        ];
        assert_eq!(sum_duration(&sessions), 75);
        assert_eq!(sum_duration(&[]), 0);
    }
}
