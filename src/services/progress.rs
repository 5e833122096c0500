//! Goal progress engine.
//!
//! All derived progress state (raw percentage, capped bar width, exceeded
//! flag) flows through [`progress_percentage`] so the numbers can never
//! drift between call sites. Percentages are deliberately unbounded above
//! 100: exceeding a limit keeps accumulating so over-usage stays visible,
//! and never forces a status change.

use chrono::{DateTime, Utc};

use crate::models::goal::{Goal, GoalStatus};

/// Percentage of the time limit consumed, rounded to the nearest integer.
/// A zero limit reads as 0% rather than dividing by zero.
pub fn progress_percentage(goal: &Goal) -> i64 {
    if goal.time_limit_minutes == 0 {
        return 0;
    }
    let pct = goal.current_progress_minutes as f64 / goal.time_limit_minutes as f64 * 100.0;
    pct.round() as i64
}

pub fn is_exceeded(goal: &Goal) -> bool {
    progress_percentage(goal) > 100
}

/// Bar width for rendering; the raw percentage stays uncapped.
pub fn progress_width(goal: &Goal) -> i64 {
    progress_percentage(goal).min(100)
}

/// Advance the streak for a new calendar day. Days are compared by calendar
/// date, not elapsed time, so repeated calls within one day are no-ops.
/// Returns whether a new-day transition happened.
pub fn update_streak(goal: &mut Goal, achieved: bool, now: DateTime<Utc>) -> bool {
    if now.date_naive() == goal.last_streak_update.date_naive() {
        return false;
    }
    if achieved {
        goal.streak += 1;
    } else {
        goal.streak = 0;
    }
    goal.last_streak_update = now;
    true
}

/// Add session minutes to the goal. Status is untouched: completion is an
/// explicit user action, never a side effect of accumulation.
pub fn apply_progress(goal: &mut Goal, delta_minutes: i32) {
    goal.current_progress_minutes += delta_minutes;
}

pub fn reset_progress(goal: &mut Goal) {
    goal.current_progress_minutes = 0;
}

/// Explicit active → completed transition.
pub fn complete(goal: &mut Goal, now: DateTime<Utc>) {
    goal.status = GoalStatus::Completed;
    if goal.completed_date.is_none() {
        goal.completed_date = Some(now);
    }
}

/// Completed → active; progress starts over and the completion stamp clears.
pub fn reactivate(goal: &mut Goal) {
    goal.status = GoalStatus::Active;
    goal.completed_date = None;
    reset_progress(goal);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::Category;
    use crate::models::goal::GoalPeriod;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn goal(time_limit: i32, progress: i32) -> Goal {
        let t = Utc.with_ymd_and_hms(2025, 8, 20, 10, 0, 0).unwrap();
        Goal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Less gaming".into(),
            category: Category::Gaming,
            description: None,
            time_limit_minutes: time_limit,
            period: GoalPeriod::Daily,
            current_progress_minutes: progress,
            status: GoalStatus::Active,
            streak: 0,
            last_streak_update: t,
            start_date: t,
            completed_date: None,
            created_at: t,
            updated_at: t,
        }
    }

    #[test]
    fn zero_limit_reads_as_zero_percent() {
        assert_eq!(progress_percentage(&goal(0, 500)), 0);
        assert!(!is_exceeded(&goal(0, 500)));
    }

    #[test]
    fn percentage_is_rounded_and_unbounded() {
        assert_eq!(progress_percentage(&goal(60, 30)), 50);
        assert_eq!(progress_percentage(&goal(90, 30)), 33);
        assert_eq!(progress_percentage(&goal(60, 300)), 500);
    }

    #[test]
    fn exceeded_only_above_one_hundred() {
        assert!(!is_exceeded(&goal(60, 60)));
        assert!(is_exceeded(&goal(60, 61)));
    }

    #[test]
    fn width_caps_but_percentage_does_not() {
        let g = goal(60, 85);
        assert_eq!(progress_percentage(&g), 142);
        assert_eq!(progress_width(&g), 100);
        assert!(is_exceeded(&g));
    }

    #[test]
    fn streak_increments_once_per_day() {
        let mut g = goal(60, 0);
        g.last_streak_update = Utc.with_ymd_and_hms(2025, 8, 19, 23, 50, 0).unwrap();

        let morning = Utc.with_ymd_and_hms(2025, 8, 20, 0, 10, 0).unwrap();
        assert!(update_streak(&mut g, true, morning));
        assert_eq!(g.streak, 1);
        assert_eq!(g.last_streak_update, morning);

        // second call on the same calendar day is a no-op
        let evening = Utc.with_ymd_and_hms(2025, 8, 20, 22, 0, 0).unwrap();
        assert!(!update_streak(&mut g, true, evening));
        assert_eq!(g.streak, 1);
        assert_eq!(g.last_streak_update, morning);
    }

    #[test]
    fn streak_resets_on_missed_day() {
        let mut g = goal(60, 0);
        g.streak = 6;
        g.last_streak_update = Utc.with_ymd_and_hms(2025, 8, 19, 12, 0, 0).unwrap();

        let next_day = Utc.with_ymd_and_hms(2025, 8, 20, 12, 0, 0).unwrap();
        assert!(update_streak(&mut g, false, next_day));
        assert_eq!(g.streak, 0);
        assert_eq!(g.last_streak_update, next_day);
    }

    #[test]
    fn apply_progress_accumulates_without_status_change() {
        let mut g = goal(60, 50);
        apply_progress(&mut g, 90);
        assert_eq!(g.current_progress_minutes, 140);
        assert_eq!(g.status, GoalStatus::Active);

        // keeps accumulating past the limit
        apply_progress(&mut g, 30);
        assert_eq!(g.current_progress_minutes, 170);
        assert!(is_exceeded(&g));
        assert_eq!(g.status, GoalStatus::Active);
    }

    #[test]
    fn complete_stamps_date_once() {
        let mut g = goal(60, 10);
        let first = Utc.with_ymd_and_hms(2025, 8, 21, 9, 0, 0).unwrap();
        complete(&mut g, first);
        assert_eq!(g.status, GoalStatus::Completed);
        assert_eq!(g.completed_date, Some(first));

        let later = Utc.with_ymd_and_hms(2025, 8, 22, 9, 0, 0).unwrap();
        complete(&mut g, later);
        assert_eq!(g.completed_date, Some(first));
    }

    #[test]
    fn reactivate_resets_progress_and_clears_completion() {
        let mut g = goal(60, 120);
        complete(&mut g, Utc.with_ymd_and_hms(2025, 8, 21, 9, 0, 0).unwrap());

        reactivate(&mut g);
        assert_eq!(g.status, GoalStatus::Active);
        assert_eq!(g.current_progress_minutes, 0);
        assert_eq!(g.completed_date, None);
    }
}
