//! Insights synthesizer: one report object combining windowed session
//! aggregates, goal progress, mood stats and rule-based recommendations.
//!
//! Everything here is pure over already-fetched records; the handler owns the
//! queries and the degrade-to-empty failure policy.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::goal::{Goal, GoalStatus};
use crate::models::mood::{Mood, MoodType};
use crate::models::session::Session;
use crate::services::format::{format_day_label, format_minutes};
use crate::services::{aggregate, progress, Insight};

const EXCEEDED_COLOR: &str = "#ef4444";
const ON_TRACK_COLOR: &str = "#48bb78";

/// Daily-average threshold (minutes) for the high-screen-time nudge. The
/// average divides by 7 even for other window sizes; the baseline is a fixed
/// week, not the selected range.
const HIGH_USAGE_DAILY_MINUTES: f64 = 420.0;

#[derive(Debug, Serialize)]
pub struct InsightsReport {
    pub stats: StatsBlock,
    pub goal_progress: Vec<GoalProgressBar>,
    pub summary: SummaryBlock,
    pub recommendations: Vec<Insight>,
    pub chart_data: ChartData,
}

#[derive(Debug, Serialize)]
pub struct StatsBlock {
    pub total_screen_time: String,
    pub total_change: String,
    pub total_change_class: String,
    pub goals_achieved: String,
    pub goals_success_rate: String,
    pub goals_change_class: String,
    pub average_mood: String,
    pub mood_trend: String,
    pub mood_change_class: String,
    pub daily_average: String,
    pub avg_change: String,
    pub avg_change_class: String,
}

#[derive(Debug, Serialize)]
pub struct GoalProgressBar {
    pub name: String,
    pub percentage: i64,
    pub progress_width: i64,
    pub exceeded: bool,
    pub color: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SummaryBlock {
    pub most_used_category: String,
    pub best_day: String,
    pub longest_session: String,
    pub active_streak: String,
}

#[derive(Debug, Serialize)]
pub struct ChartData {
    pub trend_data: Vec<f64>,
    pub trend_labels: Vec<String>,
    pub category_data: Vec<i64>,
    pub category_labels: Vec<String>,
    pub mood_correlation_data: Vec<ScatterPoint>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: i32,
}

impl Default for InsightsReport {
    /// The degraded report returned when any fetch fails. Renders identically
    /// to a report for a user with no data.
    fn default() -> Self {
        Self {
            stats: StatsBlock {
                total_screen_time: "0h 0m".into(),
                total_change: String::new(),
                total_change_class: "neutral".into(),
                goals_achieved: "0/0".into(),
                goals_success_rate: "No goals yet".into(),
                goals_change_class: "neutral".into(),
                average_mood: "No data".into(),
                mood_trend: "No data".into(),
                mood_change_class: "neutral".into(),
                daily_average: "0h 0m".into(),
                avg_change: String::new(),
                avg_change_class: "neutral".into(),
            },
            goal_progress: Vec::new(),
            summary: SummaryBlock {
                most_used_category: "N/A".into(),
                best_day: "N/A".into(),
                longest_session: "N/A".into(),
                active_streak: "N/A".into(),
            },
            recommendations: Vec::new(),
            chart_data: ChartData {
                trend_data: Vec::new(),
                trend_labels: Vec::new(),
                category_data: Vec::new(),
                category_labels: Vec::new(),
                mood_correlation_data: Vec::new(),
            },
        }
    }
}

/// Assemble the full report for one user over a trailing `range`-day window.
/// `sessions` and `moods` are the records inside the window; `goals` are all
/// of the user's goals regardless of date.
pub fn build_report(
    sessions: &[Session],
    goals: &[Goal],
    moods: &[Mood],
    range: i64,
    now: DateTime<Utc>,
) -> InsightsReport {
    let total_minutes = aggregate::sum_duration(sessions);
    let daily_average = if range > 0 {
        total_minutes as f64 / range as f64
    } else {
        0.0
    };

    let completed_goals = goals
        .iter()
        .filter(|g| g.status == GoalStatus::Completed)
        .count();
    let total_goals = goals.len();
    let success_rate = if total_goals > 0 {
        (completed_goals as f64 / total_goals as f64 * 100.0).round() as i64
    } else {
        0
    };

    let average_mood = if moods.is_empty() {
        0.0
    } else {
        moods.iter().map(|m| m.mood_value as f64).sum::<f64>() / moods.len() as f64
    };

    let stats = StatsBlock {
        total_screen_time: format_minutes(total_minutes),
        total_change: String::new(),
        total_change_class: "neutral".into(),
        goals_achieved: format!("{completed_goals}/{total_goals}"),
        goals_success_rate: if total_goals > 0 {
            format!("{success_rate}% success rate")
        } else {
            "No goals yet".into()
        },
        goals_change_class: "neutral".into(),
        average_mood: MoodType::label_for_value(average_mood.round() as i64).into(),
        mood_trend: if moods.is_empty() { "No data" } else { "Stable" }.into(),
        mood_change_class: "neutral".into(),
        daily_average: format!(
            "{}h {}m",
            (daily_average / 60.0).floor() as i64,
            (daily_average % 60.0).round() as i64
        ),
        avg_change: String::new(),
        avg_change_class: "neutral".into(),
    };

    let goal_progress = goals
        .iter()
        .filter(|g| g.status == GoalStatus::Active)
        .map(|goal| {
            let percentage = progress::progress_percentage(goal);
            let exceeded = progress::is_exceeded(goal);
            GoalProgressBar {
                name: goal.name.clone(),
                percentage,
                progress_width: progress::progress_width(goal),
                exceeded,
                color: if exceeded { EXCEEDED_COLOR } else { ON_TRACK_COLOR },
            }
        })
        .collect();

    let summary = SummaryBlock {
        most_used_category: aggregate::most_used_category(sessions)
            .map(|c| c.label().to_string())
            .unwrap_or_else(|| "N/A".into()),
        best_day: "N/A".into(),
        longest_session: aggregate::longest_session(sessions)
            .map(|s| {
                format!(
                    "{} ({})",
                    format_minutes(s.duration_minutes as i64),
                    s.category
                )
            })
            .unwrap_or_else(|| "N/A".into()),
        active_streak: "N/A".into(),
    };

    InsightsReport {
        stats,
        goal_progress,
        summary,
        recommendations: generate_recommendations(sessions, goals, moods),
        chart_data: build_chart_data(sessions, moods, range, now),
    }
}

/// Rule-ordered recommendations. Each rule fires at most once, in this order:
/// exceeded goals, recent low mood, high screen time. When nothing fires and
/// sessions exist, exactly one positive affirmation goes out instead.
pub fn generate_recommendations(
    sessions: &[Session],
    goals: &[Goal],
    moods: &[Mood],
) -> Vec<Insight> {
    let mut recommendations = Vec::new();

    let exceeded: Vec<&Goal> = goals
        .iter()
        .filter(|g| g.status == GoalStatus::Active && progress::is_exceeded(g))
        .collect();
    if let Some(first) = exceeded.first() {
        recommendations.push(Insight {
            icon: "💡".into(),
            title: format!("{} Goal(s) Exceeded", exceeded.len()),
            description: format!(
                "You've exceeded your time limit on {}. Consider adjusting your goals or taking more breaks.",
                first.name
            ),
        });
    }

    if moods.len() >= 3 {
        let mut recent: Vec<&Mood> = moods.iter().collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        let avg_recent =
            recent[..3].iter().map(|m| m.mood_value as f64).sum::<f64>() / 3.0;
        if avg_recent < 3.0 {
            recommendations.push(Insight {
                icon: "⚠️".into(),
                title: "Mood Concerns".into(),
                description: "Your mood has been lower recently. Consider reducing screen time or taking outdoor breaks.".into(),
            });
        }
    }

    let daily_avg = if sessions.is_empty() {
        0.0
    } else {
        aggregate::sum_duration(sessions) as f64 / 7.0
    };
    if daily_avg > HIGH_USAGE_DAILY_MINUTES {
        recommendations.push(Insight {
            icon: "⏰".into(),
            title: "High Screen Time".into(),
            description: "Your daily average is over 7 hours. Try setting screen time limits or scheduling regular breaks.".into(),
        });
    }

    if recommendations.is_empty() && !sessions.is_empty() {
        recommendations.push(Insight {
            icon: "✨".into(),
            title: "Doing Great!".into(),
            description: "Keep up the good work! Your screen time habits look healthy.".into(),
        });
    }

    recommendations
}

fn build_chart_data(
    sessions: &[Session],
    moods: &[Mood],
    range: i64,
    now: DateTime<Utc>,
) -> ChartData {
    let trend_labels = (0..range)
        .rev()
        .map(|days_ago| format_day_label(now - Duration::days(days_ago)))
        .collect();

    let totals = aggregate::category_totals(sessions);

    ChartData {
        trend_data: aggregate::bucket_by_day_offset(sessions, range, now),
        trend_labels,
        category_data: aggregate::category_percentages(&totals),
        category_labels: totals.iter().map(|(c, _)| c.label().to_string()).collect(),
        mood_correlation_data: moods
            .iter()
            .map(|m| ScatterPoint {
                x: (m.screen_time_minutes as f64 / 60.0 * 10.0).round() / 10.0,
                y: m.mood_value,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::Category;
    use crate::models::goal::GoalPeriod;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 25, 18, 0, 0).unwrap()
    }

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

    fn goal(status: GoalStatus, time_limit: i32, progress: i32) -> Goal {
        let t = now();
        Goal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Limit gaming".into(),
            category: Category::Gaming,
            description: None,
            time_limit_minutes: time_limit,
            period: GoalPeriod::Daily,
            current_progress_minutes: progress,
            status,
            streak: 0,
            last_streak_update: t,
            start_date: t,
            completed_date: if status == GoalStatus::Completed {
                Some(t)
            } else {
                None
            },
            created_at: t,
            updated_at: t,
        }
    }

    fn mood(mood_type: MoodType, date: DateTime<Utc>, screen_time: i32) -> Mood {
        Mood {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            mood_type,
            mood_value: mood_type.value(),
            date,
            notes: None,
            screen_time_minutes: screen_time,
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn exceeded_goal_yields_single_recommendation() {
        let sessions = vec![session(Category::Gaming, 60, now())];
        let goals = vec![goal(GoalStatus::Active, 60, 85)];

        let recs = generate_recommendations(&sessions, &goals, &[]);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].title, "1 Goal(s) Exceeded");
        assert!(recs[0].description.contains("Limit gaming"));
    }

    #[test]
    fn completed_goals_never_count_as_exceeded() {
        let goals = vec![goal(GoalStatus::Completed, 60, 200)];
        let sessions = vec![session(Category::Work, 30, now())];

        let recs = generate_recommendations(&sessions, &goals, &[]);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].title, "Doing Great!");
    }

    #[test]
    fn low_recent_mood_triggers_concern() {
        let moods = vec![
            mood(MoodType::Down, now(), 300),
            mood(MoodType::Struggling, now() - Duration::days(1), 350),
            mood(MoodType::Down, now() - Duration::days(2), 280),
            // older good mood must not dilute the 3 most recent
            mood(MoodType::Excellent, now() - Duration::days(5), 60),
        ];
        let recs = generate_recommendations(&[], &[], &moods);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].title, "Mood Concerns");
    }

    #[test]
    fn two_moods_are_not_enough_for_a_trend() {
        let moods = vec![
            mood(MoodType::Struggling, now(), 300),
            mood(MoodType::Struggling, now() - Duration::days(1), 350),
        ];
        assert!(generate_recommendations(&[], &[], &moods).is_empty());
    }

    #[test]
    fn high_usage_divides_by_fixed_week() {
        // 3000 minutes over a 3-day window: 3000/7 ≈ 428 > 420, so the rule
        // fires even though the per-window-day average would be 1000.
        let sessions = vec![session(Category::Movies, 3000, now())];
        let recs = generate_recommendations(&sessions, &[], &[]);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].title, "High Screen Time");

        // 2900/7 ≈ 414 stays under the 7-hour bar
        let light = vec![session(Category::Movies, 2900, now())];
        let recs = generate_recommendations(&light, &[], &[]);
        assert_eq!(recs[0].title, "Doing Great!");
    }

    #[test]
    fn no_sessions_means_no_affirmation() {
        assert!(generate_recommendations(&[], &[], &[]).is_empty());
    }

    #[test]
    fn all_rules_fire_together_in_fixed_order() {
        // 3100 minutes in one session clears the 420/day bar (3100/7 ≈ 443)
        let sessions = vec![session(Category::Gaming, 3100, now())];
        let goals = vec![
            goal(GoalStatus::Active, 60, 85),
            goal(GoalStatus::Active, 30, 45),
        ];
        let moods = vec![
            mood(MoodType::Down, now(), 300),
            mood(MoodType::Struggling, now() - Duration::days(1), 350),
            mood(MoodType::Down, now() - Duration::days(2), 280),
        ];

        let recs = generate_recommendations(&sessions, &goals, &moods);
        let titles: Vec<&str> = recs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["2 Goal(s) Exceeded", "Mood Concerns", "High Screen Time"]
        );
    }

    #[test]
    fn report_stats_for_typical_week() {
        let sessions = vec![
            session(Category::Work, 120, now()),
            session(Category::Gaming, 90, now() - Duration::days(1)),
        ];
        let goals = vec![
            goal(GoalStatus::Active, 120, 90),
            goal(GoalStatus::Completed, 60, 0),
        ];
        let moods = vec![mood(MoodType::Good, now(), 210)];

        let report = build_report(&sessions, &goals, &moods, 7, now());

        assert_eq!(report.stats.total_screen_time, "3h 30m");
        assert_eq!(report.stats.daily_average, "0h 30m");
        assert_eq!(report.stats.goals_achieved, "1/2");
        assert_eq!(report.stats.goals_success_rate, "50% success rate");
        assert_eq!(report.stats.average_mood, "Good");
        assert_eq!(report.stats.mood_trend, "Stable");

        // only the active goal gets a progress bar
        assert_eq!(report.goal_progress.len(), 1);
        assert_eq!(report.goal_progress[0].percentage, 75);
        assert_eq!(report.goal_progress[0].color, ON_TRACK_COLOR);

        assert_eq!(report.summary.most_used_category, "Work");
        assert_eq!(report.summary.longest_session, "2h 0m (Work)");

        assert_eq!(report.chart_data.trend_data.len(), 7);
        assert_eq!(report.chart_data.trend_labels.len(), 7);
        assert_eq!(report.chart_data.trend_labels[6], "Aug 25");
        assert_eq!(report.chart_data.category_labels, vec!["Work", "Gaming"]);
        assert_eq!(
            report.chart_data.mood_correlation_data,
            vec![ScatterPoint { x: 3.5, y: 4 }]
        );
    }

    #[test]
    fn exceeded_goal_bar_is_red_with_capped_width() {
        let goals = vec![goal(GoalStatus::Active, 60, 85)];
        let report = build_report(&[], &goals, &[], 7, now());

        let bar = &report.goal_progress[0];
        assert_eq!(bar.percentage, 142);
        assert_eq!(bar.progress_width, 100);
        assert!(bar.exceeded);
        assert_eq!(bar.color, EXCEEDED_COLOR);
    }

    #[test]
    fn empty_report_matches_degraded_default() {
        let report = build_report(&[], &[], &[], 7, now());
        let fallback = InsightsReport::default();

        assert_eq!(report.stats.total_screen_time, fallback.stats.total_screen_time);
        assert_eq!(report.stats.daily_average, fallback.stats.daily_average);
        assert_eq!(report.stats.goals_achieved, fallback.stats.goals_achieved);
        assert_eq!(
            report.stats.goals_success_rate,
            fallback.stats.goals_success_rate
        );
        assert_eq!(report.stats.average_mood, fallback.stats.average_mood);
        assert_eq!(report.stats.mood_trend, fallback.stats.mood_trend);
        assert!(report.goal_progress.is_empty());
        assert!(report.recommendations.is_empty());
        assert_eq!(report.summary.most_used_category, "N/A");
        assert_eq!(report.summary.longest_session, "N/A");
    }
}
