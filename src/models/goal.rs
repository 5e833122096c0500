use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::category::Category;
use crate::services::format::{format_date_short, format_minutes};
use crate::services::progress;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub category: Category,
    pub description: Option<String>,
    pub time_limit_minutes: i32,
    pub period: GoalPeriod,
    pub current_progress_minutes: i32,
    pub status: GoalStatus,
    pub streak: i32,
    pub last_streak_update: DateTime<Utc>,
    pub start_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "goal_period", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GoalPeriod {
    Daily,
    Weekly,
    Monthly,
}

impl Default for GoalPeriod {
    fn default() -> Self {
        Self::Daily
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "goal_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
    Failed,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGoalRequest {
    #[validate(length(min = 1, max = 100, message = "Goal name must be 1-100 characters"))]
    pub name: String,

    pub category: Category,

    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 1, message = "Time limit must be at least 1 minute"))]
    pub time_limit: i32,

    pub period: Option<GoalPeriod>,
}

/// Edits goal details only. Completion is a separate explicit action and is
/// never triggered from here.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateGoalRequest {
    #[validate(length(min = 1, max = 100, message = "Goal name must be 1-100 characters"))]
    pub name: Option<String>,

    pub category: Option<Category>,

    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 1, message = "Time limit must be at least 1 minute"))]
    pub time_limit: Option<i32>,
}

/// Fan-out request posted when the client timer finishes a session.
#[derive(Debug, Deserialize, Validate)]
pub struct ApplyProgressRequest {
    pub category: Category,

    #[validate(range(min = 1, message = "Duration must be at least 1 minute"))]
    pub duration: i32,
}

/// Display shape for an active goal card. Both the raw percentage and the
/// capped bar width come from the one canonical percentage function.
#[derive(Debug, Serialize)]
pub struct GoalView {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    pub category_class: &'static str,
    pub description: String,
    pub current_time: String,
    pub target_time: String,
    pub progress_percentage: i64,
    pub progress_width: i64,
    pub streak: i32,
    pub status: &'static str,
    pub status_class: &'static str,
    pub exceeded: bool,
}

impl From<&Goal> for GoalView {
    fn from(goal: &Goal) -> Self {
        let percentage = progress::progress_percentage(goal);
        let exceeded = progress::is_exceeded(goal);
        let (status, status_class) = match goal.status {
            GoalStatus::Completed => ("Completed", "completed"),
            _ if exceeded => ("Exceeded", "exceeded"),
            _ => ("On Track", "active"),
        };
        Self {
            id: goal.id,
            name: goal.name.clone(),
            category: goal.category,
            category_class: goal.category.css_class(),
            description: goal.description.clone().unwrap_or_default(),
            current_time: format_minutes(goal.current_progress_minutes as i64),
            target_time: format_minutes(goal.time_limit_minutes as i64),
            progress_percentage: percentage,
            progress_width: progress::progress_width(goal),
            streak: goal.streak,
            status,
            status_class,
            exceeded,
        }
    }
}

/// Display shape for a completed goal card.
#[derive(Debug, Serialize)]
pub struct CompletedGoalView {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    pub category_class: &'static str,
    pub description: String,
    pub completed_date: String,
}

impl From<&Goal> for CompletedGoalView {
    fn from(goal: &Goal) -> Self {
        Self {
            id: goal.id,
            name: goal.name.clone(),
            category: goal.category,
            category_class: goal.category.css_class(),
            description: goal.description.clone().unwrap_or_default(),
            completed_date: goal
                .completed_date
                .map(format_date_short)
                .unwrap_or_else(|| "Unknown date".into()),
        }
    }
}
