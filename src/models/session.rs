use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::category::Category;
use crate::services::format::{format_date_long, format_minutes};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: Category,
    pub duration_minutes: i32,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionRequest {
    pub category: Category,

    #[validate(range(min = 1, message = "Duration must be at least 1 minute"))]
    pub duration: i32,

    /// Backdated entries are allowed; defaults to now.
    pub date: Option<DateTime<Utc>>,

    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSessionRequest {
    pub category: Option<Category>,

    #[validate(range(min = 1, message = "Duration must be at least 1 minute"))]
    pub duration: Option<i32>,

    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub notes: Option<String>,
}

/// Display shape consumed by the sessions page.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub category: Category,
    pub category_class: &'static str,
    pub formatted_date: String,
    pub formatted_duration: String,
    pub hours: i32,
    pub minutes: i32,
    pub notes: String,
}

impl From<&Session> for SessionView {
    fn from(s: &Session) -> Self {
        Self {
            id: s.id,
            category: s.category,
            category_class: s.category.css_class(),
            formatted_date: format_date_long(s.date),
            formatted_duration: format_minutes(s.duration_minutes as i64),
            hours: s.duration_minutes / 60,
            minutes: s.duration_minutes % 60,
            notes: s.notes.clone().unwrap_or_default(),
        }
    }
}
