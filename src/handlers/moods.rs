use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::mood::{CreateMoodRequest, Mood, MoodType, MoodView, UpdateMoodRequest};
use crate::services::{correlation, Insight};
use crate::AppState;

/// Trailing window for mood/screen-time correlation, independent of any
/// insights range the client picked.
const CORRELATION_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Serialize)]
pub struct MoodsResponse {
    pub moods: Vec<MoodView>,
    pub insights: Vec<Insight>,
}

pub async fn list_moods(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<MoodsResponse>> {
    let moods = sqlx::query_as::<_, Mood>(
        r#"
        SELECT * FROM moods
        WHERE user_id = $1
        ORDER BY date DESC
        LIMIT 30
        "#,
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    // Correlation insight degrades to nothing rather than failing the page.
    let insights = match fetch_correlation_window(&state, auth_user.id).await {
        Ok(window) => correlation::lowest_screen_time_insight(&correlation::correlate(&window))
            .into_iter()
            .collect(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to compute mood correlation");
            Vec::new()
        }
    };

    Ok(Json(MoodsResponse {
        moods: moods.iter().map(MoodView::from).collect(),
        insights,
    }))
}

async fn fetch_correlation_window(state: &AppState, user_id: Uuid) -> AppResult<Vec<Mood>> {
    let now = Utc::now();
    let moods = sqlx::query_as::<_, Mood>(
        r#"
        SELECT * FROM moods
        WHERE user_id = $1 AND date >= $2 AND date <= $3
        "#,
    )
    .bind(user_id)
    .bind(now - Duration::days(CORRELATION_WINDOW_DAYS))
    .bind(now)
    .fetch_all(&state.db)
    .await?;
    Ok(moods)
}

pub async fn create_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateMoodRequest>,
) -> AppResult<Json<MoodView>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mood_type = MoodType::from_level(&body.mood_level)
        .ok_or_else(|| AppError::Validation("Invalid mood level".into()))?;

    let now = Utc::now();
    let (start_of_day, end_of_day) = calendar_day_bounds(now);

    // One entry per calendar day.
    let existing = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM moods
        WHERE user_id = $1 AND date >= $2 AND date < $3
        "#,
    )
    .bind(auth_user.id)
    .bind(start_of_day)
    .bind(end_of_day)
    .fetch_one(&state.db)
    .await?;

    if existing > 0 {
        return Err(AppError::Conflict(
            "You have already logged your mood for today. Please edit the existing entry.".into(),
        ));
    }

    // Snapshot today's screen time; a failed aggregate records 0 instead of
    // blocking the entry.
    let screen_time = match sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(duration_minutes), 0) FROM sessions
        WHERE user_id = $1 AND date >= $2 AND date < $3
        "#,
    )
    .bind(auth_user.id)
    .bind(start_of_day)
    .bind(end_of_day)
    .fetch_one(&state.db)
    .await
    {
        Ok(total) => total as i32,
        Err(e) => {
            tracing::error!(error = %e, "Failed to calculate screen time for mood entry");
            0
        }
    };

    let mood = sqlx::query_as::<_, Mood>(
        r#"
        INSERT INTO moods (id, user_id, mood_type, mood_value, date, notes, screen_time_minutes)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(mood_type)
    .bind(mood_type.value())
    .bind(now)
    .bind(&body.note)
    .bind(screen_time)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(MoodView::from(&mood)))
}

pub async fn update_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(mood_id): Path<Uuid>,
    Json(body): Json<UpdateMoodRequest>,
) -> AppResult<Json<MoodView>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut mood = sqlx::query_as::<_, Mood>("SELECT * FROM moods WHERE id = $1 AND user_id = $2")
        .bind(mood_id)
        .bind(auth_user.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("Mood entry not found".into()))?;

    if let Some(level) = body.mood_level.as_deref() {
        let mood_type = MoodType::from_level(level)
            .ok_or_else(|| AppError::Validation("Invalid mood level".into()))?;
        // type and value always move together
        mood.mood_type = mood_type;
        mood.mood_value = mood_type.value();
    }
    if let Some(note) = body.note {
        mood.notes = Some(note);
    }

    let updated = sqlx::query_as::<_, Mood>(
        r#"
        UPDATE moods SET
            mood_type = $3,
            mood_value = $4,
            notes = $5,
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(mood_id)
    .bind(auth_user.id)
    .bind(mood.mood_type)
    .bind(mood.mood_value)
    .bind(&mood.notes)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(MoodView::from(&updated)))
}

pub async fn delete_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(mood_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM moods WHERE id = $1 AND user_id = $2")
        .bind(mood_id)
        .bind(auth_user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Mood entry not found".into()));
    }

    Ok(Json(
        serde_json::json!({ "message": "Mood entry deleted successfully" }),
    ))
}

/// Half-open `[midnight, next midnight)` bounds of the calendar day
/// containing `now`, so sub-second timestamps at the end of the day still
/// fall inside it.
fn calendar_day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is valid");
    (start.and_utc(), (start + Duration::days(1)).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn day_bounds_are_half_open_on_next_midnight() {
        let now = Utc.with_ymd_and_hms(2025, 8, 25, 13, 45, 12).unwrap();
        let (start, end) = calendar_day_bounds(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 8, 25, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 8, 26, 0, 0, 0).unwrap());
    }

    #[test]
    fn final_second_of_the_day_is_inside_the_bounds() {
        let now = Utc.with_ymd_and_hms(2025, 8, 25, 10, 0, 0).unwrap();
        let (start, end) = calendar_day_bounds(now);
        let last_moment = Utc
            .with_ymd_and_hms(2025, 8, 25, 23, 59, 59)
            .unwrap()
            .checked_add_signed(Duration::milliseconds(500))
            .unwrap();
        assert!(last_moment >= start && last_moment < end);
        assert!(!(end >= start && end < end));
    }
}
