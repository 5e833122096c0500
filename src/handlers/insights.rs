use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::models::{goal::Goal, mood::Mood, session::Session};
use crate::services::insights::{build_report, InsightsReport};
use crate::AppState;

const DEFAULT_RANGE_DAYS: i64 = 7;

#[derive(Debug, Deserialize)]
pub struct InsightsQuery {
    pub range: Option<i64>,
}

pub async fn get_insights(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<InsightsQuery>,
) -> AppResult<Json<InsightsReport>> {
    let range = query
        .range
        .filter(|r| *r > 0)
        .unwrap_or(DEFAULT_RANGE_DAYS);
    let now = Utc::now();

    // Any failure degrades to the empty report; the page never errors out.
    let report = match fetch_window(&state, auth_user.id, range, now).await {
        Ok((sessions, goals, moods)) => build_report(&sessions, &goals, &moods, range, now),
        Err(e) => {
            tracing::error!(user_id = %auth_user.id, error = %e, "Failed to load insights data");
            InsightsReport::default()
        }
    };

    Ok(Json(report))
}

/// Sessions and moods inside the trailing window, plus every goal regardless
/// of date.
async fn fetch_window(
    state: &AppState,
    user_id: Uuid,
    range: i64,
    now: DateTime<Utc>,
) -> AppResult<(Vec<Session>, Vec<Goal>, Vec<Mood>)> {
    let start = now - Duration::days(range);

    let sessions = sqlx::query_as::<_, Session>(
        r#"
        SELECT * FROM sessions
        WHERE user_id = $1 AND date >= $2 AND date <= $3
        ORDER BY date DESC
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(now)
    .fetch_all(&state.db)
    .await?;

    let goals = sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(&state.db)
        .await?;

    let moods = sqlx::query_as::<_, Mood>(
        r#"
        SELECT * FROM moods
        WHERE user_id = $1 AND date >= $2 AND date <= $3
        ORDER BY date DESC
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(now)
    .fetch_all(&state.db)
    .await?;

    Ok((sessions, goals, moods))
}
