use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::session::{CreateSessionRequest, Session, SessionView, UpdateSessionRequest};
use crate::AppState;

pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<SessionView>>> {
    let sessions = sqlx::query_as::<_, Session>(
        r#"
        SELECT * FROM sessions
        WHERE user_id = $1
        ORDER BY date DESC
        LIMIT 50
        "#,
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(sessions.iter().map(SessionView::from).collect()))
}

pub async fn create_session(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateSessionRequest>,
) -> AppResult<Json<SessionView>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if !body.category.valid_for_sessions() {
        return Err(AppError::Validation(
            "Overall is not a valid session category".into(),
        ));
    }

    let date = body.date.unwrap_or_else(Utc::now);

    let session = sqlx::query_as::<_, Session>(
        r#"
        INSERT INTO sessions (id, user_id, category, duration_minutes, date, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(body.category)
    .bind(body.duration)
    .bind(date)
    .bind(&body.notes)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(SessionView::from(&session)))
}

pub async fn update_session(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<UpdateSessionRequest>,
) -> AppResult<Json<SessionView>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if let Some(category) = body.category {
        if !category.valid_for_sessions() {
            return Err(AppError::Validation(
                "Overall is not a valid session category".into(),
            ));
        }
    }

    // Verify ownership
    let _existing =
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1 AND user_id = $2")
            .bind(session_id)
            .bind(auth_user.id)
            .fetch_optional(&state.db)
            .await?
            .ok_or(AppError::NotFound("Session not found".into()))?;

    let session = sqlx::query_as::<_, Session>(
        r#"
        UPDATE sessions SET
            category = COALESCE($3, category),
            duration_minutes = COALESCE($4, duration_minutes),
            notes = COALESCE($5, notes),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(session_id)
    .bind(auth_user.id)
    .bind(body.category)
    .bind(body.duration)
    .bind(&body.notes)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(SessionView::from(&session)))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM sessions WHERE id = $1 AND user_id = $2")
        .bind(session_id)
        .bind(auth_user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Session not found".into()));
    }

    Ok(Json(
        serde_json::json!({ "message": "Session deleted successfully" }),
    ))
}
