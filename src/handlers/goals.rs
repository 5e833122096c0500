use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::goal::{
    ApplyProgressRequest, CompletedGoalView, CreateGoalRequest, Goal, GoalStatus, GoalView,
    UpdateGoalRequest,
};
use crate::services::progress;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct GoalsResponse {
    pub active_goals: Vec<GoalView>,
    pub completed_goals: Vec<CompletedGoalView>,
}

pub async fn list_goals(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<GoalsResponse>> {
    let active = sqlx::query_as::<_, Goal>(
        r#"
        SELECT * FROM goals
        WHERE user_id = $1 AND status = $2
        ORDER BY created_at DESC
        "#,
    )
    .bind(auth_user.id)
    .bind(GoalStatus::Active)
    .fetch_all(&state.db)
    .await?;

    let completed = sqlx::query_as::<_, Goal>(
        r#"
        SELECT * FROM goals
        WHERE user_id = $1 AND status = $2
        ORDER BY completed_date DESC
        "#,
    )
    .bind(auth_user.id)
    .bind(GoalStatus::Completed)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(GoalsResponse {
        active_goals: active.iter().map(GoalView::from).collect(),
        completed_goals: completed.iter().map(CompletedGoalView::from).collect(),
    }))
}

pub async fn create_goal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateGoalRequest>,
) -> AppResult<Json<GoalView>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let now = Utc::now();
    let goal = sqlx::query_as::<_, Goal>(
        r#"
        INSERT INTO goals
            (id, user_id, name, category, description, time_limit_minutes, period,
             current_progress_minutes, status, streak, last_streak_update, start_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 0, 'active', 0, $8, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(&body.name)
    .bind(body.category)
    .bind(&body.description)
    .bind(body.time_limit)
    .bind(body.period.unwrap_or_default())
    .bind(now)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(GoalView::from(&goal)))
}

/// Edits details only; progress and status are untouched, so an edit can
/// never complete a goal as a side effect.
pub async fn update_goal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
    Json(body): Json<UpdateGoalRequest>,
) -> AppResult<Json<GoalView>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let _existing = sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE id = $1 AND user_id = $2")
        .bind(goal_id)
        .bind(auth_user.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("Goal not found".into()))?;

    let goal = sqlx::query_as::<_, Goal>(
        r#"
        UPDATE goals SET
            name = COALESCE($3, name),
            category = COALESCE($4, category),
            description = COALESCE($5, description),
            time_limit_minutes = COALESCE($6, time_limit_minutes),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(goal_id)
    .bind(auth_user.id)
    .bind(&body.name)
    .bind(body.category)
    .bind(&body.description)
    .bind(body.time_limit)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(GoalView::from(&goal)))
}

/// Explicit user action; progress passing the limit never lands here on its
/// own.
pub async fn complete_goal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let mut goal = sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE id = $1 AND user_id = $2")
        .bind(goal_id)
        .bind(auth_user.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("Goal not found".into()))?;

    progress::complete(&mut goal, Utc::now());
    save_goal_state(&state, &goal).await?;

    Ok(Json(
        serde_json::json!({ "message": "Goal marked as completed" }),
    ))
}

pub async fn reactivate_goal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let mut goal = sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE id = $1 AND user_id = $2")
        .bind(goal_id)
        .bind(auth_user.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("Goal not found".into()))?;

    progress::reactivate(&mut goal);
    save_goal_state(&state, &goal).await?;

    Ok(Json(
        serde_json::json!({ "message": "Goal reactivated successfully" }),
    ))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
        .bind(goal_id)
        .bind(auth_user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Goal not found".into()));
    }

    Ok(Json(
        serde_json::json!({ "message": "Goal deleted successfully" }),
    ))
}

/// Session fan-out: one finished session adds its minutes to every active
/// goal of the same category. The SELECT below is the whole scoping rule:
/// caller's goals only, matching category, active status — completed goals
/// never accumulate. Saves are best-effort per goal, not a transaction; a
/// goal that fails to save is logged and skipped.
pub async fn apply_progress(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<ApplyProgressRequest>,
) -> AppResult<Json<serde_json::Value>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let goals = sqlx::query_as::<_, Goal>(
        r#"
        SELECT * FROM goals
        WHERE user_id = $1 AND category = $2 AND status = $3
        "#,
    )
    .bind(auth_user.id)
    .bind(body.category)
    .bind(GoalStatus::Active)
    .fetch_all(&state.db)
    .await?;

    for mut goal in goals {
        progress::apply_progress(&mut goal, body.duration);
        if let Err(e) = save_goal_state(&state, &goal).await {
            tracing::warn!(
                goal_id = %goal.id,
                error = %e,
                "Failed to save goal progress; continuing with remaining goals"
            );
        }
    }

    Ok(Json(serde_json::json!({ "message": "Goal progress updated" })))
}

/// Persist the mutable progress-engine fields, always owner-scoped.
async fn save_goal_state(state: &AppState, goal: &Goal) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE goals SET
            current_progress_minutes = $3,
            status = $4,
            streak = $5,
            last_streak_update = $6,
            completed_date = $7,
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(goal.id)
    .bind(goal.user_id)
    .bind(goal.current_progress_minutes)
    .bind(goal.status)
    .bind(goal.streak)
    .bind(goal.last_streak_update)
    .bind(goal.completed_date)
    .execute(&state.db)
    .await?;
    Ok(())
}
