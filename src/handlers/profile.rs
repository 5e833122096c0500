use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::models::user::{User, UserProfile};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub password: String,
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserProfile>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(auth_user.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(Json(user.into()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserProfile>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(auth_user.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    if let Some(username) = body.username.as_deref() {
        if username != user.username {
            let taken =
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = $1")
                    .bind(username)
                    .fetch_one(&state.db)
                    .await?;
            if taken > 0 {
                return Err(AppError::Conflict("Username already taken".into()));
            }
        }
    }

    if let Some(email) = body.email.as_deref() {
        if email != user.email {
            let taken = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(&state.db)
                .await?;
            if taken > 0 {
                return Err(AppError::Conflict("Email already registered".into()));
            }
        }
    }

    let updated = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET
            username = COALESCE($2, username),
            email = COALESCE($3, email),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(auth_user.id)
    .bind(&body.username)
    .bind(&body.email)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(updated.into()))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<ChangePasswordRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if body.current_password.is_empty()
        || body.new_password.is_empty()
        || body.confirm_password.is_empty()
    {
        return Err(AppError::Validation("All fields are required".into()));
    }
    if body.new_password != body.confirm_password {
        return Err(AppError::Validation("New passwords do not match".into()));
    }
    if body.new_password.len() < 6 {
        return Err(AppError::Validation(
            "New password must be at least 6 characters".into(),
        ));
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(auth_user.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    if !verify_password(&body.current_password, &user.password_hash)? {
        return Err(AppError::Validation("Current password is incorrect".into()));
    }

    let pwd_hash = hash_password(&body.new_password)?;
    sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
        .bind(auth_user.id)
        .bind(&pwd_hash)
        .execute(&state.db)
        .await?;

    Ok(Json(
        serde_json::json!({ "message": "Password changed successfully" }),
    ))
}

/// Full account deletion: every owned record goes with the user.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<DeleteAccountRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if body.password.is_empty() {
        return Err(AppError::Validation(
            "Password is required to delete account".into(),
        ));
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(auth_user.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    if !verify_password(&body.password, &user.password_hash)? {
        return Err(AppError::Validation("Incorrect password".into()));
    }

    let mut tx = state.db.begin().await?;
    sqlx::query("DELETE FROM sessions WHERE user_id = $1")
        .bind(auth_user.id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM goals WHERE user_id = $1")
        .bind(auth_user.id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM moods WHERE user_id = $1")
        .bind(auth_user.id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
        .bind(auth_user.id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(auth_user.id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(user_id = %auth_user.id, "Account deleted");

    Ok(Json(
        serde_json::json!({ "message": "Account deleted successfully" }),
    ))
}
