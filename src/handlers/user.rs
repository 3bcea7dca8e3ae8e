use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::Json;

use crate::auth::jwt::sign_token;
use crate::auth::password::{generate_reset_token, hash_password, verify_password};
use crate::dtos::user::{
    LoginRequest, LoginResponse, PasswordResetRequest, PasswordResetRequested, RegisterUserRequest,
    ResetPasswordRequest, SessionUser, UpdateProfileRequest, UserEnvelope,
};
use crate::dtos::Ack;
use crate::error::{is_unique_violation, AppError};
use crate::middleware::auth::AuthContext;
use crate::models::user::{PasswordReset, User, UserType, ACCOUNT_ACTIVE, MAX_RESET_ATTEMPTS, USER_COLUMNS};
use crate::state::AppState;

const DUPLICATE_USER: &str = "Username or email already exists";
const RESET_REQUESTED: &str = "If the email is registered, a reset token has been issued";
const INVALID_RESET: &str = "Invalid or expired reset token";

pub async fn register_user(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserEnvelope>), AppError> {
    let Json(req) = payload?;
    let new_user = req.validate()?;

    let password_hash = hash_password(new_user.password, state.config.bcrypt_cost).await?;

    let sql = format!(
        "INSERT INTO users (username, email, password_hash, first_name, last_name, user_type, account_status)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {USER_COLUMNS}"
    );
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&password_hash)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(new_user.user_type.as_str())
        .bind(ACCOUNT_ACTIVE)
        .fetch_one(&state.db_pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::validation(DUPLICATE_USER);
            }
            AppError::db(e)
        })?;

    tracing::info!(user_id = user.id, user_type = %user.user_type, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            success: true,
            message: Some("User registered successfully"),
            user: user.into(),
        }),
    ))
}

pub async fn login_user(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(req) = payload?;
    let (identifier, password) = req.validate()?;

    // An email match wins over a username that happens to equal it.
    let sql = format!(
        "SELECT {USER_COLUMNS} FROM users
         WHERE username = $1 OR email = $1
         ORDER BY (email = $1) DESC
         LIMIT 1"
    );
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(&identifier)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    if !verify_password(password, user.password_hash.clone()).await? {
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    if !user.is_active() {
        return Err(AppError::forbidden("Account is not active"));
    }

    let user_type: UserType = user
        .user_type
        .parse()
        .map_err(|e| AppError::internal(format!("Stored user_type for user {}: {e}", user.id)))?;

    let token = sign_token(
        user.id,
        user_type.as_str(),
        &user.username,
        &state.config.jwt_secret,
        state.config.jwt_ttl_hours,
    )?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful",
        user_type,
        user_data: SessionUser { id: user.id, username: user.username, user_type },
        token,
        expires_in_seconds: state.config.jwt_ttl_seconds(),
    }))
}

pub async fn get_profile(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<UserEnvelope>, AppError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(auth.user_id)
        .fetch_optional(&db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(UserEnvelope { success: true, message: None, user: user.into() }))
}

pub async fn update_profile(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<UserEnvelope>, AppError> {
    let Json(req) = payload?;
    let update = req.validate()?;

    let sql = format!(
        "UPDATE users
         SET username = $1, email = $2, first_name = $3, last_name = $4, updated_at = NOW()
         WHERE id = $5
         RETURNING {USER_COLUMNS}"
    );
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(&update.username)
        .bind(&update.email)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(auth.user_id)
        .fetch_optional(&db_pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::validation(DUPLICATE_USER);
            }
            AppError::db(e)
        })?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(UserEnvelope {
        success: true,
        message: Some("Profile updated successfully"),
        user: user.into(),
    }))
}

pub async fn request_password_reset(
    State(state): State<AppState>,
    payload: Result<Json<PasswordResetRequest>, JsonRejection>,
) -> Result<Json<PasswordResetRequested>, AppError> {
    let Json(req) = payload?;
    let email = req.validate()?;

    // Hash even for unknown emails so both paths cost the same.
    let token = generate_reset_token();
    let token_hash = hash_password(token.clone(), state.config.bcrypt_cost).await?;
    let ttl = chrono::Duration::minutes(state.config.password_reset_ttl_minutes);

    let user_id: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1 AND account_status = $2")
        .bind(&email)
        .bind(ACCOUNT_ACTIVE)
        .fetch_optional(&state.db_pool)
        .await?;

    if let Some(user_id) = user_id {
        let mut tx = state.db_pool.begin().await?;

        // One live token per user
        sqlx::query("UPDATE password_resets SET used_at = NOW() WHERE user_id = $1 AND used_at IS NULL")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO password_resets (user_id, token_hash, expires_at) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(&token_hash)
            .bind(chrono::Utc::now() + ttl)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(user_id, "Password reset requested");
    }

    Ok(Json(PasswordResetRequested {
        success: true,
        message: RESET_REQUESTED,
        reset_token: state.config.expose_reset_token.then_some(token),
        expires_in_seconds: ttl.num_seconds(),
    }))
}

pub async fn reset_password(
    State(state): State<AppState>,
    payload: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<Json<Ack>, AppError> {
    let Json(req) = payload?;
    let fields = req.validate()?;

    let mut tx = state.db_pool.begin().await?;

    let reset = sqlx::query_as::<_, PasswordReset>(
        "SELECT r.id, r.user_id, r.token_hash, r.attempts, r.expires_at
         FROM password_resets r
         JOIN users u ON u.id = r.user_id
         WHERE u.email = $1 AND r.used_at IS NULL AND r.expires_at > NOW() AND r.attempts < $2
         ORDER BY r.created_at DESC
         LIMIT 1
         FOR UPDATE OF r",
    )
    .bind(&fields.email)
    .bind(MAX_RESET_ATTEMPTS)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::validation(INVALID_RESET))?;

    if !verify_password(fields.reset_token, reset.token_hash.clone()).await? {
        sqlx::query("UPDATE password_resets SET attempts = attempts + 1 WHERE id = $1")
            .bind(reset.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::warn!(user_id = reset.user_id, attempts = reset.attempts + 1, "Password reset token mismatch");
        return Err(AppError::validation(INVALID_RESET));
    }

    let password_hash = hash_password(fields.new_password, state.config.bcrypt_cost).await?;

    sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
        .bind(&password_hash)
        .bind(reset.user_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE password_resets SET used_at = NOW() WHERE id = $1")
        .bind(reset.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::info!(user_id = reset.user_id, "Password reset completed");

    Ok(Json(Ack::ok("Password reset successful")))
}
