//! # Auth Handlers
//!
//! Registration, login, logout, and the current-user endpoint.
//! Registration creates the login account and its customer profile in
//! one transaction; a duplicate username or national id leaves nothing
//! behind.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use lodge_core::validation;
use lodge_core::Customer;

use crate::auth::{hash_password, new_token, verify_password, CurrentUser};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    pub phone: String,
    pub national_id: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
    pub is_staff: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
    pub is_staff: bool,
    pub customer: Option<Customer>,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    validation::validate_username(&payload.username)?;
    validation::validate_password(&payload.password)?;
    validation::validate_name(&payload.name)?;
    validation::validate_phone(&payload.phone)?;
    validation::validate_national_id(&payload.national_id)?;

    let password_hash = hash_password(&payload.password)?;
    let (account, _customer) = state
        .db
        .accounts()
        .register(
            payload.username.trim(),
            &password_hash,
            payload.name.trim(),
            payload.phone.trim(),
            payload.national_id.trim(),
        )
        .await?;

    let token = new_token();
    state.db.accounts().issue_token(&account.id, &token).await?;

    info!(username = %account.username, "Customer registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            username: account.username,
            is_staff: account.is_staff,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let account = state
        .db
        .accounts()
        .find_by_username(payload.username.trim())
        .await?;

    // Same rejection whether the username or the password was wrong.
    let account = account
        .filter(|account| verify_password(&payload.password, &account.password_hash))
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password."))?;

    let token = state
        .db
        .accounts()
        .issue_or_reuse_token(&account.id, &new_token())
        .await?;

    info!(username = %account.username, "Login");

    Ok(Json(AuthResponse {
        token,
        username: account.username,
        is_staff: account.is_staff,
    }))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<StatusCode, ApiError> {
    state.db.accounts().revoke_token(&user.token).await?;
    info!(username = %user.username, "Logout");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<MeResponse>, ApiError> {
    let customer = match &user.actor.customer_id {
        Some(id) => state.db.customers().find(id).await?,
        None => None,
    };

    Ok(Json(MeResponse {
        username: user.username,
        is_staff: user.actor.is_staff,
        customer,
    }))
}
