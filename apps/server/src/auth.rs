//! # Authentication
//!
//! Password hashing, opaque bearer tokens, and the authenticated-user
//! extractor.
//!
//! ## Token Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  register/login ──► random token ──► auth_tokens row        │
//! │                                                             │
//! │  request ──► Authorization: Bearer <token>                  │
//! │                  │                                          │
//! │                  ▼                                          │
//! │  CurrentUser extractor ──► token row lookup ──► Actor      │
//! │                                                             │
//! │  logout ──► row delete, token dead server-side              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tokens carry no claims; everything about the caller is read from
//! the database on each request, so role changes and logouts take
//! effect immediately.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use uuid::Uuid;

use lodge_core::ActorContext;

use crate::error::ApiError;
use crate::AppState;

/// Hashes a password with Argon2id and a fresh salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| ApiError::internal())?;
    Ok(hash.to_string())
}

/// Verifies a password against a stored hash. An unparseable hash
/// verifies as false rather than erroring.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Generates a fresh opaque token.
pub fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// The authenticated caller, resolved from the bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub actor: ActorContext,
    pub username: String,
    pub token: String,
}

impl CurrentUser {
    /// Rejects non-staff callers.
    pub fn require_staff(&self) -> Result<(), ApiError> {
        if self.actor.is_staff {
            Ok(())
        } else {
            Err(ApiError::forbidden(
                "You do not have permission to perform this action.",
            ))
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ApiError::unauthorized("Authentication credentials were not provided.")
            })?;

        let token = header_value
            .strip_prefix("Bearer ")
            .or_else(|| header_value.strip_prefix("Token "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::unauthorized("Invalid authorization header."))?;

        let (account, customer_id) = state
            .db
            .accounts()
            .resolve_token(token)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::unauthorized("Invalid token."))?;

        Ok(CurrentUser {
            actor: ActorContext {
                account_id: account.id,
                is_staff: account.is_staff,
                customer_id,
            },
            username: account.username,
            token: token.to_string(),
        })
    }
}
