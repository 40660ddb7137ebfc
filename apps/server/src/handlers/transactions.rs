//! # Transaction Handlers
//!
//! Staff-only, read-only views over the financial ledger.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use std::str::FromStr;

use lodge_core::{LedgerEntry, LedgerEntryType};
use lodge_db::repository::ledger::LedgerFilter;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    /// `BOOKING` or `CANCELLATION`. Accepts `type` as an alias.
    #[serde(alias = "type")]
    pub entry_type: Option<String>,
    pub booking_id: Option<String>,
}

/// GET /api/transactions (staff)
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<Vec<LedgerEntry>>, ApiError> {
    user.require_staff()?;

    let entry_type = match query.entry_type.as_deref() {
        Some(raw) => Some(LedgerEntryType::from_str(raw).map_err(|_| {
            ApiError::bad_request("entry_type must be BOOKING or CANCELLATION.")
        })?),
        None => None,
    };

    let entries = state
        .db
        .ledger()
        .list(&LedgerFilter {
            entry_type,
            booking_id: query.booking_id,
        })
        .await?;

    Ok(Json(entries))
}

/// GET /api/transactions/:id (staff)
pub async fn get(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<LedgerEntry>, ApiError> {
    user.require_staff()?;
    Ok(Json(state.db.ledger().get(&id).await?))
}
