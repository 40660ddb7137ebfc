//! # Customer Handlers
//!
//! Staff-only directory views. The detail view folds in the
//! customer's booking history.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use lodge_core::{Booking, Customer};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct BookingHistoryEntry {
    #[serde(flatten)]
    pub booking: Booking,
    pub room_number: String,
}

#[derive(Debug, Serialize)]
pub struct CustomerDetail {
    #[serde(flatten)]
    pub customer: Customer,
    pub booking_history: Vec<BookingHistoryEntry>,
    pub total_bookings: i64,
}

/// GET /api/customers (staff)
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Customer>>, ApiError> {
    user.require_staff()?;
    Ok(Json(state.db.customers().list().await?))
}

/// GET /api/customers/:id (staff)
pub async fn get(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<CustomerDetail>, ApiError> {
    user.require_staff()?;

    let customer = state.db.customers().get(&id).await?;
    let bookings = state.db.bookings().list_for_customer(&id).await?;
    let total_bookings = bookings.len() as i64;

    let room_numbers: HashMap<String, String> = state
        .db
        .rooms()
        .list()
        .await?
        .into_iter()
        .map(|room| (room.id, room.room_number))
        .collect();

    let booking_history = bookings
        .into_iter()
        .map(|booking| {
            let room_number = room_numbers
                .get(&booking.room_id)
                .cloned()
                .unwrap_or_default();
            BookingHistoryEntry {
                booking,
                room_number,
            }
        })
        .collect();

    Ok(Json(CustomerDetail {
        customer,
        booking_history,
        total_bookings,
    }))
}
