//! # Booking Handlers
//!
//! The booking lifecycle surface: list, create, fetch, cancel, and
//! the PDF receipt download. All policy and pricing decisions are the
//! engine's; this module only marshals.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use lodge_core::receipt::render_pdf;
use lodge_core::Booking;
use lodge_engine::CreateBookingRequest;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct BookingPayload {
    pub room_id: String,
    pub customer_id: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    #[serde(flatten)]
    pub booking: Booking,
    pub receipt_url: String,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        let receipt_url = format!("/api/bookings/{}/receipt", booking.id);
        BookingResponse {
            booking,
            receipt_url,
        }
    }
}

/// GET /api/bookings
///
/// Staff see every booking; customers see their own. A customer
/// account without a profile has nothing to list.
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let bookings = if user.actor.is_staff {
        state.db.bookings().list().await?
    } else {
        match &user.actor.customer_id {
            Some(customer_id) => state.db.bookings().list_for_customer(customer_id).await?,
            None => Vec::new(),
        }
    };

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// POST /api/bookings
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<BookingPayload>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let booking = state
        .engine
        .create_booking(
            &user.actor,
            CreateBookingRequest {
                room_id: payload.room_id,
                customer_id: payload.customer_id,
                check_in: payload.check_in,
                check_out: payload.check_out,
                payment_method: payload.payment_method,
                payment_reference: payload.payment_reference,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// GET /api/bookings/:id
pub async fn get(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = state.engine.get_booking(&user.actor, &id).await?;
    Ok(Json(booking.into()))
}

/// DELETE /api/bookings/:id
pub async fn cancel(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.engine.cancel_booking(&user.actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/bookings/:id/receipt
///
/// Streams the receipt PDF as an attachment download.
pub async fn receipt(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let record = state.engine.receipt(&user.actor, &id).await?;
    let pdf = render_pdf(&record);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"receipt-{id}.pdf\""),
        )
        .body(pdf.into())
        .map_err(|_| ApiError::internal())
}
