//! # Room Handlers
//!
//! Room inventory CRUD and the availability search. Reads are open,
//! no token needed; writes are staff-only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use lodge_core::validation;
use lodge_core::Room;
use lodge_db::repository::room::NewRoom;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RoomPayload {
    pub room_number: String,
    pub room_type: String,
    pub price_cents: i64,
}

impl RoomPayload {
    fn validate(&self) -> Result<NewRoom, ApiError> {
        validation::validate_room_number(&self.room_number)?;
        validation::validate_room_type(&self.room_type)?;
        validation::validate_price_cents(self.price_cents)?;

        Ok(NewRoom {
            room_number: self.room_number.trim().to_string(),
            room_type: self.room_type.trim().to_string(),
            price_cents: self.price_cents,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

/// GET /api/rooms (open)
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Room>>, ApiError> {
    Ok(Json(state.db.rooms().list().await?))
}

/// POST /api/rooms (staff)
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<RoomPayload>,
) -> Result<(StatusCode, Json<Room>), ApiError> {
    user.require_staff()?;
    let room = state.db.rooms().create(payload.validate()?).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// GET /api/rooms/available?check_in=YYYY-MM-DD&check_out=YYYY-MM-DD
///
/// Missing and malformed parameters get distinct messages so clients
/// can tell a forgotten field from a bad date.
pub async fn available(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<Room>>, ApiError> {
    let (check_in, check_out) = match (&query.check_in, &query.check_out) {
        (Some(check_in), Some(check_out)) => (check_in, check_out),
        _ => {
            return Err(ApiError::bad_request(
                "check_in and check_out query params are required (YYYY-MM-DD).",
            ))
        }
    };

    let check_in = parse_date(check_in)?;
    let check_out = parse_date(check_out)?;

    let rooms = state.engine.list_available(check_in, check_out).await?;
    Ok(Json(rooms))
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid date format. Use YYYY-MM-DD."))
}

/// GET /api/rooms/:id (open)
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Room>, ApiError> {
    Ok(Json(state.db.rooms().get(&id).await?))
}

/// PUT /api/rooms/:id (staff)
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<RoomPayload>,
) -> Result<Json<Room>, ApiError> {
    user.require_staff()?;
    let room = state.db.rooms().update(&id, payload.validate()?).await?;
    Ok(Json(room))
}

/// DELETE /api/rooms/:id (staff)
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    user.require_staff()?;
    state.db.rooms().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
