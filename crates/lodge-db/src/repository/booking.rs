//! # Booking Repository
//!
//! Read-side database operations for bookings. Creation and
//! cancellation move multiple tables together and live in
//! [`crate::store::SqliteStore`].

use sqlx::SqlitePool;

use crate::error::{DbError, DbResult};
use lodge_core::{Booking, StayRange};

/// Repository for booking database operations.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    /// Creates a new BookingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookingRepository { pool }
    }

    /// Fetches a booking by id.
    pub async fn get(&self, id: &str) -> DbResult<Booking> {
        self.find(id)
            .await?
            .ok_or_else(|| DbError::not_found("Booking", id))
    }

    /// Fetches a booking by id, returning None when absent.
    pub async fn find(&self, id: &str) -> DbResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            "SELECT id, room_id, customer_id, check_in, check_out, created_at \
             FROM bookings WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// All bookings, newest first.
    pub async fn list(&self) -> DbResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT id, room_id, customer_id, check_in, check_out, created_at \
             FROM bookings ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// One customer's bookings, newest first.
    pub async fn list_for_customer(&self, customer_id: &str) -> DbResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT id, room_id, customer_id, check_in, check_out, created_at \
             FROM bookings WHERE customer_id = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Bookings for a room whose stay overlaps the given range.
    pub async fn overlapping(&self, room_id: &str, stay: &StayRange) -> DbResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT id, room_id, customer_id, check_in, check_out, created_at \
             FROM bookings WHERE room_id = ? AND check_in < ? AND ? < check_out",
        )
        .bind(room_id)
        .bind(stay.check_out())
        .bind(stay.check_in())
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }
}
