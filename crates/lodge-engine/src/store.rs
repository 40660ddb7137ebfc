//! # Storage Trait
//!
//! The seam between the booking engine and persistence. The production
//! implementation lives in `lodge-db` on SQLite; tests run against
//! [`crate::MemoryStore`].
//!
//! Mutating operations take `today` so the store can recompute the
//! room's derived availability flag inside the same transaction as the
//! write.

use async_trait::async_trait;
use chrono::NaiveDate;
use lodge_core::{Booking, Customer, LedgerEntry, Room, StayRange};
use thiserror::Error;

/// An opaque storage failure.
///
/// The engine neither inspects nor recovers from these; they bubble up
/// as internal errors. The concrete store logs the cause.
#[derive(Debug, Error)]
#[error("storage error: {0}")]
pub struct StoreError(pub String);

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        StoreError(message.into())
    }
}

/// Persistence operations the booking lifecycle needs.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn room_by_id(&self, id: &str) -> Result<Option<Room>, StoreError>;

    async fn customer_by_id(&self, id: &str) -> Result<Option<Customer>, StoreError>;

    async fn booking_by_id(&self, id: &str) -> Result<Option<Booking>, StoreError>;

    /// All bookings for a room that overlap the given stay.
    async fn bookings_overlapping(
        &self,
        room_id: &str,
        stay: &StayRange,
    ) -> Result<Vec<Booking>, StoreError>;

    /// Rooms with no booking overlapping the given stay, ordered by
    /// room number.
    async fn rooms_free_between(&self, stay: &StayRange) -> Result<Vec<Room>, StoreError>;

    /// Persists a booking with its BOOKING ledger entry and refreshes
    /// the room's availability flag, atomically.
    async fn create_booking(
        &self,
        booking: &Booking,
        entry: &LedgerEntry,
        today: NaiveDate,
    ) -> Result<(), StoreError>;

    /// Deletes a booking, appends its CANCELLATION ledger entry, and
    /// refreshes the room's availability flag, atomically.
    ///
    /// Ledger entries referencing the booking survive with their
    /// booking link cleared.
    async fn cancel_booking(
        &self,
        booking_id: &str,
        entry: &LedgerEntry,
        today: NaiveDate,
    ) -> Result<(), StoreError>;

    /// The most recent BOOKING-type ledger entry for a booking, if any.
    async fn latest_booking_entry(
        &self,
        booking_id: &str,
    ) -> Result<Option<LedgerEntry>, StoreError>;
}
