//! # In-Memory Store
//!
//! A [`BookingStore`] backed by hash maps, for exercising the booking
//! lifecycle without a database. Mirrors the transactional guarantees
//! of the SQLite store: each mutating call applies all of its effects
//! under one lock acquisition.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use lodge_core::{Booking, Customer, LedgerEntry, LedgerEntryType, Room, StayRange};

use crate::store::{BookingStore, StoreError};

#[derive(Default)]
struct Inner {
    rooms: HashMap<String, Room>,
    customers: HashMap<String, Customer>,
    bookings: HashMap<String, Booking>,
    ledger: Vec<LedgerEntry>,
}

impl Inner {
    /// Recomputes a room's derived availability flag: available unless
    /// some booking for it ends after `today`.
    fn refresh_availability(&mut self, room_id: &str, today: NaiveDate) {
        let occupied = self
            .bookings
            .values()
            .any(|b| b.room_id == room_id && b.check_out > today);
        if let Some(room) = self.rooms.get_mut(room_id) {
            room.is_available = !occupied;
        }
    }
}

/// Hash-map [`BookingStore`] for tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_room(&self, room: Room) {
        self.inner.lock().await.rooms.insert(room.id.clone(), room);
    }

    pub async fn add_customer(&self, customer: Customer) {
        self.inner
            .lock()
            .await
            .customers
            .insert(customer.id.clone(), customer);
    }

    /// Repoints a room's nightly rate, as a staff rate update would.
    pub async fn set_room_price(&self, room_id: &str, price_cents: i64) {
        if let Some(room) = self.inner.lock().await.rooms.get_mut(room_id) {
            room.price_cents = price_cents;
        }
    }

    pub async fn room_snapshot(&self, room_id: &str) -> Option<Room> {
        self.inner.lock().await.rooms.get(room_id).cloned()
    }

    pub async fn booking_count(&self) -> usize {
        self.inner.lock().await.bookings.len()
    }

    /// Ledger entries in insertion order.
    pub async fn ledger_entries(&self) -> Vec<LedgerEntry> {
        self.inner.lock().await.ledger.clone()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn room_by_id(&self, id: &str) -> Result<Option<Room>, StoreError> {
        Ok(self.inner.lock().await.rooms.get(id).cloned())
    }

    async fn customer_by_id(&self, id: &str) -> Result<Option<Customer>, StoreError> {
        Ok(self.inner.lock().await.customers.get(id).cloned())
    }

    async fn booking_by_id(&self, id: &str) -> Result<Option<Booking>, StoreError> {
        Ok(self.inner.lock().await.bookings.get(id).cloned())
    }

    async fn bookings_overlapping(
        &self,
        room_id: &str,
        stay: &StayRange,
    ) -> Result<Vec<Booking>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .bookings
            .values()
            .filter(|b| b.room_id == room_id && b.stay().overlaps(stay))
            .cloned()
            .collect())
    }

    async fn rooms_free_between(&self, stay: &StayRange) -> Result<Vec<Room>, StoreError> {
        let inner = self.inner.lock().await;
        let mut free: Vec<Room> = inner
            .rooms
            .values()
            .filter(|room| {
                !inner
                    .bookings
                    .values()
                    .any(|b| b.room_id == room.id && b.stay().overlaps(stay))
            })
            .cloned()
            .collect();
        free.sort_by(|a, b| a.room_number.cmp(&b.room_number));
        Ok(free)
    }

    async fn create_booking(
        &self,
        booking: &Booking,
        entry: &LedgerEntry,
        today: NaiveDate,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if !inner.rooms.contains_key(&booking.room_id) {
            return Err(StoreError::new("room does not exist"));
        }
        inner
            .bookings
            .insert(booking.id.clone(), booking.clone());
        inner.ledger.push(entry.clone());
        inner.refresh_availability(&booking.room_id, today);
        Ok(())
    }

    async fn cancel_booking(
        &self,
        booking_id: &str,
        entry: &LedgerEntry,
        today: NaiveDate,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let booking = inner
            .bookings
            .remove(booking_id)
            .ok_or_else(|| StoreError::new("booking does not exist"))?;

        inner.ledger.push(entry.clone());
        // Deleting the booking severs the link on every entry that
        // referenced it, the cancellation entry included, matching the
        // database's on-delete behavior.
        for existing in &mut inner.ledger {
            if existing.booking_id.as_deref() == Some(booking_id) {
                existing.booking_id = None;
            }
        }
        inner.refresh_availability(&booking.room_id, today);
        Ok(())
    }

    async fn latest_booking_entry(
        &self,
        booking_id: &str,
    ) -> Result<Option<LedgerEntry>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .ledger
            .iter()
            .rev()
            .find(|e| {
                e.entry_type == LedgerEntryType::Booking
                    && e.booking_id.as_deref() == Some(booking_id)
            })
            .cloned())
    }
}
