//! # SQLite Booking Store
//!
//! The production [`BookingStore`]. Reads delegate to the
//! repositories; the two lifecycle writes run as single transactions
//! so a booking row, its ledger entry, and the room's availability
//! flag always move together.
//!
//! ## Create Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                      │
//! │    INSERT INTO bookings                                     │
//! │    INSERT INTO ledger_entries  (BOOKING, +amount)           │
//! │    UPDATE rooms SET is_available =                          │
//! │        NOT EXISTS (booking ending after today)              │
//! │  COMMIT                                                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cancellation is the mirror image: the CANCELLATION entry is
//! inserted first, then the booking row is deleted, which lets the
//! `ON DELETE SET NULL` foreign key clear the booking link on every
//! ledger entry that referenced it.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{debug, error};

use lodge_core::{Booking, Customer, LedgerEntry, Room, StayRange};
use lodge_engine::store::{BookingStore, StoreError};

use crate::error::DbError;
use crate::repository::booking::BookingRepository;
use crate::repository::customer::CustomerRepository;
use crate::repository::ledger::LedgerRepository;
use crate::repository::room::RoomRepository;

/// SQLite-backed booking store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates a new SqliteStore.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStore { pool }
    }

    fn rooms(&self) -> RoomRepository {
        RoomRepository::new(self.pool.clone())
    }

    fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.pool.clone())
    }

    fn bookings(&self) -> BookingRepository {
        BookingRepository::new(self.pool.clone())
    }

    fn ledger(&self) -> LedgerRepository {
        LedgerRepository::new(self.pool.clone())
    }
}

fn store_err(err: DbError) -> StoreError {
    error!(error = %err, "Booking store operation failed");
    StoreError::new(err.to_string())
}

/// Recomputes the derived availability flag inside a transaction.
async fn refresh_availability(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    room_id: &str,
    today: NaiveDate,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE rooms SET is_available = NOT EXISTS ( \
             SELECT 1 FROM bookings WHERE room_id = ? AND check_out > ? \
         ) WHERE id = ?",
    )
    .bind(room_id)
    .bind(today)
    .bind(room_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[async_trait]
impl BookingStore for SqliteStore {
    async fn room_by_id(&self, id: &str) -> Result<Option<Room>, StoreError> {
        self.rooms().find(id).await.map_err(store_err)
    }

    async fn customer_by_id(&self, id: &str) -> Result<Option<Customer>, StoreError> {
        self.customers().find(id).await.map_err(store_err)
    }

    async fn booking_by_id(&self, id: &str) -> Result<Option<Booking>, StoreError> {
        self.bookings().find(id).await.map_err(store_err)
    }

    async fn bookings_overlapping(
        &self,
        room_id: &str,
        stay: &StayRange,
    ) -> Result<Vec<Booking>, StoreError> {
        self.bookings()
            .overlapping(room_id, stay)
            .await
            .map_err(store_err)
    }

    async fn rooms_free_between(&self, stay: &StayRange) -> Result<Vec<Room>, StoreError> {
        self.rooms().available_between(stay).await.map_err(store_err)
    }

    async fn create_booking(
        &self,
        booking: &Booking,
        entry: &LedgerEntry,
        today: NaiveDate,
    ) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_err(DbError::TransactionFailed(e.to_string())))?;

        let result: Result<(), sqlx::Error> = async {
            sqlx::query(
                "INSERT INTO bookings (id, room_id, customer_id, check_in, check_out, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&booking.id)
            .bind(&booking.room_id)
            .bind(&booking.customer_id)
            .bind(booking.check_in)
            .bind(booking.check_out)
            .bind(booking.created_at)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO ledger_entries (id, booking_id, entry_type, amount_cents, note, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&entry.id)
            .bind(&entry.booking_id)
            .bind(entry.entry_type.as_str())
            .bind(entry.amount_cents)
            .bind(&entry.note)
            .bind(entry.created_at)
            .execute(&mut *tx)
            .await?;

            refresh_availability(&mut tx, &booking.room_id, today).await
        }
        .await;

        match result {
            Ok(()) => {
                tx.commit()
                    .await
                    .map_err(|e| store_err(DbError::TransactionFailed(e.to_string())))?;
                debug!(booking_id = %booking.id, "Booking transaction committed");
                Ok(())
            }
            Err(e) => {
                // Dropping tx rolls back; make it explicit.
                let _ = tx.rollback().await;
                Err(store_err(DbError::from(e)))
            }
        }
    }

    async fn cancel_booking(
        &self,
        booking_id: &str,
        entry: &LedgerEntry,
        today: NaiveDate,
    ) -> Result<(), StoreError> {
        let room_id: String = sqlx::query_scalar("SELECT room_id FROM bookings WHERE id = ?")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_err(DbError::from(e)))?
            .ok_or_else(|| StoreError::new(format!("booking not found: {booking_id}")))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_err(DbError::TransactionFailed(e.to_string())))?;

        let result: Result<(), DbError> = async {
            sqlx::query(
                "INSERT INTO ledger_entries (id, booking_id, entry_type, amount_cents, note, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&entry.id)
            .bind(&entry.booking_id)
            .bind(entry.entry_type.as_str())
            .bind(entry.amount_cents)
            .bind(&entry.note)
            .bind(entry.created_at)
            .execute(&mut *tx)
            .await?;

            // ON DELETE SET NULL clears booking_id on the ledger rows.
            let deleted = sqlx::query("DELETE FROM bookings WHERE id = ?")
                .bind(booking_id)
                .execute(&mut *tx)
                .await?;

            // A racing cancel already removed the row; rolling back keeps
            // this transaction's refund entry out of the ledger.
            if deleted.rows_affected() == 0 {
                return Err(DbError::not_found("Booking", booking_id));
            }

            refresh_availability(&mut tx, &room_id, today).await?;
            Ok(())
        }
        .await;

        match result {
            Ok(()) => {
                tx.commit()
                    .await
                    .map_err(|e| store_err(DbError::TransactionFailed(e.to_string())))?;
                debug!(booking_id = %booking_id, "Cancellation transaction committed");
                Ok(())
            }
            Err(e) => {
                let _ = tx.rollback().await;
                Err(store_err(e))
            }
        }
    }

    async fn latest_booking_entry(
        &self,
        booking_id: &str,
    ) -> Result<Option<LedgerEntry>, StoreError> {
        self.ledger()
            .latest_booking_entry(booking_id)
            .await
            .map_err(store_err)
    }
}

// =============================================================================
// Integration Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::customer::NewCustomer;
    use crate::repository::room::NewRoom;
    use chrono::{TimeZone, Utc};
    use lodge_core::{ActorContext, LedgerEntryType};
    use lodge_engine::{BookingEngine, CreateBookingRequest};

    fn fixed_clock() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 12, 1, 12, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seed(db: &Database) -> (String, String) {
        let room = db
            .rooms()
            .create(NewRoom {
                room_number: "101".to_string(),
                room_type: "Deluxe".to_string(),
                price_cents: 10000,
            })
            .await
            .unwrap();
        let customer = db
            .customers()
            .create(NewCustomer {
                account_id: None,
                name: "Ada Lovelace".to_string(),
                phone: "0700000000".to_string(),
                national_id: "NID-1".to_string(),
            })
            .await
            .unwrap();
        (room.id, customer.id)
    }

    fn create_request(room_id: &str, customer_id: &str) -> CreateBookingRequest {
        CreateBookingRequest {
            room_id: room_id.to_string(),
            customer_id: Some(customer_id.to_string()),
            check_in: date(2024, 1, 1),
            check_out: date(2024, 1, 3),
            payment_method: None,
            payment_reference: None,
        }
    }

    #[tokio::test]
    async fn test_engine_lifecycle_against_sqlite() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (room_id, customer_id) = seed(&db).await;
        let engine = BookingEngine::with_clock(db.store(), fixed_clock);
        let staff = ActorContext::staff("acct-staff");

        let booking = engine
            .create_booking(&staff, create_request(&room_id, &customer_id))
            .await
            .unwrap();

        // Availability flag flipped in the same transaction.
        let room = db.rooms().get(&room_id).await.unwrap();
        assert!(!room.is_available);

        let entries = db.ledger().list(&Default::default()).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].amount_cents, 20000);
        assert_eq!(entries[0].booking_id.as_deref(), Some(booking.id.as_str()));

        engine.cancel_booking(&staff, &booking.id).await.unwrap();

        let room = db.rooms().get(&room_id).await.unwrap();
        assert!(room.is_available);
        assert!(db.bookings().find(&booking.id).await.unwrap().is_none());

        // Both entries survive with the booking link cleared.
        let entries = db.ledger().list(&Default::default()).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.booking_id.is_none()));
        assert_eq!(entries[0].entry_type, LedgerEntryType::Cancellation);
        assert_eq!(entries[0].amount_cents, -20000);
    }

    #[tokio::test]
    async fn test_failed_create_leaves_no_ledger_entry() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (_, customer_id) = seed(&db).await;

        let now = fixed_clock();
        let booking = Booking {
            id: "b-1".to_string(),
            room_id: "no-such-room".to_string(),
            customer_id,
            check_in: date(2024, 1, 1),
            check_out: date(2024, 1, 3),
            created_at: now,
        };
        let entry = LedgerEntry {
            id: "e-1".to_string(),
            booking_id: Some("b-1".to_string()),
            entry_type: LedgerEntryType::Booking,
            amount_cents: 20000,
            note: String::new(),
            created_at: now,
        };

        let err = db
            .store()
            .create_booking(&booking, &entry, now.date_naive())
            .await;
        assert!(err.is_err());

        let entries = db.ledger().list(&Default::default()).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_of_removed_booking_appends_no_refund() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (room_id, customer_id) = seed(&db).await;
        let engine = BookingEngine::with_clock(db.store(), fixed_clock);
        let staff = ActorContext::staff("acct-staff");

        let booking = engine
            .create_booking(&staff, create_request(&room_id, &customer_id))
            .await
            .unwrap();
        engine.cancel_booking(&staff, &booking.id).await.unwrap();

        // A second cancel of the same booking must not land another
        // negative entry.
        let entry = LedgerEntry {
            id: "e-dup".to_string(),
            booking_id: None,
            entry_type: LedgerEntryType::Cancellation,
            amount_cents: -20000,
            note: String::new(),
            created_at: fixed_clock(),
        };
        let err = db
            .store()
            .cancel_booking(&booking.id, &entry, fixed_clock().date_naive())
            .await;
        assert!(err.is_err());

        let entries = db.ledger().list(&Default::default()).await.unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn test_overlap_queries_through_store() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (room_id, customer_id) = seed(&db).await;
        let engine = BookingEngine::with_clock(db.store(), fixed_clock);
        let staff = ActorContext::staff("acct-staff");

        engine
            .create_booking(&staff, create_request(&room_id, &customer_id))
            .await
            .unwrap();

        let none = engine
            .list_available(date(2024, 1, 2), date(2024, 1, 4))
            .await
            .unwrap();
        assert!(none.is_empty());

        let touching = engine
            .list_available(date(2024, 1, 3), date(2024, 1, 5))
            .await
            .unwrap();
        assert_eq!(touching.len(), 1);
    }
}
