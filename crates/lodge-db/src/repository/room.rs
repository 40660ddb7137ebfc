//! # Room Repository
//!
//! Database operations for the room inventory.
//!
//! ## Key Operations
//! - CRUD on rooms, listed in room-number order
//! - Availability search over a date range
//!
//! ## Availability Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  rooms_free_between(2024-01-02, 2024-01-04)                 │
//! │                                                             │
//! │  Room 101:  [01-01 ──────── 01-03)   ← overlaps, excluded  │
//! │  Room 102:  [01-04 ──────── 01-06)   ← touches, included   │
//! │  Room 103:  (no bookings)            ← included            │
//! │                                                             │
//! │  Two ranges overlap when each starts before the other      │
//! │  ends. Dates are ISO-8601 text, so `<` compares correctly. │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use lodge_core::{Room, StayRange};

/// Input for creating or replacing a room.
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub room_number: String,
    pub room_type: String,
    pub price_cents: i64,
}

/// Repository for room database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = RoomRepository::new(pool);
/// let rooms = repo.list().await?;
/// let room = repo.get("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct RoomRepository {
    pool: SqlitePool,
}

impl RoomRepository {
    /// Creates a new RoomRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RoomRepository { pool }
    }

    /// Creates a room. New rooms start out available.
    ///
    /// A duplicate room number surfaces as `DbError::UniqueViolation`.
    pub async fn create(&self, new: NewRoom) -> DbResult<Room> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(room_number = %new.room_number, "Creating room");

        sqlx::query(
            r#"
            INSERT INTO rooms (id, room_number, room_type, price_cents, is_available, created_at, updated_at)
            VALUES (?, ?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&new.room_number)
        .bind(&new.room_type)
        .bind(new.price_cents)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get(&id).await
    }

    /// Fetches a room by id.
    pub async fn get(&self, id: &str) -> DbResult<Room> {
        self.find(id)
            .await?
            .ok_or_else(|| DbError::not_found("Room", id))
    }

    /// Fetches a room by id, returning None when absent.
    pub async fn find(&self, id: &str) -> DbResult<Option<Room>> {
        let room = sqlx::query_as::<_, Room>(
            "SELECT id, room_number, room_type, price_cents, is_available, created_at, updated_at \
             FROM rooms WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    /// All rooms, ordered by room number.
    pub async fn list(&self) -> DbResult<Vec<Room>> {
        let rooms = sqlx::query_as::<_, Room>(
            "SELECT id, room_number, room_type, price_cents, is_available, created_at, updated_at \
             FROM rooms ORDER BY room_number",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    /// Replaces a room's details. The availability flag is untouched;
    /// it only moves with the room's bookings.
    pub async fn update(&self, id: &str, new: NewRoom) -> DbResult<Room> {
        let result = sqlx::query(
            "UPDATE rooms SET room_number = ?, room_type = ?, price_cents = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&new.room_number)
        .bind(&new.room_type)
        .bind(new.price_cents)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Room", id));
        }

        self.get(id).await
    }

    /// Deletes a room. Its bookings go with it; ledger entries for
    /// those bookings survive with their booking link cleared.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Room", id));
        }

        debug!(room_id = %id, "Room deleted");
        Ok(())
    }

    /// Rooms with no booking overlapping the given stay, ordered by
    /// room number.
    pub async fn available_between(&self, stay: &StayRange) -> DbResult<Vec<Room>> {
        let rooms = sqlx::query_as::<_, Room>(
            r#"
            SELECT id, room_number, room_type, price_cents, is_available, created_at, updated_at
            FROM rooms r
            WHERE NOT EXISTS (
                SELECT 1 FROM bookings b
                WHERE b.room_id = r.id
                  AND b.check_in < ?
                  AND ? < b.check_out
            )
            ORDER BY room_number
            "#,
        )
        .bind(stay.check_out())
        .bind(stay.check_in())
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn room(number: &str, price_cents: i64) -> NewRoom {
        NewRoom {
            room_number: number.to_string(),
            room_type: "Standard".to_string(),
            price_cents,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = test_db().await;
        let created = db.rooms().create(room("101", 10000)).await.unwrap();

        assert!(created.is_available);
        let fetched = db.rooms().get(&created.id).await.unwrap();
        assert_eq!(fetched.room_number, "101");
        assert_eq!(fetched.price_cents, 10000);
    }

    #[tokio::test]
    async fn test_duplicate_room_number_rejected() {
        let db = test_db().await;
        db.rooms().create(room("101", 10000)).await.unwrap();

        let err = db.rooms().create(room("101", 5000)).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_ordered_by_room_number() {
        let db = test_db().await;
        db.rooms().create(room("203", 10000)).await.unwrap();
        db.rooms().create(room("101", 10000)).await.unwrap();
        db.rooms().create(room("102", 10000)).await.unwrap();

        let numbers: Vec<String> = db
            .rooms()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.room_number)
            .collect();
        assert_eq!(numbers, vec!["101", "102", "203"]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = test_db().await;
        let created = db.rooms().create(room("101", 10000)).await.unwrap();

        let updated = db
            .rooms()
            .update(&created.id, room("101A", 12500))
            .await
            .unwrap();
        assert_eq!(updated.room_number, "101A");
        assert_eq!(updated.price_cents, 12500);

        db.rooms().delete(&created.id).await.unwrap();
        let err = db.rooms().get(&created.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
