//! # Ledger Repository
//!
//! Read-side database operations for the financial ledger. Entries
//! are appended by [`crate::store::SqliteStore`] as part of booking
//! creation and cancellation; nothing updates or deletes them.
//!
//! ## Ordering
//! Newest first. Timestamps only have second precision, so entries
//! created in the same second tie-break on `rowid` (insertion order).

use sqlx::SqlitePool;

use crate::error::{DbError, DbResult};
use lodge_core::{LedgerEntry, LedgerEntryType};

/// Optional filters for listing ledger entries.
#[derive(Debug, Clone, Default)]
pub struct LedgerFilter {
    pub entry_type: Option<LedgerEntryType>,
    pub booking_id: Option<String>,
}

/// Repository for ledger database operations.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Fetches an entry by id.
    pub async fn get(&self, id: &str) -> DbResult<LedgerEntry> {
        let entry = sqlx::query_as::<_, LedgerEntry>(
            "SELECT id, booking_id, entry_type, amount_cents, note, created_at \
             FROM ledger_entries WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        entry.ok_or_else(|| DbError::not_found("LedgerEntry", id))
    }

    /// Entries matching the filter, newest first.
    pub async fn list(&self, filter: &LedgerFilter) -> DbResult<Vec<LedgerEntry>> {
        let mut sql = String::from(
            "SELECT id, booking_id, entry_type, amount_cents, note, created_at \
             FROM ledger_entries WHERE 1 = 1",
        );
        if filter.entry_type.is_some() {
            sql.push_str(" AND entry_type = ?");
        }
        if filter.booking_id.is_some() {
            sql.push_str(" AND booking_id = ?");
        }
        sql.push_str(" ORDER BY created_at DESC, rowid DESC");

        let mut query = sqlx::query_as::<_, LedgerEntry>(&sql);
        if let Some(entry_type) = filter.entry_type {
            query = query.bind(entry_type.as_str());
        }
        if let Some(booking_id) = &filter.booking_id {
            query = query.bind(booking_id);
        }

        let entries = query.fetch_all(&self.pool).await?;
        Ok(entries)
    }

    /// The most recent BOOKING-type entry for a booking, if any.
    pub async fn latest_booking_entry(&self, booking_id: &str) -> DbResult<Option<LedgerEntry>> {
        let entry = sqlx::query_as::<_, LedgerEntry>(
            "SELECT id, booking_id, entry_type, amount_cents, note, created_at \
             FROM ledger_entries \
             WHERE booking_id = ? AND entry_type = 'BOOKING' \
             ORDER BY created_at DESC, rowid DESC LIMIT 1",
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }
}
