//! # Lodge DB
//!
//! SQLite persistence for the Lodge hotel management system.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Database                             │
//! │         (pool + migrations + repository access)             │
//! │                                                             │
//! │  accounts()   rooms()   customers()   bookings()  ledger() │
//! │      │           │           │            │          │      │
//! │      ▼           ▼           ▼            ▼          ▼      │
//! │  AccountRepo RoomRepo  CustomerRepo BookingRepo LedgerRepo │
//! │                                                             │
//! │  store() ──▶ SqliteStore (BookingStore impl for the        │
//! │              booking engine; owns the transactional        │
//! │              create/cancel paths)                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories are thin: one struct per aggregate, cloned pool
//! handle, runtime-bound queries. Multi-table writes that must move
//! together live in [`SqliteStore`].

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use store::SqliteStore;
