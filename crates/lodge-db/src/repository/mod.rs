//! # Repositories
//!
//! One repository per aggregate, each holding a cloned pool handle.
//! Repositories cover single-table reads and writes; the multi-table
//! booking lifecycle writes live in [`crate::store::SqliteStore`].

pub mod account;
pub mod booking;
pub mod customer;
pub mod ledger;
pub mod room;

pub use account::{Account, AccountRepository};
pub use booking::BookingRepository;
pub use customer::{CustomerRepository, NewCustomer};
pub use ledger::{LedgerFilter, LedgerRepository};
pub use room::{NewRoom, RoomRepository};
