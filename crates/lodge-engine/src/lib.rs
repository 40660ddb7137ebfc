//! # Lodge Engine
//!
//! Booking lifecycle for the Lodge hotel management system. Every
//! state change to bookings goes through [`BookingEngine`], which owns
//! policy, pricing, and conflict detection, and delegates persistence
//! to a [`BookingStore`] implementation.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       HTTP Handlers                         │
//! └───────────────────────────┬─────────────────────────────────┘
//!                             │ ActorContext + request
//!                             ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      BookingEngine                          │
//! │   validate stay ─ resolve actor ─ per-room lock ─ price    │
//! └───────────────────────────┬─────────────────────────────────┘
//!                             │ BookingStore trait
//!              ┌──────────────┴──────────────┐
//!              ▼                             ▼
//!       SqliteStore (lodge-db)        MemoryStore (tests)
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store is responsible for atomicity (booking row, ledger entry,
//! and room availability move together); the engine is responsible for
//! everything the database cannot express.

pub mod engine;
pub mod error;
pub mod memory;
pub mod store;

pub use engine::{BookingEngine, CreateBookingRequest};
pub use error::EngineError;
pub use memory::MemoryStore;
pub use store::{BookingStore, StoreError};
