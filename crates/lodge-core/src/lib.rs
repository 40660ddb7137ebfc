//! # lodge-core: Pure Business Logic for Lodge
//!
//! This crate is the **heart** of the Lodge booking backend. It contains
//! all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Lodge Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     apps/server (Axum)                          │   │
//! │  │    register, login, rooms, bookings, receipts, ledger          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  lodge-engine (lifecycle rules)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ lodge-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   stay    │  │  receipt  │  │   │
//! │  │   │   Room    │  │   Money   │  │ StayRange │  │ PDF bytes │  │   │
//! │  │   │  Booking  │  │  cents    │  │  overlap  │  │  record   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Room, Customer, Booking, LedgerEntry)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`stay`] - Stay date ranges and the half-open overlap rule
//! - [`payment`] - Payment references and ledger note formatting
//! - [`receipt`] - Receipt record and deterministic PDF rendering
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use lodge_core::money::Money;
//! use lodge_core::stay::StayRange;
//!
//! let check_in = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let check_out = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
//! let stay = StayRange::new(check_in, check_out).unwrap();
//!
//! // 2 nights at $100.00/day = $200.00
//! let rate = Money::from_cents(10_000);
//! assert_eq!((rate * stay.nights()).cents(), 20_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod payment;
pub mod receipt;
pub mod stay;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use lodge_core::Money` instead of
// `use lodge_core::money::Money`

pub use error::ValidationError;
pub use money::Money;
pub use receipt::ReceiptRecord;
pub use stay::StayRange;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a room number.
///
/// ## Business Reason
/// Room numbers are short labels ("101", "PH-2"); a hard cap keeps the
/// unique index small and catches obviously wrong input early.
pub const MAX_ROOM_NUMBER_LEN: usize = 10;

/// Maximum length of a room type label.
pub const MAX_ROOM_TYPE_LEN: usize = 50;

/// Maximum length of a customer display name.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of a phone number.
pub const MAX_PHONE_LEN: usize = 20;

/// Maximum length of a national identifier.
pub const MAX_NATIONAL_ID_LEN: usize = 50;

/// Maximum length of a username.
pub const MAX_USERNAME_LEN: usize = 150;

/// Minimum length of a password.
pub const MIN_PASSWORD_LEN: usize = 6;
