//! # Domain Types
//!
//! Core domain types used throughout Lodge.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Room        │   │    Customer     │   │    Booking      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  room_number    │   │  national_id    │   │  room_id (FK)   │       │
//! │  │  price_cents    │   │  account_id?    │   │  customer_id    │       │
//! │  │  is_available   │   │  name, phone    │   │  check_in/out   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  LedgerEntry    │   │ LedgerEntryType │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  booking_id?    │   │  Booking        │   │  MobileMoney    │       │
//! │  │  amount_cents   │   │  Cancellation   │   │  BankTransfer   │       │
//! │  │  note           │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (room_number, national_id, username) - human-readable, unique
//!
//! ## Ownership
//! Room and Customer are independent top-level entities. Booking is the
//! join point between them and exclusively owns its date range. A
//! LedgerEntry weakly references a Booking: deleting the booking nulls
//! the reference but the ledger row persists forever.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::money::Money;
use crate::stay::StayRange;

// =============================================================================
// Room
// =============================================================================

/// A room available for booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Room {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Unique human-facing room number ("101", "PH-2").
    pub room_number: String,

    /// Room category label ("Standard", "Deluxe").
    pub room_type: String,

    /// Nightly rate in cents (smallest currency unit).
    pub price_cents: i64,

    /// Derived availability flag.
    ///
    /// True iff no booking for this room has a check-out after today.
    /// Recomputed after every booking mutation; display only, NEVER used
    /// for conflict detection.
    pub is_available: bool,

    /// When the room was created.
    pub created_at: DateTime<Utc>,

    /// When the room was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Returns the nightly rate as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A booking-eligible customer profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Linked account, if any.
    ///
    /// One-to-one with an account; nulled if the account is deleted so
    /// the profile (and its booking history) survives.
    pub account_id: Option<String>,

    /// Display name.
    pub name: String,

    /// Contact phone number.
    pub phone: String,

    /// Nationally unique identifier string. Unique across all customers.
    pub national_id: String,

    /// When the profile was created.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Booking
// =============================================================================

/// A reservation of one room by one customer for a date range.
///
/// Invariant: `check_in < check_out` (strict). For any room, no two
/// simultaneously existing bookings overlap under the half-open rule.
/// Bookings are hard-deleted on cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Booking {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The booked room.
    pub room_id: String,

    /// The customer holding the reservation.
    pub customer_id: String,

    /// First occupied night.
    pub check_in: NaiveDate,

    /// Check-out morning (exclusive).
    pub check_out: NaiveDate,

    /// Immutable creation timestamp, set once.
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// The booking's stay range.
    ///
    /// The date-order invariant is enforced at creation and by the
    /// storage schema, so this conversion cannot fail.
    #[inline]
    pub fn stay(&self) -> StayRange {
        StayRange::from_parts_unchecked(self.check_in, self.check_out)
    }

    /// Number of nights booked.
    #[inline]
    pub fn nights(&self) -> i64 {
        self.stay().nights()
    }
}

// =============================================================================
// Ledger Entry Type
// =============================================================================

/// The kind of monetary event recorded in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum LedgerEntryType {
    /// A booking was created; amount is positive.
    Booking,
    /// A booking was cancelled; amount is negative.
    Cancellation,
}

impl LedgerEntryType {
    /// Wire/storage representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            LedgerEntryType::Booking => "BOOKING",
            LedgerEntryType::Cancellation => "CANCELLATION",
        }
    }
}

impl fmt::Display for LedgerEntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LedgerEntryType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BOOKING" => Ok(LedgerEntryType::Booking),
            "CANCELLATION" => Ok(LedgerEntryType::Cancellation),
            _ => Err(()),
        }
    }
}

// =============================================================================
// Ledger Entry
// =============================================================================

/// An append-only record of a monetary event tied to a booking.
///
/// Entries are never mutated or deleted. The booking reference is weak:
/// it is nulled when the booking is deleted, preserving the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LedgerEntry {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The booking this entry was recorded for, if it still exists.
    pub booking_id: Option<String>,

    /// BOOKING or CANCELLATION.
    pub entry_type: LedgerEntryType,

    /// Signed amount in cents: positive for BOOKING, negative for
    /// CANCELLATION.
    pub amount_cents: i64,

    /// Human-readable description. For customer bookings the payment
    /// method and reference are appended as `| payment: <m> (<r>)`.
    pub note: String,

    /// When the entry was appended.
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Returns the entry amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// Accepted payment methods for customer-initiated bookings.
///
/// Payment handling is intentionally shallow: the method is a label and
/// the reference an opaque string. There is no gateway integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Mobile money transfer.
    MobileMoney,
    /// Direct bank transfer.
    BankTransfer,
}

impl PaymentMethod {
    /// Wire representation ("mobile_money" / "bank_transfer").
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::MobileMoney => "mobile_money",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }

    /// Prefix used when synthesizing a payment reference.
    pub const fn reference_prefix(&self) -> &'static str {
        match self {
            PaymentMethod::BankTransfer => "BT",
            PaymentMethod::MobileMoney => "MM",
        }
    }

    /// All accepted wire names, for error messages.
    pub const fn allowed() -> [&'static str; 2] {
        ["mobile_money", "bank_transfer"]
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mobile_money" => Ok(PaymentMethod::MobileMoney),
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            _ => Err(()),
        }
    }
}

// =============================================================================
// Actor Context
// =============================================================================

/// Authorization context for an authenticated caller.
///
/// Carried into every engine call instead of scattering role checks
/// through the operations. A single policy decision per operation reads
/// from this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorContext {
    /// The authenticated account id.
    pub account_id: String,

    /// Staff actors may operate on any customer's data.
    pub is_staff: bool,

    /// The actor's own customer profile, if one exists.
    /// Staff accounts typically have none.
    pub customer_id: Option<String>,
}

impl ActorContext {
    /// A staff actor with no customer profile.
    pub fn staff(account_id: impl Into<String>) -> Self {
        ActorContext {
            account_id: account_id.into(),
            is_staff: true,
            customer_id: None,
        }
    }

    /// A customer actor bound to their own profile.
    pub fn customer(account_id: impl Into<String>, customer_id: impl Into<String>) -> Self {
        ActorContext {
            account_id: account_id.into(),
            is_staff: false,
            customer_id: Some(customer_id.into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_entry_type_roundtrip() {
        assert_eq!(LedgerEntryType::Booking.as_str(), "BOOKING");
        assert_eq!(
            "cancellation".parse::<LedgerEntryType>().unwrap(),
            LedgerEntryType::Cancellation
        );
        assert!("refund".parse::<LedgerEntryType>().is_err());
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!(
            " Mobile_Money ".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::MobileMoney
        );
        assert_eq!(
            "bank_transfer".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::BankTransfer
        );
        assert!("cash".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_reference_prefixes() {
        assert_eq!(PaymentMethod::BankTransfer.reference_prefix(), "BT");
        assert_eq!(PaymentMethod::MobileMoney.reference_prefix(), "MM");
    }

    #[test]
    fn test_booking_nights() {
        let booking = Booking {
            id: "b-1".to_string(),
            room_id: "r-1".to_string(),
            customer_id: "c-1".to_string(),
            check_in: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            created_at: Utc::now(),
        };
        assert_eq!(booking.nights(), 2);
    }
}
