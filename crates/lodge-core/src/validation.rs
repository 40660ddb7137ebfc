//! # Validation Module
//!
//! Input validation utilities for Lodge.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: API handler (Axum)                                           │
//! │  ├── Type validation (deserialization, date parsing)                   │
//! │  └── THIS MODULE: field-level rules                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Engine (lodge-engine)                                        │
//! │  ├── Lifecycle rules (overlap, actor policy)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE / CHECK constraints                             │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::{ValidationError, ValidationResult};
use crate::stay::StayRange;
use crate::{
    MAX_NAME_LEN, MAX_NATIONAL_ID_LEN, MAX_PHONE_LEN, MAX_ROOM_NUMBER_LEN, MAX_ROOM_TYPE_LEN,
    MAX_USERNAME_LEN, MIN_PASSWORD_LEN,
};

// =============================================================================
// String Validators
// =============================================================================

/// Shared rule for required, length-capped text fields.
fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a room number.
///
/// ## Rules
/// - Must not be empty
/// - At most 10 characters
///
/// ## Example
/// ```rust
/// use lodge_core::validation::validate_room_number;
///
/// assert!(validate_room_number("101").is_ok());
/// assert!(validate_room_number("").is_err());
/// ```
pub fn validate_room_number(room_number: &str) -> ValidationResult<()> {
    validate_text("room_number", room_number, MAX_ROOM_NUMBER_LEN)
}

/// Validates a room type label.
pub fn validate_room_type(room_type: &str) -> ValidationResult<()> {
    validate_text("room_type", room_type, MAX_ROOM_TYPE_LEN)
}

/// Validates a customer display name.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, MAX_NAME_LEN)
}

/// Validates a phone number. Format is not policed, only presence and size.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    validate_text("phone", phone, MAX_PHONE_LEN)
}

/// Validates a national identifier string.
pub fn validate_national_id(national_id: &str) -> ValidationResult<()> {
    validate_text("national_id", national_id, MAX_NATIONAL_ID_LEN)
}

/// Validates a username.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    validate_text("username", username, MAX_USERNAME_LEN)
}

/// Validates a password.
///
/// ## Rules
/// - At least 6 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a nightly rate in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (complimentary rooms)
///
/// ## Example
/// ```rust
/// use lodge_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(10_000).is_ok()); // $100.00
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Stay Validators
// =============================================================================

/// Validates a requested stay.
///
/// ## Rules
/// - `check_in < check_out` (strict)
///
/// ## Returns
/// The validated [`StayRange`].
pub fn validate_stay(check_in: NaiveDate, check_out: NaiveDate) -> ValidationResult<StayRange> {
    StayRange::new(check_in, check_out)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_room_number() {
        assert!(validate_room_number("101").is_ok());
        assert!(validate_room_number("PH-2").is_ok());
        assert!(validate_room_number("").is_err());
        assert!(validate_room_number("   ").is_err());
        assert!(validate_room_number("12345678901").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Ada Lovelace").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"A".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(10_000).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("12345").is_err());
    }

    #[test]
    fn test_validate_stay() {
        let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let jan3 = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();

        assert!(validate_stay(jan1, jan3).is_ok());
        assert!(validate_stay(jan3, jan1).is_err());
        assert!(validate_stay(jan1, jan1).is_err());
    }
}
