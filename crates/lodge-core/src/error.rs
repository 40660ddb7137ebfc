//! # Error Types
//!
//! Domain-specific error types for lodge-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  lodge-core errors (this file)                                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  lodge-engine errors (separate crate)                                  │
//! │  └── EngineError      - Lifecycle rule violations                      │
//! │                                                                         │
//! │  lodge-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  API errors (in server)                                                │
//! │  └── ApiError         - What clients see (400/401/403/404)             │
//! │                                                                         │
//! │  Flow: ValidationError → EngineError → ApiError → HTTP response        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, value, limit)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before lifecycle rules run.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// One field must come strictly after another.
    ///
    /// ## When This Occurs
    /// - check_out on or before check_in
    #[error("{field} must be later than {reference}")]
    MustBeAfter { field: String, reference: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., duplicate room number or national id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::Required {
            field: "room_number".to_string(),
        };
        assert_eq!(err.to_string(), "room_number is required");

        let err = ValidationError::MustBeAfter {
            field: "check_out".to_string(),
            reference: "check_in".to_string(),
        };
        assert_eq!(err.to_string(), "check_out must be later than check_in");

        let err = ValidationError::Duplicate {
            field: "national_id".to_string(),
            value: "A-1234".to_string(),
        };
        assert_eq!(err.to_string(), "national_id 'A-1234' already exists");
    }
}
