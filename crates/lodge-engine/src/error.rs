//! # Engine Errors
//!
//! Failures surfaced by booking lifecycle operations. Messages are
//! user-facing and pass through the API layer unchanged.

use lodge_core::ValidationError;
use thiserror::Error;

use crate::store::StoreError;

/// Errors produced by [`crate::BookingEngine`] operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input failed a field-level validation rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested stay overlaps an existing booking for the room.
    ///
    /// ## When This Occurs
    /// Two stays conflict when each starts before the other ends. A
    /// stay that checks in on another's check-out day does not.
    #[error("Room is already booked for the selected date range.")]
    StayConflict,

    /// A customer account has no customer profile to book against.
    ///
    /// ## When This Occurs
    /// Profiles are created at registration, so this indicates account
    /// data created outside the normal flow.
    #[error("Customer profile not found.")]
    MissingProfile,

    /// A customer-initiated booking arrived without a usable payment method.
    #[error("Payment method is required. Choose mobile_money or bank_transfer.")]
    PaymentMethodRequired,

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The actor is authenticated but not allowed to perform this operation.
    #[error("{0}")]
    Forbidden(String),

    /// The storage layer failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        EngineError::Forbidden(message.into())
    }
}
