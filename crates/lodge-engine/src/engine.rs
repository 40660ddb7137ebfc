//! # Booking Engine
//!
//! Orchestrates the booking lifecycle: create, cancel, availability,
//! and receipt assembly. All policy lives here so stores stay dumb.
//!
//! ## Concurrency
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  create_booking(room R)                                     │
//! │                                                             │
//! │  validate ──▶ acquire lock(R) ──▶ overlap check ──▶ insert │
//! │                      │                                      │
//! │  a second create for R parks here until the first commits, │
//! │  so the check-then-insert window cannot double-book R.     │
//! │  Creates for other rooms proceed unblocked.                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

use lodge_core::payment::{
    booking_note, cancellation_note, display_payment_method, generate_payment_reference,
    parse_payment_note,
};
use lodge_core::validation::validate_stay;
use lodge_core::{
    ActorContext, Booking, Customer, LedgerEntry, LedgerEntryType, PaymentMethod, ReceiptRecord,
    Room, ValidationError,
};

use crate::error::EngineError;
use crate::store::BookingStore;

// =============================================================================
// Room Locks
// =============================================================================

/// Per-room advisory locks serializing the overlap check against the
/// booking insert. Lock entries accumulate per room id; rooms number in
/// the hundreds, so the map is never compacted.
struct RoomLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl RoomLocks {
    fn new() -> Self {
        RoomLocks {
            inner: Mutex::new(HashMap::new()),
        }
    }

    async fn acquire(&self, room_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(room_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Input for [`BookingEngine::create_booking`], after HTTP decoding.
#[derive(Debug, Clone)]
pub struct CreateBookingRequest {
    pub room_id: String,

    /// Target customer. Required for staff actors; ignored for
    /// customer actors, who always book against their own profile.
    pub customer_id: Option<String>,

    pub check_in: NaiveDate,
    pub check_out: NaiveDate,

    /// Required for customer actors. Optional for staff, recorded only
    /// when paired with a reference.
    pub payment_method: Option<String>,

    /// Optional caller-supplied reference; synthesized when blank for
    /// customer actors.
    pub payment_reference: Option<String>,
}

// =============================================================================
// Engine
// =============================================================================

/// The booking lifecycle engine.
///
/// Generic over its [`BookingStore`] so lifecycle tests run against an
/// in-memory store with a fixed clock.
pub struct BookingEngine<S> {
    store: S,
    locks: RoomLocks,
    clock: fn() -> DateTime<Utc>,
}

impl<S: BookingStore> BookingEngine<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Utc::now)
    }

    /// Builds an engine with a replaceable time source.
    pub fn with_clock(store: S, clock: fn() -> DateTime<Utc>) -> Self {
        BookingEngine {
            store,
            locks: RoomLocks::new(),
            clock,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Books a room for a stay.
    ///
    /// Staff book on behalf of any customer; payment details are
    /// recorded as given when both fields are supplied. Customers book
    /// for themselves and must name a payment method; the reference is
    /// synthesized when not supplied. The overlap check and insert run
    /// under the room's advisory lock.
    ///
    /// ## Example
    /// A $100.00/day room booked 2024-01-01 to 2024-01-03 records a
    /// 2-night booking and a BOOKING ledger entry of $200.00.
    pub async fn create_booking(
        &self,
        actor: &ActorContext,
        request: CreateBookingRequest,
    ) -> Result<Booking, EngineError> {
        let stay = validate_stay(request.check_in, request.check_out)?;

        let room = self
            .store
            .room_by_id(&request.room_id)
            .await?
            .ok_or_else(|| EngineError::not_found("room", &request.room_id))?;

        let (customer, payment) = self.resolve_actor_side(actor, &request).await?;

        let _guard = self.locks.acquire(&room.id).await;
        debug!(room_id = %room.id, "acquired room lock for booking create");

        let conflicts = self.store.bookings_overlapping(&room.id, &stay).await?;
        if !conflicts.is_empty() {
            debug!(
                room_id = %room.id,
                conflicts = conflicts.len(),
                "booking rejected, stay overlaps existing booking"
            );
            return Err(EngineError::StayConflict);
        }

        let now = (self.clock)();
        let amount = room.price().for_nights(stay.nights());
        let note = booking_note(
            &customer.name,
            &room.room_number,
            stay.check_in(),
            stay.check_out(),
            payment
                .as_ref()
                .map(|(method, reference)| (method.as_str(), reference.as_str())),
        );

        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            room_id: room.id.clone(),
            customer_id: customer.id.clone(),
            check_in: stay.check_in(),
            check_out: stay.check_out(),
            created_at: now,
        };

        let entry = LedgerEntry {
            id: Uuid::new_v4().to_string(),
            booking_id: Some(booking.id.clone()),
            entry_type: LedgerEntryType::Booking,
            amount_cents: amount.cents(),
            note,
            created_at: now,
        };

        self.store
            .create_booking(&booking, &entry, now.date_naive())
            .await?;

        info!(
            booking_id = %booking.id,
            room = %room.room_number,
            customer = %customer.name,
            nights = stay.nights(),
            amount = %amount,
            "booking created"
        );

        Ok(booking)
    }

    /// Resolves the customer being booked for, and the payment details
    /// to record, from the actor's role.
    async fn resolve_actor_side(
        &self,
        actor: &ActorContext,
        request: &CreateBookingRequest,
    ) -> Result<(Customer, Option<(String, String)>), EngineError> {
        if actor.is_staff {
            let customer_id = match request.customer_id.as_deref() {
                Some(id) if !id.trim().is_empty() => id,
                _ => {
                    return Err(ValidationError::Required {
                        field: "customer_id".to_string(),
                    }
                    .into())
                }
            };
            let customer = self
                .store
                .customer_by_id(customer_id)
                .await?
                .ok_or_else(|| EngineError::not_found("customer", customer_id))?;

            // Staff-supplied payment details are recorded as given; they
            // are optional and never synthesized.
            let payment = match (
                request.payment_method.as_deref().map(str::trim),
                request.payment_reference.as_deref().map(str::trim),
            ) {
                (Some(method), Some(reference)) if !method.is_empty() && !reference.is_empty() => {
                    Some((method.to_string(), reference.to_string()))
                }
                _ => None,
            };
            return Ok((customer, payment));
        }

        let customer_id = actor
            .customer_id
            .as_deref()
            .ok_or(EngineError::MissingProfile)?;
        let customer = self
            .store
            .customer_by_id(customer_id)
            .await?
            .ok_or(EngineError::MissingProfile)?;

        let method = request
            .payment_method
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or(EngineError::PaymentMethodRequired)?;
        let method =
            PaymentMethod::from_str(method).map_err(|_| EngineError::PaymentMethodRequired)?;

        let reference = match request.payment_reference.as_deref().map(str::trim) {
            Some(reference) if !reference.is_empty() => reference.to_string(),
            _ => generate_payment_reference(method, (self.clock)().date_naive()),
        };

        Ok((customer, Some((method.as_str().to_string(), reference))))
    }

    // =========================================================================
    // Cancel
    // =========================================================================

    /// Cancels a booking, recording a negative CANCELLATION ledger
    /// entry before the booking row is deleted.
    ///
    /// The refund is priced at the room's current rate, not the rate
    /// in force when the booking was made. A rate change between
    /// booking and cancellation therefore shifts the refund, which is
    /// accepted behavior.
    pub async fn cancel_booking(
        &self,
        actor: &ActorContext,
        booking_id: &str,
    ) -> Result<(), EngineError> {
        let booking = self
            .store
            .booking_by_id(booking_id)
            .await?
            .ok_or_else(|| EngineError::not_found("booking", booking_id))?;

        self.authorize_booking_access(actor, &booking)?;

        let room = self
            .store
            .room_by_id(&booking.room_id)
            .await?
            .ok_or_else(|| EngineError::not_found("room", &booking.room_id))?;
        let customer = self
            .store
            .customer_by_id(&booking.customer_id)
            .await?
            .ok_or_else(|| EngineError::not_found("customer", &booking.customer_id))?;

        // Held across the delete and availability recompute, so a racing
        // cancel or create for the same room waits its turn. The store
        // rejects the delete if the row is already gone, so a second
        // cancel cannot append another refund.
        let _guard = self.locks.acquire(&booking.room_id).await;
        debug!(room_id = %booking.room_id, "acquired room lock for booking cancel");

        let now = (self.clock)();
        let refund = room.price().for_nights(booking.nights());

        let entry = LedgerEntry {
            id: Uuid::new_v4().to_string(),
            booking_id: Some(booking.id.clone()),
            entry_type: LedgerEntryType::Cancellation,
            amount_cents: (-refund).cents(),
            note: cancellation_note(
                &customer.name,
                &room.room_number,
                booking.check_in,
                booking.check_out,
            ),
            created_at: now,
        };

        self.store
            .cancel_booking(&booking.id, &entry, now.date_naive())
            .await?;

        info!(
            booking_id = %booking.id,
            room = %room.room_number,
            refund = %refund,
            "booking cancelled"
        );

        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Rooms with no booking overlapping the requested stay.
    pub async fn list_available(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Vec<Room>, EngineError> {
        let stay = validate_stay(check_in, check_out)?;
        Ok(self.store.rooms_free_between(&stay).await?)
    }

    /// Fetches a booking, enforcing that customers only see their own.
    pub async fn get_booking(
        &self,
        actor: &ActorContext,
        booking_id: &str,
    ) -> Result<Booking, EngineError> {
        let booking = self
            .store
            .booking_by_id(booking_id)
            .await?
            .ok_or_else(|| EngineError::not_found("booking", booking_id))?;
        self.authorize_booking_access(actor, &booking)?;
        Ok(booking)
    }

    /// Assembles the receipt for a booking.
    ///
    /// Payment details are recovered from the BOOKING ledger entry's
    /// note; both fields fall back to `"N/A"` for bookings recorded
    /// without them.
    pub async fn receipt(
        &self,
        actor: &ActorContext,
        booking_id: &str,
    ) -> Result<ReceiptRecord, EngineError> {
        let booking = self.get_booking(actor, booking_id).await?;

        let room = self
            .store
            .room_by_id(&booking.room_id)
            .await?
            .ok_or_else(|| EngineError::not_found("room", &booking.room_id))?;
        let customer = self
            .store
            .customer_by_id(&booking.customer_id)
            .await?
            .ok_or_else(|| EngineError::not_found("customer", &booking.customer_id))?;

        let mut payment_method = "N/A".to_string();
        let mut payment_reference = "N/A".to_string();
        if let Some(entry) = self.store.latest_booking_entry(&booking.id).await? {
            if let Some((method, reference)) = parse_payment_note(&entry.note) {
                payment_method = display_payment_method(&method);
                payment_reference = reference;
            }
        }

        let nights = booking.nights();
        let rate = room.price();

        Ok(ReceiptRecord {
            booking_id: booking.id.clone(),
            customer: customer.name,
            room: format!("{} ({})", room.room_number, room.room_type),
            check_in: booking.check_in,
            check_out: booking.check_out,
            nights,
            rate_per_day: rate,
            total_paid: rate.for_nights(nights),
            payment_method,
            payment_reference,
            issued: booking.created_at,
        })
    }

    // =========================================================================
    // Policy
    // =========================================================================

    fn authorize_booking_access(
        &self,
        actor: &ActorContext,
        booking: &Booking,
    ) -> Result<(), EngineError> {
        if actor.is_staff || actor.customer_id.as_deref() == Some(booking.customer_id.as_str()) {
            return Ok(());
        }
        Err(EngineError::forbidden(
            "You do not have permission to access this booking.",
        ))
    }
}

// =============================================================================
// Lifecycle Tests
// =============================================================================
