//! Booking workflows: quoting, availability queries, creation, and
//! lifecycle transitions.
//!
//! The service implements the driving side of the engine. Repositories
//! and the code generator are injected as constructed dependencies, not
//! module-level singletons, so the whole workflow is testable in
//! isolation.
//!
//! Concurrency: creation holds a per-apartment async mutex across
//! check -> quote -> persist, closing the check-then-act window inside
//! one process. The booking repository's insert-time overlap backstop
//! covers writers the lock cannot see (other processes, other service
//! instances); losing to the backstop retries the whole workflow once
//! before surfacing the failure, since availability and prices may have
//! legitimately changed. Read paths take no lock at all: they are
//! point-in-time snapshots, and staleness only risks a re-check failure
//! at booking time.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::domain::apartment::{Apartment, ApartmentId};
use crate::domain::availability::{AvailabilityReport, check_availability};
use crate::domain::booking::{Booking, BookingId, BookingStatus};
use crate::domain::error::Error;
use crate::domain::guest::{Guest, GuestDraft, GuestId};
use crate::domain::ports::{
    ApartmentRepository, BookingRepository, BookingRepositoryError, ConfirmationCodes,
    GuestRepository, GuestRepositoryError, PricingRuleRepository,
};
use crate::domain::pricing::{StayQuote, quote_stay};
use crate::domain::stay_range::StayRange;

/// Tunable workflow behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingPolicy {
    /// How many times a commit-time collision retries the whole workflow
    /// before surfacing. The race is rare, so one retry is the default.
    pub commit_retries: u32,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self { commit_retries: 1 }
    }
}

/// Which guest the booking belongs to: an existing record, or details
/// for a guest created on their first booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GuestSelector {
    /// Reference an already registered guest.
    Existing(GuestId),
    /// Register the guest as part of the booking. If the email already
    /// belongs to a guest, that record is reused.
    New(GuestDraft),
}

/// Input for [`BookingService::create_booking`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookingRequest {
    /// Apartment being booked.
    pub apartment_id: ApartmentId,
    /// Nights requested, as a half-open interval.
    pub stay: StayRange,
    /// Number of guests staying.
    pub guest_count: u32,
    /// Owning guest.
    pub guest: GuestSelector,
    /// Free-form notes carried onto the booking.
    pub notes: Option<String>,
}

/// Result of a successful creation: the persisted booking, the quote it
/// was priced from, and the resolved guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreated {
    /// The persisted booking, status `Pending`.
    pub booking: Booking,
    /// Nightly breakdown and total the booking was priced at.
    pub quote: StayQuote,
    /// The guest the booking belongs to.
    pub guest: Guest,
}

/// Outcome of one workflow attempt; commit-time collisions are retried.
enum AttemptError {
    Fatal(Error),
    Retryable(Error),
}

fn storage_error(err: impl std::fmt::Display) -> Error {
    Error::storage(err.to_string())
}

/// Booking service wiring the rate resolver and availability checker to
/// the persistence ports.
pub struct BookingService<A, B, G, P, C> {
    apartments: Arc<A>,
    bookings: Arc<B>,
    guests: Arc<G>,
    rules: Arc<P>,
    codes: Arc<C>,
    policy: BookingPolicy,
    locks: Mutex<HashMap<ApartmentId, Arc<tokio::sync::Mutex<()>>>>,
}

impl<A, B, G, P, C> BookingService<A, B, G, P, C>
where
    A: ApartmentRepository,
    B: BookingRepository,
    G: GuestRepository,
    P: PricingRuleRepository,
    C: ConfirmationCodes,
{
    /// Assemble the service from its collaborators.
    pub fn new(
        apartments: Arc<A>,
        bookings: Arc<B>,
        guests: Arc<G>,
        rules: Arc<P>,
        codes: Arc<C>,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            apartments,
            bookings,
            guests,
            rules,
            codes,
            policy,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Price a stay without booking it. Read-only snapshot; no locking.
    pub async fn quote(
        &self,
        apartment_id: &ApartmentId,
        stay: &StayRange,
    ) -> Result<StayQuote, Error> {
        let apartment = self.load_apartment(apartment_id).await?;
        let rules = self
            .rules
            .list_active_for_apartment(apartment_id)
            .await
            .map_err(storage_error)?;
        quote_stay(&apartment, &rules, stay)
    }

    /// Report which bookings a candidate stay collides with. Read-only
    /// snapshot; no locking.
    pub async fn availability(
        &self,
        apartment_id: &ApartmentId,
        stay: &StayRange,
        exclude: Option<BookingId>,
    ) -> Result<AvailabilityReport, Error> {
        let existing = self
            .bookings
            .list_blocking_for_apartment(apartment_id)
            .await
            .map_err(storage_error)?;
        Ok(check_availability(*apartment_id, stay, &existing, exclude))
    }

    /// Create a booking: capacity check, availability check, quote,
    /// confirmation code, guest resolution, persist as `Pending`.
    #[instrument(skip_all, fields(apartment_id = %request.apartment_id))]
    pub async fn create_booking(&self, request: NewBookingRequest) -> Result<BookingCreated, Error> {
        if request.guest_count == 0 {
            return Err(Error::conflict("booking must include at least one guest"));
        }

        let apartment = self.load_bookable_apartment(&request.apartment_id).await?;
        if request.guest_count > apartment.max_guests {
            return Err(Error::capacity_exceeded(
                apartment.max_guests,
                request.guest_count,
            ));
        }

        let lock = self.apartment_lock(request.apartment_id);
        let _guard = lock.lock().await;

        let mut retries_left = self.policy.commit_retries;
        loop {
            match self.try_create(&apartment, &request).await {
                Ok(created) => {
                    info!(
                        booking_id = %created.booking.id,
                        confirmation_code = %created.booking.confirmation_code,
                        total = %created.booking.total_price,
                        "booking created",
                    );
                    return Ok(created);
                }
                Err(AttemptError::Retryable(error)) if retries_left > 0 => {
                    retries_left -= 1;
                    warn!(%error, "booking commit collided; retrying workflow");
                }
                Err(AttemptError::Retryable(error) | AttemptError::Fatal(error)) => {
                    return Err(error);
                }
            }
        }
    }

    /// Confirm a pending booking.
    pub async fn confirm_booking(&self, id: &BookingId) -> Result<Booking, Error> {
        self.transition(id, BookingStatus::Confirmed).await
    }

    /// Cancel a pending or confirmed booking, releasing its nights.
    pub async fn cancel_booking(&self, id: &BookingId) -> Result<Booking, Error> {
        self.transition(id, BookingStatus::Cancelled).await
    }

    /// Mark a confirmed booking's stay as having taken place.
    pub async fn complete_booking(&self, id: &BookingId) -> Result<Booking, Error> {
        self.transition(id, BookingStatus::Completed).await
    }

    /// One pass through steps 2-6 of the creation workflow. Runs with the
    /// apartment lock held.
    async fn try_create(
        &self,
        apartment: &Apartment,
        request: &NewBookingRequest,
    ) -> Result<BookingCreated, AttemptError> {
        let existing = self
            .bookings
            .list_blocking_for_apartment(&apartment.id)
            .await
            .map_err(|err| AttemptError::Fatal(storage_error(err)))?;
        let report = check_availability(apartment.id, &request.stay, &existing, None);
        if !report.is_available() {
            return Err(AttemptError::Fatal(Error::date_conflict(report.conflicts)));
        }

        let rules = self
            .rules
            .list_active_for_apartment(&apartment.id)
            .await
            .map_err(|err| AttemptError::Fatal(storage_error(err)))?;
        let quote = quote_stay(apartment, &rules, &request.stay).map_err(AttemptError::Fatal)?;

        let code = self
            .codes
            .generate()
            .await
            .map_err(|err| AttemptError::Fatal(storage_error(err)))?;
        let guest = self.resolve_guest(&request.guest).await?;

        let booking = Booking {
            id: BookingId::random(),
            apartment_id: apartment.id,
            guest_id: guest.id,
            confirmation_code: code,
            stay: request.stay,
            guest_count: request.guest_count,
            total_price: quote.total,
            status: BookingStatus::Pending,
            notes: request.notes.clone(),
            created_at: Utc::now(),
        };
        booking
            .validate()
            .map_err(|err| AttemptError::Fatal(Error::conflict(err.to_string())))?;

        match self.bookings.insert(&booking).await {
            Ok(()) => Ok(BookingCreated {
                booking,
                quote,
                guest,
            }),
            Err(BookingRepositoryError::StayOverlap { conflicts }) => {
                Err(AttemptError::Retryable(Error::date_conflict(conflicts)))
            }
            Err(BookingRepositoryError::DuplicateConfirmationCode { code }) => {
                Err(AttemptError::Retryable(Error::conflict(format!(
                    "confirmation code {code} is already in use"
                ))))
            }
            Err(other) => Err(AttemptError::Fatal(storage_error(other))),
        }
    }

    /// Find the guest the booking belongs to, registering new guests on
    /// their first booking.
    async fn resolve_guest(&self, selector: &GuestSelector) -> Result<Guest, AttemptError> {
        match selector {
            GuestSelector::Existing(id) => self
                .guests
                .find_by_id(id)
                .await
                .map_err(|err| AttemptError::Fatal(storage_error(err)))?
                .ok_or_else(|| {
                    AttemptError::Fatal(Error::conflict(format!("guest {id} does not exist")))
                }),
            GuestSelector::New(draft) => {
                let found = self
                    .guests
                    .find_by_email(&draft.email)
                    .await
                    .map_err(|err| AttemptError::Fatal(storage_error(err)))?;
                if let Some(existing) = found {
                    return Ok(existing);
                }
                let guest = Guest::new(draft.clone())
                    .map_err(|err| AttemptError::Fatal(Error::conflict(err.to_string())))?;
                match self.guests.insert(&guest).await {
                    Ok(()) => Ok(guest),
                    // Concurrent first booking by the same guest; the retry
                    // will find the winning record by email.
                    Err(GuestRepositoryError::DuplicateEmail { email }) => {
                        Err(AttemptError::Retryable(Error::conflict(format!(
                            "guest email {email} was registered concurrently"
                        ))))
                    }
                    Err(other) => Err(AttemptError::Fatal(storage_error(other))),
                }
            }
        }
    }

    async fn transition(&self, id: &BookingId, next: BookingStatus) -> Result<Booking, Error> {
        let mut booking = self
            .bookings
            .find_by_id(id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| Error::conflict(format!("booking {id} does not exist")))?;
        if !booking.status.can_transition_to(next) {
            return Err(Error::conflict(format!(
                "booking {id} cannot move from {} to {next}",
                booking.status
            )));
        }
        self.bookings
            .update_status(id, next)
            .await
            .map_err(storage_error)?;
        booking.status = next;
        Ok(booking)
    }

    async fn load_apartment(&self, id: &ApartmentId) -> Result<Apartment, Error> {
        self.apartments
            .find_by_id(id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| Error::conflict(format!("apartment {id} does not exist")))
    }

    async fn load_bookable_apartment(&self, id: &ApartmentId) -> Result<Apartment, Error> {
        let apartment = self.load_apartment(id).await?;
        if !apartment.status.is_bookable() {
            return Err(Error::conflict(format!(
                "apartment {id} is not open for booking"
            )));
        }
        Ok(apartment)
    }

    fn apartment_lock(&self, id: ApartmentId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(id).or_default())
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
