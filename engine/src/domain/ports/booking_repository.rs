//! Port for booking persistence.
//!
//! Inserting is where the engine's concurrency backstop lives: adapters
//! must reject writes that would overlap a blocking booking or reuse a
//! confirmation code, reporting the dedicated variants below so the
//! service can retry the workflow.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::apartment::ApartmentId;
use crate::domain::booking::{Booking, BookingId, BookingRef, BookingStatus, ConfirmationCode};

/// Errors surfaced by booking repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingRepositoryError {
    /// Repository connection could not be established.
    #[error("booking repository connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("booking repository query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// The write would overlap blocking bookings (commit-time backstop).
    #[error("stay overlaps {count} existing booking(s)", count = conflicts.len())]
    StayOverlap {
        /// The bookings the rejected write collided with.
        conflicts: Vec<BookingRef>,
    },
    /// The confirmation code is already in use.
    #[error("confirmation code {code} is already in use")]
    DuplicateConfirmationCode {
        /// The contested code.
        code: String,
    },
    /// No booking exists with the given id.
    #[error("booking {id} does not exist")]
    NotFound {
        /// The missing id.
        id: String,
    },
}

impl BookingRepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for the overlap backstop.
    pub fn stay_overlap(conflicts: Vec<BookingRef>) -> Self {
        Self::StayOverlap { conflicts }
    }

    /// Helper for confirmation-code collisions.
    pub fn duplicate_confirmation_code(code: impl Into<String>) -> Self {
        Self::DuplicateConfirmationCode { code: code.into() }
    }

    /// Helper for missing rows.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}

/// Port for reading and writing booking aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Fetch a booking by id.
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, BookingRepositoryError>;

    /// Fetch a booking by its guest-facing confirmation code.
    async fn find_by_confirmation_code(
        &self,
        code: &ConfirmationCode,
    ) -> Result<Option<Booking>, BookingRepositoryError>;

    /// List the apartment's bookings that block availability
    /// (`Pending` and `Confirmed` only).
    async fn list_blocking_for_apartment(
        &self,
        apartment_id: &ApartmentId,
    ) -> Result<Vec<Booking>, BookingRepositoryError>;

    /// List every booking for the apartment regardless of status.
    async fn list_for_apartment(
        &self,
        apartment_id: &ApartmentId,
    ) -> Result<Vec<Booking>, BookingRepositoryError>;

    /// Persist a new booking atomically, enforcing the overlap and
    /// confirmation-code backstops.
    async fn insert(&self, booking: &Booking) -> Result<(), BookingRepositoryError>;

    /// Update the lifecycle status of an existing booking.
    async fn update_status(
        &self,
        id: &BookingId,
        status: BookingStatus,
    ) -> Result<(), BookingRepositoryError>;
}

/// Fixture implementation for tests that do not exercise bookings.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookingRepository;

#[async_trait]
impl BookingRepository for FixtureBookingRepository {
    async fn find_by_id(&self, _id: &BookingId) -> Result<Option<Booking>, BookingRepositoryError> {
        Ok(None)
    }

    async fn find_by_confirmation_code(
        &self,
        _code: &ConfirmationCode,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        Ok(None)
    }

    async fn list_blocking_for_apartment(
        &self,
        _apartment_id: &ApartmentId,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_for_apartment(
        &self,
        _apartment_id: &ApartmentId,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _booking: &Booking) -> Result<(), BookingRepositoryError> {
        Ok(())
    }

    async fn update_status(
        &self,
        _id: &BookingId,
        _status: BookingStatus,
    ) -> Result<(), BookingRepositoryError> {
        Ok(())
    }
}
