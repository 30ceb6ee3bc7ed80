//! Domain-level error taxonomy.
//!
//! These errors are transport agnostic. Callers map them to form
//! validation messages, HTTP responses, or any other surface; none of
//! them is fatal to the process, and each booking attempt fails
//! independently of every other.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::booking::BookingRef;

/// Stable machine-readable code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The requested stay range is malformed.
    InvalidRange,
    /// The stay is shorter than a pricing rule's minimum.
    MinimumStayViolation,
    /// More guests requested than the apartment sleeps.
    CapacityExceeded,
    /// The stay overlaps existing bookings.
    DateConflict,
    /// The booking lost a commit-time race or hit stale state.
    Conflict,
    /// The persistence collaborator failed.
    Storage,
}

/// Errors surfaced by the pricing and availability engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// End date is not after the start date, the stay is absurdly long,
    /// or the priced total cannot be represented.
    #[error("stay must end after it starts ({start} to {end})")]
    InvalidRange {
        /// Requested check-in date.
        start: NaiveDate,
        /// Requested check-out date.
        end: NaiveDate,
    },
    /// The highest-priority rule for the first night demands a longer stay.
    #[error("stay of {requested_nights} nights is below the minimum of {required_nights}")]
    MinimumStayViolation {
        /// Minimum nights demanded by the selected pricing rule.
        required_nights: u32,
        /// Nights actually requested.
        requested_nights: u32,
    },
    /// Guest count exceeds the apartment's capacity.
    #[error("{requested} guests exceed the apartment capacity of {max_guests}")]
    CapacityExceeded {
        /// Maximum guests the apartment sleeps.
        max_guests: u32,
        /// Guests requested.
        requested: u32,
    },
    /// The requested dates overlap one or more blocking bookings.
    #[error("requested dates conflict with {count} existing booking(s)", count = conflicts.len())]
    DateConflict {
        /// Every booking the requested stay collides with.
        conflicts: Vec<BookingRef>,
    },
    /// Lost a concurrency race at commit time, or acted on stale state.
    #[error("booking could not be committed: {message}")]
    Conflict {
        /// Human-readable description of the collision.
        message: String,
    },
    /// The persistence collaborator failed; never retried by the engine.
    #[error("storage failure: {message}")]
    Storage {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl Error {
    /// Helper for malformed stay ranges.
    pub fn invalid_range(start: NaiveDate, end: NaiveDate) -> Self {
        Self::InvalidRange { start, end }
    }

    /// Helper for minimum-stay violations.
    pub fn minimum_stay(required_nights: u32, requested_nights: u32) -> Self {
        Self::MinimumStayViolation {
            required_nights,
            requested_nights,
        }
    }

    /// Helper for capacity violations.
    pub fn capacity_exceeded(max_guests: u32, requested: u32) -> Self {
        Self::CapacityExceeded {
            max_guests,
            requested,
        }
    }

    /// Helper for date conflicts, carrying the full conflict set.
    pub fn date_conflict(conflicts: Vec<BookingRef>) -> Self {
        Self::DateConflict { conflicts }
    }

    /// Helper for commit-time collisions.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Helper for persistence failures.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidRange { .. } => ErrorCode::InvalidRange,
            Self::MinimumStayViolation { .. } => ErrorCode::MinimumStayViolation,
            Self::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
            Self::DateConflict { .. } => ErrorCode::DateConflict,
            Self::Conflict { .. } => ErrorCode::Conflict,
            Self::Storage { .. } => ErrorCode::Storage,
        }
    }
}
