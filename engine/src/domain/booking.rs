//! Booking aggregate: an owned child of an apartment, referencing a guest.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use money::Money;

use crate::domain::apartment::ApartmentId;
use crate::domain::guest::GuestId;
use crate::domain::stay_range::StayRange;

/// Stable booking identifier, distinct from the guest-facing
/// confirmation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Wrap an existing UUID.
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation errors raised for booking records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingValidationError {
    /// A booking must bring at least one guest.
    ZeroGuests,
    /// Total price must not be negative.
    NegativeTotal,
    /// Confirmation codes are short uppercase alphanumeric strings.
    MalformedConfirmationCode,
}

impl fmt::Display for BookingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroGuests => write!(f, "booking must include at least one guest"),
            Self::NegativeTotal => write!(f, "booking total must not be negative"),
            Self::MalformedConfirmationCode => write!(
                f,
                "confirmation code must be 4-16 uppercase letters or digits",
            ),
        }
    }
}

impl std::error::Error for BookingValidationError {}

/// Guest-facing booking reference, globally unique across all bookings.
///
/// # Examples
/// ```
/// use engine::domain::ConfirmationCode;
///
/// let code = ConfirmationCode::new("BK7XQ2MN").expect("valid code");
/// assert_eq!(code.as_str(), "BK7XQ2MN");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConfirmationCode(String);

impl ConfirmationCode {
    /// Validate and construct a confirmation code.
    pub fn new(raw: impl Into<String>) -> Result<Self, BookingValidationError> {
        let raw = raw.into();
        let len_ok = (4..=16).contains(&raw.len());
        let chars_ok = raw
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
        if !len_ok || !chars_ok {
            return Err(BookingValidationError::MalformedConfirmationCode);
        }
        Ok(Self(raw))
    }

    /// Borrow the code.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ConfirmationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ConfirmationCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for ConfirmationCode {
    type Error = BookingValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConfirmationCode> for String {
    fn from(value: ConfirmationCode) -> Self {
        value.0
    }
}

/// Booking lifecycle state.
///
/// Only `Pending` and `Confirmed` bookings block availability; cancelled
/// and completed stays never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Created but not yet confirmed by an administrator.
    Pending,
    /// Confirmed; the stay will happen.
    Confirmed,
    /// Cancelled before the stay; terminal.
    Cancelled,
    /// The stay took place; terminal.
    Completed,
}

impl BookingStatus {
    /// Whether a booking in this state blocks overlapping requests.
    pub fn blocks_availability(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Allowed lifecycle moves: pending bookings may be confirmed or
    /// cancelled; confirmed bookings may be cancelled or completed;
    /// cancelled and completed are terminal.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed | Self::Cancelled)
                | (Self::Confirmed, Self::Cancelled | Self::Completed)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
        };
        f.write_str(label)
    }
}

/// A booking record.
///
/// ## Invariants
/// - the stay range covers at least one night ([`StayRange`] enforces it);
/// - `guest_count >= 1`; the creation workflow additionally caps it at the
///   apartment's capacity;
/// - the confirmation code is globally unique (repository-enforced).
///
/// A booking cannot outlive its apartment: deleting the apartment cascades
/// to its bookings at the persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Stable identity.
    pub id: BookingId,
    /// Owning apartment.
    pub apartment_id: ApartmentId,
    /// Booking guest.
    pub guest_id: GuestId,
    /// Guest-facing reference, unique across all bookings.
    pub confirmation_code: ConfirmationCode,
    /// Nights stayed, as a half-open interval.
    pub stay: StayRange,
    /// Number of guests staying.
    pub guest_count: u32,
    /// Total price for the whole stay.
    pub total_price: Money,
    /// Lifecycle state.
    pub status: BookingStatus,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Check record-level invariants; also invoked by persistence adapters
    /// before writes.
    pub fn validate(&self) -> Result<(), BookingValidationError> {
        if self.guest_count == 0 {
            return Err(BookingValidationError::ZeroGuests);
        }
        if self.total_price.is_negative() {
            return Err(BookingValidationError::NegativeTotal);
        }
        Ok(())
    }
}

/// Lightweight reference to a booking, used when reporting conflicts so
/// callers can render full detail without another fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRef {
    /// Stable identity of the conflicting booking.
    pub id: BookingId,
    /// Its guest-facing reference.
    pub confirmation_code: ConfirmationCode,
    /// The nights it occupies.
    pub stay: StayRange,
    /// Its lifecycle state.
    pub status: BookingStatus,
}

impl From<&Booking> for BookingRef {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            confirmation_code: booking.confirmation_code.clone(),
            stay: booking.stay,
            status: booking.status,
        }
    }
}
