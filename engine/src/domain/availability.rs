//! Availability checking: does a candidate stay collide with existing
//! bookings?

use serde::{Deserialize, Serialize};

use crate::domain::apartment::ApartmentId;
use crate::domain::booking::{Booking, BookingId, BookingRef};
use crate::domain::stay_range::StayRange;

/// Outcome of an availability check. Reports *every* conflicting booking,
/// not just the first, so callers can present full detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    /// Bookings the candidate stay collides with.
    pub conflicts: Vec<BookingRef>,
}

impl AvailabilityReport {
    /// True iff the conflict set is empty.
    pub fn is_available(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Check a candidate stay against existing bookings.
///
/// Only `Pending` and `Confirmed` bookings for the same apartment
/// participate; cancelled and completed stays never block. Intervals are
/// half-open, so back-to-back stays (one ending the day another begins)
/// do not conflict. `exclude` skips one booking id, supporting
/// re-validation of a booking being edited without it conflicting with
/// itself.
///
/// A linear scan over the apartment's bookings is deliberate: per-
/// apartment volumes are small, so no interval structure is warranted.
pub fn check_availability(
    apartment_id: ApartmentId,
    stay: &StayRange,
    existing: &[Booking],
    exclude: Option<BookingId>,
) -> AvailabilityReport {
    let conflicts = existing
        .iter()
        .filter(|booking| booking.apartment_id == apartment_id)
        .filter(|booking| exclude != Some(booking.id))
        .filter(|booking| booking.status.blocks_availability())
        .filter(|booking| booking.stay.overlaps(stay))
        .map(BookingRef::from)
        .collect();
    AvailabilityReport { conflicts }
}
