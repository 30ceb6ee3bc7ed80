//! Domain model and workflows.
//!
//! Pure types and functions live in the leaf modules; anything touching
//! storage goes through the traits in [`ports`], and [`booking_service`]
//! orchestrates the creation workflow across them.

pub mod apartment;
pub mod availability;
pub mod booking;
pub mod booking_service;
pub mod error;
pub mod guest;
pub mod ports;
pub mod pricing;
pub mod pricing_rule;
pub mod stay_range;

pub use apartment::{Apartment, ApartmentDraft, ApartmentId, ApartmentStatus};
pub use availability::{AvailabilityReport, check_availability};
pub use booking::{Booking, BookingId, BookingRef, BookingStatus, ConfirmationCode};
pub use booking_service::{
    BookingCreated, BookingPolicy, BookingService, GuestSelector, NewBookingRequest,
};
pub use error::{Error, ErrorCode};
pub use guest::{EmailAddress, Guest, GuestDraft, GuestId};
pub use pricing::{NightlyRate, ResolvedNight, StayQuote, quote_stay, resolve_nightly_rate};
pub use pricing_rule::{PricingRule, PricingRuleId};
pub use stay_range::StayRange;
