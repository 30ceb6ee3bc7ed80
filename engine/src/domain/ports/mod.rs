//! Driven ports: the persistence and code-generation boundary.
//!
//! Each collaborator is a trait with its own strongly typed error enum so
//! adapters map failures into predictable variants instead of returning
//! `anyhow::Result`. Every port ships a `Fixture*` no-op implementation
//! for tests that do not exercise it, and a mockall mock under `cfg(test)`.

mod apartment_repository;
mod booking_repository;
mod confirmation_codes;
mod guest_repository;
mod pricing_rule_repository;

#[cfg(test)]
pub use apartment_repository::MockApartmentRepository;
pub use apartment_repository::{
    ApartmentRepository, ApartmentRepositoryError, FixtureApartmentRepository,
};
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{BookingRepository, BookingRepositoryError, FixtureBookingRepository};
#[cfg(test)]
pub use confirmation_codes::MockConfirmationCodes;
pub use confirmation_codes::{ConfirmationCodes, ConfirmationCodesError, FixtureConfirmationCodes};
#[cfg(test)]
pub use guest_repository::MockGuestRepository;
pub use guest_repository::{FixtureGuestRepository, GuestRepository, GuestRepositoryError};
#[cfg(test)]
pub use pricing_rule_repository::MockPricingRuleRepository;
pub use pricing_rule_repository::{
    FixturePricingRuleRepository, PricingRuleRepository, PricingRuleRepositoryError,
};
