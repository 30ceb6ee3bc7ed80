//! Pricing and availability engine for short-stay apartment bookings.
//!
//! The engine answers three questions: what does a stay cost (seasonal
//! pricing rules layered over a base nightly price), is the apartment
//! free (half-open intervals, so back-to-back stays never collide), and
//! can this booking be created (the orchestrated workflow in
//! [`domain::BookingService`]). Persistence sits behind the traits in
//! [`domain::ports`]; [`outbound`] ships an in-memory reference adapter
//! and a random confirmation-code generator.
//!
//! Quoting is a pure function once the apartment and its rules are in
//! hand:
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use chrono::NaiveDate;
//! use engine::domain::{Apartment, ApartmentDraft, ApartmentStatus, StayRange, quote_stay};
//! use money::Money;
//!
//! let apartment = Apartment::new(ApartmentDraft {
//!     name: "Spacious 2BR with Balcony".to_owned(),
//!     description: "Sleeps four, near the river.".to_owned(),
//!     max_guests: 4,
//!     base_price_per_night: Money::from_minor(8_000),
//!     photos: Vec::new(),
//!     amenities: BTreeMap::new(),
//!     status: ApartmentStatus::Active,
//! })?;
//!
//! let june = |day| NaiveDate::from_ymd_opt(2025, 6, day).expect("valid date");
//! let stay = StayRange::new(june(1), june(4))?;
//! let quote = quote_stay(&apartment, &[], &stay)?;
//! assert_eq!(quote.total, Money::from_minor(24_000));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod domain;
pub mod outbound;

pub use domain::{
    BookingCreated, BookingPolicy, BookingService, Error, ErrorCode, GuestSelector,
    NewBookingRequest, StayQuote, StayRange,
};
pub use outbound::{InMemoryStore, RandomCodes};
