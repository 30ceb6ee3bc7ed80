//! Apartment aggregate: the root every booking and pricing rule hangs off.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use money::Money;

/// Stable apartment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApartmentId(Uuid);

impl ApartmentId {
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

impl fmt::Display for ApartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Listing lifecycle state. Inactive apartments stay in the catalogue for
/// administrators but cannot take new bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApartmentStatus {
    /// Bookable and publicly listed.
    Active,
    /// Hidden from the public flow; existing bookings are untouched.
    Inactive,
}

impl ApartmentStatus {
    /// Whether new bookings may be created against the apartment.
    pub fn is_bookable(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Validation errors raised for apartment records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApartmentValidationError {
    /// Display name is empty after trimming.
    EmptyName,
    /// Capacity of zero guests makes the listing unbookable.
    ZeroCapacity,
    /// Base nightly price must not be negative.
    NegativeBasePrice,
}

impl fmt::Display for ApartmentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "apartment name must not be empty"),
            Self::ZeroCapacity => write!(f, "apartment must sleep at least one guest"),
            Self::NegativeBasePrice => write!(f, "base nightly price must not be negative"),
        }
    }
}

impl std::error::Error for ApartmentValidationError {}

/// An apartment listing.
///
/// Photos are an ordered list of structurally valid URLs and amenities a
/// name-to-availability map; both are native structured fields (the
/// original application stored them as opaque encoded text) and are
/// validated once, at construction and again at the persistence boundary,
/// never re-parsed at read sites. The amenity map uses a `BTreeMap` so
/// iteration order is stable for rendering and serialisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Apartment {
    /// Stable identity.
    pub id: ApartmentId,
    /// Display name shown in the catalogue.
    pub name: String,
    /// Long-form listing description.
    pub description: String,
    /// Maximum number of guests the apartment sleeps.
    pub max_guests: u32,
    /// Nightly price applied when no pricing rule matches.
    pub base_price_per_night: Money,
    /// Ordered photo URLs; syntax-checked at the boundary.
    pub photos: Vec<Url>,
    /// Amenity name to availability flag.
    pub amenities: BTreeMap<String, bool>,
    /// Listing lifecycle state.
    pub status: ApartmentStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input shape for creating an apartment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApartmentDraft {
    /// Display name shown in the catalogue.
    pub name: String,
    /// Long-form listing description.
    pub description: String,
    /// Maximum number of guests the apartment sleeps.
    pub max_guests: u32,
    /// Nightly price applied when no pricing rule matches.
    pub base_price_per_night: Money,
    /// Ordered photo URLs.
    pub photos: Vec<Url>,
    /// Amenity name to availability flag.
    pub amenities: BTreeMap<String, bool>,
    /// Listing lifecycle state.
    pub status: ApartmentStatus,
}

impl Apartment {
    /// Validate a draft and mint a new apartment with a random id.
    pub fn new(draft: ApartmentDraft) -> Result<Self, ApartmentValidationError> {
        let apartment = Self {
            id: ApartmentId::random(),
            name: draft.name,
            description: draft.description,
            max_guests: draft.max_guests,
            base_price_per_night: draft.base_price_per_night,
            photos: draft.photos,
            amenities: draft.amenities,
            status: draft.status,
            created_at: Utc::now(),
        };
        apartment.validate()?;
        Ok(apartment)
    }

    /// Check record-level invariants; also invoked by persistence adapters
    /// before writes.
    pub fn validate(&self) -> Result<(), ApartmentValidationError> {
        if self.name.trim().is_empty() {
            return Err(ApartmentValidationError::EmptyName);
        }
        if self.max_guests == 0 {
            return Err(ApartmentValidationError::ZeroCapacity);
        }
        if self.base_price_per_night.is_negative() {
            return Err(ApartmentValidationError::NegativeBasePrice);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;

    fn draft() -> ApartmentDraft {
        ApartmentDraft {
            name: "Cozy Studio Downtown".to_owned(),
            description: "A charming studio apartment in the heart of the city.".to_owned(),
            max_guests: 2,
            base_price_per_night: Money::from_minor(5_000),
            photos: vec![
                "https://example.com/photos/studio-1.jpg"
                    .parse()
                    .expect("valid url"),
            ],
            amenities: BTreeMap::from([("wifi".to_owned(), true), ("parking".to_owned(), false)]),
            status: ApartmentStatus::Active,
        }
    }

    #[test]
    fn new_accepts_a_valid_draft() {
        let apartment = Apartment::new(draft()).expect("valid draft");
        assert!(apartment.status.is_bookable());
        assert_eq!(apartment.max_guests, 2);
    }

    #[test]
    fn rejects_blank_name() {
        let mut bad = draft();
        bad.name = "   ".to_owned();
        assert_eq!(
            Apartment::new(bad).expect_err("blank name"),
            ApartmentValidationError::EmptyName,
        );
    }

    #[test]
    fn rejects_zero_capacity() {
        let mut bad = draft();
        bad.max_guests = 0;
        assert_eq!(
            Apartment::new(bad).expect_err("zero capacity"),
            ApartmentValidationError::ZeroCapacity,
        );
    }

    #[test]
    fn rejects_negative_base_price() {
        let mut bad = draft();
        bad.base_price_per_night = Money::from_minor(-1);
        assert_eq!(
            Apartment::new(bad).expect_err("negative price"),
            ApartmentValidationError::NegativeBasePrice,
        );
    }

    #[test]
    fn inactive_apartments_are_not_bookable() {
        assert!(!ApartmentStatus::Inactive.is_bookable());
    }

    #[test]
    fn status_serialises_screaming_snake_case() {
        let json = serde_json::to_string(&ApartmentStatus::Active).expect("serialises");
        assert_eq!(json, "\"ACTIVE\"");
    }
}
