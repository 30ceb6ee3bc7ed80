//! Seasonal pricing rules: date-windowed nightly price overrides.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use money::Money;

use crate::domain::apartment::ApartmentId;

/// Stable pricing-rule identifier. `Ord` so equal-priority,
/// equal-creation-time ties still resolve deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PricingRuleId(Uuid);

impl PricingRuleId {
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

impl fmt::Display for PricingRuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation errors raised for pricing-rule records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingRuleValidationError {
    /// Rule name is empty after trimming.
    EmptyName,
    /// The applicability window must not end before it starts.
    InvertedWindow,
    /// Override nightly price must not be negative.
    NegativePrice,
    /// A minimum stay of zero nights is meaningless.
    ZeroMinimumStay,
}

impl fmt::Display for PricingRuleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "pricing rule name must not be empty"),
            Self::InvertedWindow => write!(f, "pricing rule window must not end before it starts"),
            Self::NegativePrice => write!(f, "pricing rule price must not be negative"),
            Self::ZeroMinimumStay => write!(f, "minimum stay must be at least one night"),
        }
    }
}

impl std::error::Error for PricingRuleValidationError {}

/// A pricing rule owned by an apartment.
///
/// The applicability window `[start_date, end_date]` is inclusive on both
/// ends, unlike the half-open stay range: a rule ending on September 15
/// still prices the night of September 15. Overlapping windows are legal;
/// [`crate::domain::pricing`] breaks ties by priority, then recency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRule {
    /// Stable identity.
    pub id: PricingRuleId,
    /// Owning apartment.
    pub apartment_id: ApartmentId,
    /// Descriptive name, e.g. "Summer High Season".
    pub name: String,
    /// First day the rule applies (inclusive).
    pub start_date: NaiveDate,
    /// Last day the rule applies (inclusive).
    pub end_date: NaiveDate,
    /// Override nightly price while the rule applies.
    pub price_per_night: Money,
    /// Minimum stay length (nights) demanded when this rule prices the
    /// first night of a stay.
    pub min_stay_nights: Option<u32>,
    /// Higher priority wins when windows overlap.
    pub priority: i32,
    /// Inactive rules are ignored by resolution.
    pub active: bool,
    /// Creation timestamp; recency breaks priority ties.
    pub created_at: DateTime<Utc>,
}

impl PricingRule {
    /// Check record-level invariants; also invoked by persistence adapters
    /// before writes.
    pub fn validate(&self) -> Result<(), PricingRuleValidationError> {
        if self.name.trim().is_empty() {
            return Err(PricingRuleValidationError::EmptyName);
        }
        if self.end_date < self.start_date {
            return Err(PricingRuleValidationError::InvertedWindow);
        }
        if self.price_per_night.is_negative() {
            return Err(PricingRuleValidationError::NegativePrice);
        }
        if self.min_stay_nights == Some(0) {
            return Err(PricingRuleValidationError::ZeroMinimumStay);
        }
        Ok(())
    }

    /// Whether this rule prices the given night: it must be active and the
    /// night must fall inside the inclusive window.
    pub fn applies_on(&self, night: NaiveDate) -> bool {
        self.active && self.start_date <= night && night <= self.end_date
    }
}
