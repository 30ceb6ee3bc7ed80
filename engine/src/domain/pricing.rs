//! Rate resolution: per-night price selection and whole-stay quoting.
//!
//! Pure functions over already-fetched data; persistence stays behind the
//! ports and the service layer. All arithmetic runs in integer minor
//! units, summed night-ascending, so totals are exact and deterministic
//! regardless of rule iteration order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use money::Money;

use crate::domain::apartment::Apartment;
use crate::domain::error::Error;
use crate::domain::pricing_rule::PricingRule;
use crate::domain::stay_range::StayRange;

/// Upper bound on quotable stay length. Anything longer is a caller error
/// and keeps nightly sums far away from `i64` overflow.
pub const MAX_STAY_NIGHTS: i64 = 1_000;

/// The price selected for a single night, with the winning rule if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedNight<'a> {
    /// The night being priced.
    pub date: NaiveDate,
    /// Nightly price after rule resolution.
    pub price: Money,
    /// The rule that won, or `None` when the base price applied.
    pub rule: Option<&'a PricingRule>,
}

/// One line of a quote's nightly breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NightlyRate {
    /// The night being priced.
    pub date: NaiveDate,
    /// Price for that night.
    pub price: Money,
}

/// A complete stay quote: per-night breakdown plus the exact total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StayQuote {
    /// Per-night prices in ascending date order.
    pub nights: Vec<NightlyRate>,
    /// Sum of all nightly prices.
    pub total: Money,
}

/// Resolve the price for a single night.
///
/// Active rules whose inclusive window contains `night` compete; the
/// highest `priority` wins, ties broken by most recent `created_at`, then
/// by rule id. The ordering is total, so the outcome never depends on the
/// order rules were fetched in. With no match the apartment's base price
/// applies.
pub fn resolve_nightly_rate<'a>(
    base_price: Money,
    rules: &'a [PricingRule],
    night: NaiveDate,
) -> ResolvedNight<'a> {
    let winner = rules
        .iter()
        .filter(|rule| rule.applies_on(night))
        .max_by_key(|rule| (rule.priority, rule.created_at, rule.id));
    ResolvedNight {
        date: night,
        price: winner.map_or(base_price, |rule| rule.price_per_night),
        rule: winner,
    }
}

/// Quote an entire stay for an apartment.
///
/// Resolves every night in the half-open range independently (rates may
/// change night to night when rule boundaries fall inside the stay) and
/// sums in ascending date order. If the rule selected for the *first*
/// night carries a minimum stay longer than the request, the quote fails
/// with [`Error::MinimumStayViolation`] carrying the required nights.
pub fn quote_stay(
    apartment: &Apartment,
    rules: &[PricingRule],
    stay: &StayRange,
) -> Result<StayQuote, Error> {
    let requested_nights = stay.nights();
    if requested_nights > MAX_STAY_NIGHTS {
        return Err(Error::invalid_range(stay.start(), stay.end()));
    }

    let first_night = resolve_nightly_rate(apartment.base_price_per_night, rules, stay.start());
    if let Some(required) = first_night.rule.and_then(|rule| rule.min_stay_nights)
        && requested_nights < i64::from(required)
    {
        let requested = u32::try_from(requested_nights).unwrap_or(u32::MAX);
        return Err(Error::minimum_stay(required, requested));
    }

    let mut nights = Vec::with_capacity(usize::try_from(requested_nights).unwrap_or_default());
    let mut total = Money::ZERO;
    for date in stay.iter_nights() {
        let resolved = resolve_nightly_rate(apartment.base_price_per_night, rules, date);
        // An overflowing total means the request itself is unpriceable.
        total = total
            .checked_add(resolved.price)
            .ok_or_else(|| Error::invalid_range(stay.start(), stay.end()))?;
        nights.push(NightlyRate {
            date,
            price: resolved.price,
        });
    }

    Ok(StayQuote { nights, total })
}

#[cfg(test)]
#[path = "pricing_tests.rs"]
mod tests;
