//! Minor-unit currency primitives.
//!
//! All money inside the booking engine is held as an integer count of
//! minor units (cents) so that nightly sums stay exact; decimal strings
//! only appear at the serialisation boundary. [`Money`] serialises as a
//! two-decimal string (`"120.00"`) and refuses inputs with more precision
//! than the minor unit can hold.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of minor units per major unit (cents per euro).
const MINOR_PER_MAJOR: i64 = 100;

/// Errors raised when parsing a decimal amount into [`Money`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMoneyError {
    /// The input was empty or contained no digits.
    #[error("amount must contain at least one digit")]
    Empty,
    /// A character other than digits, one `.`, or a leading `-` appeared.
    #[error("amount contains an invalid character")]
    InvalidCharacter,
    /// More fractional digits were supplied than the minor unit holds.
    #[error("amount supports at most {max} fractional digits")]
    TooPrecise {
        /// Maximum number of fractional digits accepted.
        max: u32,
    },
    /// The amount does not fit in the underlying integer representation.
    #[error("amount is out of range")]
    OutOfRange,
}

/// An exact currency amount stored as integer minor units.
///
/// # Examples
/// ```
/// use money::Money;
///
/// let nightly: Money = "120.00".parse().expect("valid amount");
/// assert_eq!(nightly, Money::from_minor(12_000));
/// assert_eq!(nightly.to_string(), "120.00");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Money(i64);

impl Money {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Construct from a raw count of minor units (cents).
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Construct from whole major units, if the result fits.
    #[must_use]
    pub const fn from_major(major: i64) -> Option<Self> {
        match major.checked_mul(MINOR_PER_MAJOR) {
            Some(minor) => Some(Self(minor)),
            None => None,
        }
    }

    /// Raw count of minor units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition; `None` on overflow.
    ///
    /// # Examples
    /// ```
    /// use money::Money;
    ///
    /// let a = Money::from_minor(5_000);
    /// let b = Money::from_minor(6_500);
    /// assert_eq!(a.checked_add(b), Some(Money::from_minor(11_500)));
    /// ```
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(minor) => Some(Self(minor)),
            None => None,
        }
    }

    /// Checked multiplication by a scalar count (e.g. nights); `None` on
    /// overflow.
    #[must_use]
    pub const fn checked_mul(self, count: i64) -> Option<Self> {
        match self.0.checked_mul(count) {
            Some(minor) => Some(Self(minor)),
            None => None,
        }
    }

    /// Render with the original application's default currency.
    ///
    /// # Examples
    /// ```
    /// use money::Money;
    ///
    /// assert_eq!(Money::from_minor(12_000).display_eur(), "€120.00");
    /// ```
    #[must_use]
    pub fn display_eur(self) -> String {
        format!("€{self}")
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{major}.{cents:02}")
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        if unsigned.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let (major_part, fraction_part) = match unsigned.split_once('.') {
            Some((major, fraction)) => (major, Some(fraction)),
            None => (unsigned, None),
        };
        if major_part.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let major = parse_digits(major_part)?;
        let cents = match fraction_part {
            None => 0,
            Some(fraction) if fraction.is_empty() => return Err(ParseMoneyError::Empty),
            Some(fraction) if fraction.len() > 2 => {
                return Err(ParseMoneyError::TooPrecise { max: 2 });
            }
            // "5" means fifty cents, "05" means five.
            Some(fraction) => {
                let raw = parse_digits(fraction)?;
                if fraction.len() == 1 { raw * 10 } else { raw }
            }
        };

        let minor = major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(cents))
            .ok_or(ParseMoneyError::OutOfRange)?;
        let signed = if negative {
            minor.checked_neg().ok_or(ParseMoneyError::OutOfRange)?
        } else {
            minor
        };
        Ok(Self(signed))
    }
}

fn parse_digits(part: &str) -> Result<i64, ParseMoneyError> {
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseMoneyError::InvalidCharacter);
    }
    part.parse::<i64>().map_err(|_| ParseMoneyError::OutOfRange)
}

impl TryFrom<String> for Money {
    type Error = ParseMoneyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Money> for String {
    fn from(value: Money) -> Self {
        value.to_string()
    }
}
