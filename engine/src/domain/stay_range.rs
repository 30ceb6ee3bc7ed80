//! Half-open date interval shared by bookings, quotes, and availability.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::error::Error;

/// A stay expressed as the half-open interval `[start, end)`.
///
/// The interval covers the nights slept: a guest checking in on the 1st
/// and out on the 5th occupies the nights of the 1st through the 4th.
/// Using a half-open interval means back-to-back stays (one ending the
/// day another begins) never overlap.
///
/// ## Invariants
/// - `start < end`, so every range covers at least one night.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use engine::domain::StayRange;
///
/// let june = |day| NaiveDate::from_ymd_opt(2025, 6, day).expect("valid date");
/// let stay = StayRange::new(june(1), june(5)).expect("valid range");
/// assert_eq!(stay.nights(), 4);
/// assert!(!stay.contains_night(june(5)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "StayRangeDto", into = "StayRangeDto")]
pub struct StayRange {
    start: NaiveDate,
    end: NaiveDate,
}

/// Serialisation shape; re-validated on the way in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StayRangeDto {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl StayRange {
    /// Validate and construct a stay range.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, Error> {
        if end <= start {
            return Err(Error::invalid_range(start, end));
        }
        Ok(Self { start, end })
    }

    /// Check-in date (first night slept).
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Check-out date (first night *not* slept).
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of nights covered; always at least one.
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Iterate the nights in `[start, end)` in ascending order.
    pub fn iter_nights(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |night| *night < end)
    }

    /// Half-open intersection test: `[s1,e1)` and `[s2,e2)` overlap iff
    /// `s1 < e2 && s2 < e1`.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether the given night is slept within this stay.
    pub fn contains_night(&self, night: NaiveDate) -> bool {
        self.start <= night && night < self.end
    }
}

impl TryFrom<StayRangeDto> for StayRange {
    type Error = Error;

    fn try_from(dto: StayRangeDto) -> Result<Self, Self::Error> {
        Self::new(dto.start_date, dto.end_date)
    }
}

impl From<StayRange> for StayRangeDto {
    fn from(range: StayRange) -> Self {
        Self {
            start_date: range.start,
            end_date: range.end,
        }
    }
}
