// src/daycount.rs
//! Day counting and date parsing.
//!
//! Only the Actual/365 Fixed convention is supported: the year fraction is the
//! number of calendar days between two dates divided by 365, with no holiday
//! or business-day adjustment.

use crate::error::{PricerError, PricerResult};
use chrono::NaiveDate;

/// Date format accepted in option-chain records
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Actual/365 Fixed day counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Actual365Fixed;

impl Actual365Fixed {
    pub const DAYS_PER_YEAR: f64 = 365.0;

    /// Year fraction between `start` and `end`; negative when `end` precedes `start`
    pub fn year_fraction(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        (end - start).num_days() as f64 / Self::DAYS_PER_YEAR
    }

    /// Parses both dates and returns the year fraction between them
    pub fn year_fraction_str(&self, start: &str, end: &str) -> PricerResult<f64> {
        Ok(self.year_fraction(parse_date(start)?, parse_date(end)?))
    }
}

/// Parses an ISO `YYYY-MM-DD` date, surrounding whitespace ignored
pub fn parse_date(input: &str) -> PricerResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|e| PricerError::DateParse {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Clamps a non-positive time to maturity up to `min_ttm`.
///
/// Expired and same-day contracts would otherwise make d1/d2 singular.
pub fn clamp_time_to_maturity(ttm: f64, min_ttm: f64) -> f64 {
    if ttm <= 0.0 {
        min_ttm
    } else {
        ttm
    }
}
