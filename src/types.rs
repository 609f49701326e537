//! Common Types Module
//!
//! Shared types used across the codebase to avoid circular dependencies.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single daily observation for one ticker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Calendar date of the observation (ISO 8601)
    pub date: NaiveDate,
    /// Dividend/split-adjusted closing price
    pub adj_close: Decimal,
    /// Traded volume, when the source provides it
    pub volume: Option<Decimal>,
}

/// Errors raised when constructing a [`PriceSeries`].
#[derive(Error, Debug)]
pub enum SeriesError {
    #[error("{ticker}: dates must be strictly increasing (violation at {date})")]
    NonMonotonicDates { ticker: String, date: NaiveDate },

    #[error("invalid ticker symbol: '{0}'")]
    InvalidTicker(String),
}

/// A date-indexed adjusted-close history for a single ticker.
///
/// Invariants enforced at construction: the ticker symbol is well-formed and
/// dates are strictly increasing (which also rules out duplicates). The series
/// is immutable once built; callers that need a different window fetch a new
/// series from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a validated series. An empty `points` vector is allowed and means
    /// "no data for this ticker in the requested window".
    pub fn new(ticker: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        let ticker = ticker.into();
        if !is_valid_ticker(&ticker) {
            return Err(SeriesError::InvalidTicker(ticker));
        }

        for window in points.windows(2) {
            if window[1].date <= window[0].date {
                return Err(SeriesError::NonMonotonicDates {
                    ticker,
                    date: window[1].date,
                });
            }
        }

        Ok(Self { ticker, points })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Check that a ticker symbol looks like an exchange symbol: non-empty,
/// uppercase alphanumerics plus `.` and `-` (e.g. "BRK.B", "BTC-USD").
pub fn is_valid_ticker(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol.len() <= 12
        && symbol
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '.' || c == '-')
}
