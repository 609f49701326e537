//! Panel alignment and cleaning.
//!
//! Reduces a set of price series with possibly different date coverage to a
//! common date axis. Rows are dropped whole: a date survives only if every
//! ticker has a usable (finite, positive) price on it.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, warn};

use super::error::EngineError;
use crate::types::PriceSeries;

/// A set of price series reduced to their common date axis.
///
/// Every column has exactly one `f64` value per date in [`AlignedPanel::dates`].
/// Columns are keyed in a `BTreeMap`, so iteration order is the tickers'
/// lexicographic order; the pair selector relies on this for its documented
/// first-wins tie-break.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPanel {
    dates: Vec<NaiveDate>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl AlignedPanel {
    /// Align a collection of series onto their common date axis.
    ///
    /// Prices are converted to `f64` here; observations that are missing,
    /// non-finite or non-positive (the log transform downstream needs
    /// positivity) are treated as absent, which excludes their whole row.
    ///
    /// # Errors
    /// `EmptyPanelError` when fewer than two tickers have any usable data, or
    /// when the date intersection is empty.
    pub fn from_series<'a, I>(series: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = &'a PriceSeries>,
    {
        // Per-ticker date -> price maps, keeping only usable observations
        let mut by_ticker: BTreeMap<String, HashMap<NaiveDate, f64>> = BTreeMap::new();

        for s in series {
            let mut usable: HashMap<NaiveDate, f64> = HashMap::with_capacity(s.len());
            for point in s.points() {
                match point.adj_close.to_f64() {
                    Some(price) if price.is_finite() && price > 0.0 => {
                        usable.insert(point.date, price);
                    }
                    _ => {
                        debug!(
                            ticker = s.ticker(),
                            date = %point.date,
                            "Dropping unusable observation"
                        );
                    }
                }
            }

            if usable.is_empty() {
                warn!(ticker = s.ticker(), "No usable observations, excluding ticker");
                continue;
            }
            by_ticker.insert(s.ticker().to_string(), usable);
        }

        if by_ticker.len() < 2 {
            return Err(EngineError::EmptyPanel {
                usable: by_ticker.len(),
            });
        }

        // Intersect dates across all remaining tickers
        let mut common: Option<Vec<NaiveDate>> = None;
        for prices in by_ticker.values() {
            common = Some(match common {
                None => prices.keys().copied().collect(),
                Some(dates) => dates
                    .into_iter()
                    .filter(|d| prices.contains_key(d))
                    .collect(),
            });
        }

        let mut dates = common.unwrap_or_default();
        if dates.is_empty() {
            return Err(EngineError::EmptyPanel {
                usable: by_ticker.len(),
            });
        }
        dates.sort_unstable();

        let columns = by_ticker
            .into_iter()
            .map(|(ticker, prices)| {
                let column = dates.iter().map(|d| prices[d]).collect();
                (ticker, column)
            })
            .collect();

        Ok(Self { dates, columns })
    }

    /// Common date axis, ascending
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Tickers in lexicographic order
    pub fn tickers(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Price column for one ticker, aligned to [`AlignedPanel::dates`]
    pub fn column(&self, ticker: &str) -> Option<&[f64]> {
        self.columns.get(ticker).map(Vec::as_slice)
    }

    /// Number of rows (common dates)
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn num_tickers(&self) -> usize {
        self.columns.len()
    }
}
