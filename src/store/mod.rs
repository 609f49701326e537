//! Price store: the engine's data-supply collaborator.
//!
//! The engine itself never performs I/O; everything it consumes arrives
//! through the [`PriceStore`] trait. The CSV-backed implementation is the
//! production path; [`MemoryStore`] serves tests and embedders that already
//! hold series in memory.

mod csv_store;

pub use csv_store::CsvStore;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use crate::types::{PriceSeries, SeriesError};

/// Errors from a price store implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed data for {ticker}: {reason}")]
    Malformed { ticker: String, reason: String },

    #[error("invalid series for {0}")]
    InvalidSeries(#[from] SeriesError),

    #[error("data error: {0}")]
    DataFrame(#[from] polars::prelude::PolarsError),
}

/// Supplies date-indexed adjusted-close history per ticker.
///
/// An unknown or delisted ticker yields an *empty* series — absence of data
/// is a normal outcome, not a failure of the caller's logic. Errors are
/// reserved for genuinely broken sources (unreadable files, malformed rows).
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Fetch the series for `ticker` within the inclusive `[start, end]`
    /// window, in ascending date order.
    async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, StoreError>;
}

/// Fetch a whole candidate universe, skipping tickers that fail or come back
/// empty. Failures are logged with the offending ticker and do not abort the
/// rest of the universe.
pub async fn fetch_universe(
    store: &dyn PriceStore,
    tickers: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> HashMap<String, PriceSeries> {
    let mut series = HashMap::with_capacity(tickers.len());

    for ticker in tickers {
        match store.fetch(ticker, start, end).await {
            Ok(s) if s.is_empty() => {
                warn!(ticker = %ticker, "No data in requested window, skipping");
            }
            Ok(s) => {
                series.insert(ticker.clone(), s);
            }
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "Fetch failed, skipping");
            }
        }
    }

    info!(
        requested = tickers.len(),
        loaded = series.len(),
        start = %start,
        end = %end,
        "Universe loaded"
    );
    series
}

/// In-memory store for tests and embedding callers.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    series: HashMap<String, PriceSeries>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, series: PriceSeries) {
        self.series.insert(series.ticker().to_string(), series);
    }
}

#[async_trait]
impl PriceStore for MemoryStore {
    async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, StoreError> {
        let points = self
            .series
            .get(ticker)
            .map(|s| {
                s.points()
                    .iter()
                    .copied()
                    .filter(|p| p.date >= start && p.date <= end)
                    .collect()
            })
            .unwrap_or_default();

        Ok(PriceSeries::new(ticker, points)?)
    }
}
