//! CSV-backed price store.
//!
//! Reads one file per ticker from a data directory, `<TICKER>.csv`, with a
//! `date,adj_close,vol` layout (the download pipeline's on-disk format).
//! Date cells may carry a full timestamp; only the leading `YYYY-MM-DD` is
//! used. A missing file means "no data for this ticker", not an error.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use polars::prelude::*;
use rust_decimal::Decimal;
use tracing::debug;

use super::{PriceStore, StoreError};
use crate::types::{PricePoint, PriceSeries};

/// Price store reading `<data_dir>/<TICKER>.csv` files.
#[derive(Debug, Clone)]
pub struct CsvStore {
    data_dir: PathBuf,
}

impl CsvStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn path_for(&self, ticker: &str) -> PathBuf {
        self.data_dir.join(format!("{ticker}.csv"))
    }
}

#[async_trait]
impl PriceStore for CsvStore {
    async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, StoreError> {
        let path = self.path_for(ticker);
        if !path.exists() {
            debug!(ticker, path = %path.display(), "No price file, returning empty series");
            return Ok(PriceSeries::new(ticker, Vec::new())?);
        }

        let owned_ticker = ticker.to_string();
        // File parsing is blocking work; keep it off the async runtime
        let points = tokio::task::spawn_blocking(move || {
            read_points(&path, &owned_ticker, start, end)
        })
        .await
        .map_err(|e| StoreError::Io(std::io::Error::other(e)))??;

        Ok(PriceSeries::new(ticker, points)?)
    }
}

fn read_points(
    path: &Path,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PricePoint>, StoreError> {
    let df = CsvReader::from_path(path)?.has_header(true).finish()?;

    let dates = df
        .column("date")
        .map_err(|_| malformed(ticker, "missing 'date' column"))?
        .utf8()
        .map_err(|_| malformed(ticker, "'date' column is not text"))?;
    let closes = df
        .column("adj_close")
        .map_err(|_| malformed(ticker, "missing 'adj_close' column"))?
        .cast(&DataType::Float64)?;
    let closes = closes.f64()?;

    // Volume is optional in the file layout
    let volumes = df
        .column("vol")
        .ok()
        .map(|s| s.cast(&DataType::Float64))
        .transpose()?;
    let volumes = volumes.as_ref().map(|s| s.f64()).transpose()?;

    let mut points = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let (Some(raw_date), Some(close)) = (dates.get(i), closes.get(i)) else {
            // Row with a missing required field: dropped, as in alignment
            continue;
        };

        let date = parse_date(raw_date).ok_or_else(|| {
            malformed(ticker, &format!("unparseable date '{raw_date}'"))
        })?;
        if date < start || date > end {
            continue;
        }

        let Some(adj_close) = Decimal::from_f64_retain(close) else {
            continue;
        };

        points.push(PricePoint {
            date,
            adj_close,
            volume: volumes
                .and_then(|v| v.get(i))
                .and_then(Decimal::from_f64_retain),
        });
    }

    points.sort_by_key(|p| p.date);
    Ok(points)
}

/// Accept plain dates and full timestamps ("2016-01-04 00:00:00-05:00").
fn parse_date(raw: &str) -> Option<NaiveDate> {
    raw.get(..10)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

fn malformed(ticker: &str, reason: &str) -> StoreError {
    StoreError::Malformed {
        ticker: ticker.to_string(),
        reason: reason.to_string(),
    }
}
