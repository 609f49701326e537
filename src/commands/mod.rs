//! CLI command handlers.
//!
//! One handler per subcommand, delegating to the store and the engine.

mod metrics;
mod scan;
mod sectors;

pub use metrics::run_metrics;
pub use scan::run_scan;
pub use sectors::run_sectors;

use chrono::NaiveDate;

/// Parse a required/optional CLI date pair; a missing end date means today.
pub(crate) fn parse_window(
    start: &str,
    end: Option<&str>,
) -> Result<(NaiveDate, NaiveDate), Box<dyn std::error::Error>> {
    let start: NaiveDate = start
        .parse()
        .map_err(|e| format!("invalid start date '{start}': {e}"))?;
    let end: NaiveDate = match end {
        Some(raw) => raw
            .parse()
            .map_err(|e| format!("invalid end date '{raw}': {e}"))?,
        None => chrono::Utc::now().date_naive(),
    };
    if end < start {
        return Err(format!("end date {end} precedes start date {start}").into());
    }
    Ok((start, end))
}

/// Resolve a comma-separated ticker argument (or "default" + sector) into a
/// validated, deduplicated candidate list.
pub(crate) fn resolve_candidates(
    tickers_arg: &str,
    sector: &str,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let candidates: Vec<String> = if tickers_arg == "default" {
        crate::universe::sector_tickers(sector)
            .ok_or_else(|| {
                format!(
                    "unknown sector '{}'; available: {}",
                    sector,
                    crate::universe::sectors().join(", ")
                )
            })?
            .iter()
            .map(|s| s.to_string())
            .collect()
    } else {
        tickers_arg
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect()
    };

    let mut seen = std::collections::HashSet::new();
    let candidates: Vec<String> = candidates
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect();

    for ticker in &candidates {
        if !crate::types::is_valid_ticker(ticker) {
            return Err(format!("invalid ticker symbol '{ticker}'").into());
        }
    }
    Ok(candidates)
}
