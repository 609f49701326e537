//! Exhaustive pair scan over an aligned panel.
//!
//! Every unordered ticker pair is estimated independently and the pair with
//! the lowest cointegration p-value wins. Ties break to the first pair in
//! canonical (lexicographic) enumeration order, by strict less-than tracking.
//!
//! Note for users: scanning C(N,2) pairs and keeping the minimum p-value is a
//! multiple-comparisons procedure — the winning p-value overstates the
//! evidence, and the false-discovery risk grows with the universe size. Treat
//! the selected pair as a candidate for further validation, not a confirmed
//! relationship.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use super::align::AlignedPanel;
use super::config::EngineConfig;
use super::error::EngineError;
use super::estimator::{self, CointegrationResult};

/// Estimation outcome for one candidate pair.
#[derive(Debug, Clone, Serialize)]
pub struct PairResult {
    pub ticker_a: String,
    pub ticker_b: String,
    #[serde(flatten)]
    pub result: CointegrationResult,
}

impl PairResult {
    /// Header for the scan-report CSV
    pub fn csv_header() -> &'static str {
        "ticker_a,ticker_b,hedge_ratio,cointegration_statistic,cointegration_p_value,spread_adf_statistic,spread_adf_p_value"
    }

    /// One report row, numeric fields rounded to 4 decimal places
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{:.4},{:.4},{:.4},{:.4},{:.4}",
            self.ticker_a,
            self.ticker_b,
            self.result.hedge_ratio,
            self.result.cointegration_statistic,
            self.result.cointegration_p_value,
            self.result.spread_adf_statistic,
            self.result.spread_adf_p_value,
        )
    }
}

/// One row of the winning pair's charting series.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    /// log price of the winning pair's first ticker, rounded to 4 decimals
    pub log_price_a: f64,
    /// log price of the winning pair's second ticker, rounded to 4 decimals
    pub log_price_b: f64,
}

/// Scan outcome: the winner plus every evaluated candidate.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub best: PairResult,
    /// The winner's price history prepared for charting
    pub chart: Vec<ChartPoint>,
    /// All successfully estimated pairs, in enumeration order
    pub evaluated: Vec<PairResult>,
}

/// Evaluate all C(N,2) pairs in the panel and select the lowest
/// cointegration p-value.
///
/// Individual pair failures (short sample, constant regressor) are logged
/// with the pair identity and skipped; the scan fails only when no pair at
/// all could be estimated.
///
/// # Errors
/// `NoCointegratedPairError` when every candidate pair failed estimation.
pub fn select_best_pair(
    panel: &AlignedPanel,
    config: &EngineConfig,
) -> Result<ScanOutcome, EngineError> {
    let tickers = panel.tickers();
    let mut evaluated: Vec<PairResult> = Vec::new();
    let mut candidates = 0usize;
    let mut best: Option<usize> = None;

    for i in 0..tickers.len() {
        for j in (i + 1)..tickers.len() {
            let (ticker_a, ticker_b) = (tickers[i], tickers[j]);
            candidates += 1;

            let prices_a = panel.column(ticker_a).expect("panel column must exist");
            let prices_b = panel.column(ticker_b).expect("panel column must exist");

            match estimator::estimate_pair(
                ticker_a,
                prices_a,
                ticker_b,
                prices_b,
                config.min_observations,
            ) {
                Ok(result) => {
                    let is_better = match best {
                        Some(idx) => {
                            result.cointegration_p_value
                                < evaluated[idx].result.cointegration_p_value
                        }
                        None => true,
                    };
                    evaluated.push(PairResult {
                        ticker_a: ticker_a.to_string(),
                        ticker_b: ticker_b.to_string(),
                        result,
                    });
                    if is_better {
                        best = Some(evaluated.len() - 1);
                    }
                }
                Err(e) => {
                    warn!(
                        pair = format!("{}-{}", ticker_a, ticker_b),
                        error = %e,
                        "Skipping pair"
                    );
                }
            }
        }
    }

    let best_idx = best.ok_or(EngineError::NoCointegratedPair { candidates })?;
    let best = evaluated[best_idx].clone();

    info!(
        pair = format!("{}-{}", best.ticker_a, best.ticker_b),
        p_value = format!("{:.4}", best.result.cointegration_p_value),
        evaluated = evaluated.len(),
        candidates,
        "Scan complete"
    );

    let chart = chart_points(panel, &best.ticker_a, &best.ticker_b);

    Ok(ScanOutcome {
        best,
        chart,
        evaluated,
    })
}

/// Log-price chart rows for a pair, rounded to 4 decimals.
fn chart_points(panel: &AlignedPanel, ticker_a: &str, ticker_b: &str) -> Vec<ChartPoint> {
    let round4 = |v: f64| (v * 10_000.0).round() / 10_000.0;
    let a = panel.column(ticker_a).expect("panel column must exist");
    let b = panel.column(ticker_b).expect("panel column must exist");

    panel
        .dates()
        .iter()
        .zip(a.iter().zip(b.iter()))
        .map(|(date, (pa, pb))| ChartPoint {
            date: *date,
            log_price_a: round4(pa.ln()),
            log_price_b: round4(pb.ln()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PricePoint, PriceSeries};
    use rust_decimal::Decimal;

    /// Build a panel where `planted` pairs share a random walk (cointegrated)
    /// and the rest are independent walks.
    fn synthetic_panel(tickers: &[&str], shared: &[bool], n: usize) -> AlignedPanel {
        let start: NaiveDate = "2022-01-03".parse().unwrap();

        let mut state = 0x9E3779B97F4A7C15u64;
        let mut next = move || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 32) as f64 / (1u64 << 31) as f64) - 1.0
        };

        // One shared walk plus an independent walk per ticker
        let mut shared_walk = vec![0.0f64; n];
        let mut level = 0.0;
        for slot in shared_walk.iter_mut() {
            level += 0.02 * next();
            *slot = level;
        }

        let series: Vec<PriceSeries> = tickers
            .iter()
            .zip(shared.iter())
            .map(|(ticker, follows_shared)| {
                let mut own = 0.0f64;
                let points = (0..n)
                    .map(|t| {
                        let log_price = if *follows_shared {
                            4.0 + shared_walk[t] + 0.01 * next()
                        } else {
                            own += 0.02 * next();
                            4.0 + own
                        };
                        PricePoint {
                            date: start + chrono::Duration::days(t as i64),
                            adj_close: Decimal::from_f64_retain(log_price.exp()).unwrap(),
                            volume: None,
                        }
                    })
                    .collect();
                PriceSeries::new(*ticker, points).unwrap()
            })
            .collect();

        AlignedPanel::from_series(series.iter()).unwrap()
    }

    #[test]
    fn test_scan_evaluates_all_unordered_pairs() {
        let tickers = ["AAA", "BBB", "CCC", "DDD", "EEE"];
        let shared = [true, true, false, false, false];
        let panel = synthetic_panel(&tickers, &shared, 300);

        let outcome = select_best_pair(&panel, &EngineConfig::default()).unwrap();
        // C(5, 2) = 10 distinct pairs
        assert_eq!(outcome.evaluated.len(), 10);
    }

    #[test]
    fn test_winner_has_minimal_p_value() {
        let tickers = ["AAA", "BBB", "CCC", "DDD"];
        let shared = [true, true, false, false];
        let panel = synthetic_panel(&tickers, &shared, 300);

        let outcome = select_best_pair(&panel, &EngineConfig::default()).unwrap();
        for pair in &outcome.evaluated {
            assert!(
                outcome.best.result.cointegration_p_value <= pair.result.cointegration_p_value
            );
        }
        // The planted cointegrated pair should win
        assert_eq!(
            (outcome.best.ticker_a.as_str(), outcome.best.ticker_b.as_str()),
            ("AAA", "BBB")
        );
    }

    #[test]
    fn test_degenerate_pairs_skipped_not_fatal() {
        // One constant-price ticker: pairs against it fail as singular, the
        // remaining pair still wins.
        let start: NaiveDate = "2022-01-03".parse().unwrap();
        let constant: Vec<PricePoint> = (0..100)
            .map(|t| PricePoint {
                date: start + chrono::Duration::days(t),
                adj_close: Decimal::from(50),
                volume: None,
            })
            .collect();
        let constant = PriceSeries::new("ZZZ", constant).unwrap();

        let panel = synthetic_panel(&["AAA", "BBB"], &[true, true], 100);
        let mut series: Vec<PriceSeries> = panel
            .tickers()
            .iter()
            .map(|t| {
                let points = panel
                    .dates()
                    .iter()
                    .zip(panel.column(t).unwrap())
                    .map(|(date, close)| PricePoint {
                        date: *date,
                        adj_close: Decimal::from_f64_retain(*close).unwrap(),
                        volume: None,
                    })
                    .collect();
                PriceSeries::new(*t, points).unwrap()
            })
            .collect();
        series.push(constant);

        let panel = AlignedPanel::from_series(series.iter()).unwrap();
        let outcome = select_best_pair(&panel, &EngineConfig::default()).unwrap();

        assert_eq!(outcome.evaluated.len(), 1, "only AAA-BBB is estimable");
        assert_eq!(outcome.best.ticker_b, "BBB");
    }

    #[test]
    fn test_all_degenerate_fails() {
        let start: NaiveDate = "2022-01-03".parse().unwrap();
        let make_constant = |ticker: &str, price: i64| {
            let points = (0..50)
                .map(|t| PricePoint {
                    date: start + chrono::Duration::days(t),
                    adj_close: Decimal::from(price),
                    volume: None,
                })
                .collect();
            PriceSeries::new(ticker, points).unwrap()
        };

        let a = make_constant("AAA", 10);
        let b = make_constant("BBB", 20);
        let panel = AlignedPanel::from_series([&a, &b]).unwrap();

        let result = select_best_pair(&panel, &EngineConfig::default());
        assert!(matches!(
            result,
            Err(EngineError::NoCointegratedPair { candidates: 1 })
        ));
    }

    #[test]
    fn test_chart_uses_rounded_log_prices() {
        let panel = synthetic_panel(&["AAA", "BBB"], &[true, true], 60);
        let outcome = select_best_pair(&panel, &EngineConfig::default()).unwrap();

        assert_eq!(outcome.chart.len(), panel.len());
        for point in &outcome.chart {
            let rescaled = point.log_price_a * 10_000.0;
            assert!((rescaled - rescaled.round()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_csv_line_shape() {
        let panel = synthetic_panel(&["AAA", "BBB"], &[true, true], 60);
        let outcome = select_best_pair(&panel, &EngineConfig::default()).unwrap();

        assert_eq!(
            PairResult::csv_header().split(',').count(),
            outcome.best.to_csv_line().split(',').count()
        );
    }
}
