//! Pairwise cointegration estimation.
//!
//! Follows the Engle-Granger two-step convention on log prices: an OLS hedge
//! regression of log(A) on log(B), a cointegration test on the regression
//! residuals, and a separate ADF test on the hedge spread itself. Log prices
//! are used uniformly for the regression, the spread construction and the
//! unit-root tests.

use serde::Serialize;
use tracing::debug;

use super::error::EngineError;
use super::regression;
use super::stationarity::{self, Surface};

/// Cointegration metrics for one ordered pair (A regressed on B).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CointegrationResult {
    /// OLS slope of log(A) on log(B): units of A exposure hedged per unit of B
    pub hedge_ratio: f64,
    /// OLS intercept of the hedge regression
    pub intercept: f64,
    /// Dickey-Fuller statistic of the cointegrating-regression residuals
    pub cointegration_statistic: f64,
    /// Approximate p-value on the Engle-Granger surface
    pub cointegration_p_value: f64,
    /// ADF statistic of the hedge spread log(A) - hedge_ratio * log(B)
    pub spread_adf_statistic: f64,
    /// Approximate p-value on the ADF surface
    pub spread_adf_p_value: f64,
}

/// Construct the hedge spread `log(a) - hedge_ratio * log(b)` from raw prices.
///
/// Callers guarantee positivity (the aligned panel drops non-positive rows).
pub fn log_spread(prices_a: &[f64], prices_b: &[f64], hedge_ratio: f64) -> Vec<f64> {
    prices_a
        .iter()
        .zip(prices_b.iter())
        .map(|(a, b)| a.ln() - hedge_ratio * b.ln())
        .collect()
}

/// Estimate the cointegration relationship between two aligned price series.
///
/// # Errors
/// - `InsufficientDataError` when the aligned sample is shorter than
///   `min_observations` (or the series lengths disagree).
/// - `SingularRegressionError` when `ticker_b`'s log prices are constant,
///   making the hedge regression degenerate.
pub fn estimate_pair(
    ticker_a: &str,
    prices_a: &[f64],
    ticker_b: &str,
    prices_b: &[f64],
    min_observations: usize,
) -> Result<CointegrationResult, EngineError> {
    let min_required = min_observations.max(stationarity::MIN_TEST_LEN);
    if prices_a.len() != prices_b.len() {
        return Err(EngineError::InsufficientData {
            expected: min_required,
            actual: prices_a.len().min(prices_b.len()),
        });
    }
    if prices_a.len() < min_required {
        return Err(EngineError::InsufficientData {
            expected: min_required,
            actual: prices_a.len(),
        });
    }

    let log_a: Vec<f64> = prices_a.iter().map(|p| p.ln()).collect();
    let log_b: Vec<f64> = prices_b.iter().map(|p| p.ln()).collect();

    let fit = regression::ols(&log_a, &log_b).ok_or_else(|| EngineError::SingularRegression {
        ticker: ticker_b.to_string(),
    })?;

    // Cointegration test on the regression residuals. A degenerate test
    // regression (e.g. perfectly collinear inputs leave residuals with no
    // variance) is reported as "no evidence either way" rather than an error.
    let residual_test = stationarity::unit_root_test(&fit.residuals, Surface::EngleGranger)
        .unwrap_or(stationarity::UnitRootTest {
            statistic: 0.0,
            p_value: 1.0,
        });

    let spread = log_spread(prices_a, prices_b, fit.slope);
    let spread_test = stationarity::unit_root_test(&spread, Surface::Adf).unwrap_or(
        stationarity::UnitRootTest {
            statistic: 0.0,
            p_value: 1.0,
        },
    );

    debug!(
        pair = format!("{}-{}", ticker_a, ticker_b),
        hedge_ratio = format!("{:.4}", fit.slope),
        coint_p = format!("{:.4}", residual_test.p_value),
        spread_adf_p = format!("{:.4}", spread_test.p_value),
        "Pair estimated"
    );

    Ok(CointegrationResult {
        hedge_ratio: fit.slope,
        intercept: fit.intercept,
        cointegration_statistic: residual_test.statistic,
        cointegration_p_value: residual_test.p_value,
        spread_adf_statistic: spread_test.statistic,
        spread_adf_p_value: spread_test.p_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shared pseudo-random walk plus optional stationary noise, exponentiated
    /// so the log transform recovers the construction exactly.
    fn exp_walk(n: usize, seed: u64, noise_scale: f64) -> (Vec<f64>, Vec<f64>) {
        let mut state = seed;
        let mut next = move || {
            // Linear congruential step (Numerical Recipes constants)
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 32) as f64 / (1u64 << 31) as f64) - 1.0
        };

        let mut walk = 0.0f64;
        let mut a = Vec::with_capacity(n);
        let mut b = Vec::with_capacity(n);
        for _ in 0..n {
            walk += 0.02 * next();
            let eps = noise_scale * next();
            a.push((4.0 + walk + eps).exp());
            b.push((4.0 + walk).exp());
        }
        (a, b)
    }

    #[test]
    fn test_collinear_pair_recovers_scale() {
        // a = k * b exactly: log(a) = ln(k) + log(b), so the hedge ratio is 1
        // and the intercept is ln(k).
        let (_, b) = exp_walk(120, 7, 0.0);
        let a: Vec<f64> = b.iter().map(|p| 3.0 * p).collect();

        let result = estimate_pair("AAA", &a, "BBB", &b, 20).unwrap();
        assert!((result.hedge_ratio - 1.0).abs() < 1e-9);
        assert!((result.intercept - 3.0f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_cointegrated_pair_detected() {
        let (a, b) = exp_walk(500, 42, 0.01);

        let result = estimate_pair("AAA", &a, "BBB", &b, 20).unwrap();
        assert!(
            (result.hedge_ratio - 1.0).abs() < 0.05,
            "hedge ratio should be near 1.0, got {}",
            result.hedge_ratio
        );
        assert!(
            result.cointegration_p_value < 0.05,
            "shared-walk pair should test as cointegrated, p = {}",
            result.cointegration_p_value
        );
    }

    #[test]
    fn test_independent_walks_not_flagged() {
        let (a, _) = exp_walk(500, 1, 0.0);
        let (c, _) = exp_walk(500, 99, 0.0);

        let result = estimate_pair("AAA", &a, "CCC", &c, 20).unwrap();
        assert!(
            result.cointegration_p_value > 0.10,
            "independent walks should not look cointegrated, p = {}",
            result.cointegration_p_value
        );
    }

    #[test]
    fn test_p_values_in_unit_interval() {
        let (a, b) = exp_walk(300, 5, 0.5);
        let result = estimate_pair("AAA", &a, "BBB", &b, 20).unwrap();
        assert!((0.0..=1.0).contains(&result.cointegration_p_value));
        assert!((0.0..=1.0).contains(&result.spread_adf_p_value));
    }

    #[test]
    fn test_short_series_rejected() {
        let a = vec![10.0; 10];
        let b = vec![20.0; 10];
        let result = estimate_pair("AAA", &a, "BBB", &b, 20);
        assert!(matches!(
            result,
            Err(EngineError::InsufficientData { expected: 20, actual: 10 })
        ));
    }

    #[test]
    fn test_constant_regressor_is_singular() {
        let (a, _) = exp_walk(100, 3, 0.0);
        let b = vec![50.0; 100];
        let result = estimate_pair("AAA", &a, "BBB", &b, 20);
        assert!(matches!(
            result,
            Err(EngineError::SingularRegression { ticker }) if ticker == "BBB"
        ));
    }

    #[test]
    fn test_log_spread_construction() {
        let a = vec![100.0, 110.0];
        let b = vec![50.0, 55.0];
        let spread = log_spread(&a, &b, 1.0);
        assert!((spread[0] - (100.0f64.ln() - 50.0f64.ln())).abs() < 1e-12);
    }
}
