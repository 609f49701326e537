//! Spread descriptive statistics: mean, dispersion, z-scores and the
//! mean-reversion half-life implied by an AR(1) fit.

use serde::Serialize;

use super::error::EngineError;
use super::regression;

/// Statistical profile of a spread series.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SpreadProfile {
    /// Full-sample mean
    pub mean: f64,
    /// Full-sample population standard deviation
    pub std_dev: f64,
    /// Z-score of the last observation against the full sample
    pub z_score: f64,
    /// Mean-reversion half-life in observation periods; `None` when the
    /// spread shows no mean reversion over the sample
    pub half_life: Option<f64>,
}

/// Compute the profile of a spread series.
///
/// # Errors
/// `InsufficientDataError` for samples too short to fit the AR(1) regression.
pub fn profile(spread: &[f64]) -> Result<SpreadProfile, EngineError> {
    if spread.len() < 3 {
        return Err(EngineError::InsufficientData {
            expected: 3,
            actual: spread.len(),
        });
    }

    let mean = regression::mean(spread);
    let std_dev = regression::population_std(spread);
    let last = spread[spread.len() - 1];
    let z_score = if std_dev > 0.0 { (last - mean) / std_dev } else { 0.0 };

    Ok(SpreadProfile {
        mean,
        std_dev,
        z_score,
        half_life: half_life(spread).ok(),
    })
}

/// Half-life of mean reversion from an AR(1) fit.
///
/// Fits `delta_spread[t] = lambda * (spread[t-1] - mean) + e` and converts the
/// reversion speed to a half-life: `ln(0.5) / ln(1 + lambda)`. Requires
/// `-1 < lambda < 0`; outside that range the series does not decay toward its
/// mean and a finite half-life is undefined.
///
/// # Errors
/// - `InsufficientDataError` for samples shorter than 3.
/// - `NonMeanRevertingError` when `lambda >= 0` (or the fit is degenerate).
pub fn half_life(spread: &[f64]) -> Result<f64, EngineError> {
    if spread.len() < 3 {
        return Err(EngineError::InsufficientData {
            expected: 3,
            actual: spread.len(),
        });
    }

    let mean = regression::mean(spread);
    let delta: Vec<f64> = spread.windows(2).map(|w| w[1] - w[0]).collect();
    let centered_lag: Vec<f64> = spread[..spread.len() - 1].iter().map(|s| s - mean).collect();

    let lambda = regression::ols(&delta, &centered_lag)
        .map(|fit| fit.slope)
        .ok_or(EngineError::NonMeanReverting { lambda: 0.0 })?;

    if lambda >= 0.0 || lambda <= -1.0 {
        return Err(EngineError::NonMeanReverting { lambda });
    }

    Ok(0.5f64.ln() / (1.0 + lambda).ln())
}

/// Z-score series for a spread.
///
/// With `window = None` every observation is scored against the full-sample
/// mean and standard deviation. With `Some(w)` a trailing window of `w`
/// observations is used and the first `w - 1` entries are 0 (no signal until
/// the window fills). Zero dispersion scores as 0 rather than dividing.
pub fn z_score_series(spread: &[f64], window: Option<usize>) -> Vec<f64> {
    match window {
        None => {
            let mean = regression::mean(spread);
            let std_dev = regression::population_std(spread);
            spread
                .iter()
                .map(|s| if std_dev > 0.0 { (s - mean) / std_dev } else { 0.0 })
                .collect()
        }
        Some(w) => {
            let mut scores = vec![0.0; spread.len().min(w.saturating_sub(1))];
            if spread.len() < w {
                return scores;
            }
            for i in (w - 1)..spread.len() {
                let view = &spread[i + 1 - w..=i];
                let mean = regression::mean(view);
                let std_dev = regression::population_std(view);
                scores.push(if std_dev > 0.0 { (spread[i] - mean) / std_dev } else { 0.0 });
            }
            scores
        }
    }
}
