//! Ordinary least squares on a single regressor.
//!
//! The hedge regression and both unit-root tests only ever need the
//! one-regressor-plus-intercept case, so this is the closed-form fit rather
//! than a general linear-algebra solve.

/// Result of fitting `y = intercept + slope * x + e`.
#[derive(Debug, Clone)]
pub struct OlsFit {
    pub intercept: f64,
    pub slope: f64,
    pub residuals: Vec<f64>,
}

/// Fit `y` on `x` with an intercept.
///
/// Returns `None` when the inputs are unusable: mismatched or too-short
/// series, or a regressor with (numerically) zero variance, which makes the
/// slope undefined.
pub fn ols(y: &[f64], x: &[f64]) -> Option<OlsFit> {
    if y.len() != x.len() || y.len() < 2 {
        return None;
    }

    let n = y.len() as f64;
    let mean_y = y.iter().sum::<f64>() / n;
    let mean_x = x.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    for (yi, xi) in y.iter().zip(x.iter()) {
        let dy = yi - mean_y;
        let dx = xi - mean_x;
        covariance += dy * dx;
        var_x += dx * dx;
    }

    if var_x < f64::EPSILON {
        return None;
    }

    let slope = covariance / var_x;
    let intercept = mean_y - slope * mean_x;

    let residuals = y
        .iter()
        .zip(x.iter())
        .map(|(yi, xi)| yi - intercept - slope * xi)
        .collect();

    Some(OlsFit {
        intercept,
        slope,
        residuals,
    })
}

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (n denominator), matching the z-score
/// convention used throughout the engine.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Sample standard deviation (n-1 denominator), used for return-based ratios.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() as f64 - 1.0);
    variance.sqrt()
}
