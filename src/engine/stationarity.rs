//! Unit-root testing for spreads and regression residuals.
//!
//! Implements a Dickey-Fuller test (constant, no trend, no lag augmentation)
//! and maps its t-statistic to an approximate p-value by interpolating
//! MacKinnon-style critical-value tables. Two surfaces are provided: the
//! standard ADF surface for a directly observed series, and the Engle-Granger
//! surface for residuals of an estimated cointegrating regression, whose
//! distribution is shifted by the estimation of the hedge vector.

use super::regression;

/// Outcome of a unit-root test.
///
/// More negative statistics are stronger evidence against a unit root
/// (i.e. for stationarity); `p_value` is always within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitRootTest {
    pub statistic: f64,
    pub p_value: f64,
}

/// Critical values (1%, 5%, 10%) for a given sample size.
type CriticalRow = (usize, f64, f64, f64);

/// Dickey-Fuller critical values with constant, no trend (MacKinnon).
const ADF_SURFACE: &[CriticalRow] = &[
    (25, -3.75, -3.00, -2.63),
    (50, -3.58, -2.93, -2.60),
    (100, -3.51, -2.89, -2.58),
    (250, -3.46, -2.88, -2.57),
    (500, -3.44, -2.87, -2.57),
];

/// Engle-Granger critical values for residuals of a two-variable
/// cointegrating regression with constant (MacKinnon).
const ENGLE_GRANGER_SURFACE: &[CriticalRow] = &[
    (25, -4.37, -3.59, -3.22),
    (50, -4.12, -3.46, -3.13),
    (100, -4.01, -3.39, -3.09),
    (250, -3.95, -3.36, -3.07),
    (500, -3.92, -3.35, -3.05),
];

/// Which critical-value surface to evaluate a Dickey-Fuller statistic against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Directly observed series (standard ADF distribution)
    Adf,
    /// Residuals of an estimated two-series cointegrating regression
    EngleGranger,
}

/// Minimum observations for the test regression to be meaningful
pub const MIN_TEST_LEN: usize = 20;

/// Dickey-Fuller t-statistic: regress the first difference on the lagged
/// level (with constant) and return the t-ratio of the level coefficient.
///
/// Returns `None` for series that are too short or degenerate (constant
/// levels or a perfect fit leaving no residual variance).
pub fn dickey_fuller_statistic(series: &[f64]) -> Option<f64> {
    if series.len() < MIN_TEST_LEN {
        return None;
    }

    let n = series.len() - 1;
    let mut delta: Vec<f64> = Vec::with_capacity(n);
    let mut lagged: Vec<f64> = Vec::with_capacity(n);
    for window in series.windows(2) {
        delta.push(window[1] - window[0]);
        lagged.push(window[0]);
    }

    let fit = regression::ols(&delta, &lagged)?;
    let gamma = fit.slope;

    // Standard error of gamma from the residual variance
    let lag_mean = regression::mean(&lagged);
    let lag_ss: f64 = lagged.iter().map(|v| (v - lag_mean).powi(2)).sum();
    let sse: f64 = fit.residuals.iter().map(|r| r * r).sum();
    let dof = (n as f64 - 2.0).max(1.0);
    let se_gamma = (sse / dof / lag_ss).sqrt();

    if !se_gamma.is_finite() || se_gamma < f64::EPSILON {
        return None;
    }

    let t = gamma / se_gamma;
    t.is_finite().then_some(t)
}

/// Run the Dickey-Fuller test against the chosen surface.
///
/// Degenerate series (too short, constant, or already a perfect fit) return
/// `None`; the caller decides whether that means "cannot say" or an error.
pub fn unit_root_test(series: &[f64], surface: Surface) -> Option<UnitRootTest> {
    let statistic = dickey_fuller_statistic(series)?;
    let p_value = approximate_p_value(statistic, series.len(), surface);
    Some(UnitRootTest { statistic, p_value })
}

/// Interpolate the critical values of a surface for the given sample size.
fn critical_values(n: usize, table: &[CriticalRow]) -> (f64, f64, f64) {
    let first = table[0];
    if n <= first.0 {
        return (first.1, first.2, first.3);
    }
    for pair in table.windows(2) {
        let (n1, a1, b1, c1) = pair[0];
        let (n2, a2, b2, c2) = pair[1];
        if n >= n1 && n <= n2 {
            let t = (n - n1) as f64 / (n2 - n1) as f64;
            let lerp = |lo: f64, hi: f64| lo + t * (hi - lo);
            return (lerp(a1, a2), lerp(b1, b2), lerp(c1, c2));
        }
    }
    let last = table[table.len() - 1];
    (last.1, last.2, last.3)
}

/// Map a Dickey-Fuller t-statistic to an approximate p-value.
///
/// Piecewise-linear interpolation through the (critical value, significance
/// level) anchor points of the surface, extended with coarse anchors for the
/// far tails, clamped to [0.001, 0.999]. Coarse by construction, but
/// monotonic in the statistic and accurate near the conventional decision
/// thresholds, which is where it matters.
pub fn approximate_p_value(statistic: f64, n: usize, surface: Surface) -> f64 {
    let table = match surface {
        Surface::Adf => ADF_SURFACE,
        Surface::EngleGranger => ENGLE_GRANGER_SURFACE,
    };
    let (c1, c5, c10) = critical_values(n, table);

    // (statistic, p) anchors, ascending in statistic
    let anchors = [
        (c1 - 1.5, 0.001),
        (c1, 0.01),
        (c5, 0.05),
        (c10, 0.10),
        (0.0, 0.90),
        (1.5, 0.999),
    ];

    if statistic <= anchors[0].0 {
        return anchors[0].1;
    }
    for pair in anchors.windows(2) {
        let (s_lo, p_lo) = pair[0];
        let (s_hi, p_hi) = pair[1];
        if statistic <= s_hi {
            let t = (statistic - s_lo) / (s_hi - s_lo);
            return (p_lo + t * (p_hi - p_lo)).clamp(0.001, 0.999);
        }
    }
    0.999
}
