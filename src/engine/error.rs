//! Error types for the analytics engine

use thiserror::Error;

/// Errors that can occur during pair estimation, selection and simulation.
///
/// Per-pair failures during a multi-pair scan are caught and logged by the
/// selector; they only surface as [`EngineError::NoCointegratedPair`] when
/// every candidate fails. Single-pair computations propagate these directly.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Series too short (or misaligned) for estimation
    #[error("insufficient data: expected at least {expected} observations, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Regressor has zero variance, so the hedge regression is degenerate
    #[error("singular regression: '{ticker}' is constant over the sample")]
    SingularRegression { ticker: String },

    /// AR(1) coefficient is non-negative, so a finite half-life is undefined
    #[error("spread is not mean-reverting (lambda = {lambda:.6})")]
    NonMeanReverting { lambda: f64 },

    /// No common dates, or fewer than two tickers with usable data
    #[error("empty panel: {usable} usable ticker(s), need at least 2 with overlapping dates")]
    EmptyPanel { usable: usize },

    /// Every candidate pair in a scan failed estimation
    #[error("no candidate pair survived estimation ({candidates} pair(s) tried)")]
    NoCointegratedPair { candidates: usize },
}
