//! Pair-selection and spread-analytics engine.
//!
//! Pure, synchronous computation over in-memory series: alignment, the
//! cointegration estimator, the exhaustive pair scan, spread analytics and
//! the threshold-rule trading simulation. All functions are deterministic in
//! their inputs and hold no shared state; concurrency and I/O belong to the
//! callers and the price store.

pub mod align;
pub mod analytics;
pub mod config;
pub mod error;
pub mod estimator;
pub mod regression;
pub mod selector;
pub mod simulator;
pub mod stationarity;

pub use align::AlignedPanel;
pub use config::EngineConfig;
pub use error::EngineError;
pub use estimator::CointegrationResult;
pub use selector::{select_best_pair, ScanOutcome};
pub use simulator::{PerformanceMetrics, TradeRecord};

use serde::Serialize;

/// The complete per-pair output record: relationship and stationarity
/// fields, spread descriptive statistics, and simulated trading performance.
///
/// Undefined values use explicit sentinels rather than failing:
/// `half_life_days` is `None` when the spread is not mean-reverting, and
/// `profit_factor` is infinite when the simulation produced winners but no
/// losers (both serialize as JSON `null`).
#[derive(Debug, Clone, Serialize)]
pub struct MetricsRecord {
    pub ticker_a: String,
    pub ticker_b: String,

    // Relationship & stationarity
    pub hedge_ratio: f64,
    pub cointegration_statistic: f64,
    pub cointegration_p_value: f64,
    pub spread_adf_statistic: f64,
    pub spread_adf_p_value: f64,
    pub half_life_days: Option<f64>,
    pub spread_mean: f64,
    pub spread_std_dev: f64,
    pub spread_z_score: f64,

    // Spread performance & risk
    pub cumulative_return: f64,
    pub annualized_return: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,
    pub max_drawdown: f64,

    // Trade stats & tail risk
    pub var_95: f64,
    pub cvar_95: f64,
    pub profit_factor: f64,
    pub mae: f64,
    pub num_trades: u32,
    pub win_rate: f64,
    pub mean_trade_duration_days: f64,
}

/// Run the full single-pair pipeline over an aligned panel: estimate the
/// relationship, profile the spread, simulate the threshold rule, and
/// assemble one flat record.
///
/// # Errors
/// Propagates estimation errors (`InsufficientDataError`,
/// `SingularRegressionError`); an `EmptyPanelError` surfaces when either
/// ticker is missing from the panel.
pub fn analyze_pair(
    panel: &AlignedPanel,
    ticker_a: &str,
    ticker_b: &str,
    config: &EngineConfig,
) -> Result<MetricsRecord, EngineError> {
    let prices_a = panel
        .column(ticker_a)
        .ok_or(EngineError::EmptyPanel { usable: 0 })?;
    let prices_b = panel
        .column(ticker_b)
        .ok_or(EngineError::EmptyPanel { usable: 0 })?;

    let estimate =
        estimator::estimate_pair(ticker_a, prices_a, ticker_b, prices_b, config.min_observations)?;

    let spread = estimator::log_spread(prices_a, prices_b, estimate.hedge_ratio);
    let profile = analytics::profile(&spread)?;
    let simulation = simulator::simulate(panel.dates(), &spread, config);
    let m = simulation.metrics;

    Ok(MetricsRecord {
        ticker_a: ticker_a.to_string(),
        ticker_b: ticker_b.to_string(),
        hedge_ratio: estimate.hedge_ratio,
        cointegration_statistic: estimate.cointegration_statistic,
        cointegration_p_value: estimate.cointegration_p_value,
        spread_adf_statistic: estimate.spread_adf_statistic,
        spread_adf_p_value: estimate.spread_adf_p_value,
        half_life_days: profile.half_life,
        spread_mean: profile.mean,
        spread_std_dev: profile.std_dev,
        spread_z_score: profile.z_score,
        cumulative_return: m.cumulative_return,
        annualized_return: m.annualized_return,
        sharpe_ratio: m.sharpe_ratio,
        sortino_ratio: m.sortino_ratio,
        calmar_ratio: m.calmar_ratio,
        max_drawdown: m.max_drawdown,
        var_95: m.var_95,
        cvar_95: m.cvar_95,
        profit_factor: m.profit_factor,
        mae: m.mae,
        num_trades: m.num_trades,
        win_rate: m.win_rate,
        mean_trade_duration_days: m.mean_trade_duration_days,
    })
}
