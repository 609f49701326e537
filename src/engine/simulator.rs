//! Threshold-rule trading simulation over a spread, and the performance
//! metrics derived from its mark-to-market equity curve.
//!
//! The rule: enter long the spread when its z-score drops through
//! `-entry_z`, enter short when it rises through `+entry_z`, exit when the
//! z-score reverts through the exit threshold toward the mean. At most one
//! position is open at a time; an entry signal while a position is open is
//! ignored. A position still open at the end of the sample is liquidated at
//! the final observation.
//!
//! Because the spread is a difference of log prices, its one-period change is
//! the fractional return of the dollar-neutral two-leg portfolio, so daily
//! strategy return = direction x change in spread, and 0 while flat.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::analytics::z_score_series;
use super::config::EngineConfig;
use super::regression;

/// Position direction over the spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Long A / short B: profits when the spread rises
    LongSpread,
    /// Short A / long B: profits when the spread falls
    ShortSpread,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Direction::LongSpread => 1.0,
            Direction::ShortSpread => -1.0,
        }
    }
}

/// One closed round-trip produced by the simulator.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TradeRecord {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    /// Z-score at entry
    pub entry_z: f64,
    /// Direction x total spread change over the holding period
    pub realized_return: f64,
    /// Worst unrealized adverse move before exit, in return units (>= 0)
    pub max_adverse_excursion: f64,
}

/// Aggregate performance of a simulation run.
///
/// Degenerate denominators resolve to documented sentinels instead of
/// failing: ratios are 0 on zero volatility / zero drawdown / no trades, and
/// `profit_factor` is `f64::INFINITY` when there are winners but no losers.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PerformanceMetrics {
    pub cumulative_return: f64,
    pub annualized_return: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,
    /// Worst peak-to-trough equity decline; always <= 0
    pub max_drawdown: f64,
    /// 5th percentile of daily returns
    pub var_95: f64,
    /// Mean of daily returns at or below the 5th percentile
    pub cvar_95: f64,
    pub profit_factor: f64,
    /// Mean max adverse excursion across trades
    pub mae: f64,
    pub num_trades: u32,
    pub win_rate: f64,
    pub mean_trade_duration_days: f64,
}

/// Full simulation output: the trade ledger, the per-period strategy returns
/// (one entry per observation after the first) and the derived metrics.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub trades: Vec<TradeRecord>,
    pub daily_returns: Vec<f64>,
    pub metrics: PerformanceMetrics,
}

struct OpenPosition {
    direction: Direction,
    entry_index: usize,
    entry_z: f64,
    entry_spread: f64,
    worst_excursion: f64,
}

/// Simulate the threshold rule over a spread series.
///
/// `dates` and `spread` must be the same length; the caller aligns them.
pub fn simulate(dates: &[NaiveDate], spread: &[f64], config: &EngineConfig) -> Simulation {
    debug_assert_eq!(dates.len(), spread.len());

    let z = z_score_series(spread, config.z_window);
    let n = spread.len();

    let mut trades: Vec<TradeRecord> = Vec::new();
    let mut daily_returns: Vec<f64> = Vec::with_capacity(n.saturating_sub(1));
    let mut position: Option<OpenPosition> = None;

    for t in 1..n {
        // Mark the open position to market over (t-1, t]
        let step_return = match &mut position {
            Some(open) => {
                let excursion = open.direction.sign() * (spread[t] - open.entry_spread);
                if excursion < open.worst_excursion {
                    open.worst_excursion = excursion;
                }
                open.direction.sign() * (spread[t] - spread[t - 1])
            }
            None => 0.0,
        };
        daily_returns.push(step_return);

        // State transitions at the close of bar t. One transition per bar:
        // an open position only evaluates its exit; entries are only taken
        // while flat, and never on the final bar (nothing left to mark).
        match &position {
            Some(open) => {
                let reverted = match open.direction {
                    Direction::LongSpread => z[t] >= -config.exit_z,
                    Direction::ShortSpread => z[t] <= config.exit_z,
                };
                if reverted {
                    let open = position.take().expect("position checked above");
                    trades.push(close_trade(&open, dates, spread, t));
                }
            }
            None if t < n - 1 => {
                let direction = if z[t] <= -config.entry_z {
                    Some(Direction::LongSpread)
                } else if z[t] >= config.entry_z {
                    Some(Direction::ShortSpread)
                } else {
                    None
                };
                if let Some(direction) = direction {
                    debug!(index = t, z = format!("{:.2}", z[t]), ?direction, "Opening position");
                    position = Some(OpenPosition {
                        direction,
                        entry_index: t,
                        entry_z: z[t],
                        entry_spread: spread[t],
                        worst_excursion: 0.0,
                    });
                }
            }
            None => {}
        }
    }

    // Liquidate anything still open at the final observation
    if let Some(open) = position.take() {
        if n > open.entry_index + 1 {
            trades.push(close_trade(&open, dates, spread, n - 1));
        }
    }

    let metrics = compute_metrics(&daily_returns, &trades, config);

    Simulation {
        trades,
        daily_returns,
        metrics,
    }
}

fn close_trade(
    open: &OpenPosition,
    dates: &[NaiveDate],
    spread: &[f64],
    exit_index: usize,
) -> TradeRecord {
    TradeRecord {
        entry_date: dates[open.entry_index],
        exit_date: dates[exit_index],
        entry_z: open.entry_z,
        realized_return: open.direction.sign() * (spread[exit_index] - open.entry_spread),
        max_adverse_excursion: -open.worst_excursion.min(0.0),
    }
}

/// Derive the metric family from per-period returns and the trade ledger.
fn compute_metrics(
    daily_returns: &[f64],
    trades: &[TradeRecord],
    config: &EngineConfig,
) -> PerformanceMetrics {
    let num_periods = daily_returns.len();

    // Equity curve from compounded per-period returns, plus peak tracking
    let mut equity = 1.0f64;
    let mut peak = 1.0f64;
    let mut max_drawdown = 0.0f64;
    for r in daily_returns {
        equity *= 1.0 + r;
        if equity > peak {
            peak = equity;
        }
        let drawdown = equity / peak - 1.0;
        if drawdown < max_drawdown {
            max_drawdown = drawdown;
        }
    }

    let cumulative_return = equity - 1.0;
    let annualized_return = if num_periods > 0 && equity > 0.0 {
        equity.powf(config.periods_per_year / num_periods as f64) - 1.0
    } else {
        0.0
    };

    let rf_per_period = config.risk_free_rate / config.periods_per_year;
    let excess: Vec<f64> = daily_returns.iter().map(|r| r - rf_per_period).collect();
    let mean_excess = regression::mean(&excess);
    let vol = regression::sample_std(&excess);
    let sharpe_ratio = if vol > 0.0 {
        mean_excess / vol * config.periods_per_year.sqrt()
    } else {
        0.0
    };

    let downside: Vec<f64> = daily_returns.iter().copied().filter(|r| *r < 0.0).collect();
    let downside_vol = regression::sample_std(&downside);
    let sortino_ratio = if downside_vol > 0.0 {
        mean_excess / downside_vol * config.periods_per_year.sqrt()
    } else {
        0.0
    };

    let calmar_ratio = if max_drawdown < 0.0 {
        annualized_return / max_drawdown.abs()
    } else {
        0.0
    };

    let var_95 = percentile(daily_returns, 0.05);
    let tail: Vec<f64> = daily_returns.iter().copied().filter(|r| *r <= var_95).collect();
    let cvar_95 = regression::mean(&tail);

    let gross_profit: f64 = trades
        .iter()
        .map(|t| t.realized_return)
        .filter(|r| *r > 0.0)
        .sum();
    let gross_loss: f64 = trades
        .iter()
        .map(|t| t.realized_return)
        .filter(|r| *r < 0.0)
        .sum::<f64>()
        .abs();
    let profit_factor = if trades.is_empty() {
        0.0
    } else if gross_loss > 0.0 {
        gross_profit / gross_loss
    } else if gross_profit > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };

    let num_trades = trades.len() as u32;
    let (mae, win_rate, mean_trade_duration_days) = if trades.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let count = trades.len() as f64;
        let mae = trades.iter().map(|t| t.max_adverse_excursion).sum::<f64>() / count;
        let wins = trades.iter().filter(|t| t.realized_return > 0.0).count() as f64;
        let duration: i64 = trades
            .iter()
            .map(|t| (t.exit_date - t.entry_date).num_days())
            .sum();
        (mae, wins / count, duration as f64 / count)
    };

    PerformanceMetrics {
        cumulative_return,
        annualized_return,
        sharpe_ratio,
        sortino_ratio,
        calmar_ratio,
        max_drawdown,
        var_95,
        cvar_95,
        profit_factor,
        mae,
        num_trades,
        win_rate,
        mean_trade_duration_days,
    }
}

/// Percentile with linear interpolation between order statistics.
/// Returns 0.0 for an empty slice.
fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = q * (sorted.len() as f64 - 1.0);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let weight = rank - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}
