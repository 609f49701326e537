//! Property-based tests for the analytics engine
//!
//! These tests use proptest to verify invariants across many random inputs,
//! catching edge cases that unit tests might miss.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use statarb::engine::analytics::z_score_series;
use statarb::engine::simulator::simulate;
use statarb::engine::stationarity::{approximate_p_value, unit_root_test, Surface};
use statarb::engine::{AlignedPanel, EngineConfig};
use statarb::types::{PricePoint, PriceSeries};

fn dates(n: usize) -> Vec<NaiveDate> {
    let start: NaiveDate = "2023-01-02".parse().unwrap();
    (0..n)
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect()
}

fn series_from_prices(ticker: &str, prices: &[f64]) -> PriceSeries {
    let points = dates(prices.len())
        .into_iter()
        .zip(prices)
        .map(|(date, price)| PricePoint {
            date,
            adj_close: Decimal::from_f64_retain(*price).unwrap(),
            volume: None,
        })
        .collect();
    PriceSeries::new(ticker, points).unwrap()
}

proptest! {
    /// Full-sample z-scores are always finite and average out to ~0
    #[test]
    fn zscores_finite_with_zero_mean(
        spread in prop::collection::vec(-100.0f64..100.0f64, 3..80)
    ) {
        let scores = z_score_series(&spread, None);
        prop_assert_eq!(scores.len(), spread.len());
        for z in &scores {
            prop_assert!(z.is_finite(), "z-score should be finite: {}", z);
        }
        let mean: f64 = scores.iter().sum::<f64>() / scores.len() as f64;
        prop_assert!(mean.abs() < 1e-8, "z-scores should center on 0, got {}", mean);
    }

    /// Rolling z-scores stay finite and the warmup prefix is flat
    #[test]
    fn rolling_zscores_finite(
        spread in prop::collection::vec(-100.0f64..100.0f64, 10..60),
        window in 2usize..12
    ) {
        let scores = z_score_series(&spread, Some(window));
        prop_assert_eq!(scores.len(), spread.len());
        for (i, z) in scores.iter().enumerate() {
            prop_assert!(z.is_finite());
            if i + 1 < window.min(spread.len() + 1) {
                prop_assert_eq!(*z, 0.0, "warmup entries must be 0");
            }
        }
    }

    /// Approximate p-values never leave [0, 1], on either surface
    #[test]
    fn p_values_in_unit_interval(
        statistic in -12.0f64..6.0f64,
        n in 20usize..2000
    ) {
        for surface in [Surface::Adf, Surface::EngleGranger] {
            let p = approximate_p_value(statistic, n, surface);
            prop_assert!((0.0..=1.0).contains(&p), "p = {}", p);
        }
    }

    /// The unit-root test, when it runs at all, reports an in-range p-value
    #[test]
    fn unit_root_test_p_in_range(
        series in prop::collection::vec(-50.0f64..50.0f64, 20..120)
    ) {
        if let Some(test) = unit_root_test(&series, Surface::Adf) {
            prop_assert!(test.statistic.is_finite());
            prop_assert!((0.0..=1.0).contains(&test.p_value));
        }
    }

    /// Aligning an already-aligned panel reproduces it exactly
    #[test]
    fn alignment_idempotent(
        prices_a in prop::collection::vec(1.0f64..1000.0f64, 5..40),
        offsets in prop::collection::vec(1.0f64..1000.0f64, 5..40)
    ) {
        let n = prices_a.len().min(offsets.len());
        let a = series_from_prices("AAA", &prices_a[..n]);
        let b = series_from_prices("BBB", &offsets[..n]);

        let panel = AlignedPanel::from_series([&a, &b]).unwrap();

        let rebuilt: Vec<PriceSeries> = panel
            .tickers()
            .iter()
            .map(|t| {
                let prices: Vec<f64> = panel.column(t).unwrap().to_vec();
                series_from_prices(t, &prices)
            })
            .collect();
        let again = AlignedPanel::from_series(rebuilt.iter()).unwrap();

        prop_assert_eq!(panel, again);
    }

    /// Simulator invariants: ledger ordering, position exclusivity, and
    /// well-defined metrics for arbitrary spreads and thresholds
    #[test]
    fn simulator_invariants(
        spread in prop::collection::vec(-1.0f64..1.0f64, 25..120),
        entry_z in 0.5f64..4.0f64
    ) {
        let config = EngineConfig {
            entry_z,
            ..Default::default()
        };
        let sim = simulate(&dates(spread.len()), &spread, &config);

        prop_assert_eq!(sim.daily_returns.len(), spread.len() - 1);
        prop_assert_eq!(sim.metrics.num_trades as usize, sim.trades.len());

        for trade in &sim.trades {
            prop_assert!(trade.exit_date > trade.entry_date);
            prop_assert!(trade.max_adverse_excursion >= 0.0);
            prop_assert!(trade.entry_z.abs() >= entry_z);
        }
        // At most one open position: holding intervals never overlap
        for pair in sim.trades.windows(2) {
            prop_assert!(pair[1].entry_date >= pair[0].exit_date);
        }

        let m = &sim.metrics;
        prop_assert!(m.max_drawdown <= 0.0);
        prop_assert!(m.cvar_95 <= m.var_95);
        prop_assert!((0.0..=1.0).contains(&m.win_rate));
        prop_assert!(m.sharpe_ratio.is_finite());
        prop_assert!(m.sortino_ratio.is_finite());
        prop_assert!(m.calmar_ratio.is_finite());
        // profit_factor may legitimately be +inf (no losing trades)
        prop_assert!(!m.profit_factor.is_nan());
        prop_assert!(m.mean_trade_duration_days >= 0.0);
    }

    /// No-signal configurations report zero sentinels without failing
    #[test]
    fn no_trades_means_zero_sentinels(
        spread in prop::collection::vec(-0.5f64..0.5f64, 25..80)
    ) {
        let config = EngineConfig {
            entry_z: 1000.0,
            ..Default::default()
        };
        let sim = simulate(&dates(spread.len()), &spread, &config);

        prop_assert_eq!(sim.metrics.num_trades, 0);
        prop_assert_eq!(sim.metrics.sharpe_ratio, 0.0);
        prop_assert_eq!(sim.metrics.sortino_ratio, 0.0);
        prop_assert_eq!(sim.metrics.profit_factor, 0.0);
        prop_assert_eq!(sim.metrics.win_rate, 0.0);
        prop_assert_eq!(sim.metrics.cumulative_return, 0.0);
    }
}
