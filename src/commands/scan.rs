//! Pair-scan command handler.
//!
//! Loads the candidate universe, aligns it onto a common date axis, runs the
//! exhaustive cointegration scan and writes the report and chart files.

use std::fs::File;
use std::io::Write;

use tracing::{info, warn};

use crate::engine::{self, EngineConfig};
use crate::store::{self, CsvStore};

use super::{parse_window, resolve_candidates};

/// Run the `scan` subcommand.
#[allow(clippy::too_many_arguments)]
pub async fn run_scan(
    tickers_arg: &str,
    sector: &str,
    start_arg: &str,
    end_arg: Option<&str>,
    data_dir: &str,
    report_path: &str,
    chart_path: Option<&str>,
    min_observations: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let (start, end) = parse_window(start_arg, end_arg)?;
    let candidates = resolve_candidates(tickers_arg, sector)?;

    let config = EngineConfig {
        min_observations,
        ..Default::default()
    };
    config.validate()?;

    info!(
        candidates = candidates.len(),
        start = %start,
        end = %end,
        "Starting pair scan"
    );

    let store = CsvStore::new(data_dir);
    let universe = store::fetch_universe(&store, &candidates, start, end).await;

    let panel = engine::AlignedPanel::from_series(universe.values())?;
    info!(
        tickers = panel.num_tickers(),
        observations = panel.len(),
        "Panel aligned"
    );

    let outcome = engine::select_best_pair(&panel, &config)?;

    // Full scan report
    let mut report = File::create(report_path)?;
    writeln!(report, "{}", engine::selector::PairResult::csv_header())?;
    for pair in &outcome.evaluated {
        writeln!(report, "{}", pair.to_csv_line())?;
    }
    info!(
        report = report_path,
        pairs = outcome.evaluated.len(),
        "Scan report written"
    );

    // Chart series for the winner
    if let Some(chart_path) = chart_path {
        let mut chart = File::create(chart_path)?;
        writeln!(
            chart,
            "date,{}_log_price,{}_log_price",
            outcome.best.ticker_a, outcome.best.ticker_b
        )?;
        for point in &outcome.chart {
            writeln!(
                chart,
                "{},{:.4},{:.4}",
                point.date, point.log_price_a, point.log_price_b
            )?;
        }
        info!(chart = chart_path, rows = outcome.chart.len(), "Chart series written");
    }

    // Human-readable summary
    println!(
        "\n{:<8} {:<8} {:>12} {:>10} {:>10}",
        "A", "B", "hedge_ratio", "coint_p", "adf_p"
    );
    println!("{}", "-".repeat(52));
    for pair in &outcome.evaluated {
        println!(
            "{:<8} {:<8} {:>12.4} {:>10.4} {:>10.4}",
            pair.ticker_a,
            pair.ticker_b,
            pair.result.hedge_ratio,
            pair.result.cointegration_p_value,
            pair.result.spread_adf_p_value
        );
    }
    println!(
        "\nBest pair: {}/{} (p = {:.4})",
        outcome.best.ticker_a, outcome.best.ticker_b, outcome.best.result.cointegration_p_value
    );
    println!(
        "Note: the minimum p-value over {} candidate pairs overstates significance; \
         validate the selected pair out of sample.",
        outcome.evaluated.len()
    );

    if outcome.evaluated.len() < candidates.len() * (candidates.len() - 1) / 2 {
        warn!(
            evaluated = outcome.evaluated.len(),
            "Some candidate pairs could not be estimated; see log for details"
        );
    }

    Ok(())
}
