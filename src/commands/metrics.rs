//! Single-pair risk-metrics command handler.

use tracing::info;

use crate::engine::{self, EngineConfig, MetricsRecord};
use crate::store::{self, CsvStore};

use super::{parse_window, resolve_candidates};

/// Run the `metrics` subcommand.
#[allow(clippy::too_many_arguments)]
pub async fn run_metrics(
    tickers_arg: &str,
    start_arg: &str,
    end_arg: Option<&str>,
    data_dir: &str,
    entry_z: f64,
    exit_z: f64,
    risk_free_rate: f64,
    periods_per_year: f64,
    min_observations: usize,
    output: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (start, end) = parse_window(start_arg, end_arg)?;

    if tickers_arg == "default" {
        return Err("metrics requires an explicit pair, e.g. --tickers KO,PEP".into());
    }
    let tickers = resolve_candidates(tickers_arg, "")?;
    if tickers.len() != 2 {
        return Err(format!(
            "metrics requires exactly 2 tickers, got {} ('{}')",
            tickers.len(),
            tickers_arg
        )
        .into());
    }

    let config = EngineConfig {
        min_observations,
        entry_z,
        exit_z,
        risk_free_rate,
        periods_per_year,
        ..Default::default()
    };
    config.validate()?;

    let store = CsvStore::new(data_dir);
    let universe = store::fetch_universe(&store, &tickers, start, end).await;

    let panel = engine::AlignedPanel::from_series(universe.values())?;
    info!(observations = panel.len(), "Panel aligned");

    let record = engine::analyze_pair(&panel, &tickers[0], &tickers[1], &config)?;
    print_record(&record);

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&record)?;
        std::fs::write(path, json)?;
        info!(output = path, "Metrics record written");
    }

    Ok(())
}

fn print_record(record: &MetricsRecord) {
    println!("\n=== {} / {} ===", record.ticker_a, record.ticker_b);

    println!("\nRelationship & stationarity");
    println!("  hedge ratio          {:>12.4}", record.hedge_ratio);
    println!(
        "  cointegration        {:>12.4} (p = {:.4})",
        record.cointegration_statistic, record.cointegration_p_value
    );
    println!(
        "  spread ADF           {:>12.4} (p = {:.4})",
        record.spread_adf_statistic, record.spread_adf_p_value
    );
    match record.half_life_days {
        Some(half_life) => println!("  half-life (days)     {:>12.2}", half_life),
        None => println!("  half-life (days)     {:>12}", "undefined"),
    }
    println!("  spread std dev       {:>12.4}", record.spread_std_dev);
    println!("  current z-score      {:>12.2}", record.spread_z_score);

    println!("\nPerformance");
    println!("  cumulative return    {:>12.2}%", record.cumulative_return * 100.0);
    println!("  annualized return    {:>12.2}%", record.annualized_return * 100.0);
    println!("  Sharpe ratio         {:>12.2}", record.sharpe_ratio);
    println!("  Sortino ratio        {:>12.2}", record.sortino_ratio);
    println!("  Calmar ratio         {:>12.2}", record.calmar_ratio);
    println!("  max drawdown         {:>12.2}%", record.max_drawdown * 100.0);

    println!("\nTrades & tail risk");
    println!("  VaR 95               {:>12.4}", record.var_95);
    println!("  CVaR 95              {:>12.4}", record.cvar_95);
    if record.profit_factor.is_finite() {
        println!("  profit factor        {:>12.2}", record.profit_factor);
    } else {
        println!("  profit factor        {:>12}", "no losses");
    }
    println!("  mean MAE             {:>12.4}", record.mae);
    println!("  trades               {:>12}", record.num_trades);
    println!("  win rate             {:>12.1}%", record.win_rate * 100.0);
    println!(
        "  mean duration (days) {:>12.1}",
        record.mean_trade_duration_days
    );
}
