use clap::Parser;
use tracing_subscriber::EnvFilter;

use statarb::cli::{Cli, Commands};
use statarb::commands;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize structured logging; --verbose accepts any EnvFilter directive
    let filter = EnvFilter::try_new(&cli.verbose).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Scan {
            tickers,
            sector,
            start,
            end,
            data_dir,
            report,
            chart,
            min_observations,
        } => {
            commands::run_scan(
                tickers,
                sector,
                start,
                end.as_deref(),
                data_dir,
                report,
                chart.as_deref(),
                *min_observations,
            )
            .await?;
        }
        Commands::Metrics {
            tickers,
            start,
            end,
            data_dir,
            entry_z,
            exit_z,
            risk_free_rate,
            periods_per_year,
            min_observations,
            output,
        } => {
            commands::run_metrics(
                tickers,
                start,
                end.as_deref(),
                data_dir,
                *entry_z,
                *exit_z,
                *risk_free_rate,
                *periods_per_year,
                *min_observations,
                output.as_deref(),
            )
            .await?;
        }
        Commands::Sectors => {
            commands::run_sectors();
        }
    }

    Ok(())
}
