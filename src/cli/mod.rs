//! CLI argument parsing using clap.
//!
//! Defines the command-line interface for the statarb engine, including all
//! subcommands and their arguments. Handlers live in `crate::commands`.

use clap::{Parser, Subcommand};

/// statarb - cointegrated-pair discovery and spread risk engine
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Set the verbosity level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub verbose: String,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Scan a ticker universe for the most cointegrated pair
    Scan {
        /// Tickers to analyze (comma-separated), or "default" for the
        /// selected sector's built-in list
        #[arg(long, default_value = "default")]
        tickers: String,
        /// Sector whose built-in list to use when tickers = "default"
        #[arg(long, default_value = "tech")]
        sector: String,
        /// Start of the analysis window (YYYY-MM-DD, inclusive)
        #[arg(long, default_value = "2016-01-01")]
        start: String,
        /// End of the analysis window (YYYY-MM-DD, inclusive; default today)
        #[arg(long)]
        end: Option<String>,
        /// Directory holding <TICKER>.csv price files
        #[arg(long, default_value = "data")]
        data_dir: String,
        /// Output CSV path for the full scan report
        #[arg(long, default_value = "cointegration.csv")]
        report: String,
        /// Optional output CSV path for the winning pair's chart series
        #[arg(long)]
        chart: Option<String>,
        /// Minimum aligned observations required per pair
        #[arg(long, default_value_t = 20)]
        min_observations: usize,
    },

    /// Compute the full risk/performance record for one pair
    Metrics {
        /// Exactly two tickers, comma-separated (e.g. "KO,PEP")
        #[arg(long)]
        tickers: String,
        /// Start of the analysis window (YYYY-MM-DD, inclusive)
        #[arg(long, default_value = "2016-01-01")]
        start: String,
        /// End of the analysis window (YYYY-MM-DD, inclusive; default today)
        #[arg(long)]
        end: Option<String>,
        /// Directory holding <TICKER>.csv price files
        #[arg(long, default_value = "data")]
        data_dir: String,
        /// Z-score threshold to enter a position
        #[arg(long, default_value_t = 2.0)]
        entry_z: f64,
        /// Z-score threshold to exit a position (0 = mean crossing)
        #[arg(long, default_value_t = 0.0)]
        exit_z: f64,
        /// Annual risk-free rate for Sharpe/Sortino
        #[arg(long, default_value_t = 0.0)]
        risk_free_rate: f64,
        /// Trading periods per year for annualization
        #[arg(long, default_value_t = 252.0)]
        periods_per_year: f64,
        /// Minimum aligned observations required
        #[arg(long, default_value_t = 20)]
        min_observations: usize,
        /// Optional output path for the record as pretty JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// List the built-in sector universes
    Sectors,
}
