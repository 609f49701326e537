//! Sector-listing command handler.

use crate::universe;

/// Run the `sectors` subcommand: print each built-in sector and its tickers.
pub fn run_sectors() {
    for sector in universe::sectors() {
        let tickers = universe::sector_tickers(sector).unwrap_or_default();
        println!("{:<12} {}", sector, tickers.join(", "));
    }
}
