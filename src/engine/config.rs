//! Configuration for pair estimation and spread simulation

use serde::{Deserialize, Serialize};

/// Tunable parameters consumed by the engine. All values are supplied by the
/// caller (CLI, config file, embedding application); the defaults here are the
/// documented fallbacks only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum aligned observations required before running the regression
    /// and unit-root tests
    #[serde(default = "default_min_observations")]
    pub min_observations: usize,

    /// Z-score magnitude that opens a position (long below -entry, short
    /// above +entry)
    #[serde(default = "default_entry_z")]
    pub entry_z: f64,

    /// Z-score threshold that closes a position (0.0 = exit on mean crossing)
    #[serde(default = "default_exit_z")]
    pub exit_z: f64,

    /// Annual risk-free rate used in Sharpe/Sortino numerators
    #[serde(default)]
    pub risk_free_rate: f64,

    /// Trading periods per year used for annualization
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: f64,

    /// Rolling window for z-score computation. `None` (the default) uses the
    /// full-sample mean and standard deviation.
    #[serde(default)]
    pub z_window: Option<usize>,
}

fn default_min_observations() -> usize {
    20
}
fn default_entry_z() -> f64 {
    2.0
}
fn default_exit_z() -> f64 {
    0.0
}
fn default_periods_per_year() -> f64 {
    252.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_observations: default_min_observations(),
            entry_z: default_entry_z(),
            exit_z: default_exit_z(),
            risk_free_rate: 0.0,
            periods_per_year: default_periods_per_year(),
            z_window: None,
        }
    }
}

impl EngineConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_observations < 3 {
            return Err(format!(
                "min_observations must be at least 3, got {}",
                self.min_observations
            ));
        }
        if self.entry_z <= 0.0 {
            return Err(format!("entry_z must be positive, got {}", self.entry_z));
        }
        if self.exit_z < 0.0 || self.exit_z >= self.entry_z {
            return Err(format!(
                "exit_z must be in [0, entry_z), got {} (entry_z = {})",
                self.exit_z, self.entry_z
            ));
        }
        if self.periods_per_year <= 0.0 {
            return Err(format!(
                "periods_per_year must be positive, got {}",
                self.periods_per_year
            ));
        }
        if let Some(window) = self.z_window {
            if window < 2 {
                return Err(format!("z_window must be at least 2, got {}", window));
            }
        }
        Ok(())
    }
}
