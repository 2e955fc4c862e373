//! Run configuration
//!
//! Loaded from a JSON file and/or assembled from command line flags. Every
//! field is optional in the file; missing ones take the values below.

use crate::error::ConfigError;
use herding_abm::PopulationConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Placeholder in [`RunConfig::output`] replaced by the realization id
pub const REALIZATION_PLACEHOLDER: &str = "{realization}";

/// Everything one invocation of the driver needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Independent realizations to simulate
    pub realizations: usize,
    /// Report ticks per realization
    pub points: usize,
    /// Output file stem, may contain `{realization}`
    pub output: String,
    /// Base seed; realization `i` uses `seed + i`. Entropy when absent
    pub seed: Option<u64>,
    /// Wall-clock budget for the whole run, in seconds
    pub timeout_secs: u64,
    /// Simulated time between report ticks
    pub report_tick: f64,
    /// Initial price
    pub price: f64,
    /// Fundamental price
    pub fundamental_price: f64,
    pub population: PopulationConfig,
    /// Scale returns to unit standard deviation
    pub normalize_return: bool,
    /// Scale trade counts to unit mean
    pub normalize_trade: bool,
    /// Also write the raw `.ret.series` / `.trade.series` files
    pub write_series: bool,
    pub pdf_points: usize,
    pub psd_points: usize,
    /// FFT slice length, a power of two
    pub psd_slice: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            realizations: 1,
            points: 1_048_576,
            output: "test".to_string(),
            seed: None,
            timeout_secs: 300,
            report_tick: 1.0,
            price: 30000.0,
            fundamental_price: 30000.0,
            population: default_population(),
            normalize_return: false,
            normalize_trade: false,
            write_series: false,
            pdf_points: 100,
            psd_points: 100,
            psd_slice: 131_072,
        }
    }
}

/// Population used by the driver unless configured otherwise
pub fn default_population() -> PopulationConfig {
    PopulationConfig {
        n_fundamentalists: 250,
        n_chartists: 250,
        base_event_rate: 1e-5,
        chartist_trade_rate: 100.0,
        fundamentalist_trade_rate: 100.0,
        mood_change_rate: 10.0,
        epsilon_f: 2.0,
        epsilon_c: 2.0,
        alpha: 2.0,
        lambda_zero: 0.005,
        initial_mood: 0.75,
        spread_shape: 4.0,
        spread_scale: 15.5,
    }
}

impl RunConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    ///
    /// A partial `population` object is completed with the driver's
    /// population, not with the model's own defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;

        if let Some(population) = value.get_mut("population").and_then(|p| p.as_object_mut()) {
            let defaults = serde_json::to_value(default_population())
                .map_err(|e| ConfigError::Parse(e.to_string()))?;
            if let serde_json::Value::Object(defaults) = defaults {
                for (key, default) in defaults {
                    population.entry(key).or_insert(default);
                }
            }
        }

        serde_json::from_value(value).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check the driver parameters and the population
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.realizations == 0 {
            return Err(ConfigError::Invalid("realizations must be positive".into()));
        }
        if self.points < 2 {
            return Err(ConfigError::Invalid(format!(
                "points must be at least 2, got {}",
                self.points
            )));
        }
        if !(self.report_tick > 0.0 && self.report_tick.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "report_tick must be positive, got {}",
                self.report_tick
            )));
        }
        if !(self.price > 0.0 && self.fundamental_price > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "prices must be positive, got price={} fundamental_price={}",
                self.price, self.fundamental_price
            )));
        }
        if self.pdf_points < 2 || self.psd_points < 2 {
            return Err(ConfigError::Invalid(
                "pdf_points and psd_points must be at least 2".into(),
            ));
        }
        if !self.psd_slice.is_power_of_two() {
            return Err(ConfigError::Invalid(format!(
                "psd_slice must be a power of two, got {}",
                self.psd_slice
            )));
        }
        if self.realizations > 1 && !self.output.contains(REALIZATION_PLACEHOLDER) {
            log::warn!(
                "Output stem '{}' has no {} placeholder, realizations will overwrite each other",
                self.output,
                REALIZATION_PLACEHOLDER
            );
        }

        self.population
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Output file stem of realization `id`
    pub fn stem(&self, id: usize) -> String {
        self.output.replace(REALIZATION_PLACEHOLDER, &id.to_string())
    }

    /// Seed of realization `id`, if the run is seeded
    pub fn realization_seed(&self, id: usize) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(id as u64))
    }
}
