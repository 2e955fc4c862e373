//! Population configuration
//!
//! Everything `reset_population` needs: population sizes, event rates,
//! herding parameters and the half-spread distribution.

use crate::error::{AbmError, Result};
use serde::{Deserialize, Serialize};

/// Parameters of a population reset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Agents starting as fundamentalists (ids `0..n_fundamentalists`)
    pub n_fundamentalists: usize,
    /// Agents starting as chartists (the remaining ids)
    pub n_chartists: usize,
    /// Base event rate, scales every other rate
    pub base_event_rate: f64,
    /// Single chartist trading rate (relative to the base rate)
    pub chartist_trade_rate: f64,
    /// Single fundamentalist trading rate per unit of log mispricing
    pub fundamentalist_trade_rate: f64,
    /// Mood flip rate (relative to the base rate)
    pub mood_change_rate: f64,
    /// Idiosyncratic switching propensity toward fundamentalism
    pub epsilon_f: f64,
    /// Idiosyncratic switching propensity toward chartism
    pub epsilon_c: f64,
    /// Herding exponent
    pub alpha: f64,
    /// Floor of the herding scenario multiplier
    pub lambda_zero: f64,
    /// Initial chartist mood in [-1, 1]
    pub initial_mood: f64,
    /// Gamma shape of the full spread distribution
    pub spread_shape: f64,
    /// Gamma scale of the full spread distribution
    pub spread_scale: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            n_fundamentalists: 100,
            n_chartists: 100,
            base_event_rate: 0.001,
            chartist_trade_rate: 1.0,
            fundamentalist_trade_rate: 1.0,
            mood_change_rate: 0.1,
            epsilon_f: 2.0,
            epsilon_c: 2.0,
            alpha: 0.0,
            lambda_zero: 0.005,
            initial_mood: 1.0,
            spread_shape: 4.0,
            spread_scale: 15.5,
        }
    }
}

impl PopulationConfig {
    /// Total number of agents
    pub fn n_agents(&self) -> usize {
        self.n_fundamentalists + self.n_chartists
    }

    /// Reject configurations under which the event rates are undefined
    pub fn validate(&self) -> Result<()> {
        if self.n_agents() == 0 {
            return Err(AbmError::InvalidConfig("population is empty".into()));
        }

        let non_negative = [
            ("base_event_rate", self.base_event_rate),
            ("chartist_trade_rate", self.chartist_trade_rate),
            ("fundamentalist_trade_rate", self.fundamentalist_trade_rate),
            ("mood_change_rate", self.mood_change_rate),
            ("epsilon_f", self.epsilon_f),
            ("epsilon_c", self.epsilon_c),
            ("alpha", self.alpha),
            ("lambda_zero", self.lambda_zero),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(AbmError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        if self.base_event_rate == 0.0 {
            return Err(AbmError::InvalidConfig(
                "base_event_rate must be positive".into(),
            ));
        }

        if !(self.spread_shape > 0.0 && self.spread_scale > 0.0) {
            return Err(AbmError::InvalidConfig(format!(
                "spread gamma parameters must be positive, got shape={} scale={}",
                self.spread_shape, self.spread_scale
            )));
        }

        if !(-1.0..=1.0).contains(&self.initial_mood) {
            return Err(AbmError::InvalidConfig(format!(
                "initial_mood must lie in [-1, 1], got {}",
                self.initial_mood
            )));
        }

        Ok(())
    }
}
