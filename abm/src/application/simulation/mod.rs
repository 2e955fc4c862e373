//! Simulation Framework
//!
//! The herding model and everything it is parameterized by.
//!
//! # Architecture
//!
//! - [`PopulationConfig`]: population sizes, rates and spread distribution
//! - [`EventRates`]: intensities of the five event streams and their
//!   cumulative selection thresholds
//! - [`HerdingModel`]: the jump process driving agents and the order book

mod config;
mod engine;
mod rates;

pub use config::PopulationConfig;
pub use engine::{HerdingModel, PRICE_FLOOR, TickSnapshot};
pub use rates::{EventKind, EventRates, herding_scenario};
