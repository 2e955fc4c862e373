//! Herding Runner - realization driver for the herding model
//!
//! For every realization:
//!
//! - **Simulation**: a fresh [`herding_abm::HerdingModel`] stepped over a
//!   fixed number of report ticks
//! - **Series**: per-tick log-returns and trade counts, optionally normalised
//! - **Estimates**: PDF and PSD of the return modulus and of trade counts,
//!   written as two-column text files
//!
//! ```text
//!   RunConfig ──► HerdingModel ──► returns / trades ──► process_pdf ──► <stem>.ret.dist
//!   (JSON+CLI)     (per seed)          series       └─► process_psd ──► <stem>.ret.spec
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod realization;
pub mod stats;

// Re-export main types
pub use cli::Cli;
pub use config::RunConfig;
pub use error::{ConfigError, Result, RunError, StatsError};
pub use realization::{
    Deadline, RealizationReport, RealizationSeries, collect_series, run, run_realization,
};
pub use stats::{process_pdf, process_psd};
