//! Agent-Based Model (ABM) of herding in a limit order book market
//!
//! Fundamentalists trade toward a fixed fundamental price; chartists keep a
//! bid and an ask in the book around the last traded price and trade with a
//! shared mood. Agents switch roles under a herding pressure that grows with
//! the chartist share. The model is simulated as a continuous-time jump
//! process and observed at regular report ticks.
//!
//! ```no_run
//! use herding_abm::{HerdingModel, PopulationConfig, SeededSource};
//!
//! let mut model = HerdingModel::new(SeededSource::new(1), 1.0, 30000.0, 30000.0);
//! model.reset_population(&PopulationConfig::default())?;
//! for _ in 0..1000 {
//!     model.step()?;
//!     println!("{} {}", model.last_price(), model.trade_events());
//! }
//! # Ok::<(), herding_abm::AbmError>(())
//! ```

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-export key types at crate root
pub use application::RandomSource;
pub use application::simulation::{
    EventKind, EventRates, HerdingModel, PopulationConfig, TickSnapshot,
};
pub use domain::{Agent, AgentId, AgentState, OrderBook, Population};
pub use error::{AbmError, Result};
pub use infrastructure::{ScriptedSource, SeededSource};
