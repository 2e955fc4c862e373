//! Infrastructure Layer
//!
//! Concrete random sources for the simulation engine.

mod rng;
mod scripted;

pub use rng::SeededSource;
pub use scripted::ScriptedSource;
