//! Application layer
//!
//! Contains:
//! - **random**: the random source port consumed by the engine
//! - **simulation**: population configuration, event rates and the herding model

mod random;
pub mod simulation;

pub use random::RandomSource;
