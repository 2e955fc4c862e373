use crate::domain::AgentId;
use thiserror::Error;

/// Fatal bookkeeping and configuration errors raised by the model.
///
/// None of these are expected during a correct run: each one means an index,
/// count or position went out of sync and the realization must stop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AbmError {
    #[error("{structure} is full (capacity {capacity})")]
    CapacityExceeded {
        structure: &'static str,
        capacity: usize,
    },

    #[error("{operation}: position {position} out of range (stored {len})")]
    OutOfRange {
        operation: &'static str,
        position: usize,
        len: usize,
    },

    #[error("{structure} does not contain agent {agent}")]
    NotMember {
        structure: &'static str,
        agent: AgentId,
    },

    #[error("{operation}: inconsistent resting orders for agent {agent}")]
    OrderBookkeeping {
        operation: &'static str,
        agent: AgentId,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Population has not been reset")]
    Uninitialized,
}

pub type Result<T> = std::result::Result<T, AbmError>;
