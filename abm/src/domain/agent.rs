//! Agent records
//!
//! Agents live in a fixed table for the whole run. They are never created or
//! destroyed after a population reset, only relabeled between the two roles.

use serde::{Deserialize, Serialize};

/// Stable agent identifier: the index into the engine's agent table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub usize);

impl AgentId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trading role currently held by an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentState {
    /// Trades toward the fundamental price, holds no resting orders
    Fundamentalist,
    /// Quotes a bid and an ask around its valuation
    Chartist,
}

/// Per-agent parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    /// Half of the distance between the agent's bid and ask, fixed for the run
    pub half_spread: f64,
    /// Reference price the agent quotes around; follows the last trade
    pub valuation: f64,
    pub state: AgentState,
}

impl Agent {
    pub fn new(half_spread: f64, valuation: f64, state: AgentState) -> Self {
        Self {
            half_spread,
            valuation,
            state,
        }
    }

    /// Price of the agent's resting ask
    #[inline]
    pub fn ask_quote(&self) -> f64 {
        self.valuation + self.half_spread
    }

    /// Price of the agent's resting bid
    #[inline]
    pub fn bid_quote(&self) -> f64 {
        self.valuation - self.half_spread
    }

    #[inline]
    pub fn is_chartist(&self) -> bool {
        self.state == AgentState::Chartist
    }
}
