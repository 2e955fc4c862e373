//! Population partition
//!
//! Two fixed-capacity id sets, one per role. Insertion is an append and
//! removal swaps the last member into the vacated slot, so member order is
//! not stable.

use super::AgentId;
use crate::error::{AbmError, Result};

/// Fixed-capacity set of agent ids with swap-remove deletion
#[derive(Debug, Clone)]
pub struct AgentSet {
    name: &'static str,
    members: Vec<AgentId>,
    capacity: usize,
}

impl AgentSet {
    /// Create an empty set that can hold `capacity` ids
    pub fn with_capacity(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            members: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Member stored at `position`
    #[inline]
    pub fn get(&self, position: usize) -> Option<AgentId> {
        self.members.get(position).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.members.iter().copied()
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.find(agent).is_some()
    }

    /// Append an id
    pub fn add(&mut self, agent: AgentId) -> Result<()> {
        if self.members.len() >= self.capacity {
            return Err(AbmError::CapacityExceeded {
                structure: self.name,
                capacity: self.capacity,
            });
        }
        self.members.push(agent);
        Ok(())
    }

    /// Remove the member at `position`, moving the last member into its slot
    pub fn remove_at(&mut self, position: usize) -> Result<AgentId> {
        if position >= self.members.len() {
            return Err(AbmError::OutOfRange {
                operation: "AgentSet::remove_at",
                position,
                len: self.members.len(),
            });
        }
        Ok(self.members.swap_remove(position))
    }

    /// Remove `agent` wherever it is stored
    pub fn remove(&mut self, agent: AgentId) -> Result<()> {
        let position = self.find(agent).ok_or(AbmError::NotMember {
            structure: self.name,
            agent,
        })?;
        self.remove_at(position).map(|_| ())
    }

    /// Linear scan for the position of `agent`
    pub fn find(&self, agent: AgentId) -> Option<usize> {
        self.members.iter().position(|&a| a == agent)
    }

    /// Pick a member from a uniform draw `u` in [0, 1)
    pub fn pick(&self, u: f64) -> Option<AgentId> {
        if self.members.is_empty() {
            return None;
        }
        let position = ((u * self.members.len() as f64) as usize).min(self.members.len() - 1);
        self.get(position)
    }
}

/// Disjoint fundamentalist / chartist sets covering every agent id
#[derive(Debug, Clone)]
pub struct Population {
    fundamentalists: AgentSet,
    chartists: AgentSet,
}

impl Population {
    /// Empty partition sized for `n_agents` ids
    pub fn with_capacity(n_agents: usize) -> Self {
        Self {
            fundamentalists: AgentSet::with_capacity("fundamentalists", n_agents),
            chartists: AgentSet::with_capacity("chartists", n_agents),
        }
    }

    pub fn fundamentalists(&self) -> &AgentSet {
        &self.fundamentalists
    }

    pub fn chartists(&self) -> &AgentSet {
        &self.chartists
    }

    #[inline]
    pub fn n_fundamentalists(&self) -> usize {
        self.fundamentalists.len()
    }

    #[inline]
    pub fn n_chartists(&self) -> usize {
        self.chartists.len()
    }

    /// Total number of agents across both roles
    #[inline]
    pub fn n_agents(&self) -> usize {
        self.fundamentalists.len() + self.chartists.len()
    }

    pub fn add_fundamentalist(&mut self, agent: AgentId) -> Result<()> {
        self.fundamentalists.add(agent)
    }

    pub fn add_chartist(&mut self, agent: AgentId) -> Result<()> {
        self.chartists.add(agent)
    }

    /// Move `agent` from the fundamentalist set into the chartist set
    pub fn to_chartist(&mut self, agent: AgentId) -> Result<()> {
        self.fundamentalists.remove(agent)?;
        self.chartists.add(agent)
    }

    /// Move `agent` from the chartist set into the fundamentalist set
    pub fn to_fundamentalist(&mut self, agent: AgentId) -> Result<()> {
        self.chartists.remove(agent)?;
        self.fundamentalists.add(agent)
    }
}
