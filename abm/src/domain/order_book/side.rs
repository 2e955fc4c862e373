//! One side of the limit order book
//!
//! Resting orders are kept in a flat array sorted best-first. Every mutation
//! shifts or swaps neighbours and writes the new position of each moved owner
//! into a caller-supplied [`PositionIndex`], so `index[owner]` always points
//! at the owner's order on this side.

use crate::domain::AgentId;
use crate::error::{AbmError, Result};
use std::marker::PhantomData;

/// Sort direction of a book side
pub trait Priority: Copy + Default + std::fmt::Debug {
    const NAME: &'static str;

    /// Whether quote `a` has strictly higher priority than quote `b`
    fn better(a: f64, b: f64) -> bool;
}

/// Buy side: highest price first
#[derive(Debug, Clone, Copy, Default)]
pub struct Bid;

impl Priority for Bid {
    const NAME: &'static str = "bid side";

    #[inline]
    fn better(a: f64, b: f64) -> bool {
        a > b
    }
}

/// Sell side: lowest price first
#[derive(Debug, Clone, Copy, Default)]
pub struct Ask;

impl Priority for Ask {
    const NAME: &'static str = "ask side";

    #[inline]
    fn better(a: f64, b: f64) -> bool {
        a < b
    }
}

/// A standing limit order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestingOrder {
    pub price: f64,
    pub owner: AgentId,
}

/// Owner -> position map for one book side (`None` = no order on that side)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionIndex(Vec<Option<usize>>);

impl PositionIndex {
    pub fn new(n_agents: usize) -> Self {
        Self(vec![None; n_agents])
    }

    #[inline]
    pub fn get(&self, agent: AgentId) -> Option<usize> {
        self.0.get(agent.index()).copied().flatten()
    }

    #[inline]
    pub fn contains(&self, agent: AgentId) -> bool {
        self.get(agent).is_some()
    }

    #[inline]
    fn set(&mut self, agent: AgentId, position: usize) {
        self.0[agent.index()] = Some(position);
    }

    #[inline]
    fn clear(&mut self, agent: AgentId) {
        self.0[agent.index()] = None;
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(agent, position)` for every agent
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, Option<usize>)> + '_ {
        self.0.iter().enumerate().map(|(i, p)| (AgentId(i), *p))
    }
}

/// Capacity-bounded, priority-sorted sequence of resting orders
#[derive(Debug, Clone)]
pub struct BookSide<P: Priority> {
    orders: Vec<RestingOrder>,
    capacity: usize,
    _priority: PhantomData<P>,
}

pub type BidSide = BookSide<Bid>;
pub type AskSide = BookSide<Ask>;

impl<P: Priority> BookSide<P> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            orders: Vec::with_capacity(capacity),
            capacity,
            _priority: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Order at `position` (0 = best)
    #[inline]
    pub fn get(&self, position: usize) -> Option<&RestingOrder> {
        self.orders.get(position)
    }

    /// Best resting order
    #[inline]
    pub fn best(&self) -> Option<&RestingOrder> {
        self.orders.first()
    }

    pub fn orders(&self) -> &[RestingOrder] {
        &self.orders
    }

    /// Best order not owned by `exclude`, looking no deeper than second best
    pub fn counterparty(&self, exclude: AgentId) -> Option<RestingOrder> {
        match self.orders.first() {
            Some(order) if order.owner == exclude => self.orders.get(1).copied(),
            other => other.copied(),
        }
    }

    /// Insert a new order after every order of equal or better priority
    pub fn add(&mut self, price: f64, owner: AgentId, index: &mut PositionIndex) -> Result<usize> {
        if self.orders.len() >= self.capacity {
            return Err(AbmError::CapacityExceeded {
                structure: P::NAME,
                capacity: self.capacity,
            });
        }

        let position = self
            .orders
            .iter()
            .position(|o| P::better(price, o.price))
            .unwrap_or(self.orders.len());

        self.orders.insert(position, RestingOrder { price, owner });
        self.reindex_from(position, index);
        Ok(position)
    }

    /// Remove the order at `position`
    pub fn cancel(&mut self, position: usize, index: &mut PositionIndex) -> Result<RestingOrder> {
        self.check_position("cancel", position)?;

        let removed = self.orders.remove(position);
        index.clear(removed.owner);
        self.reindex_from(position, index);
        Ok(removed)
    }

    /// Reprice the order at `position` and bubble it to its sorted slot
    ///
    /// An improved order moves ahead of orders with an equal price; a worsened
    /// (or unchanged) one moves behind them. Returns the order's new position.
    pub fn revise(
        &mut self,
        position: usize,
        price: f64,
        index: &mut PositionIndex,
    ) -> Result<usize> {
        self.check_position("revise", position)?;

        let improved = P::better(price, self.orders[position].price);
        self.orders[position].price = price;

        let mut i = position;
        if improved {
            while i > 0 && !P::better(self.orders[i - 1].price, self.orders[i].price) {
                self.swap(i - 1, i, index);
                i -= 1;
            }
        } else {
            while i + 1 < self.orders.len()
                && !P::better(self.orders[i].price, self.orders[i + 1].price)
            {
                self.swap(i, i + 1, index);
                i += 1;
            }
        }
        Ok(i)
    }

    /// Whether the best quote would execute against an order at `reference`
    pub fn would_market(&self, reference: f64) -> bool {
        self.best().is_some_and(|o| P::better(o.price, reference))
    }

    /// Whether quotes never improve with position
    pub fn is_sorted(&self) -> bool {
        self.orders
            .windows(2)
            .all(|w| !P::better(w[1].price, w[0].price))
    }

    /// Whether `index` and the stored owners agree in both directions
    pub fn is_consistent_with(&self, index: &PositionIndex) -> bool {
        let forward = index.iter().all(|(agent, position)| match position {
            Some(p) => self.orders.get(p).is_some_and(|o| o.owner == agent),
            None => true,
        });
        let backward = self
            .orders
            .iter()
            .enumerate()
            .all(|(p, o)| index.get(o.owner) == Some(p));
        forward && backward
    }

    fn check_position(&self, operation: &'static str, position: usize) -> Result<()> {
        if position >= self.orders.len() {
            return Err(AbmError::OutOfRange {
                operation,
                position,
                len: self.orders.len(),
            });
        }
        Ok(())
    }

    fn swap(&mut self, a: usize, b: usize, index: &mut PositionIndex) {
        self.orders.swap(a, b);
        index.set(self.orders[a].owner, a);
        index.set(self.orders[b].owner, b);
    }

    fn reindex_from(&mut self, start: usize, index: &mut PositionIndex) {
        for (position, order) in self.orders.iter().enumerate().skip(start) {
            index.set(order.owner, position);
        }
    }
}
