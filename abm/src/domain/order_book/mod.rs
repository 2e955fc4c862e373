//! Limit order book
//!
//! Each agent holds at most one order per side, so both sides are sized to
//! the agent count once and never grow.

mod book;
mod side;

pub use book::{BestQuotes, OrderBook};
pub use side::{Ask, AskSide, Bid, BidSide, BookSide, PositionIndex, Priority, RestingOrder};
