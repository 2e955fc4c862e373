//! Domain layer: agents, population partition and the limit order book

mod agent;
mod order_book;
mod population;

pub use agent::{Agent, AgentId, AgentState};
pub use order_book::{
    Ask, AskSide, BestQuotes, Bid, BidSide, BookSide, OrderBook, PositionIndex, Priority,
    RestingOrder,
};
pub use population::{AgentSet, Population};
