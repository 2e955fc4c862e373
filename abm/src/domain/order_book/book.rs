use super::side::{AskSide, BidSide, RestingOrder};
use crate::domain::AgentId;

/// Best quotes on both sides
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestQuotes {
    /// Midpoint of best ask and best bid
    pub mid_price: f64,
    pub ask_owner: AgentId,
    pub bid_owner: AgentId,
}

/// Bid and ask sides over the same owner universe
///
/// Matching decisions are taken by the engine; the book only stores quotes.
#[derive(Debug, Clone)]
pub struct OrderBook {
    bid: BidSide,
    ask: AskSide,
}

impl OrderBook {
    /// Empty book where each side can hold one order per agent
    pub fn new(n_agents: usize) -> Self {
        Self {
            bid: BidSide::with_capacity(n_agents),
            ask: AskSide::with_capacity(n_agents),
        }
    }

    pub fn bid(&self) -> &BidSide {
        &self.bid
    }

    pub fn ask(&self) -> &AskSide {
        &self.ask
    }

    pub fn bid_mut(&mut self) -> &mut BidSide {
        &mut self.bid
    }

    pub fn ask_mut(&mut self) -> &mut AskSide {
        &mut self.ask
    }

    pub fn best_bid(&self) -> Option<&RestingOrder> {
        self.bid.best()
    }

    pub fn best_ask(&self) -> Option<&RestingOrder> {
        self.ask.best()
    }

    /// Whether the best ask is below the best bid
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => ask.price < bid.price,
            _ => false,
        }
    }

    /// Spread between best ask and best bid
    pub fn spread(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.price - bid.price),
            _ => None,
        }
    }

    /// Mid price and best owners, if both sides are quoted
    pub fn best(&self) -> Option<BestQuotes> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(BestQuotes {
                mid_price: (ask.price + bid.price) / 2.0,
                ask_owner: ask.owner,
                bid_owner: bid.owner,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PositionIndex;

    fn book_with(bids: &[(usize, f64)], asks: &[(usize, f64)]) -> OrderBook {
        let mut book = OrderBook::new(8);
        let mut bid_index = PositionIndex::new(8);
        let mut ask_index = PositionIndex::new(8);
        for &(agent, price) in bids {
            book.bid_mut().add(price, AgentId(agent), &mut bid_index).unwrap();
        }
        for &(agent, price) in asks {
            book.ask_mut().add(price, AgentId(agent), &mut ask_index).unwrap();
        }
        book
    }

    #[test]
    fn test_empty_book_has_no_best() {
        let book = OrderBook::new(4);

        assert!(book.best().is_none());
        assert!(book.spread().is_none());
        assert!(!book.is_crossed());
    }

    #[test]
    fn test_best_quotes() {
        let book = book_with(&[(0, 99.0), (1, 98.0)], &[(0, 101.0), (1, 103.0)]);

        let best = book.best().unwrap();
        assert_eq!(best.mid_price, 100.0);
        assert_eq!(best.bid_owner, AgentId(0));
        assert_eq!(best.ask_owner, AgentId(0));
        assert_eq!(book.spread(), Some(2.0));
        assert!(!book.is_crossed());
    }

    #[test]
    fn test_crossed_book() {
        let book = book_with(&[(0, 105.0)], &[(1, 101.0)]);

        assert!(book.is_crossed());
        assert_eq!(book.spread(), Some(-4.0));
    }
}
