//! Herding model engine
//!
//! A continuous-time Markov jump process over five event classes (see
//! [`EventKind`]). Each event is drawn from the rates of the current state,
//! mutates agents, the population partition and the order book, then the
//! rates are re-evaluated. Time advances by an independent exponential
//! holding time after the jump.
//!
//! # Reporting
//!
//! [`HerdingModel::step`] runs events until the next report boundary is
//! crossed. The observable snapshot is overwritten before every event, so
//! after `step` returns it holds the state immediately preceding the event
//! that crossed the boundary.

use super::{EventKind, EventRates, PopulationConfig};
use crate::application::RandomSource;
use crate::domain::{Agent, AgentId, AgentState, OrderBook, Population, PositionIndex};
use crate::error::{AbmError, Result};

/// Prices below this floor are reset to the fundamental price
pub const PRICE_FLOOR: f64 = 10.0;

/// Externally observable state, refreshed before every event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSnapshot {
    /// Last observed price
    pub price: f64,
    /// Last observed number of chartists
    pub chartists: usize,
    /// Last observed chartist mood
    pub mood: f64,
    /// Cumulative trade events so far
    pub trade_events: u64,
}

/// Chartist / fundamentalist market driven through a limit order book
pub struct HerdingModel<R: RandomSource> {
    rng: R,

    // time tracking
    time: f64,
    report_at: f64,
    report_interval: f64,

    // price tracking
    price: f64,
    fundamental_price: f64,
    last_price: f64,
    last_chartists: usize,
    last_mood: f64,
    trade_events: u64,
    events: u64,

    // agents
    config: PopulationConfig,
    initialized: bool,
    agents: Vec<Agent>,
    population: Population,
    mood: f64,
    prob_bid: f64,
    rates: EventRates,

    // order book and per-agent order positions
    book: OrderBook,
    ask_positions: PositionIndex,
    bid_positions: PositionIndex,
}

impl<R: RandomSource> HerdingModel<R> {
    /// Create a model; [`HerdingModel::reset_population`] must follow
    pub fn new(rng: R, report_interval: f64, price: f64, fundamental_price: f64) -> Self {
        Self {
            rng,
            time: 0.0,
            report_at: 0.0,
            report_interval,
            price,
            fundamental_price,
            last_price: price,
            last_chartists: 0,
            last_mood: 0.0,
            trade_events: 0,
            events: 0,
            config: PopulationConfig::default(),
            initialized: false,
            agents: Vec::new(),
            population: Population::with_capacity(0),
            mood: 0.0,
            prob_bid: 0.5,
            rates: EventRates::default(),
            book: OrderBook::new(0),
            ask_positions: PositionIndex::new(0),
            bid_positions: PositionIndex::new(0),
        }
    }

    /// Rebuild agents, population and order book from `config`
    ///
    /// Agents `0..n_fundamentalists` start as fundamentalists, the rest as
    /// chartists. Every agent values the asset at the current price and gets
    /// a half-spread of `Gamma(shape, scale) / 2`. Time and price are left as
    /// they are.
    ///
    /// Fails with [`AbmError::InvalidConfig`] when `config` is invalid or the
    /// report interval is not a positive finite number.
    pub fn reset_population(&mut self, config: &PopulationConfig) -> Result<()> {
        config.validate()?;
        if !(self.report_interval > 0.0 && self.report_interval.is_finite()) {
            return Err(AbmError::InvalidConfig(format!(
                "report interval must be positive, got {}",
                self.report_interval
            )));
        }

        let n_agents = config.n_agents();
        let price = self.price;
        let rng = &mut self.rng;
        self.agents = (0..n_agents)
            .map(|i| {
                let half_spread = rng.gamma(config.spread_shape, config.spread_scale) / 2.0;
                let state = if i < config.n_fundamentalists {
                    AgentState::Fundamentalist
                } else {
                    AgentState::Chartist
                };
                Agent::new(half_spread, price, state)
            })
            .collect();

        self.population = Population::with_capacity(n_agents);
        for (i, agent) in self.agents.iter().enumerate() {
            match agent.state {
                AgentState::Fundamentalist => self.population.add_fundamentalist(AgentId(i))?,
                AgentState::Chartist => self.population.add_chartist(AgentId(i))?,
            }
        }

        self.book = OrderBook::new(n_agents);
        self.ask_positions = PositionIndex::new(n_agents);
        self.bid_positions = PositionIndex::new(n_agents);
        let chartists: Vec<AgentId> = self.population.chartists().iter().collect();
        for agent in chartists {
            self.post_quotes(agent)?;
        }

        self.config = config.clone();
        self.mood = config.initial_mood;
        self.last_chartists = self.population.n_chartists();
        self.last_mood = self.mood;
        self.initialized = true;
        self.refresh_rates();

        log::debug!(
            "Population reset: {} fundamentalists, {} chartists, book depth {}/{}",
            self.population.n_fundamentalists(),
            self.population.n_chartists(),
            self.book.bid().len(),
            self.book.ask().len()
        );
        Ok(())
    }

    /// Run events until simulated time reaches the next report boundary
    pub fn step(&mut self) -> Result<()> {
        if !self.initialized {
            return Err(AbmError::Uninitialized);
        }

        self.report_at += self.report_interval;
        while self.time < self.report_at {
            self.last_chartists = self.population.n_chartists();
            self.last_mood = self.mood;
            self.last_price = self.price;
            self.event_step()?;
        }
        Ok(())
    }

    /// Draw and apply a single event, then advance time
    fn event_step(&mut self) -> Result<()> {
        if self.rates.is_absorbing() {
            self.time = f64::INFINITY;
            return Ok(());
        }

        let dt = self.rng.exponential(self.rates.total());
        let kind = self.rates.select(self.rng.uniform());
        self.apply(kind)?;
        self.time += dt;
        self.events += 1;

        log::trace!(
            "event {:?} t={:.6} price={:.4} chartists={}",
            kind,
            self.time,
            self.price,
            self.population.n_chartists()
        );
        Ok(())
    }

    /// Apply one event of class `kind` to the current state
    ///
    /// Random choices inside the event (acting agent, buy or sell) are drawn
    /// from the model's random source. Time is not advanced.
    pub fn apply(&mut self, kind: EventKind) -> Result<()> {
        if !self.initialized {
            return Err(AbmError::Uninitialized);
        }

        match kind {
            EventKind::ChartistTrade => self.chartist_trade(),
            EventKind::FundamentalistTrade => self.fundamentalist_trade(),
            EventKind::MoodFlip => {
                self.mood = -self.mood;
                self.refresh_rates();
                Ok(())
            }
            EventKind::SwitchToChartist => {
                match self.population.fundamentalists().pick(self.rng.uniform()) {
                    Some(agent) => self.switch_to_chartist(agent),
                    None => Ok(()),
                }
            }
            EventKind::SwitchToFundamentalist => {
                match self.population.chartists().pick(self.rng.uniform()) {
                    Some(agent) => self.switch_to_fundamentalist(agent),
                    None => Ok(()),
                }
            }
        }
    }

    fn chartist_trade(&mut self) -> Result<()> {
        if let Some(agent) = self.population.chartists().pick(self.rng.uniform()) {
            self.chartist_market(agent);
        }
        self.clear_market();
        self.requote()?;
        self.refresh_rates();
        Ok(())
    }

    fn fundamentalist_trade(&mut self) -> Result<()> {
        self.fundamentalist_market();
        self.clear_market();
        self.requote()?;
        self.refresh_rates();
        Ok(())
    }

    /// Turn fundamentalist `agent` into a chartist and post its quotes
    pub fn switch_to_chartist(&mut self, agent: AgentId) -> Result<()> {
        self.population.to_chartist(agent)?;
        self.agents[agent.index()].state = AgentState::Chartist;
        self.post_quotes(agent)?;
        self.refresh_rates();
        Ok(())
    }

    /// Turn chartist `agent` into a fundamentalist, pull its quotes and let
    /// it react to mispricing straight away
    pub fn switch_to_fundamentalist(&mut self, agent: AgentId) -> Result<()> {
        self.population.to_fundamentalist(agent)?;
        self.agents[agent.index()].state = AgentState::Fundamentalist;
        self.cancel_quotes(agent)?;
        self.fundamentalist_market();
        self.refresh_rates();
        Ok(())
    }

    // chartist interaction with the book

    /// Market order by chartist `agent` against the best counter-quote,
    /// falling back to the second best when the best one is its own
    fn chartist_market(&mut self, agent: AgentId) -> bool {
        let counterparty = if self.rng.uniform() < self.prob_bid {
            self.book.ask().counterparty(agent)
        } else {
            self.book.bid().counterparty(agent)
        };

        match counterparty {
            Some(order) => {
                self.price = order.price;
                self.trade_events += 1;
                true
            }
            None => false,
        }
    }

    fn post_quotes(&mut self, agent: AgentId) -> Result<()> {
        if self.ask_positions.contains(agent) || self.bid_positions.contains(agent) {
            return Err(AbmError::OrderBookkeeping {
                operation: "post_quotes",
                agent,
            });
        }

        let (ask, bid) = {
            let a = &self.agents[agent.index()];
            (a.ask_quote(), a.bid_quote())
        };
        self.book
            .ask_mut()
            .add(ask, agent, &mut self.ask_positions)?;
        self.book
            .bid_mut()
            .add(bid, agent, &mut self.bid_positions)?;
        Ok(())
    }

    fn revise_quotes(&mut self, agent: AgentId) -> Result<()> {
        let (Some(ask_position), Some(bid_position)) = (
            self.ask_positions.get(agent),
            self.bid_positions.get(agent),
        ) else {
            return Err(AbmError::OrderBookkeeping {
                operation: "revise_quotes",
                agent,
            });
        };

        let (ask, bid) = {
            let a = &self.agents[agent.index()];
            (a.ask_quote(), a.bid_quote())
        };
        self.book
            .ask_mut()
            .revise(ask_position, ask, &mut self.ask_positions)?;
        self.book
            .bid_mut()
            .revise(bid_position, bid, &mut self.bid_positions)?;
        Ok(())
    }

    fn cancel_quotes(&mut self, agent: AgentId) -> Result<()> {
        let (Some(ask_position), Some(bid_position)) = (
            self.ask_positions.get(agent),
            self.bid_positions.get(agent),
        ) else {
            return Err(AbmError::OrderBookkeeping {
                operation: "cancel_quotes",
                agent,
            });
        };

        self.book
            .ask_mut()
            .cancel(ask_position, &mut self.ask_positions)?;
        self.book
            .bid_mut()
            .cancel(bid_position, &mut self.bid_positions)?;
        Ok(())
    }

    /// Every agent adopts the last price; chartists move their quotes
    fn requote(&mut self) -> Result<()> {
        let price = self.price;
        for i in 0..self.agents.len() {
            self.agents[i].valuation = price;
            if self.agents[i].is_chartist() {
                self.revise_quotes(AgentId(i))?;
            }
        }
        Ok(())
    }

    // fundamentalist interaction with the book

    /// Sell into a best bid above the fundamental price, otherwise buy a best
    /// ask below it
    fn fundamentalist_market(&mut self) -> bool {
        let bid = self.book.bid();
        let ask = self.book.ask();
        let quote = if bid.would_market(self.fundamental_price) {
            bid.best().map(|o| o.price)
        } else if ask.would_market(self.fundamental_price) {
            ask.best().map(|o| o.price)
        } else {
            None
        };

        match quote {
            Some(price) => {
                self.price = price;
                self.trade_events += 1;
                true
            }
            None => false,
        }
    }

    /// Circuit breaker: a price under the floor snaps back to fundamentals
    ///
    /// The reset also overwrites the observed price and counts as a trade.
    fn clear_market(&mut self) {
        if self.price < PRICE_FLOOR {
            log::debug!(
                "Price {:.4} below floor, resetting to {:.4}",
                self.price,
                self.fundamental_price
            );
            self.last_price = self.fundamental_price;
            self.price = self.fundamental_price;
            self.trade_events += 1;
        }
    }

    fn refresh_rates(&mut self) {
        self.prob_bid = (1.0 + self.mood) / 2.0;
        self.rates = EventRates::new(
            &self.config,
            self.population.n_fundamentalists(),
            self.population.n_chartists(),
            self.price,
            self.fundamental_price,
        );
    }

    // observers

    /// Snapshot as of the last report boundary
    pub fn snapshot(&self) -> TickSnapshot {
        TickSnapshot {
            price: self.last_price,
            chartists: self.last_chartists,
            mood: self.last_mood,
            trade_events: self.trade_events,
        }
    }

    pub fn last_price(&self) -> f64 {
        self.last_price
    }

    pub fn last_chartists(&self) -> usize {
        self.last_chartists
    }

    pub fn last_mood(&self) -> f64 {
        self.last_mood
    }

    /// Cumulative number of trade events, never decreases
    pub fn trade_events(&self) -> u64 {
        self.trade_events
    }

    /// Number of events applied by [`HerdingModel::step`]
    pub fn events_processed(&self) -> u64 {
        self.events
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn report_at(&self) -> f64 {
        self.report_at
    }

    pub fn report_interval(&self) -> f64 {
        self.report_interval
    }

    /// Price after the latest event
    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn fundamental_price(&self) -> f64 {
        self.fundamental_price
    }

    pub fn mood(&self) -> f64 {
        self.mood
    }

    /// Probability that a trading chartist buys
    pub fn prob_bid(&self) -> f64 {
        self.prob_bid
    }

    pub fn rates(&self) -> &EventRates {
        &self.rates
    }

    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn n_agents(&self) -> usize {
        self.agents.len()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, agent: AgentId) -> Option<&Agent> {
        self.agents.get(agent.index())
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn ask_positions(&self) -> &PositionIndex {
        &self.ask_positions
    }

    pub fn bid_positions(&self) -> &PositionIndex {
        &self.bid_positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{ScriptedSource, SeededSource};
    use approx::assert_relative_eq;

    /// 2 fundamentalists (ids 0, 1) and 2 chartists (ids 2, 3) with
    /// half-spreads 5, 10, 15, 20
    fn small_config() -> PopulationConfig {
        PopulationConfig {
            n_fundamentalists: 2,
            n_chartists: 2,
            ..Default::default()
        }
    }

    fn scripted_model(uniforms: &[f64]) -> HerdingModel<ScriptedSource> {
        let rng = ScriptedSource::new()
            .with_uniforms(uniforms.iter().copied())
            .with_exponentials([1.0])
            .with_gammas([10.0, 20.0, 30.0, 40.0]);
        let mut model = HerdingModel::new(rng, 1.0, 1000.0, 1000.0);
        model.reset_population(&small_config()).unwrap();
        model
    }

    fn ask_quotes(model: &HerdingModel<ScriptedSource>) -> Vec<(usize, f64)> {
        model
            .book()
            .ask()
            .orders()
            .iter()
            .map(|o| (o.owner.index(), o.price))
            .collect()
    }

    fn bid_quotes(model: &HerdingModel<ScriptedSource>) -> Vec<(usize, f64)> {
        model
            .book()
            .bid()
            .orders()
            .iter()
            .map(|o| (o.owner.index(), o.price))
            .collect()
    }

    #[test]
    fn test_step_before_reset_fails() {
        let mut model = HerdingModel::new(SeededSource::new(1), 1.0, 100.0, 100.0);
        assert_eq!(model.step(), Err(AbmError::Uninitialized));
        assert!(!model.is_initialized());
    }

    #[test]
    fn test_reset_builds_population_and_book() {
        let model = scripted_model(&[0.5]);

        assert_eq!(model.n_agents(), 4);
        assert_eq!(model.population().n_fundamentalists(), 2);
        assert_eq!(model.population().n_chartists(), 2);
        assert_eq!(model.agent(AgentId(2)).unwrap().half_spread, 15.0);

        assert_eq!(ask_quotes(&model), vec![(2, 1015.0), (3, 1020.0)]);
        assert_eq!(bid_quotes(&model), vec![(2, 985.0), (3, 980.0)]);
        assert_eq!(model.ask_positions().get(AgentId(0)), None);
        assert_eq!(model.bid_positions().get(AgentId(3)), Some(1));

        assert_eq!(model.last_chartists(), 2);
        assert_eq!(model.last_mood(), 1.0);
        assert_eq!(model.prob_bid(), 1.0);
        assert_eq!(model.trade_events(), 0);
    }

    #[test]
    fn test_reset_rejects_invalid_config() {
        let mut model = HerdingModel::new(SeededSource::new(1), 1.0, 100.0, 100.0);
        let config = PopulationConfig {
            spread_shape: -1.0,
            ..small_config()
        };

        assert!(matches!(
            model.reset_population(&config),
            Err(AbmError::InvalidConfig(_))
        ));
        assert!(!model.is_initialized());
    }

    #[test]
    fn test_first_event_is_chartist_trade() {
        // r = 0.05 selects a chartist trade, 0.95 picks chartist 3,
        // 0.5 < prob_bid = 1 makes it buy from the best ask (agent 2)
        let mut model = scripted_model(&[0.05, 0.95, 0.5]);
        assert!(0.05 < model.rates().thresholds()[0]);

        model.step().unwrap();

        assert_eq!(model.events_processed(), 1);
        assert_eq!(model.trade_events(), 1);
        assert_eq!(model.price(), 1015.0);
        assert_relative_eq!(model.time(), 1.0);

        // snapshot holds the state before the boundary-crossing event
        assert_eq!(model.last_price(), 1000.0);
        assert_eq!(model.snapshot().trade_events, 1);

        // trades do not consume resting orders; chartists requoted at 1015
        assert_eq!(model.book().ask().len(), 2);
        assert_eq!(model.book().bid().len(), 2);
        assert_eq!(ask_quotes(&model), vec![(2, 1030.0), (3, 1035.0)]);
        assert_eq!(bid_quotes(&model), vec![(2, 1000.0), (3, 995.0)]);
        assert!(model.agents().iter().all(|a| a.valuation == 1015.0));
    }

    #[test]
    fn test_self_trade_falls_back_to_second_best() {
        // chartist 2 owns the best ask, so it lifts chartist 3's ask instead
        let mut model = scripted_model(&[0.1, 0.5]);

        model.apply(EventKind::ChartistTrade).unwrap();

        assert_eq!(model.price(), 1020.0);
        assert_eq!(model.trade_events(), 1);
    }

    #[test]
    fn test_chartist_sells_when_mood_negative() {
        let mut model = scripted_model(&[0.0, 0.1]);
        model.apply(EventKind::MoodFlip).unwrap();
        assert_eq!(model.mood(), -1.0);
        assert_eq!(model.prob_bid(), 0.0);

        // chartist 2 sells; best bid is its own, so it hits chartist 3 at 980
        model.apply(EventKind::ChartistTrade).unwrap();
        assert_eq!(model.price(), 980.0);
    }

    #[test]
    fn test_switch_to_chartist_posts_both_quotes() {
        let mut model = scripted_model(&[0.5]);
        let agent = AgentId(1);

        model.switch_to_chartist(agent).unwrap();

        assert!(!model.population().fundamentalists().contains(agent));
        assert!(model.population().chartists().contains(agent));
        assert_eq!(model.agent(agent).unwrap().state, AgentState::Chartist);
        assert_eq!(model.population().n_agents(), 4);

        let ask = model.ask_positions().get(agent).unwrap();
        let bid = model.bid_positions().get(agent).unwrap();
        assert_eq!(model.book().ask().get(ask).unwrap().price, 1010.0);
        assert_eq!(model.book().bid().get(bid).unwrap().price, 990.0);
        assert_eq!(model.book().ask().len(), 3);
        assert_eq!(model.book().bid().len(), 3);
        assert_eq!(
            model.book().ask().orders().iter().filter(|o| o.owner == agent).count(),
            1
        );
    }

    #[test]
    fn test_switch_to_chartist_of_chartist_fails() {
        let mut model = scripted_model(&[0.5]);

        assert!(matches!(
            model.switch_to_chartist(AgentId(2)),
            Err(AbmError::NotMember { .. })
        ));
    }

    #[test]
    fn test_switch_to_fundamentalist_cancels_quotes() {
        let mut model = scripted_model(&[0.5]);
        let agent = AgentId(3);

        model.switch_to_fundamentalist(agent).unwrap();

        assert!(model.population().fundamentalists().contains(agent));
        assert_eq!(model.population().n_chartists(), 1);
        assert_eq!(model.ask_positions().get(agent), None);
        assert_eq!(model.bid_positions().get(agent), None);
        assert_eq!(model.book().ask().len(), 1);
        assert_eq!(model.book().bid().len(), 1);
        // price at fundamentals, so the converted agent does not trade
        assert_eq!(model.trade_events(), 0);
    }

    #[test]
    fn test_switch_to_fundamentalist_trades_on_mispricing() {
        let rng = ScriptedSource::new()
            .with_uniforms([0.5])
            .with_gammas([10.0, 20.0, 30.0, 40.0]);
        let mut model = HerdingModel::new(rng, 1.0, 1100.0, 1000.0);
        model.reset_population(&small_config()).unwrap();

        model.switch_to_fundamentalist(AgentId(2)).unwrap();

        // agent 2's bid at 1085 is gone, agent 3's bid at 1080 is best
        assert_eq!(model.trade_events(), 1);
        assert_eq!(model.price(), 1080.0);
        assert_eq!(model.book().bid().len(), 1);
        // no requote on conversion
        assert!(model.agents().iter().all(|a| a.valuation == 1100.0));
        assert_eq!(ask_quotes(&model), vec![(3, 1120.0)]);
        assert_eq!(bid_quotes(&model), vec![(3, 1080.0)]);
    }

    #[test]
    fn test_reset_rejects_non_positive_report_interval() {
        for interval in [0.0, -1.0, f64::NAN] {
            let mut model = HerdingModel::new(SeededSource::new(1), interval, 100.0, 100.0);
            assert!(matches!(
                model.reset_population(&small_config()),
                Err(AbmError::InvalidConfig(_))
            ));
            assert_eq!(model.step(), Err(AbmError::Uninitialized));
        }
    }

    #[test]
    fn test_fundamentalist_sells_into_overpriced_bid() {
        let rng = ScriptedSource::new()
            .with_uniforms([0.5])
            .with_gammas([10.0, 20.0, 30.0, 40.0]);
        // chartists value the asset at 1100 while fundamentals are 1000
        let mut model = HerdingModel::new(rng, 1.0, 1100.0, 1000.0);
        model.reset_population(&small_config()).unwrap();

        model.apply(EventKind::FundamentalistTrade).unwrap();

        // best bid is chartist 2 at 1100 - 15
        assert_eq!(model.price(), 1085.0);
        assert_eq!(model.trade_events(), 1);
        assert!(model.agents().iter().all(|a| a.valuation == 1085.0));
    }

    #[test]
    fn test_fundamentalist_buys_underpriced_ask() {
        let rng = ScriptedSource::new()
            .with_uniforms([0.5])
            .with_gammas([10.0, 20.0, 30.0, 40.0]);
        let mut model = HerdingModel::new(rng, 1.0, 900.0, 1000.0);
        model.reset_population(&small_config()).unwrap();

        model.apply(EventKind::FundamentalistTrade).unwrap();

        assert_eq!(model.price(), 915.0);
        assert_eq!(model.trade_events(), 1);
    }

    #[test]
    fn test_price_floor_resets_to_fundamentals() {
        let rng = ScriptedSource::new()
            .with_uniforms([0.0, 0.0])
            .with_gammas([10.0, 20.0, 30.0, 40.0]);
        // valuation 12 puts both chartist bids below the floor
        let mut model = HerdingModel::new(rng, 1.0, 12.0, 1000.0);
        model.reset_population(&small_config()).unwrap();
        model.apply(EventKind::MoodFlip).unwrap();

        // chartist 2 sells into chartist 3's bid at 12 - 20 = -8
        model.apply(EventKind::ChartistTrade).unwrap();

        assert_eq!(model.price(), 1000.0);
        assert_eq!(model.last_price(), 1000.0);
        assert_eq!(model.trade_events(), 2);
    }

    #[test]
    fn test_mood_flip_changes_only_buy_probability() {
        let mut model = scripted_model(&[0.5]);
        let before = *model.rates();

        model.apply(EventKind::MoodFlip).unwrap();
        model.apply(EventKind::MoodFlip).unwrap();
        model.apply(EventKind::MoodFlip).unwrap();

        assert_eq!(model.mood(), -1.0);
        assert_eq!(model.prob_bid(), 0.0);
        assert_eq!(*model.rates(), before);
    }

    #[test]
    fn test_step_reaches_report_boundary() {
        let mut model = HerdingModel::new(SeededSource::new(7), 1.0, 1000.0, 1000.0);
        model
            .reset_population(&PopulationConfig {
                n_fundamentalists: 20,
                n_chartists: 20,
                base_event_rate: 0.01,
                ..Default::default()
            })
            .unwrap();

        let mut trades = 0;
        for tick in 1..=50 {
            model.step().unwrap();
            assert!(model.time() >= tick as f64);
            assert_eq!(model.report_at(), tick as f64);
            assert!(model.trade_events() >= trades);
            trades = model.trade_events();
        }
        assert!(model.events_processed() > 0);
    }

    #[test]
    fn test_absorbing_state_stops_time() {
        let rng = ScriptedSource::new().with_gammas([10.0]);
        let mut model = HerdingModel::new(rng, 1.0, 1000.0, 1000.0);
        // one fundamentalist at fair price, no chartists, no mood flips:
        // alpha = 1 gives a zero herding multiplier with lambda_zero = 0
        model
            .reset_population(&PopulationConfig {
                n_fundamentalists: 1,
                n_chartists: 0,
                alpha: 1.0,
                lambda_zero: 0.0,
                ..Default::default()
            })
            .unwrap();
        assert!(model.rates().is_absorbing());

        model.step().unwrap();
        model.step().unwrap();

        assert_eq!(model.time(), f64::INFINITY);
        assert_eq!(model.events_processed(), 0);
        assert_eq!(model.last_price(), 1000.0);
    }
}
