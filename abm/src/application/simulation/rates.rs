//! Event-rate model
//!
//! Five competing exponential event streams. Their intensities depend on the
//! population split, the price and the fundamental price, and are turned into
//! cumulative selection thresholds after every state change.

use super::PopulationConfig;

/// Event classes of the jump process, in selection order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A random chartist trades against the best counter-quote
    ChartistTrade,
    /// A fundamentalist trades against mispriced best quotes
    FundamentalistTrade,
    /// Chartist mood changes sign
    MoodFlip,
    /// A fundamentalist becomes a chartist
    SwitchToChartist,
    /// A chartist becomes a fundamentalist
    SwitchToFundamentalist,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::ChartistTrade,
        EventKind::FundamentalistTrade,
        EventKind::MoodFlip,
        EventKind::SwitchToChartist,
        EventKind::SwitchToFundamentalist,
    ];

    /// Numeric event code (0..=4)
    pub fn code(self) -> usize {
        match self {
            EventKind::ChartistTrade => 0,
            EventKind::FundamentalistTrade => 1,
            EventKind::MoodFlip => 2,
            EventKind::SwitchToChartist => 3,
            EventKind::SwitchToFundamentalist => 4,
        }
    }
}

/// Herding multiplier applied to every rate
///
/// `y` is the chartist/fundamentalist ratio, or `2 * n_chartists` when there
/// are no fundamentalists.
pub fn herding_scenario(
    n_fundamentalists: usize,
    n_chartists: usize,
    alpha: f64,
    lambda_zero: f64,
) -> f64 {
    if alpha == 0.0 {
        return lambda_zero + 1.0;
    }

    let y = if n_fundamentalists == 0 {
        2.0 * n_chartists as f64
    } else {
        n_chartists as f64 / n_fundamentalists as f64
    };

    if alpha == 1.0 {
        lambda_zero + y
    } else if alpha == 2.0 {
        lambda_zero + y * y
    } else {
        lambda_zero + y.powf(alpha)
    }
}

/// Intensities of the five event streams and their cumulative thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventRates {
    intensities: [f64; 5],
    total: f64,
    thresholds: [f64; 5],
}

impl Default for EventRates {
    fn default() -> Self {
        Self::from_intensities([0.0; 5])
    }
}

impl EventRates {
    /// Evaluate every stream at the current state
    pub fn new(
        config: &PopulationConfig,
        n_fundamentalists: usize,
        n_chartists: usize,
        price: f64,
        fundamental_price: f64,
    ) -> Self {
        let base_rate = config.base_event_rate
            * herding_scenario(
                n_fundamentalists,
                n_chartists,
                config.alpha,
                config.lambda_zero,
            );
        let n_f = n_fundamentalists as f64;
        let n_c = n_chartists as f64;

        let chartist_trade = base_rate * config.chartist_trade_rate * n_c;
        let fundamentalist_trade = base_rate
            * config.fundamentalist_trade_rate
            * n_f
            * (price / fundamental_price).ln().abs();
        let mood_flip = base_rate * config.mood_change_rate;
        let to_chartist = base_rate * n_f * (config.epsilon_c + n_c);
        let to_fundamentalist = base_rate * n_c * (config.epsilon_f + n_f);

        Self::from_intensities([
            chartist_trade,
            fundamentalist_trade,
            mood_flip,
            to_chartist,
            to_fundamentalist,
        ])
    }

    /// Build thresholds from raw intensities, ordered as [`EventKind::ALL`]
    ///
    /// With a zero total rate no event can fire; the thresholds then put all
    /// mass on the last class and [`EventRates::is_absorbing`] is true.
    pub fn from_intensities(intensities: [f64; 5]) -> Self {
        let total: f64 = intensities.iter().sum();
        let mut thresholds = [0.0; 5];

        if total > 0.0 {
            let mut cumulative = 0.0;
            for (threshold, intensity) in thresholds.iter_mut().zip(&intensities).take(4) {
                cumulative += intensity / total;
                *threshold = cumulative;
            }
        }
        thresholds[4] = 1.0;

        Self {
            intensities,
            total,
            thresholds,
        }
    }

    /// Sum of all intensities
    #[inline]
    pub fn total(&self) -> f64 {
        self.total
    }

    #[inline]
    pub fn intensity(&self, kind: EventKind) -> f64 {
        self.intensities[kind.code()]
    }

    /// Cumulative selection probabilities; the last one is exactly 1.0
    #[inline]
    pub fn thresholds(&self) -> &[f64; 5] {
        &self.thresholds
    }

    /// No event can occur from this state
    #[inline]
    pub fn is_absorbing(&self) -> bool {
        !(self.total > 0.0)
    }

    /// The first event class whose threshold exceeds the uniform draw `r`
    pub fn select(&self, r: f64) -> EventKind {
        EventKind::ALL
            .into_iter()
            .zip(self.thresholds)
            .take(4)
            .find(|&(_, threshold)| r < threshold)
            .map_or(EventKind::SwitchToFundamentalist, |(kind, _)| kind)
    }
}
