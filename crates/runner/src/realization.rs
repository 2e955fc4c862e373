//! Realization loop
//!
//! Each realization gets a fresh model with its own random source, is
//! stepped for `points` report ticks, and its return and trade series are
//! turned into PDF and PSD estimates on disk.

use crate::config::RunConfig;
use crate::error::{Result, RunError};
use crate::output::{output_path, write_columns, write_series};
use crate::stats::{mean, process_pdf, process_psd, sample_std};
use herding_abm::{HerdingModel, RandomSource, SeededSource};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Wall-clock limit shared by every realization of a run
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    limit_secs: u64,
}

impl Deadline {
    pub fn from_now(limit_secs: u64) -> Self {
        Self {
            at: Instant::now() + Duration::from_secs(limit_secs),
            limit_secs,
        }
    }

    /// Fail once the deadline has passed
    pub fn check(&self, realization: usize, tick: usize) -> Result<()> {
        if Instant::now() >= self.at {
            return Err(RunError::Timeout {
                realization,
                tick,
                limit_secs: self.limit_secs,
            });
        }
        Ok(())
    }
}

/// Per-tick observables of one realization
#[derive(Debug, Clone, Default)]
pub struct RealizationSeries {
    /// Log-returns between consecutive report ticks
    pub returns: Vec<f64>,
    /// Trade events between consecutive report ticks
    pub trades: Vec<f64>,
    /// Largest signed return
    pub max_return: f64,
    pub max_trades: f64,
    pub return_mean: f64,
    pub total_trades: u64,
}

impl RealizationSeries {
    pub fn points(&self) -> usize {
        self.returns.len()
    }

    /// Mean trade events per tick
    pub fn trade_mean(&self) -> f64 {
        if self.trades.is_empty() {
            return 0.0;
        }
        self.total_trades as f64 / self.trades.len() as f64
    }

    /// Scale returns (and their maximum) to unit sample standard deviation
    pub fn normalize_returns(&mut self) {
        let deviation = sample_std(&self.returns);
        if !(deviation > 0.0) {
            log::warn!("Return series has zero variance, skipping normalisation");
            return;
        }
        self.returns.iter_mut().for_each(|r| *r /= deviation);
        self.max_return /= deviation;
        self.return_mean /= deviation;
    }

    /// Scale trade counts to unit mean; the maximum is left unscaled
    pub fn normalize_trades(&mut self) {
        let trade_mean = self.trade_mean();
        if !(trade_mean > 0.0) {
            log::warn!("No trades in realization, skipping normalisation");
            return;
        }
        self.trades.iter_mut().for_each(|t| *t /= trade_mean);
    }
}

/// Step `model` for `points` ticks and record returns and trade counts
///
/// Returns are taken against `initial_price` for the first tick.
pub fn collect_series<R: RandomSource>(
    model: &mut HerdingModel<R>,
    points: usize,
    initial_price: f64,
    deadline: &Deadline,
    realization: usize,
) -> Result<RealizationSeries> {
    let mut series = RealizationSeries {
        returns: Vec::with_capacity(points),
        trades: Vec::with_capacity(points),
        max_return: f64::NEG_INFINITY,
        max_trades: f64::NEG_INFINITY,
        ..Default::default()
    };

    let start_trades = model.trade_events();
    let mut old_price = initial_price;
    let mut old_trades = start_trades;

    for tick in 0..points {
        deadline.check(realization, tick)?;
        model.step()?;

        let price = model.last_price();
        let trades = model.trade_events();
        let ret = (price / old_price).ln();
        let traded = (trades - old_trades) as f64;

        series.returns.push(ret);
        series.trades.push(traded);
        series.max_return = series.max_return.max(ret);
        series.max_trades = series.max_trades.max(traded);

        old_price = price;
        old_trades = trades;
    }

    series.total_trades = old_trades - start_trades;
    series.return_mean = mean(&series.returns);
    Ok(series)
}

/// Summary of a finished realization
#[derive(Debug, Clone)]
pub struct RealizationReport {
    pub realization: usize,
    pub stem: String,
    pub total_trades: u64,
    pub events: u64,
    pub elapsed: Duration,
    pub files: Vec<PathBuf>,
}

/// Simulate realization `id` and write its output files
pub fn run_realization(
    config: &RunConfig,
    id: usize,
    deadline: &Deadline,
) -> Result<RealizationReport> {
    let stem = config.stem(id);
    let started = Instant::now();

    let rng = SeededSource::from_seed(config.realization_seed(id));
    let mut model = HerdingModel::new(
        rng,
        config.report_tick,
        config.price,
        config.fundamental_price,
    );
    model.reset_population(&config.population)?;

    let mut series = collect_series(&mut model, config.points, config.price, deadline, id)?;
    let trade_mean = series.trade_mean();

    if config.normalize_return {
        series.normalize_returns();
    }
    if config.normalize_trade {
        series.normalize_trades();
    }

    let mut files = Vec::new();
    if config.write_series {
        let path = output_path(&stem, "ret.series");
        write_series(&path, &series.returns)?;
        files.push(path);
        let path = output_path(&stem, "trade.series");
        write_series(&path, &series.trades)?;
        files.push(path);
    }

    // distribution and spectrum of the return modulus
    let abs_returns: Vec<f64> = series.returns.iter().map(|r| r.abs()).collect();
    let elapsed = started.elapsed();
    log::info!(
        "{}: simulated in {:.3?}, {} total trades",
        stem,
        elapsed,
        series.total_trades
    );

    let (llim, rlim) = if config.normalize_return {
        (1e-2, series.max_return)
    } else {
        (1e-4 * series.max_return, 1.1 * series.max_return)
    };
    let ret_pdf = process_pdf(&abs_returns, true, llim, rlim, config.pdf_points);
    let ret_psd = process_psd(
        &abs_returns,
        config.report_tick,
        config.psd_points,
        config.psd_slice,
    )?;

    let (llim, rlim) = if config.normalize_trade && trade_mean > 0.0 {
        (1.0 / trade_mean, series.max_trades / trade_mean)
    } else {
        (1.0, series.max_trades)
    };
    let trade_pdf = process_pdf(&series.trades, true, llim, rlim, config.pdf_points);
    let trade_psd = process_psd(
        &series.trades,
        config.report_tick,
        config.psd_points,
        config.psd_slice,
    )?;

    for (suffix, rows) in [
        ("ret.dist", &ret_pdf),
        ("ret.spec", &ret_psd),
        ("trade.dist", &trade_pdf),
        ("trade.spec", &trade_psd),
    ] {
        let path = output_path(&stem, suffix);
        write_columns(&path, rows)?;
        files.push(path);
    }

    Ok(RealizationReport {
        realization: id,
        stem,
        total_trades: series.total_trades,
        events: model.events_processed(),
        elapsed: started.elapsed(),
        files,
    })
}

/// Run every realization of `config` in sequence
///
/// The timeout covers the whole run. The first error aborts it.
pub fn run(config: &RunConfig) -> Result<Vec<RealizationReport>> {
    config.validate()?;
    let deadline = Deadline::from_now(config.timeout_secs);

    (0..config.realizations)
        .map(|id| {
            run_realization(config, id, &deadline).inspect_err(|e| {
                log::error!("Realization {} failed: {}", id, e);
            })
        })
        .collect()
}
