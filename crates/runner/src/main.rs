use anyhow::Context;
use clap::Parser;
use herding_runner::{Cli, run};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse()
        .into_config()
        .context("failed to load run configuration")?;
    log::info!(
        "Running {} realization(s) of {} ticks, {} agents",
        config.realizations,
        config.points,
        config.population.n_agents()
    );

    let reports = run(&config)?;
    let trades: u64 = reports.iter().map(|r| r.total_trades).sum();
    log::info!(
        "Finished {} realization(s), {} trades in total",
        reports.len(),
        trades
    );
    Ok(())
}
