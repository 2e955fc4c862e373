//! Command line
//!
//! `--config` loads a JSON [`RunConfig`]; every other flag overrides the
//! matching field of that file (or of the defaults when no file is given).

use crate::config::RunConfig;
use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "herding-runner")]
#[command(about = "Simulate the herding order book model and estimate return/trade statistics")]
#[command(version)]
pub struct Cli {
    /// Load configuration from a JSON file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of realizations
    #[arg(short, long)]
    pub realizations: Option<usize>,

    /// Report ticks per realization
    #[arg(short = 'n', long)]
    pub points: Option<usize>,

    /// Output file stem, `{realization}` is replaced by the realization id
    #[arg(short, long)]
    pub output: Option<String>,

    /// Base random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Wall-clock limit for the whole run, in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Simulated time between report ticks
    #[arg(long)]
    pub report_tick: Option<f64>,

    /// Initial price
    #[arg(long)]
    pub price: Option<f64>,

    /// Fundamental price
    #[arg(long)]
    pub fundamental_price: Option<f64>,

    #[arg(long)]
    pub n_fundamentalists: Option<usize>,

    #[arg(long)]
    pub n_chartists: Option<usize>,

    #[arg(long)]
    pub base_event_rate: Option<f64>,

    #[arg(long)]
    pub chartist_trade_rate: Option<f64>,

    #[arg(long)]
    pub fundamentalist_trade_rate: Option<f64>,

    #[arg(long)]
    pub mood_change_rate: Option<f64>,

    #[arg(long)]
    pub epsilon_f: Option<f64>,

    #[arg(long)]
    pub epsilon_c: Option<f64>,

    /// Herding exponent
    #[arg(short, long)]
    pub alpha: Option<f64>,

    #[arg(long)]
    pub lambda_zero: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub initial_mood: Option<f64>,

    #[arg(long)]
    pub spread_shape: Option<f64>,

    #[arg(long)]
    pub spread_scale: Option<f64>,

    /// Scale returns to unit standard deviation
    #[arg(long)]
    pub normalize_return: bool,

    /// Scale trade counts to unit mean
    #[arg(long)]
    pub normalize_trade: bool,

    /// Write the raw series next to the estimates
    #[arg(long)]
    pub write_series: bool,
}

impl Cli {
    /// Resolve the final configuration
    pub fn into_config(self) -> Result<RunConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                RunConfig::from_file(path)?
            }
            None => RunConfig::default(),
        };
        Ok(self.apply(base))
    }

    /// Overlay every flag that was given onto `config`
    pub fn apply(self, mut config: RunConfig) -> RunConfig {
        fn set<T>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }

        set(&mut config.realizations, self.realizations);
        set(&mut config.points, self.points);
        set(&mut config.output, self.output);
        set(&mut config.timeout_secs, self.timeout);
        set(&mut config.report_tick, self.report_tick);
        set(&mut config.price, self.price);
        set(&mut config.fundamental_price, self.fundamental_price);
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        let population = &mut config.population;
        set(&mut population.n_fundamentalists, self.n_fundamentalists);
        set(&mut population.n_chartists, self.n_chartists);
        set(&mut population.base_event_rate, self.base_event_rate);
        set(&mut population.chartist_trade_rate, self.chartist_trade_rate);
        set(
            &mut population.fundamentalist_trade_rate,
            self.fundamentalist_trade_rate,
        );
        set(&mut population.mood_change_rate, self.mood_change_rate);
        set(&mut population.epsilon_f, self.epsilon_f);
        set(&mut population.epsilon_c, self.epsilon_c);
        set(&mut population.alpha, self.alpha);
        set(&mut population.lambda_zero, self.lambda_zero);
        set(&mut population.initial_mood, self.initial_mood);
        set(&mut population.spread_shape, self.spread_shape);
        set(&mut population.spread_scale, self.spread_scale);

        config.normalize_return |= self.normalize_return;
        config.normalize_trade |= self.normalize_trade;
        config.write_series |= self.write_series;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_keeps_defaults() {
        let cli = Cli::try_parse_from(["herding-runner"]).unwrap();
        assert_eq!(cli.into_config().unwrap(), RunConfig::default());
    }

    #[test]
    fn test_flags_override() {
        let cli = Cli::try_parse_from([
            "herding-runner",
            "-r",
            "3",
            "-n",
            "4096",
            "-o",
            "out/run{realization}",
            "--seed",
            "9",
            "--alpha",
            "1.5",
            "--initial-mood",
            "-1",
            "--n-chartists",
            "40",
            "--write-series",
        ])
        .unwrap();
        let config = cli.into_config().unwrap();

        assert_eq!(config.realizations, 3);
        assert_eq!(config.points, 4096);
        assert_eq!(config.stem(1), "out/run1");
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.population.alpha, 1.5);
        assert_eq!(config.population.initial_mood, -1.0);
        assert_eq!(config.population.n_chartists, 40);
        assert_eq!(config.population.n_fundamentalists, 250);
        assert!(config.write_series);
        assert!(!config.normalize_return);
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, r#"{"points": 128, "price": 100.0, "normalize_trade": true}"#)
            .unwrap();

        let cli = Cli::try_parse_from([
            "herding-runner",
            "--config",
            path.to_str().unwrap(),
            "--price",
            "200",
        ])
        .unwrap();
        let config = cli.into_config().unwrap();

        assert_eq!(config.points, 128);
        assert_eq!(config.price, 200.0);
        assert!(config.normalize_trade);
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::try_parse_from(["herding-runner", "-c", "/nonexistent/run.json"]).unwrap();
        assert!(matches!(cli.into_config(), Err(ConfigError::Io { .. })));
    }
}
