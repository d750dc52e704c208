//! CLI configuration loaded from the environment.
use std::env;
use std::path::PathBuf;

use strum::{Display, EnumString};

/// What the binary does with the loaded catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mode {
    /// Recompute every selector many times and report the distribution.
    #[default]
    Sample,
    /// Run interval selectors on background workers and log their events.
    Watch,
}

/// Sample report format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Catalog file; `None` when no platform config dir could be resolved.
    pub catalog: Option<PathBuf>,
    pub draws: u32,
    pub seed: Option<u64>,
    pub mode: Mode,
    pub watch_secs: u64,
    pub output: OutputFormat,
    /// Directory for the rolling log file; stderr only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog_path(),
            draws: Self::DEFAULT_DRAWS,
            seed: None,
            mode: Mode::default(),
            watch_secs: Self::DEFAULT_WATCH_SECS,
            output: OutputFormat::default(),
            log_dir: None,
        }
    }
}

impl CliConfig {
    pub const DEFAULT_DRAWS: u32 = 1000;
    pub const DEFAULT_WATCH_SECS: u64 = 5;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PROBABILITY_CATALOG` - Catalog file (default: `catalog.ron` in the platform config dir)
    /// - `PROBABILITY_DRAWS` - Samples per selector (default: 1000, min: 1)
    /// - `PROBABILITY_SEED` - Base seed for reproducible runs (default: entropy)
    /// - `PROBABILITY_MODE` - `sample` or `watch` (default: sample)
    /// - `PROBABILITY_WATCH_SECS` - Watch duration in seconds (default: 5)
    /// - `PROBABILITY_OUTPUT` - `table` or `json` (default: table)
    /// - `PROBABILITY_LOG_DIR` - Directory for a daily rolling log file (optional)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = env::var("PROBABILITY_CATALOG") {
            config.catalog = Some(PathBuf::from(path));
        }

        if let Some(draws) = read_env::<u32>("PROBABILITY_DRAWS") {
            config.draws = draws.max(1);
        }

        config.seed = read_env::<u64>("PROBABILITY_SEED");

        if let Some(mode) = read_env::<Mode>("PROBABILITY_MODE") {
            config.mode = mode;
        }

        if let Some(secs) = read_env::<u64>("PROBABILITY_WATCH_SECS") {
            config.watch_secs = secs;
        }

        if let Some(output) = read_env::<OutputFormat>("PROBABILITY_OUTPUT") {
            config.output = output;
        }

        config.log_dir = env::var("PROBABILITY_LOG_DIR").ok().map(PathBuf::from);

        config
    }

    /// A catalog path given on the command line wins over the environment.
    #[must_use]
    pub fn with_catalog_arg(mut self, arg: Option<String>) -> Self {
        if let Some(path) = arg {
            self.catalog = Some(PathBuf::from(path));
        }
        self
    }
}

fn default_catalog_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "probability")
        .map(|dirs| dirs.config_dir().join("catalog.ron"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
