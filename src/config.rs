use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

const APP_DIR: &str = "planner-tui";
const DEFAULT_LOG_FILTER: &str = "info";
const DEFAULT_TICK_SECONDS: u64 = 60;

/// Settings from `<config_dir>/planner-tui/config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where `storage.json` and the log file live.
    pub data_dir: Option<PathBuf>,
    /// `tracing` filter directive, overridden by `PLANNER_LOG`.
    pub log_filter: Option<String>,
    /// How often the clock is re-read so "today" rolls over.
    pub tick_seconds: Option<u64>,
}

impl Config {
    /// Read the config file. A missing or invalid file gives the defaults.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                eprintln!("Cannot read {}: {err}", path.display());
                return Self::default();
            }
        };
        Self::parse(&content).unwrap_or_else(|err| {
            eprintln!("Ignoring invalid {}: {err}", path.display());
            Self::default()
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Configured data directory, else the platform data dir.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR)))
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_secs(self.tick_seconds.unwrap_or(DEFAULT_TICK_SECONDS).max(1))
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}
