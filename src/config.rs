use std::path::Path;
use std::time::Duration;

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use crate::error::{FflError, Result};
use crate::model::Category;

/// Application configuration loaded from `ffl.toml`.
///
/// Every section and key is optional; missing ones take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scrape: ScrapeConfig,
    pub stats: StatsConfig,
    pub data: DataConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Weekly leaders report, queried with `year`, `start` and `end`.
    pub leaders_url: String,
    pub season: u16,
    /// Last week to aggregate; weeks run from 1 to this value.
    pub last_week: u8,
    /// Skip a week whose page fails instead of aborting the run.
    pub skip_failed_weeks: bool,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Category pages live under `{base_url}/{category}/{season}/REG/all/...`.
    pub base_url: String,
    pub categories: Vec<Category>,
    /// Upper bound on pages followed through "next page" links.
    pub max_pages: usize,
    pub output_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub rosters_path: String,
    pub trade_values_path: String,
    pub output_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub iterations: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl ScrapeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// The NFL regular season starts in September; before that the most
/// recent complete season is last year's.
fn default_season() -> u16 {
    let today = Local::now().date_naive();
    let year = today.year() as u16;
    if today.month() >= 9 {
        year
    } else {
        year - 1
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            leaders_url: "https://www.fantasypros.com/nfl/reports/leaders/".to_string(),
            season: default_season(),
            last_week: 18,
            skip_failed_weeks: false,
            timeout_secs: 30,
            max_attempts: 3,
            retry_delay_ms: 500,
            user_agent: concat!("ffl-scraper/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.nfl.com/stats/player-stats/category".to_string(),
            categories: vec![
                Category::Passing,
                Category::Rushing,
                Category::Receiving,
                Category::Kicking,
            ],
            max_pages: 50,
            output_path: "data/player-stats.csv".to_string(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            rosters_path: "data/nfl-dynasty-rosters.csv".to_string(),
            trade_values_path: "data/trade-values.csv".to_string(),
            output_path: "data/players.csv".to_string(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            seed: None,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            FflError::Config(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        toml::from_str(&content)
            .map_err(|e| FflError::Config(format!("failed to parse config: {e}")))
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| FflError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, content).map_err(|source| FflError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}
