//! End-to-end runs: scrape, aggregate, join, value and export.

use itertools::Itertools;
use tracing::{info, instrument, warn};

use crate::aggregate::aggregate_weeks;
use crate::client::FflClient;
use crate::config::Config;
use crate::error::Result;
use crate::files;
use crate::metrics::derive_metrics;
use crate::model::{OwnershipRecord, PlayerRecord, ScoredStatLine, TradeValueRecord, WeeklyResultSet};
use crate::roster::join_rosters;
use crate::scoring::{merge_stat_lines, score_stat_lines};

/// Turn scraped weeks and the two input sheets into the exported table.
///
/// This is the whole in-memory part of a run; it performs no I/O.
pub fn build_dataset(
    weeks: Vec<WeeklyResultSet>,
    ownership: &[OwnershipRecord],
    trade_values: &[TradeValueRecord],
) -> Vec<PlayerRecord> {
    let players = aggregate_weeks(weeks);
    let rostered = join_rosters(players, ownership);
    derive_metrics(rostered, trade_values)
}

/// Runs configured scrapes and writes their output files.
#[derive(Debug, Clone)]
pub struct Pipeline {
    client: FflClient,
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        let client = FflClient::from_config(&config.scrape)?;
        Ok(Self { client, config })
    }

    pub fn with_client(client: FflClient, config: Config) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch weeks `1..=last_week` one after another.
    ///
    /// A week that fails is fatal unless `skip_failed_weeks` is set, in which
    /// case it is kept as an empty week so the table still spans every week.
    pub async fn fetch_weeks(&self) -> Result<Vec<WeeklyResultSet>> {
        let scrape = &self.config.scrape;
        let mut weeks = Vec::with_capacity(scrape.last_week as usize);

        for week in 1..=scrape.last_week {
            match self
                .client
                .get_week(&scrape.leaders_url, scrape.season, week)
                .await
            {
                Ok(results) => weeks.push(results),
                Err(e) if scrape.skip_failed_weeks => {
                    warn!(week, error = %e, "skipping failed week");
                    weeks.push(WeeklyResultSet::new(week));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(weeks)
    }

    /// Scrape the season, value every player and overwrite the player table.
    #[instrument(skip(self), fields(season = self.config.scrape.season))]
    pub async fn run(&self) -> Result<Vec<PlayerRecord>> {
        let weeks = self.fetch_weeks().await?;

        let data = &self.config.data;
        let ownership = files::load_ownership(&data.rosters_path)?;
        let trade_values = files::load_trade_values(&data.trade_values_path)?;

        let players = build_dataset(weeks, &ownership, &trade_values);
        files::write_players(&data.output_path, &players)?;

        info!(
            players = players.len(),
            free_agents = players.iter().filter(|p| p.free_agent).count(),
            output = %data.output_path,
            "player table written"
        );
        Ok(players)
    }

    /// Scrape the configured stat categories, score them and write the result.
    #[instrument(skip(self), fields(season = self.config.scrape.season))]
    pub async fn run_stats(&self) -> Result<Vec<ScoredStatLine>> {
        let stats = &self.config.stats;
        let tables = self
            .client
            .get_categories(
                &stats.base_url,
                self.config.scrape.season,
                &stats.categories,
                stats.max_pages,
            )
            .await?;

        let lines = merge_stat_lines(&tables)?;
        let ownership = files::load_ownership(&self.config.data.rosters_path)?;
        let scored = score_stat_lines(lines, &ownership);
        files::write_stat_lines(&stats.output_path, &scored)?;

        info!(
            players = scored.len(),
            categories = %tables.keys().join(","),
            output = %stats.output_path,
            "stat lines written"
        );
        Ok(scored)
    }
}
