use std::collections::BTreeMap;

use tracing::instrument;

use crate::config::ScrapeConfig;
use crate::error::{FflError, Result};
use crate::model::{Category, CategoryTable, WeeklyResultSet};
use crate::scraper::{self, RetryPolicy};

/// HTTP entry point for the fantasy points and player stats sources.
///
/// `FflClient` wraps a [`reqwest::Client`] together with the retry policy
/// applied to every page fetch.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> ffl_scraper::Result<()> {
/// use ffl_scraper::{Config, FflClient};
///
/// let config = Config::default();
/// let client = FflClient::from_config(&config.scrape)?;
/// let week = client
///     .get_week(&config.scrape.leaders_url, 2022, 1)
///     .await?;
/// println!("Found {} players", week.players.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FflClient {
    http: reqwest::Client,
    retry: RetryPolicy,
}

impl FflClient {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            retry: RetryPolicy::default(),
        }
    }

    /// Build a client with the timeout, user agent and retry settings of
    /// `config`.
    pub fn from_config(config: &ScrapeConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| FflError::Config(format!("failed to build http client: {e}")))?;

        Ok(Self {
            http,
            retry: RetryPolicy::from_config(config),
        })
    }

    /// Create a new client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure proxies, headers, etc.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            http: client,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry(&self) -> RetryPolicy {
        self.retry
    }

    /// Fetch one week's points column and the running season total.
    #[instrument(skip(self))]
    pub async fn get_week(&self, base_url: &str, season: u16, week: u8) -> Result<WeeklyResultSet> {
        scraper::leaders::get_week(&self.http, self.retry, base_url, season, week).await
    }

    /// Fetch every page of a single stats category.
    #[instrument(skip(self))]
    pub async fn get_category(
        &self,
        base_url: &str,
        season: u16,
        category: Category,
        max_pages: usize,
    ) -> Result<CategoryTable> {
        scraper::stats::get_category(&self.http, self.retry, base_url, season, category, max_pages)
            .await
            .map(|(_, table)| table)
    }

    /// Fetch several stats categories concurrently.
    #[instrument(skip(self))]
    pub async fn get_categories(
        &self,
        base_url: &str,
        season: u16,
        categories: &[Category],
        max_pages: usize,
    ) -> Result<BTreeMap<Category, CategoryTable>> {
        scraper::stats::get_categories(&self.http, self.retry, base_url, season, categories, max_pages)
            .await
    }
}

impl Default for FflClient {
    fn default() -> Self {
        Self::new()
    }
}
