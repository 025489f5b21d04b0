pub(crate) mod leaders;
pub(crate) mod stats;
pub mod table;

use std::time::Duration;

pub(crate) use ::scraper::Html;
use ::scraper::ElementRef;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::config::ScrapeConfig;
use crate::error::{FflError, Result};

/// How often and how patiently a page fetch is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &ScrapeConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: config.retry_delay(),
        }
    }

    /// Delay before retry number `attempt` (1-based), doubling each time.
    fn delay(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// Transport failures, server errors and rate limiting are worth another
/// attempt; anything else will fail the same way again.
fn is_retryable(err: &FflError) -> bool {
    match err {
        FflError::Http { .. } | FflError::ResponseBody { .. } => true,
        FflError::UnexpectedStatus { status, .. } => {
            status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
        }
        _ => false,
    }
}

async fn fetch_once(client: &reqwest::Client, url: &str) -> Result<String> {
    debug!(url, "fetching page");

    let response = client.get(url).send().await.map_err(|e| FflError::Http {
        url: url.to_owned(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FflError::UnexpectedStatus {
            url: url.to_owned(),
            status,
        });
    }

    response.text().await.map_err(|e| FflError::ResponseBody {
        url: url.to_owned(),
        source: e,
    })
}

/// Fetch a URL and return the response body, retrying transient failures.
pub(crate) async fn get_body(
    client: &reqwest::Client,
    url: &str,
    retry: RetryPolicy,
) -> Result<String> {
    let mut attempt = 1;
    loop {
        match fetch_once(client, url).await {
            Ok(body) => return Ok(body),
            Err(e) if attempt < retry.max_attempts && is_retryable(&e) => {
                let delay = retry.delay(attempt);
                warn!(url, attempt, error = %e, ?delay, "fetch failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// All text below `element`, joined and with surrounding whitespace removed.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .trim()
        .replace(['\n', '\t'], "")
}

/// Read a scraped score cell. Bye weeks and dashes count as zero.
pub(crate) fn parse_score(value: &str) -> Result<f64> {
    let value = value.trim();
    match value {
        "" | "-" | "BYE" => Ok(0.0),
        _ => value
            .replace(',', "")
            .parse()
            .map_err(|source| FflError::NumberParse {
                value: value.to_string(),
                source,
            }),
    }
}

/// Resolve a possibly relative link against the page it was found on.
pub(crate) fn resolve_url(base: &str, href: &str) -> Result<String> {
    reqwest::Url::parse(base)
        .and_then(|base| base.join(href))
        .map(|url| url.to_string())
        .map_err(|_| FflError::ElementNotFound {
            context: "resolvable next page link",
        })
}
