use ::scraper::error::SelectorErrorKind;

use crate::model::Position;

/// All errors that can occur while scraping, joining or valuing players.
#[derive(thiserror::Error, Debug)]
pub enum FflError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// An expected HTML element was not found on the page.
    #[error("expected element not found: {context}")]
    ElementNotFound { context: &'static str },

    /// A table did not carry a column the parser relies on.
    #[error("expected column {column:?} not found in table")]
    MissingColumn { column: String },

    /// A scraped cell could not be read as a number.
    #[error("failed to parse number from {value:?}")]
    NumberParse {
        value: String,
        source: std::num::ParseFloatError,
    },

    /// The flat cell list does not divide evenly into rows.
    #[error("table shape mismatch: {cells} cells for {columns} columns")]
    Shape { cells: usize, columns: usize },

    /// A later page of a paginated table carried different columns.
    #[error("column mismatch across pages: expected {expected:?}, found {found:?}")]
    ColumnMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A background scrape task panicked or was cancelled.
    #[error("scrape task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Not enough priced players to fit a price model for a position.
    #[error("cannot fit price model for {position}: {samples} priced samples")]
    RegressionUndefined { position: Position, samples: usize },

    /// A lineup references an unknown player or puts one in the wrong slot.
    #[error("invalid lineup: {0}")]
    Lineup(String),

    #[error("csv error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl FflError {
    /// True for failures to obtain a page at all.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            FflError::Http { .. } | FflError::UnexpectedStatus { .. } | FflError::ResponseBody { .. }
        )
    }

    /// True when the page arrived but its structure no longer matches the
    /// scraper, meaning the selectors need updating rather than a retry.
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            FflError::Selector(_)
                | FflError::ElementNotFound { .. }
                | FflError::MissingColumn { .. }
                | FflError::NumberParse { .. }
        )
    }
}

impl<'a> From<SelectorErrorKind<'a>> for FflError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        FflError::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FflError>;
