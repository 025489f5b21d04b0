//! Scrape weekly NFL fantasy scores, join them with a dynasty league's
//! ownership sheet and derive per-player valuations.
//!
//! [`Pipeline`] drives a full run; the individual stages are exposed for
//! callers that already hold scraped data.

pub use crate::scraper::table::{extract_table, ExtractedTable, TableSelectors};
pub use crate::scraper::RetryPolicy;
pub use client::FflClient;
pub use config::Config;
pub use error::{FflError, Result};
pub use lineup::{compare_lineups, Comparison, Distribution, Lineup, Slot};
pub use model::*;
pub use pipeline::{build_dataset, Pipeline};

pub mod aggregate;
mod client;
pub mod config;
mod error;
pub mod files;
pub mod lineup;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod roster;
pub mod scoring;
mod scraper;
