//! Positional table extraction.
//!
//! Pages are read by structural selectors only: a container element, its
//! header cells and its body cells. Body cells are collected as one flat
//! list and cut into rows of the header width, so a layout change on the
//! provider side shows up as a parse or shape error instead of silently
//! misaligned data.

use ::scraper::{Html, Selector};
use itertools::Itertools;
use tracing::debug;

use crate::error::{FflError, Result};
use crate::scraper::{element_text, resolve_url};

/// CSS selectors describing where a table lives on a page.
///
/// `header` and `cell` are evaluated inside the element matched by `table`;
/// `category` and `next_page` are evaluated against the whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSelectors {
    pub table: String,
    pub header: String,
    pub cell: String,
    pub category: Option<String>,
    pub next_page: Option<String>,
}

impl TableSelectors {
    pub fn new(table: &str, header: &str, cell: &str) -> Self {
        Self {
            table: table.to_owned(),
            header: header.to_owned(),
            cell: cell.to_owned(),
            category: None,
            next_page: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, selector: &str) -> Self {
        self.category = Some(selector.to_owned());
        self
    }

    #[must_use]
    pub fn with_next_page(mut self, selector: &str) -> Self {
        self.next_page = Some(selector.to_owned());
        self
    }
}

/// Text content of one table, plus the page-level context around it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedTable {
    /// Active category label shown on the page, if one was requested.
    pub category: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Absolute URL of the following page, if the page links to one.
    pub next_page: Option<String>,
}

impl ExtractedTable {
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| FflError::MissingColumn {
                column: name.to_owned(),
            })
    }

    /// Index of the first column matching any of `names`.
    pub fn column_index_any(&self, names: &[&str]) -> Result<usize> {
        names
            .iter()
            .find_map(|name| self.column_index(name).ok())
            .ok_or_else(|| FflError::MissingColumn {
                column: names.iter().join(" | "),
            })
    }
}

/// Cut a flat cell list into rows of `columns` cells each.
pub fn build_rows(cells: Vec<String>, columns: usize) -> Result<Vec<Vec<String>>> {
    if columns == 0 || cells.len() % columns != 0 {
        return Err(FflError::Shape {
            cells: cells.len(),
            columns,
        });
    }
    Ok(cells
        .into_iter()
        .chunks(columns)
        .into_iter()
        .map(|row| row.collect_vec())
        .collect_vec())
}

/// Extract the table described by `selectors` from `document`.
///
/// `page_url` is used to resolve a relative "next page" link.
pub fn extract_table(
    document: &Html,
    selectors: &TableSelectors,
    page_url: &str,
) -> Result<ExtractedTable> {
    let table_selector = Selector::parse(&selectors.table)?;
    let table = document
        .select(&table_selector)
        .next()
        .ok_or(FflError::ElementNotFound {
            context: "table container",
        })?;

    let header_selector = Selector::parse(&selectors.header)?;
    let columns = table
        .select(&header_selector)
        .map(|th| element_text(&th))
        .collect_vec();
    if columns.is_empty() {
        return Err(FflError::ElementNotFound {
            context: "table column headers",
        });
    }

    let cell_selector = Selector::parse(&selectors.cell)?;
    let cells = table
        .select(&cell_selector)
        .map(|td| element_text(&td))
        .collect_vec();
    let rows = build_rows(cells, columns.len())?;

    let category = match &selectors.category {
        Some(selector) => {
            let selector = Selector::parse(selector)?;
            let label = document
                .select(&selector)
                .next()
                .ok_or(FflError::ElementNotFound {
                    context: "active category label",
                })?;
            Some(
                label
                    .value()
                    .attr("aria-label")
                    .map(|l| l.trim().to_owned())
                    .unwrap_or_else(|| element_text(&label)),
            )
        }
        None => None,
    };

    let next_page = match &selectors.next_page {
        Some(selector) => {
            let selector = Selector::parse(selector)?;
            document
                .select(&selector)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::trim)
                .filter(|href| !href.is_empty())
                .map(|href| resolve_url(page_url, href))
                .transpose()?
        }
        None => None,
    };

    debug!(
        columns = columns.len(),
        rows = rows.len(),
        has_next = next_page.is_some(),
        "extracted table"
    );

    Ok(ExtractedTable {
        category,
        columns,
        rows,
        next_page,
    })
}
