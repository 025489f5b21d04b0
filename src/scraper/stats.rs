use std::collections::BTreeMap;

use tokio::task::JoinSet;
use tracing::{debug, instrument, warn};

use crate::error::{FflError, Result};
use crate::model::{Category, CategoryTable};
use crate::scraper::table::{extract_table, ExtractedTable, TableSelectors};
use crate::scraper::{self, Html, RetryPolicy};

pub(crate) fn stats_selectors() -> TableSelectors {
    TableSelectors::new("table.d3-o-table", "thead th", "tbody td")
        .with_category(".d3-o-tabs__list-item--selected a")
        .with_next_page("a.nfl-o-table-pagination__next")
}

/// Path segment, default sort column and tab label for a category.
fn category_route(category: Category) -> (&'static str, &'static str, &'static str) {
    match category {
        Category::Passing => ("passing", "passingyards", "Passing"),
        Category::Rushing => ("rushing", "rushingyards", "Rushing"),
        Category::Receiving => ("receiving", "receivingreceptions", "Receiving"),
        Category::Kicking => ("field-goals", "kickingfgmade", "Field Goals"),
    }
}

pub(crate) fn category_url(base: &str, season: u16, category: Category) -> String {
    let (path, sort, _) = category_route(category);
    format!("{base}/{path}/{season}/REG/all/{sort}/DESC")
}

/// Pages of one category, collected in link order.
#[derive(Debug)]
pub(crate) struct CategoryAccumulator {
    category: Category,
    table: CategoryTable,
}

impl CategoryAccumulator {
    pub(crate) fn new(category: Category) -> Self {
        Self {
            category,
            table: CategoryTable::default(),
        }
    }

    pub(crate) fn pages(&self) -> usize {
        self.table.pages
    }

    /// Append one page. Every page must carry the first page's columns.
    pub(crate) fn push_page(&mut self, page: ExtractedTable) -> Result<()> {
        if self.table.pages == 0 {
            self.table.columns = page.columns;
        } else if page.columns != self.table.columns {
            return Err(FflError::ColumnMismatch {
                expected: self.table.columns.clone(),
                found: page.columns,
            });
        }
        self.table.rows.extend(page.rows);
        self.table.pages += 1;
        Ok(())
    }

    pub(crate) fn finish(self) -> (Category, CategoryTable) {
        (self.category, self.table)
    }
}

async fn get_page(client: &reqwest::Client, retry: RetryPolicy, url: &str) -> Result<ExtractedTable> {
    let body = scraper::get_body(client, url, retry).await?;
    extract_table(&Html::parse_document(&body), &stats_selectors(), url)
}

/// Fetch every page of one category by following "next page" links.
#[instrument(skip(client, retry, base_url))]
pub(crate) async fn get_category(
    client: &reqwest::Client,
    retry: RetryPolicy,
    base_url: &str,
    season: u16,
    category: Category,
    max_pages: usize,
) -> Result<(Category, CategoryTable)> {
    let (_, _, label) = category_route(category);
    let mut accumulator = CategoryAccumulator::new(category);
    let mut next = Some(category_url(base_url, season, category));

    while let Some(url) = next.take() {
        if accumulator.pages() >= max_pages {
            warn!(%category, max_pages, "page limit reached, stopping pagination");
            break;
        }

        let page = get_page(client, retry, &url).await?;
        if let Some(shown) = page.category.as_deref() {
            if !shown.eq_ignore_ascii_case(label) {
                warn!(%category, shown, "page shows a different category than requested");
            }
        }

        next = page.next_page.clone().filter(|n| *n != url);
        accumulator.push_page(page)?;
    }

    let (category, table) = accumulator.finish();
    debug!(%category, pages = table.pages, rows = table.rows.len(), "scraped category");
    Ok((category, table))
}

/// Fetch several categories concurrently. Pagination inside each category
/// stays sequential; every task owns its accumulator.
pub(crate) async fn get_categories(
    client: &reqwest::Client,
    retry: RetryPolicy,
    base_url: &str,
    season: u16,
    categories: &[Category],
    max_pages: usize,
) -> Result<BTreeMap<Category, CategoryTable>> {
    let mut tasks = JoinSet::new();
    for &category in categories {
        let client = client.clone();
        let base_url = base_url.to_owned();
        tasks.spawn(async move {
            get_category(&client, retry, &base_url, season, category, max_pages).await
        });
    }

    let mut tables = BTreeMap::new();
    while let Some(joined) = tasks.join_next().await {
        let (category, table) = joined??;
        tables.insert(category, table);
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(columns: &[&str], rows: &[&[&str]]) -> ExtractedTable {
        ExtractedTable {
            category: None,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
            next_page: None,
        }
    }

    #[test]
    fn test_category_url() {
        assert_eq!(
            category_url("https://www.nfl.com/stats/player-stats/category", 2022, Category::Kicking),
            "https://www.nfl.com/stats/player-stats/category/field-goals/2022/REG/all/kickingfgmade/DESC"
        );
    }

    #[test]
    fn test_accumulator_appends_pages() {
        let mut acc = CategoryAccumulator::new(Category::Rushing);
        acc.push_page(page(&["Player", "Rush Yds"], &[&["A", "100"]]))
            .unwrap();
        acc.push_page(page(&["Player", "Rush Yds"], &[&["B", "90"], &["C", "80"]]))
            .unwrap();

        let (category, table) = acc.finish();
        assert_eq!(category, Category::Rushing);
        assert_eq!(table.pages, 2);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[2], vec!["C", "80"]);
    }

    #[test]
    fn test_accumulator_rejects_changed_columns() {
        let mut acc = CategoryAccumulator::new(Category::Passing);
        acc.push_page(page(&["Player", "Pass Yds"], &[])).unwrap();
        let err = acc
            .push_page(page(&["Player", "Yds"], &[&["A", "1"]]))
            .unwrap_err();
        assert!(matches!(err, FflError::ColumnMismatch { .. }));
    }

    #[tokio::test]
    #[ignore = "hits nfl.com"]
    async fn test_get_categories_live() {
        let client = reqwest::Client::new();
        let tables = get_categories(
            &client,
            RetryPolicy::default(),
            "https://www.nfl.com/stats/player-stats/category",
            2022,
            &[Category::Passing, Category::Rushing],
            2,
        )
        .await
        .unwrap();
        assert_eq!(tables.len(), 2);
        assert!(tables.values().all(|t| !t.rows.is_empty()));
    }
}
