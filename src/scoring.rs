//! Fantasy scoring of raw counting stats.
//!
//! Scoring rules follow the standard half-PPR system with first-down
//! bonuses: <https://fantasydata.com/api/fantasy-scoring-system/nfl>.

use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use tracing::{debug, warn};

use crate::error::{FflError, Result};
use crate::model::{Category, CategoryTable, OwnershipRecord, ScoredStatLine, StatLine};
use crate::scraper::parse_score;

const PLAYER_COLUMN: &str = "Player";

impl StatLine {
    pub fn fantasy_points(&self) -> f64 {
        let rushing = self.rushing_yards / 10.0
            + self.rushing_touchdowns * 6.0
            + self.rushing_first_downs * 0.5
            - self.rushing_fumbles * 2.0;
        let passing =
            self.passing_yards / 25.0 + self.passing_touchdowns * 4.0 - self.interceptions * 2.0;
        let receiving = self.receptions * 0.5
            + self.receiving_yards / 10.0
            + self.receiving_touchdowns * 6.0
            + self.receiving_first_downs * 0.5;
        let kicking = self.field_goals_made * 3.0;

        rushing + passing + receiving + kicking
    }
}

/// One counting stat of a [`StatLine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stat {
    PassingYards,
    PassingTouchdowns,
    Interceptions,
    RushingYards,
    RushingTouchdowns,
    RushingFirstDowns,
    RushingFumbles,
    Receptions,
    ReceivingYards,
    ReceivingTouchdowns,
    ReceivingFirstDowns,
    FieldGoalsMade,
}

impl StatLine {
    fn set(&mut self, stat: Stat, value: f64) {
        let field = match stat {
            Stat::PassingYards => &mut self.passing_yards,
            Stat::PassingTouchdowns => &mut self.passing_touchdowns,
            Stat::Interceptions => &mut self.interceptions,
            Stat::RushingYards => &mut self.rushing_yards,
            Stat::RushingTouchdowns => &mut self.rushing_touchdowns,
            Stat::RushingFirstDowns => &mut self.rushing_first_downs,
            Stat::RushingFumbles => &mut self.rushing_fumbles,
            Stat::Receptions => &mut self.receptions,
            Stat::ReceivingYards => &mut self.receiving_yards,
            Stat::ReceivingTouchdowns => &mut self.receiving_touchdowns,
            Stat::ReceivingFirstDowns => &mut self.receiving_first_downs,
            Stat::FieldGoalsMade => &mut self.field_goals_made,
        };
        *field = value;
    }
}

/// Columns read from each category table. Touchdown columns share a header
/// across categories, so the category decides which stat they feed.
fn category_columns(category: Category) -> &'static [(&'static str, Stat)] {
    match category {
        Category::Passing => &[
            ("Pass Yds", Stat::PassingYards),
            ("TD", Stat::PassingTouchdowns),
            ("INT", Stat::Interceptions),
        ],
        Category::Rushing => &[
            ("Rush Yds", Stat::RushingYards),
            ("TD", Stat::RushingTouchdowns),
            ("Rush 1st", Stat::RushingFirstDowns),
            ("Rush FUM", Stat::RushingFumbles),
        ],
        Category::Receiving => &[
            ("Rec", Stat::Receptions),
            ("Yds", Stat::ReceivingYards),
            ("TD", Stat::ReceivingTouchdowns),
            ("Rec 1st", Stat::ReceivingFirstDowns),
        ],
        Category::Kicking => &[("FGM", Stat::FieldGoalsMade)],
    }
}

fn column_index(table: &CategoryTable, name: &str) -> Result<usize> {
    table
        .columns
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| FflError::MissingColumn {
            column: name.to_owned(),
        })
}

/// Merge category tables into one stat line per player.
///
/// A category missing a column it is scored on fails the whole merge; a
/// single row with an unreadable number is skipped.
pub fn merge_stat_lines(tables: &BTreeMap<Category, CategoryTable>) -> Result<BTreeMap<String, StatLine>> {
    let mut lines: BTreeMap<String, StatLine> = BTreeMap::new();

    for (&category, table) in tables {
        let name_idx = column_index(table, PLAYER_COLUMN)?;
        let columns = category_columns(category)
            .iter()
            .map(|&(name, stat)| column_index(table, name).map(|idx| (idx, stat)))
            .collect::<Result<Vec<_>>>()?;

        for row in &table.rows {
            let name = row[name_idx].trim();
            if name.is_empty() {
                continue;
            }

            let values = columns
                .iter()
                .map(|&(idx, stat)| parse_score(&row[idx]).map(|v| (stat, v)))
                .collect::<Result<Vec<_>>>();
            let values = match values {
                Ok(values) => values,
                Err(e) => {
                    warn!(%category, name, error = %e, "skipping unparsable stats row");
                    continue;
                }
            };

            let line = lines.entry(name.to_owned()).or_default();
            for (stat, value) in values {
                line.set(stat, value);
            }
        }
    }

    debug!(players = lines.len(), categories = tables.len(), "merged stat lines");
    Ok(lines)
}

/// Score merged stat lines and relate them to known prices.
pub fn score_stat_lines(
    lines: BTreeMap<String, StatLine>,
    owners: &[OwnershipRecord],
) -> Vec<ScoredStatLine> {
    let prices: HashMap<&str, f64> = owners
        .iter()
        .filter_map(|o| o.price.map(|p| (o.player.as_str(), p)))
        .collect();

    lines
        .into_iter()
        .map(|(name, stats)| {
            let fantasy_points = stats.fantasy_points();
            let cost_per_point = prices
                .get(name.as_str())
                .filter(|&&price| price > 0.0)
                .map(|price| fantasy_points / price);
            ScoredStatLine {
                name,
                stats,
                fantasy_points,
                cost_per_point,
            }
        })
        .sorted_by(|a, b| b.fantasy_points.total_cmp(&a.fantasy_points))
        .collect_vec()
}
