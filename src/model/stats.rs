use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString};

/// Statistic category pages published by the stats provider.
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Passing,
    Rushing,
    Receiving,
    Kicking,
}

/// All pages of one category, concatenated in the order they were fetched.
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub pages: usize,
}

/// Raw season counting stats for one player, merged across categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatLine {
    pub passing_yards: f64,
    pub passing_touchdowns: f64,
    pub interceptions: f64,
    pub rushing_yards: f64,
    pub rushing_touchdowns: f64,
    pub rushing_first_downs: f64,
    pub rushing_fumbles: f64,
    pub receptions: f64,
    pub receiving_yards: f64,
    pub receiving_touchdowns: f64,
    pub receiving_first_downs: f64,
    pub field_goals_made: f64,
}

/// A player's scored stat line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredStatLine {
    pub name: String,
    pub stats: StatLine,
    pub fantasy_points: f64,
    /// Fantasy points divided by price, when a positive price is known.
    pub cost_per_point: Option<f64>,
}
