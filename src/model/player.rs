use std::collections::BTreeMap;

use serde::Serialize;

use super::Position;

/// Squad name given to players nobody owns.
pub const FREE_AGENT: &str = "Free Agent";

/// One player's line in a single week's source table.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyObservation {
    pub position: Position,
    pub team: String,
    /// Points scored in this week.
    pub points: f64,
    /// Cumulative total reported by the source as of this week.
    pub season_total: f64,
}

/// Everything observed for one reporting period, keyed by player name.
#[derive(Debug, Clone, Default)]
pub struct WeeklyResultSet {
    pub week: u8,
    pub players: BTreeMap<String, WeeklyObservation>,
}

impl WeeklyResultSet {
    pub fn new(week: u8) -> Self {
        Self {
            week,
            players: BTreeMap::new(),
        }
    }
}

/// A player's season as assembled from the weekly tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonPlayer {
    pub name: String,
    pub position: Position,
    pub team: String,
    /// One entry per aggregated week, ascending, zero when not observed.
    pub weekly_points: Vec<f64>,
    pub season_total: f64,
}

/// A season player after the ownership table has been joined in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosteredPlayer {
    pub player: SeasonPlayer,
    pub squad: String,
    pub years_remaining: f64,
    pub price: Option<f64>,
}

impl RosteredPlayer {
    pub fn is_free_agent(&self) -> bool {
        self.squad == FREE_AGENT
    }
}

/// Final, fully valued row of the exported player table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    pub name: String,
    pub position: Position,
    pub team: String,
    pub weekly_points: Vec<f64>,
    pub season_total: f64,
    pub squad: String,
    pub free_agent: bool,
    pub years_remaining: f64,
    /// Known or imputed price. `None` when the position could not be modelled.
    pub price: Option<f64>,
    pub points_above_replacement: f64,
    pub trade_value: f64,
}

impl PlayerRecord {
    pub fn mean_weekly_points(&self) -> f64 {
        if self.weekly_points.is_empty() {
            return 0.0;
        }
        self.weekly_points.iter().sum::<f64>() / self.weekly_points.len() as f64
    }
}
