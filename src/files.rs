//! CSV inputs and outputs.
//!
//! The ownership sheet and trade chart are read through `serde`; the player
//! table has one column per week, so its header is built at write time.

use std::path::Path;
use std::str::FromStr;

use itertools::Itertools;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{FflError, Result};
use crate::model::{OwnershipRecord, PlayerRecord, Position, ScoredStatLine, TradeValueRecord};

const NAME: &str = "Name";
const POSITION: &str = "Position";
const TEAM: &str = "Team";
const TOTAL: &str = "TTL";
const SQUAD: &str = "Squad";
const FREE_AGENT_COLUMN: &str = "Free Agent";
const YEARS_REMAINING: &str = "Years Remaining";
const PRICE: &str = "Price";
const PAR: &str = "PointsAboveReplacement";
const TRADE_VALUE: &str = "Trade Value";

fn path_string(path: &Path) -> String {
    path.display().to_string()
}

fn csv_error(path: &Path) -> impl Fn(csv::Error) -> FflError + '_ {
    move |source| FflError::Csv {
        path: path_string(path),
        source,
    }
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error(path))?;

    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(csv_error(path))?;
    debug!(path = %path.display(), rows = records.len(), "read csv");
    Ok(records)
}

/// Read the dynasty ownership sheet (`Player, Squad, Years Remaining, Price`).
pub fn load_ownership(path: impl AsRef<Path>) -> Result<Vec<OwnershipRecord>> {
    read_records(path.as_ref())
}

/// Read the trade value chart (`Player, Team, Trade Value`).
pub fn load_trade_values(path: impl AsRef<Path>) -> Result<Vec<TradeValueRecord>> {
    read_records(path.as_ref())
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| FflError::Io {
                path: path_string(parent),
                source: e,
            })
        }
        _ => Ok(()),
    }
}

fn format_number(value: f64) -> String {
    value.to_string()
}

/// Write the player table, replacing any previous file at `path`.
///
/// Column `n` holds `weekly_points[n - 1]`, matching the week indexing of
/// the aggregator. The column count is the longest weekly vector; all
/// records produced by one aggregation share the same length.
pub fn write_players(path: impl AsRef<Path>, players: &[PlayerRecord]) -> Result<()> {
    let path = path.as_ref();
    create_parent(path)?;

    let weeks = players
        .iter()
        .map(|p| p.weekly_points.len())
        .max()
        .unwrap_or(0);

    let mut writer = csv::Writer::from_path(path).map_err(csv_error(path))?;

    let header = [NAME, POSITION, TEAM]
        .into_iter()
        .map(str::to_owned)
        .chain((1..=weeks).map(|w| w.to_string()))
        .chain(
            [TOTAL, SQUAD, FREE_AGENT_COLUMN, YEARS_REMAINING, PRICE, PAR, TRADE_VALUE]
                .into_iter()
                .map(str::to_owned),
        )
        .collect_vec();
    writer.write_record(&header).map_err(csv_error(path))?;

    for player in players {
        let mut record = vec![
            player.name.clone(),
            player.position.to_string(),
            player.team.clone(),
        ];
        record.extend((0..weeks).map(|i| {
            format_number(player.weekly_points.get(i).copied().unwrap_or_default())
        }));
        record.extend([
            format_number(player.season_total),
            player.squad.clone(),
            player.free_agent.to_string(),
            format_number(player.years_remaining),
            player.price.map(format_number).unwrap_or_default(),
            format_number(player.points_above_replacement),
            format_number(player.trade_value),
        ]);
        writer.write_record(&record).map_err(csv_error(path))?;
    }

    writer.flush().map_err(|e| FflError::Io {
        path: path_string(path),
        source: e,
    })?;
    debug!(path = %path.display(), rows = players.len(), weeks, "wrote player table");
    Ok(())
}

fn header_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| FflError::MissingColumn {
            column: name.to_owned(),
        })
}

fn parse_number(value: &str) -> Result<f64> {
    value.trim().parse::<f64>().map_err(|e| FflError::NumberParse {
        value: value.to_owned(),
        source: e,
    })
}

/// Read a player table previously written by [`write_players`].
///
/// Week columns are the purely numeric headers, in file order. Rows with a
/// position this crate does not know are skipped.
pub fn read_players(path: impl AsRef<Path>) -> Result<Vec<PlayerRecord>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error(path))?;
    let headers = reader.headers().map_err(csv_error(path))?.clone();

    let name_idx = header_index(&headers, NAME)?;
    let position_idx = header_index(&headers, POSITION)?;
    let team_idx = header_index(&headers, TEAM)?;
    let total_idx = header_index(&headers, TOTAL)?;
    let squad_idx = header_index(&headers, SQUAD)?;
    let free_agent_idx = header_index(&headers, FREE_AGENT_COLUMN)?;
    let years_idx = header_index(&headers, YEARS_REMAINING)?;
    let price_idx = header_index(&headers, PRICE)?;
    let par_idx = header_index(&headers, PAR)?;
    let trade_idx = header_index(&headers, TRADE_VALUE)?;
    let week_idxs = headers
        .iter()
        .positions(|h| h.parse::<u8>().is_ok())
        .collect_vec();

    let mut players = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error(path))?;
        let field = |idx: usize| record.get(idx).unwrap_or_default();

        let position = match Position::from_str(field(position_idx)) {
            Ok(position) => position,
            Err(_) => {
                warn!(name = field(name_idx), position = field(position_idx), "skipping row with unknown position");
                continue;
            }
        };

        let price = match field(price_idx) {
            "" => None,
            value => Some(parse_number(value)?),
        };

        players.push(PlayerRecord {
            name: field(name_idx).to_owned(),
            position,
            team: field(team_idx).to_owned(),
            weekly_points: week_idxs
                .iter()
                .map(|&idx| parse_number(field(idx)))
                .collect::<Result<Vec<_>>>()?,
            season_total: parse_number(field(total_idx))?,
            squad: field(squad_idx).to_owned(),
            free_agent: field(free_agent_idx).eq_ignore_ascii_case("true"),
            years_remaining: parse_number(field(years_idx))?,
            price,
            points_above_replacement: parse_number(field(par_idx))?,
            trade_value: parse_number(field(trade_idx))?,
        });
    }

    debug!(path = %path.display(), rows = players.len(), "read player table");
    Ok(players)
}

#[derive(Serialize)]
struct StatRow<'a> {
    #[serde(rename = "Player")]
    name: &'a str,
    #[serde(rename = "Pass Yds")]
    passing_yards: f64,
    #[serde(rename = "Pass TD")]
    passing_touchdowns: f64,
    #[serde(rename = "INT")]
    interceptions: f64,
    #[serde(rename = "Rush Yds")]
    rushing_yards: f64,
    #[serde(rename = "Rush TD")]
    rushing_touchdowns: f64,
    #[serde(rename = "Rush 1st")]
    rushing_first_downs: f64,
    #[serde(rename = "Rush FUM")]
    rushing_fumbles: f64,
    #[serde(rename = "Rec")]
    receptions: f64,
    #[serde(rename = "Rec Yds")]
    receiving_yards: f64,
    #[serde(rename = "Rec TD")]
    receiving_touchdowns: f64,
    #[serde(rename = "Rec 1st")]
    receiving_first_downs: f64,
    #[serde(rename = "FGM")]
    field_goals_made: f64,
    #[serde(rename = "Fantasy Points")]
    fantasy_points: f64,
    #[serde(rename = "Cost Per Point")]
    cost_per_point: Option<f64>,
}

impl<'a> From<&'a ScoredStatLine> for StatRow<'a> {
    fn from(line: &'a ScoredStatLine) -> Self {
        let s = &line.stats;
        Self {
            name: &line.name,
            passing_yards: s.passing_yards,
            passing_touchdowns: s.passing_touchdowns,
            interceptions: s.interceptions,
            rushing_yards: s.rushing_yards,
            rushing_touchdowns: s.rushing_touchdowns,
            rushing_first_downs: s.rushing_first_downs,
            rushing_fumbles: s.rushing_fumbles,
            receptions: s.receptions,
            receiving_yards: s.receiving_yards,
            receiving_touchdowns: s.receiving_touchdowns,
            receiving_first_downs: s.receiving_first_downs,
            field_goals_made: s.field_goals_made,
            fantasy_points: line.fantasy_points,
            cost_per_point: line.cost_per_point,
        }
    }
}

/// Write scored category stats, replacing any previous file at `path`.
pub fn write_stat_lines(path: impl AsRef<Path>, lines: &[ScoredStatLine]) -> Result<()> {
    let path = path.as_ref();
    create_parent(path)?;

    let mut writer = csv::Writer::from_path(path).map_err(csv_error(path))?;
    for line in lines {
        writer
            .serialize(StatRow::from(line))
            .map_err(csv_error(path))?;
    }
    writer.flush().map_err(|e| FflError::Io {
        path: path_string(path),
        source: e,
    })?;
    debug!(path = %path.display(), rows = lines.len(), "wrote stat lines");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StatLine;

    fn record(name: &str, position: Position, weekly: Vec<f64>, price: Option<f64>) -> PlayerRecord {
        PlayerRecord {
            name: name.to_string(),
            position,
            team: "BUF".to_string(),
            season_total: weekly.iter().sum(),
            weekly_points: weekly,
            squad: "Free Agent".to_string(),
            free_agent: true,
            years_remaining: 1.0,
            price,
            points_above_replacement: -2.5,
            trade_value: 1.0,
        }
    }

    #[test]
    fn test_write_players_header_and_empty_price() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("players.csv");
        write_players(&path, &[record("Josh Allen", Position::QB, vec![24.5, 0.0], None)]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Name,Position,Team,1,2,TTL,Squad,Free Agent,Years Remaining,Price,PointsAboveReplacement,Trade Value"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Josh Allen,QB,BUF,24.5,0,24.5,Free Agent,true,1,,-2.5,1"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_write_players_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players.csv");
        write_players(
            &path,
            &[
                record("A", Position::WR, vec![1.0], None),
                record("B", Position::WR, vec![2.0], None),
            ],
        )
        .unwrap();
        write_players(&path, &[record("C", Position::TE, vec![3.0], Some(4.0))]).unwrap();

        let players = read_players(&path).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "C");
    }

    #[test]
    fn test_read_players_restores_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players.csv");
        let written = vec![
            record("Josh Allen", Position::QB, vec![24.5, 0.0, 31.25], Some(52.0)),
            record("Buffalo", Position::DST, vec![5.0, 9.0, 1.0], None),
        ];
        write_players(&path, &written).unwrap();

        assert_eq!(read_players(&path).unwrap(), written);
    }

    #[test]
    fn test_load_ownership_fills_optional_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rosters.csv");
        std::fs::write(
            &path,
            "Player,Squad,Years Remaining,Price\n\
             Ja'Marr Chase,Tottenham Royals,3,45\n\
             Tee Higgins,,,\n",
        )
        .unwrap();

        let owners = load_ownership(&path).unwrap();
        assert_eq!(owners.len(), 2);
        assert_eq!(owners[0].squad.as_deref(), Some("Tottenham Royals"));
        assert_eq!(owners[0].price, Some(45.0));
        assert_eq!(owners[1].squad, None);
        assert_eq!(owners[1].years_remaining, None);
        assert_eq!(owners[1].price, None);
    }

    #[test]
    fn test_load_trade_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.csv");
        std::fs::write(&path, "Player,Team,Trade Value\nJosh Allen,BUF,48.5\n").unwrap();

        let trades = load_trade_values(&path).unwrap();
        assert_eq!(trades[0].team, "BUF");
        assert_eq!(trades[0].trade_value, 48.5);
    }

    #[test]
    fn test_missing_input_is_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_ownership(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, FflError::Csv { .. }));
    }

    #[test]
    fn test_write_stat_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.csv");
        let lines = vec![ScoredStatLine {
            name: "Justin Tucker".to_string(),
            stats: StatLine {
                field_goals_made: 37.0,
                ..StatLine::default()
            },
            fantasy_points: 111.0,
            cost_per_point: None,
        }];
        write_stat_lines(&path, &lines).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut rows = text.lines();
        assert!(rows.next().unwrap().starts_with("Player,Pass Yds,Pass TD,INT"));
        assert_eq!(
            rows.next().unwrap(),
            "Justin Tucker,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,37.0,111.0,"
        );
    }
}
