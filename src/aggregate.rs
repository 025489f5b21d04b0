//! Weekly aggregation.
//!
//! Turns one [`WeeklyResultSet`] per week into one [`SeasonPlayer`] per
//! player. A player missing from a week scores `0.0` for it; the source
//! does not distinguish "did not play" from "scored nothing" and neither
//! does this table.

use std::collections::BTreeMap;

use itertools::Itertools;
use tracing::{debug, warn};

use crate::model::{SeasonPlayer, WeeklyObservation, WeeklyResultSet};

/// Merge weekly tables into season rows, ordered by player name.
///
/// `weekly_points[i]` holds week `i + 1`, up to the highest week supplied,
/// so gaps in the input stay zero instead of shifting later weeks. Sets
/// sharing a week number are merged into that week's column.
///
/// Position and team come from the most recent week the player was seen in,
/// and so does the season total, which is copied from the source's own
/// cumulative column rather than re-added from the weekly scores.
pub fn aggregate_weeks(mut weeks: Vec<WeeklyResultSet>) -> Vec<SeasonPlayer> {
    weeks.retain(|w| {
        if w.week == 0 {
            warn!(players = w.players.len(), "dropping results without a week number");
        }
        w.week > 0
    });
    // Stable sort: for a repeated week the later set keeps the last word.
    weeks.sort_by_key(|w| w.week);
    let week_count = weeks.last().map_or(0, |w| usize::from(w.week));

    let mut players: BTreeMap<&str, (Vec<f64>, &WeeklyObservation)> = BTreeMap::new();
    for week in &weeks {
        let index = usize::from(week.week) - 1;
        for (name, observation) in &week.players {
            let entry = players
                .entry(name.as_str())
                .or_insert_with(|| (vec![0.0; week_count], observation));
            entry.0[index] = observation.points;
            // Later weeks overwrite: most recent observation wins.
            entry.1 = observation;
        }
    }

    debug!(
        weeks = week_count,
        sets = weeks.len(),
        players = players.len(),
        "aggregated weekly results"
    );

    players
        .into_iter()
        .map(|(name, (weekly_points, latest))| SeasonPlayer {
            name: name.to_owned(),
            position: latest.position,
            team: latest.team.clone(),
            weekly_points,
            season_total: latest.season_total,
        })
        .collect_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;

    fn observation(position: Position, team: &str, points: f64, total: f64) -> WeeklyObservation {
        WeeklyObservation {
            position,
            team: team.to_string(),
            points,
            season_total: total,
        }
    }

    fn week(week: u8, rows: Vec<(&str, WeeklyObservation)>) -> WeeklyResultSet {
        let mut set = WeeklyResultSet::new(week);
        for (name, obs) in rows {
            set.players.insert(name.to_string(), obs);
        }
        set
    }

    #[test]
    fn test_zero_fills_missing_weeks() {
        let weeks = vec![
            week(
                1,
                vec![
                    ("A", observation(Position::QB, "KC", 20.0, 20.0)),
                    ("B", observation(Position::RB, "SF", 10.0, 10.0)),
                ],
            ),
            week(2, vec![("A", observation(Position::QB, "KC", 15.0, 35.0))]),
            week(3, vec![("C", observation(Position::WR, "MIA", 7.5, 7.5))]),
        ];

        let players = aggregate_weeks(weeks);
        assert_eq!(players.len(), 3);
        for player in &players {
            assert_eq!(player.weekly_points.len(), 3);
        }

        let b = players.iter().find(|p| p.name == "B").unwrap();
        assert_eq!(b.weekly_points, vec![10.0, 0.0, 0.0]);
        let c = players.iter().find(|p| p.name == "C").unwrap();
        assert_eq!(c.weekly_points, vec![0.0, 0.0, 7.5]);
    }

    #[test]
    fn test_season_total_is_copied_from_latest_week() {
        // The reported total deliberately differs from the sum of weekly
        // points: it must be passed through untouched.
        let weeks = vec![
            week(2, vec![("A", observation(Position::QB, "KC", 15.0, 36.2))]),
            week(1, vec![("A", observation(Position::QB, "KC", 20.0, 20.0))]),
        ];

        let players = aggregate_weeks(weeks);
        assert_eq!(players[0].weekly_points, vec![20.0, 15.0]);
        assert_eq!(players[0].season_total, 36.2);
    }

    #[test]
    fn test_most_recent_position_and_team_win() {
        let weeks = vec![
            week(1, vec![("Taysom Hill", observation(Position::QB, "NO", 3.0, 3.0))]),
            week(2, vec![("Taysom Hill", observation(Position::TE, "NO", 9.0, 12.0))]),
            week(3, vec![("Taysom Hill", observation(Position::TE, "LV", 1.0, 13.0))]),
        ];

        let players = aggregate_weeks(weeks);
        assert_eq!(players[0].position, Position::TE);
        assert_eq!(players[0].team, "LV");
        assert_eq!(players[0].season_total, 13.0);
    }

    #[test]
    fn test_output_sorted_by_name() {
        let weeks = vec![week(
            1,
            vec![
                ("Zed", observation(Position::K, "BAL", 1.0, 1.0)),
                ("Abe", observation(Position::K, "DAL", 2.0, 2.0)),
            ],
        )];
        let names = aggregate_weeks(weeks)
            .into_iter()
            .map(|p| p.name)
            .collect_vec();
        assert_eq!(names, vec!["Abe", "Zed"]);
    }

    #[test]
    fn test_gaps_keep_week_numbers() {
        let weeks = vec![
            week(3, vec![("A", observation(Position::QB, "KC", 7.0, 12.0))]),
            week(1, vec![("A", observation(Position::QB, "KC", 5.0, 5.0))]),
        ];

        let players = aggregate_weeks(weeks);
        assert_eq!(players[0].weekly_points, vec![5.0, 0.0, 7.0]);
        assert_eq!(players[0].season_total, 12.0);
    }

    #[test]
    fn test_repeated_week_shares_one_column() {
        let weeks = vec![
            week(1, vec![("A", observation(Position::WR, "MIA", 4.0, 4.0))]),
            week(2, vec![("A", observation(Position::WR, "MIA", 6.0, 10.0))]),
            week(2, vec![("B", observation(Position::WR, "MIA", 3.0, 3.0))]),
        ];

        let players = aggregate_weeks(weeks);
        assert_eq!(players[0].weekly_points, vec![4.0, 6.0]);
        assert_eq!(players[1].weekly_points, vec![0.0, 3.0]);
    }

    #[test]
    fn test_no_weeks() {
        assert!(aggregate_weeks(vec![]).is_empty());
    }
}
