use std::collections::HashMap;

use itertools::Itertools;
use tracing::debug;

use crate::model::{OwnershipRecord, RosteredPlayer, SeasonPlayer, FREE_AGENT};

/// Contract length assumed for anyone without one; free agents can only be
/// signed for a single year.
pub const DEFAULT_YEARS_REMAINING: f64 = 1.0;

/// Left-join scraped players with the ownership sheet on exact player name.
///
/// Players with no ownership row become free agents with a one-year term and
/// no price. Names that differ only by suffix, case or nickname do not match;
/// such players simply show up as free agents.
pub fn join_rosters(players: Vec<SeasonPlayer>, owners: &[OwnershipRecord]) -> Vec<RosteredPlayer> {
    let mut by_name: HashMap<&str, &OwnershipRecord> = HashMap::with_capacity(owners.len());
    for owner in owners {
        by_name.entry(owner.player.as_str()).or_insert(owner);
    }

    let mut unmatched = 0usize;
    let joined = players
        .into_iter()
        .map(|player| match by_name.get(player.name.as_str()) {
            Some(owner) => RosteredPlayer {
                squad: owner
                    .squad
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .unwrap_or(FREE_AGENT)
                    .to_owned(),
                years_remaining: owner.years_remaining.unwrap_or(DEFAULT_YEARS_REMAINING),
                price: owner.price,
                player,
            },
            None => {
                unmatched += 1;
                RosteredPlayer {
                    player,
                    squad: FREE_AGENT.to_owned(),
                    years_remaining: DEFAULT_YEARS_REMAINING,
                    price: None,
                }
            }
        })
        .collect_vec();

    debug!(
        players = joined.len(),
        unmatched, "joined scraped players with ownership sheet"
    );
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;

    fn season_player(name: &str) -> SeasonPlayer {
        SeasonPlayer {
            name: name.to_string(),
            position: Position::WR,
            team: "CIN".to_string(),
            weekly_points: vec![10.0],
            season_total: 10.0,
        }
    }

    fn owner(name: &str, squad: Option<&str>, years: Option<f64>, price: Option<f64>) -> OwnershipRecord {
        OwnershipRecord {
            player: name.to_string(),
            squad: squad.map(str::to_string),
            years_remaining: years,
            price,
        }
    }

    #[test]
    fn test_join_matches_exact_names() {
        let owners = vec![
            owner("Ja'Marr Chase", Some("Tottenham Royals"), Some(3.0), Some(45.0)),
            owner("Tee Higgins", None, None, None),
        ];
        let joined = join_rosters(
            vec![
                season_player("Ja'Marr Chase"),
                season_player("Tee Higgins"),
                season_player("Tyler Boyd"),
            ],
            &owners,
        );

        assert_eq!(joined[0].squad, "Tottenham Royals");
        assert_eq!(joined[0].years_remaining, 3.0);
        assert_eq!(joined[0].price, Some(45.0));
        assert!(!joined[0].is_free_agent());

        // Listed but unowned: defaults fill the gaps.
        assert_eq!(joined[1].squad, FREE_AGENT);
        assert_eq!(joined[1].years_remaining, DEFAULT_YEARS_REMAINING);
        assert!(joined[1].is_free_agent());

        // Missing from the sheet entirely.
        assert_eq!(joined[2].squad, FREE_AGENT);
        assert_eq!(joined[2].price, None);
        assert!(joined[2].is_free_agent());
    }

    #[test]
    fn test_join_is_case_sensitive() {
        let owners = vec![owner("tee higgins", Some("Squad"), Some(2.0), Some(5.0))];
        let joined = join_rosters(vec![season_player("Tee Higgins")], &owners);
        assert!(joined[0].is_free_agent());
        assert_eq!(joined[0].price, None);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let owners = vec![
            owner("Tee Higgins", Some("First"), Some(2.0), Some(5.0)),
            owner("Tee Higgins", Some("Second"), Some(1.0), Some(9.0)),
        ];
        let joined = join_rosters(vec![season_player("Tee Higgins")], &owners);
        assert_eq!(joined[0].squad, "First");
        assert_eq!(joined[0].price, Some(5.0));
    }
}
