//! Monte Carlo comparison of two starting lineups.
//!
//! Each starter's weekly score is modelled as an exponential variable whose
//! mean is the player's average weekly points, and a lineup's score is the
//! sum over its ten slots.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use tracing::debug;

use crate::error::{FflError, Result};
use crate::model::{PlayerRecord, Position};

/// Starting lineup slot, in lineup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Slot {
    QB,
    RB1,
    RB2,
    WR1,
    WR2,
    WR3,
    TE,
    FLEX,
    K,
    DST,
}

impl Slot {
    pub fn accepts(self, position: Position) -> bool {
        match self {
            Slot::QB => position == Position::QB,
            Slot::RB1 | Slot::RB2 => position == Position::RB,
            Slot::WR1 | Slot::WR2 | Slot::WR3 => position == Position::WR,
            Slot::TE => position == Position::TE,
            Slot::FLEX => position.is_flex(),
            Slot::K => position == Position::K,
            Slot::DST => position == Position::DST,
        }
    }
}

/// Ten player names, one per [`Slot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lineup {
    starters: Vec<(Slot, String)>,
}

impl Lineup {
    /// Build a lineup from names given in slot order
    /// (`QB, RB1, RB2, WR1, WR2, WR3, TE, FLEX, K, DST`).
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter().map(Into::into).collect_vec();
        let slots = Slot::iter().collect_vec();
        if names.len() != slots.len() {
            return Err(FflError::Lineup(format!(
                "expected {} players ({}), got {}",
                slots.len(),
                slots.iter().join(", "),
                names.len()
            )));
        }

        Ok(Self {
            starters: slots.into_iter().zip(names).collect(),
        })
    }

    pub fn starters(&self) -> &[(Slot, String)] {
        &self.starters
    }

    /// Mean weekly points per slot, checking that every starter exists, fits
    /// its slot and is used once.
    fn slot_means(&self, players: &HashMap<&str, &PlayerRecord>) -> Result<Vec<f64>> {
        let mut seen = HashSet::new();
        self.starters
            .iter()
            .map(|(slot, name)| {
                let player = players
                    .get(name.as_str())
                    .ok_or_else(|| FflError::Lineup(format!("unknown player {name:?}")))?;
                if !slot.accepts(player.position) {
                    return Err(FflError::Lineup(format!(
                        "{name} is a {} and cannot start at {slot}",
                        player.position
                    )));
                }
                if !seen.insert(name.as_str()) {
                    return Err(FflError::Lineup(format!("{name} is listed twice")));
                }
                Ok(player.mean_weekly_points())
            })
            .collect()
    }
}

/// Simulated lineup scores.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub samples: Vec<f64>,
    pub mean: f64,
    pub median: f64,
}

impl Distribution {
    pub fn from_samples(samples: Vec<f64>) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self {
                samples,
                mean: 0.0,
                median: 0.0,
            };
        }

        let mean = samples.iter().sum::<f64>() / n as f64;
        let sorted = samples.iter().copied().sorted_by(f64::total_cmp).collect_vec();
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        };

        Self {
            samples,
            mean,
            median,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub original: Distribution,
    pub alternative: Distribution,
    /// Share of iterations in which the alternative outscored the original.
    pub alternative_win_rate: f64,
}

fn sample_exponential(rng: &mut StdRng, mean: f64) -> f64 {
    if mean <= 0.0 {
        return 0.0;
    }
    let u: f64 = rng.gen();
    -mean * (1.0 - u).ln()
}

fn sample_lineup(rng: &mut StdRng, means: &[f64]) -> f64 {
    means.iter().map(|&mean| sample_exponential(rng, mean)).sum()
}

/// Simulate both lineups `iterations` times and compare their scores.
///
/// With a `seed` the result is fully reproducible.
pub fn compare_lineups(
    players: &[PlayerRecord],
    original: &Lineup,
    alternative: &Lineup,
    iterations: usize,
    seed: Option<u64>,
) -> Result<Comparison> {
    if iterations == 0 {
        return Err(FflError::Config(
            "simulation iterations must be positive".to_owned(),
        ));
    }

    let by_name: HashMap<&str, &PlayerRecord> =
        players.iter().map(|p| (p.name.as_str(), p)).collect();
    let original_means = original.slot_means(&by_name)?;
    let alternative_means = alternative.slot_means(&by_name)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (original_samples, alternative_samples): (Vec<f64>, Vec<f64>) = (0..iterations)
        .map(|_| {
            let a = sample_lineup(&mut rng, &original_means);
            let b = sample_lineup(&mut rng, &alternative_means);
            (a, b)
        })
        .unzip();

    let wins = original_samples
        .iter()
        .zip(&alternative_samples)
        .filter(|(a, b)| b > a)
        .count();

    let comparison = Comparison {
        original: Distribution::from_samples(original_samples),
        alternative: Distribution::from_samples(alternative_samples),
        alternative_win_rate: wins as f64 / iterations as f64,
    };
    debug!(
        iterations,
        original_median = comparison.original.median,
        alternative_median = comparison.alternative.median,
        win_rate = comparison.alternative_win_rate,
        "simulated lineups"
    );
    Ok(comparison)
}
