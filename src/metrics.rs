//! Derived valuation metrics.
//!
//! Everything here is a pure function of the joined table, so the whole
//! stage can be re-run from scratch on every pipeline run.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use itertools::Itertools;
use tracing::{debug, warn};

use crate::error::{FflError, Result};
use crate::model::{PlayerRecord, Position, RosteredPlayer, TradeValueRecord};

/// Trade value assumed for players missing from the trade chart.
pub const DEFAULT_TRADE_VALUE: f64 = 1.0;

/// Single-variable ordinary least squares fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fit season totals to prices for one position.
    ///
    /// At least two samples are required. When every x is identical the
    /// slope is zero and the fit predicts the mean price.
    pub fn fit(position: Position, xs: &[f64], ys: &[f64]) -> Result<Self> {
        let n = xs.len().min(ys.len());
        if n < 2 {
            return Err(FflError::RegressionUndefined {
                position,
                samples: n,
            });
        }

        let (xs, ys) = (&xs[..n], &ys[..n]);
        let mean_x = xs.iter().sum::<f64>() / n as f64;
        let mean_y = ys.iter().sum::<f64>() / n as f64;

        let (covariance, variance) = xs
            .iter()
            .zip(ys)
            .fold((0.0, 0.0), |(cov, var), (x, y)| {
                let dx = x - mean_x;
                (cov + dx * (y - mean_y), var + dx * dx)
            });

        let slope = if variance == 0.0 {
            0.0
        } else {
            covariance / variance
        };
        Ok(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Mean season total per position.
pub fn position_means(players: impl IntoIterator<Item = (Position, f64)>) -> HashMap<Position, f64> {
    players
        .into_iter()
        .into_group_map()
        .into_iter()
        .map(|(position, totals)| {
            let mean = totals.iter().sum::<f64>() / totals.len() as f64;
            (position, mean)
        })
        .collect()
}

/// Fill missing prices position by position from a season-total model.
///
/// Positions with fewer than two priced players are left as they are; a
/// failed fit for one position never affects the others.
pub fn impute_prices(players: &mut [RosteredPlayer]) {
    let positions = players
        .iter()
        .map(|p| p.player.position)
        .collect::<BTreeSet<_>>();

    for position in positions {
        let (xs, ys): (Vec<f64>, Vec<f64>) = players
            .iter()
            .filter(|p| p.player.position == position)
            .filter_map(|p| p.price.map(|price| (p.player.season_total, price)))
            .unzip();

        let fit = match LinearFit::fit(position, &xs, &ys) {
            Ok(fit) => fit,
            Err(e) => {
                warn!(%position, error = %e, "leaving prices unset");
                continue;
            }
        };

        let mut imputed = 0usize;
        for player in players
            .iter_mut()
            .filter(|p| p.player.position == position && p.price.is_none())
        {
            player.price = Some(fit.predict(player.player.season_total));
            imputed += 1;
        }
        debug!(%position, slope = fit.slope, intercept = fit.intercept, imputed, "imputed prices");
    }
}

/// Compute points above replacement, free-agent flags, imputed prices and
/// trade values for the joined table.
pub fn derive_metrics(
    mut players: Vec<RosteredPlayer>,
    trade_values: &[TradeValueRecord],
) -> Vec<PlayerRecord> {
    let means = position_means(
        players
            .iter()
            .map(|p| (p.player.position, p.player.season_total)),
    );

    impute_prices(&mut players);

    let mut trade_chart: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for record in trade_values {
        trade_chart
            .entry((record.player.as_str(), record.team.as_str()))
            .or_insert(record.trade_value);
    }

    players
        .into_iter()
        .map(|rostered| {
            let free_agent = rostered.is_free_agent();
            let player = rostered.player;
            let replacement = means.get(&player.position).copied().unwrap_or_default();
            let trade_value = trade_chart
                .get(&(player.name.as_str(), player.team.as_str()))
                .copied()
                .unwrap_or(DEFAULT_TRADE_VALUE);

            PlayerRecord {
                points_above_replacement: player.season_total - replacement,
                trade_value,
                name: player.name,
                position: player.position,
                team: player.team,
                weekly_points: player.weekly_points,
                season_total: player.season_total,
                squad: rostered.squad,
                free_agent,
                years_remaining: rostered.years_remaining,
                price: rostered.price,
            }
        })
        .collect_vec()
}
