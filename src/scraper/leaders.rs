use std::str::FromStr;

use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::model::{Position, WeeklyObservation, WeeklyResultSet};
use crate::scraper::table::{extract_table, ExtractedTable, TableSelectors};
use crate::scraper::{self, parse_score, Html, RetryPolicy};

const TOTAL_COLUMN: &str = "TTL";

pub(crate) fn leaders_selectors() -> TableSelectors {
    TableSelectors::new("table#data", "thead th", "tbody td")
}

pub(crate) fn leaders_url(base: &str, season: u16, week: u8) -> String {
    format!("{base}?year={season}&start=1&end={week}")
}

/// Fetch the cumulative leaders report through `week` and keep that week's
/// column together with the running total.
#[instrument(skip(client, retry))]
pub(crate) async fn get_week(
    client: &reqwest::Client,
    retry: RetryPolicy,
    base_url: &str,
    season: u16,
    week: u8,
) -> Result<WeeklyResultSet> {
    let url = leaders_url(base_url, season, week);
    let body = scraper::get_body(client, &url, retry).await?;
    let table = extract_table(&Html::parse_document(&body), &leaders_selectors(), &url)?;
    let results = parse_week(&table, week)?;
    debug!(count = results.players.len(), week, "parsed weekly leaders");
    Ok(results)
}

pub(crate) fn parse_week(table: &ExtractedTable, week: u8) -> Result<WeeklyResultSet> {
    let name_idx = table.column_index("Player")?;
    let position_idx = table.column_index_any(&["Pos", "Position"])?;
    let team_idx = table.column_index("Team")?;
    let week_idx = table.column_index(&week.to_string())?;
    let total_idx = table.column_index(TOTAL_COLUMN)?;

    let mut results = WeeklyResultSet::new(week);
    for row in &table.rows {
        let name = row[name_idx].trim();
        if name.is_empty() {
            continue;
        }

        let position = match Position::from_str(&row[position_idx]) {
            Ok(position) => position,
            Err(_) => {
                warn!(name, position = %row[position_idx], "skipping player with unknown position");
                continue;
            }
        };

        let scores = parse_score(&row[week_idx])
            .and_then(|points| parse_score(&row[total_idx]).map(|total| (points, total)));
        let (points, season_total) = match scores {
            Ok(scores) => scores,
            Err(e) => {
                warn!(name, error = %e, "skipping unparsable leaders row");
                continue;
            }
        };

        results.players.insert(
            name.to_owned(),
            WeeklyObservation {
                position,
                team: row[team_idx].trim().to_owned(),
                points,
                season_total,
            },
        );
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEADERS_WEEK_2: &str = r#"
        <html><body>
        <table id="data">
          <thead><tr>
            <th>Rank</th><th>Player</th><th>Pos</th><th>Team</th>
            <th>1</th><th>2</th><th>Avg</th><th>TTL</th>
          </tr></thead>
          <tbody>
            <tr><td>1</td><td>Patrick Mahomes II </td><td>QB</td><td>KC</td>
                <td>35.5</td><td>19.6</td><td>27.6</td><td>55.1</td></tr>
            <tr><td>2</td><td>Justin Tucker</td><td>K</td><td>BAL</td>
                <td>BYE</td><td>9.0</td><td>9.0</td><td>9.0</td></tr>
            <tr><td>3</td><td>Some Linebacker</td><td>LB</td><td>NYG</td>
                <td>4.0</td><td>3.0</td><td>3.5</td><td>7.0</td></tr>
            <tr><td>4</td><td>Broken Row</td><td>WR</td><td>NYJ</td>
                <td>4.0</td><td>n/a</td><td>3.5</td><td>7.0</td></tr>
            <tr><td>5</td><td>Bills</td><td>DST</td><td>BUF</td>
                <td>-</td><td>12.0</td><td>12.0</td><td>12.0</td></tr>
          </tbody>
        </table>
        </body></html>
    "#;

    const LEADERS_WEEK_1: &str = r#"
        <html><body>
        <table id="data">
          <thead><tr>
            <th>Rank</th><th>Player</th><th>Pos</th><th>Team</th>
            <th>1</th><th>Avg</th><th>TTL</th>
          </tr></thead>
          <tbody>
            <tr><td>1</td><td>Patrick Mahomes II</td><td>QB</td><td>KC</td>
                <td>35.5</td><td>35.5</td><td>35.4</td></tr>
            <tr><td>2</td><td>Justin Tucker</td><td>K</td><td>BAL</td>
                <td>BYE</td><td>0</td><td>0</td></tr>
          </tbody>
        </table>
        </body></html>
    "#;

    fn parse_page(html: &str, week: u8) -> WeeklyResultSet {
        let document = Html::parse_document(html);
        let table = extract_table(&document, &leaders_selectors(), "https://example.com").unwrap();
        parse_week(&table, week).unwrap()
    }

    #[test]
    fn test_season_total_comes_from_last_page() {
        let weeks = vec![parse_page(LEADERS_WEEK_1, 1), parse_page(LEADERS_WEEK_2, 2)];
        let players = crate::aggregate::aggregate_weeks(weeks);

        let mahomes = players
            .iter()
            .find(|p| p.name == "Patrick Mahomes II")
            .unwrap();
        assert_eq!(mahomes.weekly_points, vec![35.5, 19.6]);
        // TTL of the week 2 page, not 35.5 + 19.6 and not the week 1 TTL.
        assert_eq!(mahomes.season_total, 55.1);

        let tucker = players.iter().find(|p| p.name == "Justin Tucker").unwrap();
        assert_eq!(tucker.weekly_points, vec![0.0, 9.0]);
        assert_eq!(tucker.season_total, 9.0);

        // Only on the week 2 page.
        let bills = players.iter().find(|p| p.name == "Bills").unwrap();
        assert_eq!(bills.weekly_points, vec![0.0, 12.0]);
        assert_eq!(bills.season_total, 12.0);
    }

    #[test]
    fn test_leaders_url() {
        assert_eq!(
            leaders_url("https://www.fantasypros.com/nfl/reports/leaders/", 2022, 3),
            "https://www.fantasypros.com/nfl/reports/leaders/?year=2022&start=1&end=3"
        );
    }

    #[test]
    fn test_parse_week() {
        let document = Html::parse_document(LEADERS_WEEK_2);
        let table = extract_table(&document, &leaders_selectors(), "https://example.com").unwrap();
        let week = parse_week(&table, 2).unwrap();

        assert_eq!(week.week, 2);
        assert_eq!(week.players.len(), 3);

        let mahomes = &week.players["Patrick Mahomes II"];
        assert_eq!(mahomes.position, Position::QB);
        assert_eq!(mahomes.team, "KC");
        assert_eq!(mahomes.points, 19.6);
        assert_eq!(mahomes.season_total, 55.1);

        assert_eq!(week.players["Justin Tucker"].points, 9.0);
        assert_eq!(week.players["Bills"].position, Position::DST);
        assert!(!week.players.contains_key("Some Linebacker"));
        assert!(!week.players.contains_key("Broken Row"));
    }

    #[test]
    fn test_parse_week_without_week_column() {
        let document = Html::parse_document(LEADERS_WEEK_2);
        let table = extract_table(&document, &leaders_selectors(), "https://example.com").unwrap();
        let err = parse_week(&table, 3).unwrap_err();
        assert!(err.is_parse());
    }

    #[tokio::test]
    #[ignore = "hits fantasypros.com"]
    async fn test_get_week_live() {
        let client = reqwest::Client::new();
        let week = get_week(
            &client,
            RetryPolicy::default(),
            "https://www.fantasypros.com/nfl/reports/leaders/",
            2022,
            1,
        )
        .await
        .unwrap();
        assert!(!week.players.is_empty());
    }
}
