use serde::Deserialize;

/// One row of the dynasty ownership sheet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OwnershipRecord {
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Squad", default)]
    pub squad: Option<String>,
    #[serde(rename = "Years Remaining", default)]
    pub years_remaining: Option<f64>,
    #[serde(rename = "Price", default)]
    pub price: Option<f64>,
}

/// One row of the externally maintained trade value chart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TradeValueRecord {
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Trade Value")]
    pub trade_value: f64,
}
