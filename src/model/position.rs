use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString};

/// Roster position of a fantasy player.
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
#[strum(ascii_case_insensitive)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    K,
    #[strum(to_string = "DST", serialize = "DEF", serialize = "D/ST")]
    DST,
}

impl Position {
    /// Positions that may fill a flex lineup slot.
    pub fn is_flex(self) -> bool {
        matches!(self, Position::RB | Position::WR | Position::TE)
    }
}
