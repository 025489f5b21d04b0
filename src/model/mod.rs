mod player;
mod position;
mod roster;
mod stats;

pub use player::*;
pub use position::*;
pub use roster::*;
pub use stats::*;
