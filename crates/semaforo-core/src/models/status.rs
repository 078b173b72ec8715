use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Traffic-light compliance status of one sub-indicator.
///
/// Ordered from worst to best, so `Status::Red < Status::Green`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum Status {
    #[default]
    Red,
    Yellow,
    Green,
}

impl Status {
    pub fn is_green(self) -> bool {
        self == Status::Green
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Red => "RED",
            Status::Yellow => "YELLOW",
            Status::Green => "GREEN",
        })
    }
}
