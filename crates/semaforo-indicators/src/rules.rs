use serde::{Deserialize, Serialize};
use semaforo_core::models::status::Status;
use ts_rs::TS;

/// Ordered thresholds mapping a growing counter onto a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Ladder {
    pub green: u32,
    pub yellow: u32,
}

impl Ladder {
    /// A single occurrence is enough; never YELLOW.
    pub const PRESENCE: Ladder = Ladder {
        green: 1,
        yellow: 1,
    };

    pub fn status(self, count: u32) -> Status {
        if count >= self.green {
            Status::Green
        } else if count >= self.yellow {
            Status::Yellow
        } else {
            Status::Red
        }
    }
}

pub fn presence(flag: bool) -> Status {
    if flag { Status::Green } else { Status::Red }
}

/// How a sub-indicator derives its status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum RuleKind {
    /// A milestone date compared against a deadline from the reference date.
    Deadline { deadline_days: u32 },
    Ladder(Ladder),
    /// A counter ladder combined with a follow-up flag.
    Combined,
    /// Every member of fixed exam panels present and evaluated.
    Panel,
    /// Any qualifying event flips the status to GREEN.
    Flag,
}

/// A sub-indicator definition within a family.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubIndicator {
    pub code: String,
    pub name: String,
    pub rule: RuleKind,
    pub description: Option<String>,
}

impl SubIndicator {
    pub fn new(code: &str, name: &str, rule: RuleKind) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            rule,
            description: None,
        }
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum WindowUnit {
    Days,
    Weeks,
}

/// Outcome of a deadline check that is reported but does not gate status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TimelinessCheck {
    pub check: String,
    pub elapsed: u32,
    pub deadline: u32,
    pub unit: WindowUnit,
    pub within_deadline: bool,
}
