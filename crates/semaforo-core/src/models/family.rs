use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// A clinical protocol with its own sub-indicators and thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FamilyKind {
    Childcare,
    Prenatal,
    Diabetes,
    Hypertension,
    Elderly,
    WomanHealth,
}

impl FamilyKind {
    pub const ALL: [FamilyKind; 6] = [
        FamilyKind::Childcare,
        FamilyKind::Prenatal,
        FamilyKind::Diabetes,
        FamilyKind::Hypertension,
        FamilyKind::Elderly,
        FamilyKind::WomanHealth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FamilyKind::Childcare => "childcare",
            FamilyKind::Prenatal => "prenatal",
            FamilyKind::Diabetes => "diabetes",
            FamilyKind::Hypertension => "hypertension",
            FamilyKind::Elderly => "elderly",
            FamilyKind::WomanHealth => "woman_health",
        }
    }

    /// Prenatal records live per pregnancy episode instead of per patient.
    pub fn is_episodic(self) -> bool {
        matches!(self, FamilyKind::Prenatal)
    }
}

impl fmt::Display for FamilyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FamilyKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FamilyKind::ALL
            .into_iter()
            .find(|family| family.as_str() == s)
            .ok_or_else(|| CoreError::UnknownFamily(s.to_string()))
    }
}
