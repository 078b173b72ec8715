use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::family::FamilyKind;

/// A patient as owned by the surrounding registry. The engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub birth_date: Date,
    pub memberships: FamilyMemberships,
    #[serde(default)]
    pub diabetes_diagnosed_on: Option<Date>,
    #[serde(default)]
    pub hypertension_diagnosed_on: Option<Date>,
}

impl Patient {
    pub fn belongs_to(&self, family: FamilyKind) -> bool {
        self.memberships.includes(family)
    }
}

/// Which indicator families a patient is enrolled in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct FamilyMemberships {
    pub is_child: bool,
    pub is_pregnant: bool,
    pub has_diabetes: bool,
    pub has_hypertension: bool,
    pub is_elderly: bool,
    pub is_woman: bool,
}

impl FamilyMemberships {
    pub fn includes(&self, family: FamilyKind) -> bool {
        match family {
            FamilyKind::Childcare => self.is_child,
            FamilyKind::Prenatal => self.is_pregnant,
            FamilyKind::Diabetes => self.has_diabetes,
            FamilyKind::Hypertension => self.has_hypertension,
            FamilyKind::Elderly => self.is_elderly,
            FamilyKind::WomanHealth => self.is_woman,
        }
    }

    pub fn families(&self) -> Vec<FamilyKind> {
        FamilyKind::ALL
            .into_iter()
            .filter(|family| self.includes(*family))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DeliveryType {
    Vaginal,
    Cesarean,
    Abortion,
}

/// One pregnancy. At most one episode per patient is open at a time; closing
/// it stamps the delivery facts and keeps the episode.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PregnancyEpisode {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub last_menstrual_on: Date,
    pub expected_delivery_on: Date,
    #[serde(default)]
    pub delivered_on: Option<Date>,
    #[serde(default)]
    pub delivery_type: Option<DeliveryType>,
    #[serde(default)]
    pub high_risk: bool,
    #[serde(default)]
    pub previous_pregnancies: u8,
    #[serde(default)]
    pub previous_deliveries: u8,
}

impl PregnancyEpisode {
    pub fn is_open(&self) -> bool {
        self.delivered_on.is_none()
    }

    pub fn close(&mut self, closure: &EpisodeClosure) {
        self.delivered_on = Some(closure.delivered_on);
        self.delivery_type = Some(closure.delivery_type);
    }
}

/// Delivery facts produced by a postpartum consultation. The caller stamps
/// them onto the episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EpisodeClosure {
    pub episode_id: Uuid,
    pub delivered_on: Date,
    pub delivery_type: DeliveryType,
}

/// Dates from which a family's time windows are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReferenceDates {
    pub birth_date: Date,
    pub diagnosed_on: Option<Date>,
    pub last_menstrual_on: Option<Date>,
    pub delivered_on: Option<Date>,
}

impl ReferenceDates {
    /// Collect the reference dates relevant to `family`.
    pub fn for_family(
        patient: &Patient,
        family: FamilyKind,
        episode: Option<&PregnancyEpisode>,
    ) -> Self {
        let diagnosed_on = match family {
            FamilyKind::Diabetes => patient.diabetes_diagnosed_on,
            FamilyKind::Hypertension => patient.hypertension_diagnosed_on,
            _ => None,
        };
        let (last_menstrual_on, delivered_on) = match (family, episode) {
            (FamilyKind::Prenatal, Some(episode)) => {
                (Some(episode.last_menstrual_on), episode.delivered_on)
            }
            _ => (None, None),
        };
        Self {
            birth_date: patient.birth_date,
            diagnosed_on,
            last_menstrual_on,
            delivered_on,
        }
    }

    /// Chronic families fall back to the birth date when no diagnosis date is recorded.
    pub fn diagnosis_or_birth(&self) -> Date {
        self.diagnosed_on.unwrap_or(self.birth_date)
    }
}
