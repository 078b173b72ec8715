use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::counters::{
    ChildcareCounters, ChildcareStatus, DiabetesCounters, DiabetesStatus, ElderlyCounters,
    ElderlyStatus, HypertensionCounters, HypertensionStatus, PrenatalCounters, PrenatalStatus,
    WomanHealthCounters, WomanHealthStatus,
};
use super::family::FamilyKind;
use super::status::Status;

/// Identifies one indicator record: per patient and family, or per pregnancy
/// episode for the prenatal family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecordKey {
    pub patient_id: Uuid,
    pub family: FamilyKind,
    pub episode_id: Option<Uuid>,
}

impl RecordKey {
    pub fn patient(patient_id: Uuid, family: FamilyKind) -> Self {
        Self {
            patient_id,
            family,
            episode_id: None,
        }
    }

    pub fn prenatal(patient_id: Uuid, episode_id: Uuid) -> Self {
        Self {
            patient_id,
            family: FamilyKind::Prenatal,
            episode_id: Some(episode_id),
        }
    }
}

/// The counters/status aggregate for one family of one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IndicatorRecord {
    pub patient_id: Uuid,
    pub episode_id: Option<Uuid>,
    pub indicators: FamilyRecord,
    /// Number of event facts folded into this record.
    pub events_applied: u64,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl IndicatorRecord {
    /// A fresh record: zero counters, every sub-indicator RED.
    pub fn new(key: &RecordKey, now: jiff::Timestamp) -> Self {
        Self {
            patient_id: key.patient_id,
            episode_id: key.episode_id,
            indicators: FamilyRecord::empty(key.family),
            events_applied: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey {
            patient_id: self.patient_id,
            family: self.indicators.family(),
            episode_id: self.episode_id,
        }
    }

    pub fn family(&self) -> FamilyKind {
        self.indicators.family()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "family", rename_all = "snake_case")]
#[ts(export)]
pub enum FamilyRecord {
    Childcare(ChildcareRecord),
    Prenatal(PrenatalRecord),
    Diabetes(DiabetesRecord),
    Hypertension(HypertensionRecord),
    Elderly(ElderlyRecord),
    WomanHealth(WomanHealthRecord),
}

impl FamilyRecord {
    pub fn empty(family: FamilyKind) -> Self {
        match family {
            FamilyKind::Childcare => FamilyRecord::Childcare(ChildcareRecord::default()),
            FamilyKind::Prenatal => FamilyRecord::Prenatal(PrenatalRecord::default()),
            FamilyKind::Diabetes => FamilyRecord::Diabetes(DiabetesRecord::default()),
            FamilyKind::Hypertension => FamilyRecord::Hypertension(HypertensionRecord::default()),
            FamilyKind::Elderly => FamilyRecord::Elderly(ElderlyRecord::default()),
            FamilyKind::WomanHealth => FamilyRecord::WomanHealth(WomanHealthRecord::default()),
        }
    }

    pub fn family(&self) -> FamilyKind {
        match self {
            FamilyRecord::Childcare(_) => FamilyKind::Childcare,
            FamilyRecord::Prenatal(_) => FamilyKind::Prenatal,
            FamilyRecord::Diabetes(_) => FamilyKind::Diabetes,
            FamilyRecord::Hypertension(_) => FamilyKind::Hypertension,
            FamilyRecord::Elderly(_) => FamilyKind::Elderly,
            FamilyRecord::WomanHealth(_) => FamilyKind::WomanHealth,
        }
    }

    /// Sub-indicator codes and their current status, in display order.
    pub fn statuses(&self) -> Vec<(&'static str, Status)> {
        match self {
            FamilyRecord::Childcare(r) => vec![
                ("B1", r.status.b1),
                ("B2", r.status.b2),
                ("B3", r.status.b3),
                ("B5", r.status.b5),
            ],
            FamilyRecord::Prenatal(r) => vec![
                ("C1", r.status.c1),
                ("C2", r.status.c2),
                ("C3", r.status.c3),
                ("C4", r.status.c4),
                ("C6", r.status.c6),
            ],
            FamilyRecord::Diabetes(r) => vec![
                ("D1", r.status.d1),
                ("D2", r.status.d2),
                ("D3", r.status.d3),
                ("D4", r.status.d4),
                ("D5", r.status.d5),
            ],
            FamilyRecord::Hypertension(r) => vec![
                ("H1", r.status.h1),
                ("H2", r.status.h2),
                ("H3", r.status.h3),
                ("H4", r.status.h4),
            ],
            FamilyRecord::Elderly(r) => vec![
                ("E1", r.status.e1),
                ("E2", r.status.e2),
                ("E3", r.status.e3),
                ("E4", r.status.e4),
            ],
            FamilyRecord::WomanHealth(r) => vec![
                ("W1", r.status.w1),
                ("W2", r.status.w2),
                ("W3", r.status.w3),
                ("W4", r.status.w4),
            ],
        }
    }

    pub fn status_of(&self, code: &str) -> Option<Status> {
        self.statuses()
            .into_iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(code))
            .map(|(_, status)| status)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChildcareRecord {
    pub counters: ChildcareCounters,
    pub status: ChildcareStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PrenatalRecord {
    pub counters: PrenatalCounters,
    pub status: PrenatalStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiabetesRecord {
    pub counters: DiabetesCounters,
    pub status: DiabetesStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HypertensionRecord {
    pub counters: HypertensionCounters,
    pub status: HypertensionStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ElderlyRecord {
    pub counters: ElderlyCounters,
    pub status: ElderlyStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WomanHealthRecord {
    pub counters: WomanHealthCounters,
    pub status: WomanHealthStatus,
}
