use jiff::civil::{Date, DateTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::patient::DeliveryType;

/// An immutable description of one clinical action, consumed exactly once.
///
/// `occurred_at` is clinic-local wall time; time windows only look at its
/// calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EventFact {
    pub id: Uuid,
    pub occurred_at: DateTime,
    pub payload: EventPayload,
}

impl EventFact {
    pub fn new(occurred_at: DateTime, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            occurred_at,
            payload,
        }
    }

    pub fn occurred_on(&self) -> Date {
        self.occurred_at.date()
    }

    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EventKind {
    Consultation,
    Vaccine,
    Exam,
    PostpartumConsultation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum EventPayload {
    Consultation(ConsultationFact),
    Vaccine(VaccineFact),
    Exam(ExamFact),
    PostpartumConsultation(PostpartumFact),
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::Consultation(_) => EventKind::Consultation,
            EventPayload::Vaccine(_) => EventKind::Vaccine,
            EventPayload::Exam(_) => EventKind::Exam,
            EventPayload::PostpartumConsultation(_) => EventKind::PostpartumConsultation,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct ConsultationFact {
    pub anthropometry: Option<Anthropometry>,
    pub blood_pressure: Option<BloodPressure>,
    /// Diabetic foot examination performed during the visit.
    pub foot_exam: bool,
    /// Sexual and reproductive health counselling.
    pub reproductive_health: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Anthropometry {
    pub weight_kg: f64,
    pub height_cm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BloodPressure {
    pub systolic: u16,
    pub diastolic: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum VaccineCode {
    Bcg,
    HepatitisB,
    Pentavalent,
    Polio,
    Rotavirus,
    Pneumococcal,
    Meningococcal,
    YellowFever,
    Mmr,
    Dtpa,
    Influenza,
    Hpv,
    Covid19,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VaccineFact {
    pub vaccine: VaccineCode,
    pub dose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ExamType {
    Syphilis,
    Hiv,
    HepatitisB,
    HepatitisC,
    GlycatedHemoglobin,
    Creatinine,
    CervicalCytology,
    Mammography,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExamFact {
    pub exam: ExamType,
    /// Whether a professional has evaluated the result.
    pub evaluated: bool,
    #[serde(default)]
    pub result: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PostpartumFact {
    pub delivered_on: Date,
    pub delivery_type: DeliveryType,
}
