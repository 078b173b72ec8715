//! Per-family counters and sub-indicator statuses.
//!
//! Counters only ever grow. Statuses are a pure function of the counters
//! and the family's reference dates and are recomputed on every event.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::fact::ExamType;
use super::status::Status;

// Childcare

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChildcareCounters {
    pub consultations: u32,
    pub anthropometry_records: u32,
    pub first_consultation_on: Option<Date>,
    pub vaccines_applied: u32,
    pub vaccine_up_to_date: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChildcareStatus {
    /// First consultation within 30 days of life.
    pub b1: Status,
    /// Consultation cadence.
    pub b2: Status,
    /// Weight and height tracking.
    pub b3: Status,
    /// Vaccination currency.
    pub b5: Status,
}

// Prenatal

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Trimester {
    First,
    Second,
    Third,
}

/// One exam of the pregnancy's exam history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExamEntry {
    pub exam: ExamType,
    pub trimester: Trimester,
    pub evaluated: bool,
    pub resulted_on: Date,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PrenatalCounters {
    pub consultations: u32,
    pub first_consultation_on: Option<Date>,
    pub blood_pressure_records: u32,
    pub anthropometry_records: u32,
    pub dtpa_applied: bool,
    pub postpartum_done: bool,
    pub postpartum_on: Option<Date>,
    pub exams: Vec<ExamEntry>,
}

impl PrenatalCounters {
    /// True when `exam` was recorded in `trimester` with an evaluated result.
    pub fn has_evaluated(&self, exam: ExamType, trimester: Trimester) -> bool {
        self.exams
            .iter()
            .any(|e| e.exam == exam && e.trimester == trimester && e.evaluated)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PrenatalStatus {
    /// Consultation count combined with the postpartum visit.
    pub c1: Status,
    /// Blood pressure measurements.
    pub c2: Status,
    /// Weight and height measurements.
    pub c3: Status,
    /// dTpa vaccination.
    pub c4: Status,
    /// First- and third-trimester exam panels.
    pub c6: Status,
}

// Diabetes

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiabetesCounters {
    pub consultations: u32,
    pub blood_pressure_records: u32,
    pub anthropometry_records: u32,
    pub glycated_hemoglobin_exams: u32,
    pub foot_exams: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiabetesStatus {
    pub d1: Status,
    pub d2: Status,
    pub d3: Status,
    pub d4: Status,
    pub d5: Status,
}

// Hypertension

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HypertensionCounters {
    pub consultations: u32,
    pub blood_pressure_records: u32,
    pub anthropometry_records: u32,
    pub creatinine_exams: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HypertensionStatus {
    pub h1: Status,
    pub h2: Status,
    pub h3: Status,
    pub h4: Status,
}

// Elderly

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ElderlyCounters {
    pub consultations: u32,
    pub anthropometry_records: u32,
    pub blood_pressure_records: u32,
    pub influenza_doses: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ElderlyStatus {
    pub e1: Status,
    pub e2: Status,
    pub e3: Status,
    pub e4: Status,
}

// Woman health

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WomanHealthCounters {
    pub hpv_doses: u32,
    pub cervical_cytology_exams: u32,
    pub mammography_exams: u32,
    pub reproductive_health_consultations: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WomanHealthStatus {
    pub w1: Status,
    pub w2: Status,
    pub w3: Status,
    pub w4: Status,
}
