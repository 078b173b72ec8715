use jiff::civil::Date;
use semaforo_core::models::counters::{HypertensionCounters, HypertensionStatus};
use semaforo_core::models::fact::{EventFact, EventKind, EventPayload, ExamType};
use semaforo_core::models::family::FamilyKind;
use semaforo_core::models::patient::ReferenceDates;
use semaforo_core::models::record::{FamilyRecord, HypertensionRecord};

use super::wrong_record;
use crate::IndicatorFamily;
use crate::error::RuleError;
use crate::rules::{Ladder, RuleKind, SubIndicator};

pub const CONSULTATION_LADDER: Ladder = Ladder {
    green: 2,
    yellow: 1,
};
pub const BLOOD_PRESSURE_LADDER: Ladder = Ladder {
    green: 2,
    yellow: 1,
};

/// Hypertension: periodic checks of people with high blood pressure.
pub struct Hypertension;

impl IndicatorFamily for Hypertension {
    fn kind(&self) -> FamilyKind {
        FamilyKind::Hypertension
    }

    fn name(&self) -> &str {
        "Hypertension"
    }

    fn sub_indicators(&self) -> &[SubIndicator] {
        static SUB_INDICATORS: std::sync::LazyLock<Vec<SubIndicator>> =
            std::sync::LazyLock::new(|| {
                vec![
                    SubIndicator::new("H1", "Consultations", RuleKind::Ladder(CONSULTATION_LADDER)),
                    SubIndicator::new(
                        "H2",
                        "Blood pressure measurements",
                        RuleKind::Ladder(BLOOD_PRESSURE_LADDER),
                    ),
                    SubIndicator::new(
                        "H3",
                        "Weight and height measurement",
                        RuleKind::Ladder(Ladder::PRESENCE),
                    ),
                    SubIndicator::new(
                        "H4",
                        "Kidney function exam",
                        RuleKind::Ladder(Ladder::PRESENCE),
                    )
                    .describe("An evaluated serum creatinine result"),
                ]
            });
        &SUB_INDICATORS
    }

    fn consumes(&self) -> &[EventKind] {
        &[EventKind::Consultation, EventKind::Exam]
    }

    fn anchor(&self, refs: &ReferenceDates) -> Result<Date, RuleError> {
        Ok(refs.diagnosis_or_birth())
    }

    fn update(
        &self,
        record: &FamilyRecord,
        fact: &EventFact,
        _refs: &ReferenceDates,
    ) -> Result<FamilyRecord, RuleError> {
        let FamilyRecord::Hypertension(current) = record else {
            return Err(wrong_record(FamilyKind::Hypertension, record));
        };

        let mut counters = current.counters.clone();
        match &fact.payload {
            EventPayload::Consultation(consultation) => {
                counters.consultations += 1;
                if consultation.blood_pressure.is_some() {
                    counters.blood_pressure_records += 1;
                }
                if consultation.anthropometry.is_some() {
                    counters.anthropometry_records += 1;
                }
            }
            EventPayload::Exam(exam) => {
                if exam.exam == ExamType::Creatinine && exam.evaluated {
                    counters.creatinine_exams += 1;
                }
            }
            other => {
                return Err(RuleError::UnsupportedFact {
                    family: FamilyKind::Hypertension,
                    kind: other.kind(),
                });
            }
        }

        let status = evaluate(&counters);
        Ok(FamilyRecord::Hypertension(HypertensionRecord { counters, status }))
    }
}

pub fn evaluate(counters: &HypertensionCounters) -> HypertensionStatus {
    HypertensionStatus {
        h1: CONSULTATION_LADDER.status(counters.consultations),
        h2: BLOOD_PRESSURE_LADDER.status(counters.blood_pressure_records),
        h3: Ladder::PRESENCE.status(counters.anthropometry_records),
        h4: Ladder::PRESENCE.status(counters.creatinine_exams),
    }
}
