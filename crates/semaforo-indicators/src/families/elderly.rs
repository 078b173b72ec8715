use jiff::civil::Date;
use semaforo_core::models::counters::{ElderlyCounters, ElderlyStatus};
use semaforo_core::models::fact::{EventFact, EventKind, EventPayload, VaccineCode};
use semaforo_core::models::family::FamilyKind;
use semaforo_core::models::patient::ReferenceDates;
use semaforo_core::models::record::{ElderlyRecord, FamilyRecord};

use super::wrong_record;
use crate::IndicatorFamily;
use crate::error::RuleError;
use crate::rules::{Ladder, RuleKind, SubIndicator};

pub const TWICE_A_YEAR: Ladder = Ladder {
    green: 2,
    yellow: 1,
};

pub struct Elderly;

impl IndicatorFamily for Elderly {
    fn kind(&self) -> FamilyKind {
        FamilyKind::Elderly
    }

    fn name(&self) -> &str {
        "Elderly"
    }

    fn sub_indicators(&self) -> &[SubIndicator] {
        static SUB_INDICATORS: std::sync::LazyLock<Vec<SubIndicator>> =
            std::sync::LazyLock::new(|| {
                vec![
                    SubIndicator::new("E1", "Consultations", RuleKind::Ladder(TWICE_A_YEAR)),
                    SubIndicator::new(
                        "E2",
                        "Weight and height measurements",
                        RuleKind::Ladder(TWICE_A_YEAR),
                    ),
                    SubIndicator::new(
                        "E3",
                        "Blood pressure measurements",
                        RuleKind::Ladder(TWICE_A_YEAR),
                    ),
                    SubIndicator::new(
                        "E4",
                        "Influenza vaccination",
                        RuleKind::Ladder(Ladder::PRESENCE),
                    ),
                ]
            });
        &SUB_INDICATORS
    }

    fn consumes(&self) -> &[EventKind] {
        &[EventKind::Consultation, EventKind::Vaccine]
    }

    fn anchor(&self, refs: &ReferenceDates) -> Result<Date, RuleError> {
        Ok(refs.birth_date)
    }

    fn update(
        &self,
        record: &FamilyRecord,
        fact: &EventFact,
        _refs: &ReferenceDates,
    ) -> Result<FamilyRecord, RuleError> {
        let FamilyRecord::Elderly(current) = record else {
            return Err(wrong_record(FamilyKind::Elderly, record));
        };

        let mut counters = current.counters.clone();
        match &fact.payload {
            EventPayload::Consultation(consultation) => {
                counters.consultations += 1;
                if consultation.anthropometry.is_some() {
                    counters.anthropometry_records += 1;
                }
                if consultation.blood_pressure.is_some() {
                    counters.blood_pressure_records += 1;
                }
            }
            EventPayload::Vaccine(vaccine) => {
                if vaccine.vaccine == VaccineCode::Influenza {
                    counters.influenza_doses += 1;
                }
            }
            other => {
                return Err(RuleError::UnsupportedFact {
                    family: FamilyKind::Elderly,
                    kind: other.kind(),
                });
            }
        }

        let status = evaluate(&counters);
        Ok(FamilyRecord::Elderly(ElderlyRecord { counters, status }))
    }
}

pub fn evaluate(counters: &ElderlyCounters) -> ElderlyStatus {
    ElderlyStatus {
        e1: TWICE_A_YEAR.status(counters.consultations),
        e2: TWICE_A_YEAR.status(counters.anthropometry_records),
        e3: TWICE_A_YEAR.status(counters.blood_pressure_records),
        e4: Ladder::PRESENCE.status(counters.influenza_doses),
    }
}
