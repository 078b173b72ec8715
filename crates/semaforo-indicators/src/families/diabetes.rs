use jiff::civil::Date;
use semaforo_core::models::counters::{DiabetesCounters, DiabetesStatus};
use semaforo_core::models::fact::{EventFact, EventKind, EventPayload, ExamType};
use semaforo_core::models::family::FamilyKind;
use semaforo_core::models::patient::ReferenceDates;
use semaforo_core::models::record::{DiabetesRecord, FamilyRecord};

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
pub const GLYCATED_HEMOGLOBIN_LADDER: Ladder = Ladder {
    green: 2,
    yellow: 1,
};

/// Diabetes: periodic checks of people with diabetes, measured from diagnosis.
pub struct Diabetes;

impl IndicatorFamily for Diabetes {
    fn kind(&self) -> FamilyKind {
        FamilyKind::Diabetes
    }

    fn name(&self) -> &str {
        "Diabetes"
    }

    fn sub_indicators(&self) -> &[SubIndicator] {
        static SUB_INDICATORS: std::sync::LazyLock<Vec<SubIndicator>> =
            std::sync::LazyLock::new(|| {
                vec![
                    SubIndicator::new("D1", "Consultations", RuleKind::Ladder(CONSULTATION_LADDER)),
                    SubIndicator::new(
                        "D2",
                        "Blood pressure measurements",
                        RuleKind::Ladder(BLOOD_PRESSURE_LADDER),
                    ),
                    SubIndicator::new(
                        "D3",
                        "Weight and height measurement",
                        RuleKind::Ladder(Ladder::PRESENCE),
                    ),
                    SubIndicator::new(
                        "D4",
                        "Glycated hemoglobin exams",
                        RuleKind::Ladder(GLYCATED_HEMOGLOBIN_LADDER),
                    )
                    .describe("Counts evaluated HbA1c results only"),
                    SubIndicator::new("D5", "Foot examination", RuleKind::Ladder(Ladder::PRESENCE)),
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
        let FamilyRecord::Diabetes(current) = record else {
            return Err(wrong_record(FamilyKind::Diabetes, record));
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
                if consultation.foot_exam {
                    counters.foot_exams += 1;
                }
            }
            EventPayload::Exam(exam) => {
                if exam.exam == ExamType::GlycatedHemoglobin && exam.evaluated {
                    counters.glycated_hemoglobin_exams += 1;
                }
            }
            other => {
                return Err(RuleError::UnsupportedFact {
                    family: FamilyKind::Diabetes,
                    kind: other.kind(),
                });
            }
        }

        let status = evaluate(&counters);
        Ok(FamilyRecord::Diabetes(DiabetesRecord { counters, status }))
    }
}

pub fn evaluate(counters: &DiabetesCounters) -> DiabetesStatus {
    DiabetesStatus {
        d1: CONSULTATION_LADDER.status(counters.consultations),
        d2: BLOOD_PRESSURE_LADDER.status(counters.blood_pressure_records),
        d3: Ladder::PRESENCE.status(counters.anthropometry_records),
        d4: GLYCATED_HEMOGLOBIN_LADDER.status(counters.glycated_hemoglobin_exams),
        d5: Ladder::PRESENCE.status(counters.foot_exams),
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use semaforo_core::models::fact::{
        Anthropometry, BloodPressure, ConsultationFact, ExamFact, VaccineCode, VaccineFact,
    };
    use semaforo_core::models::status::Status;

    use super::*;

    fn refs() -> ReferenceDates {
        ReferenceDates {
            birth_date: date(1960, 1, 1),
            diagnosed_on: Some(date(2020, 5, 1)),
            last_menstrual_on: None,
            delivered_on: None,
        }
    }

    #[test]
    fn consultation_with_foot_exam_moves_three_indicators() {
        let fact = EventFact::new(
            date(2024, 3, 3).at(14, 0, 0, 0),
            EventPayload::Consultation(ConsultationFact {
                foot_exam: true,
                ..Default::default()
            }),
        );
        let record = Diabetes
            .apply(&FamilyRecord::empty(FamilyKind::Diabetes), &fact, &refs())
            .unwrap();
        assert_eq!(record.status_of("D1"), Some(Status::Yellow));
        assert_eq!(record.status_of("D2"), Some(Status::Red));
        assert_eq!(record.status_of("D5"), Some(Status::Green));
    }

    #[test]
    fn only_evaluated_hba1c_counts() {
        let hba1c = |evaluated| {
            EventFact::new(
                date(2024, 3, 3).at(14, 0, 0, 0),
                EventPayload::Exam(ExamFact {
                    exam: ExamType::GlycatedHemoglobin,
                    evaluated,
                    result: Some("7.1%".to_string()),
                }),
            )
        };
        let empty = FamilyRecord::empty(FamilyKind::Diabetes);
        let pending = Diabetes.apply(&empty, &hba1c(false), &refs()).unwrap();
        assert_eq!(pending.status_of("D4"), Some(Status::Red));

        let one = Diabetes.apply(&pending, &hba1c(true), &refs()).unwrap();
        let two = Diabetes.apply(&one, &hba1c(true), &refs()).unwrap();
        assert_eq!(one.status_of("D4"), Some(Status::Yellow));
        assert_eq!(two.status_of("D4"), Some(Status::Green));
    }

    #[test]
    fn events_before_diagnosis_are_rejected() {
        let fact = EventFact::new(
            date(2019, 12, 31).at(8, 0, 0, 0),
            EventPayload::Consultation(ConsultationFact::default()),
        );
        assert!(matches!(
            Diabetes.apply(&FamilyRecord::empty(FamilyKind::Diabetes), &fact, &refs()),
            Err(RuleError::Window(_))
        ));
    }

    #[test]
    fn vaccines_are_not_a_diabetes_fact() {
        let fact = EventFact::new(
            date(2024, 4, 1).at(8, 0, 0, 0),
            EventPayload::Vaccine(VaccineFact {
                vaccine: VaccineCode::Influenza,
                dose: 1,
            }),
        );
        assert_eq!(
            Diabetes.apply(&FamilyRecord::empty(FamilyKind::Diabetes), &fact, &refs()),
            Err(RuleError::UnsupportedFact {
                family: FamilyKind::Diabetes,
                kind: EventKind::Vaccine,
            })
        );
    }

    #[test]
    fn measured_visits_drive_d2_and_d3() {
        let visit = EventFact::new(
            date(2024, 3, 3).at(14, 0, 0, 0),
            EventPayload::Consultation(ConsultationFact {
                anthropometry: Some(Anthropometry {
                    weight_kg: 88.0,
                    height_cm: 175.0,
                }),
                blood_pressure: Some(BloodPressure {
                    systolic: 130,
                    diastolic: 85,
                }),
                ..Default::default()
            }),
        );
        let empty = FamilyRecord::empty(FamilyKind::Diabetes);
        assert_eq!(empty.status_of("D3"), Some(Status::Red));

        let once = Diabetes.apply(&empty, &visit, &refs()).unwrap();
        let twice = Diabetes.apply(&once, &visit, &refs()).unwrap();
        assert_eq!(once.status_of("D3"), Some(Status::Green));
        assert_eq!(once.status_of("D2"), Some(Status::Yellow));
        assert_eq!(twice.status_of("D1"), Some(Status::Green));
        assert_eq!(twice.status_of("D2"), Some(Status::Green));
        assert_eq!(twice.status_of("D5"), Some(Status::Red));
    }
}
