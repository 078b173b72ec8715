use jiff::civil::Date;
use semaforo_core::models::counters::{WomanHealthCounters, WomanHealthStatus};
use semaforo_core::models::fact::{EventFact, EventKind, EventPayload, ExamType, VaccineCode};
use semaforo_core::models::family::FamilyKind;
use semaforo_core::models::patient::ReferenceDates;
use semaforo_core::models::record::{FamilyRecord, WomanHealthRecord};

use super::wrong_record;
use crate::IndicatorFamily;
use crate::error::RuleError;
use crate::rules::{Ladder, RuleKind, SubIndicator};

pub const HPV_LADDER: Ladder = Ladder {
    green: 2,
    yellow: 1,
};

/// Woman health: cancer screening, HPV vaccination and reproductive care.
pub struct WomanHealth;

impl IndicatorFamily for WomanHealth {
    fn kind(&self) -> FamilyKind {
        FamilyKind::WomanHealth
    }

    fn name(&self) -> &str {
        "Woman health"
    }

    fn sub_indicators(&self) -> &[SubIndicator] {
        static SUB_INDICATORS: std::sync::LazyLock<Vec<SubIndicator>> =
            std::sync::LazyLock::new(|| {
                vec![
                    SubIndicator::new("W1", "HPV vaccination", RuleKind::Ladder(HPV_LADDER))
                        .describe("Doses applied; two doses complete the schedule"),
                    SubIndicator::new(
                        "W2",
                        "Cervical cancer screening",
                        RuleKind::Ladder(Ladder::PRESENCE),
                    ),
                    SubIndicator::new(
                        "W3",
                        "Breast cancer screening",
                        RuleKind::Ladder(Ladder::PRESENCE),
                    ),
                    SubIndicator::new(
                        "W4",
                        "Reproductive health consultation",
                        RuleKind::Ladder(Ladder::PRESENCE),
                    ),
                ]
            });
        &SUB_INDICATORS
    }

    fn consumes(&self) -> &[EventKind] {
        &[EventKind::Consultation, EventKind::Vaccine, EventKind::Exam]
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
        let FamilyRecord::WomanHealth(current) = record else {
            return Err(wrong_record(FamilyKind::WomanHealth, record));
        };

        let mut counters = current.counters.clone();
        match &fact.payload {
            EventPayload::Consultation(consultation) => {
                if consultation.reproductive_health {
                    counters.reproductive_health_consultations += 1;
                }
            }
            EventPayload::Vaccine(vaccine) => {
                if vaccine.vaccine == VaccineCode::Hpv {
                    counters.hpv_doses += 1;
                }
            }
            EventPayload::Exam(exam) if exam.evaluated => match exam.exam {
                ExamType::CervicalCytology => counters.cervical_cytology_exams += 1,
                ExamType::Mammography => counters.mammography_exams += 1,
                _ => {}
            },
            EventPayload::Exam(_) => {}
            other => {
                return Err(RuleError::UnsupportedFact {
                    family: FamilyKind::WomanHealth,
                    kind: other.kind(),
                });
            }
        }

        let status = evaluate(&counters);
        Ok(FamilyRecord::WomanHealth(WomanHealthRecord { counters, status }))
    }
}

pub fn evaluate(counters: &WomanHealthCounters) -> WomanHealthStatus {
    WomanHealthStatus {
        w1: HPV_LADDER.status(counters.hpv_doses),
        w2: Ladder::PRESENCE.status(counters.cervical_cytology_exams),
        w3: Ladder::PRESENCE.status(counters.mammography_exams),
        w4: Ladder::PRESENCE.status(counters.reproductive_health_consultations),
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use semaforo_core::models::fact::{ConsultationFact, ExamFact, VaccineFact};
    use semaforo_core::models::status::Status;

    use super::*;

    fn refs() -> ReferenceDates {
        ReferenceDates {
            birth_date: date(2012, 6, 30),
            diagnosed_on: None,
            last_menstrual_on: None,
            delivered_on: None,
        }
    }

    #[test]
    fn hpv_schedule_needs_two_doses() {
        let dose = |dose| {
            EventFact::new(
                date(2024, 2, 2).at(10, 0, 0, 0),
                EventPayload::Vaccine(VaccineFact {
                    vaccine: VaccineCode::Hpv,
                    dose,
                }),
            )
        };
        let first = WomanHealth
            .apply(&FamilyRecord::empty(FamilyKind::WomanHealth), &dose(1), &refs())
            .unwrap();
        let second = WomanHealth.apply(&first, &dose(2), &refs()).unwrap();
        assert_eq!(first.status_of("W1"), Some(Status::Yellow));
        assert_eq!(second.status_of("W1"), Some(Status::Green));
    }

    #[test]
    fn unevaluated_screening_does_not_count() {
        let exam = |evaluated| {
            EventFact::new(
                date(2024, 2, 2).at(10, 0, 0, 0),
                EventPayload::Exam(ExamFact {
                    exam: ExamType::Mammography,
                    evaluated,
                    result: None,
                }),
            )
        };
        let empty = FamilyRecord::empty(FamilyKind::WomanHealth);
        let pending = WomanHealth.apply(&empty, &exam(false), &refs()).unwrap();
        assert_eq!(pending.status_of("W3"), Some(Status::Red));
        let done = WomanHealth.apply(&pending, &exam(true), &refs()).unwrap();
        assert_eq!(done.status_of("W3"), Some(Status::Green));
        assert_eq!(done.status_of("W2"), Some(Status::Red));
    }

    #[test]
    fn evaluated_cytology_turns_w2_green() {
        let cytology = EventFact::new(
            date(2024, 4, 4).at(10, 0, 0, 0),
            EventPayload::Exam(ExamFact {
                exam: ExamType::CervicalCytology,
                evaluated: true,
                result: Some("NILM".to_string()),
            }),
        );
        let record = WomanHealth
            .apply(&FamilyRecord::empty(FamilyKind::WomanHealth), &cytology, &refs())
            .unwrap();
        assert_eq!(record.status_of("W2"), Some(Status::Green));
        assert_eq!(record.status_of("W3"), Some(Status::Red));
    }

    #[test]
    fn only_reproductive_health_visits_count_for_w4() {
        let visit = |reproductive_health| {
            EventFact::new(
                date(2024, 4, 4).at(10, 0, 0, 0),
                EventPayload::Consultation(ConsultationFact {
                    reproductive_health,
                    ..Default::default()
                }),
            )
        };
        let empty = FamilyRecord::empty(FamilyKind::WomanHealth);
        let routine = WomanHealth.apply(&empty, &visit(false), &refs()).unwrap();
        assert_eq!(routine.status_of("W4"), Some(Status::Red));

        let counselled = WomanHealth.apply(&routine, &visit(true), &refs()).unwrap();
        assert_eq!(counselled.status_of("W4"), Some(Status::Green));
        assert_eq!(counselled.status_of("W1"), Some(Status::Red));
    }
}
