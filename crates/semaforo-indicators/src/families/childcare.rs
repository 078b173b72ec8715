use jiff::civil::Date;
use semaforo_core::models::counters::{ChildcareCounters, ChildcareStatus};
use semaforo_core::models::fact::{EventFact, EventKind, EventPayload};
use semaforo_core::models::family::FamilyKind;
use semaforo_core::models::patient::ReferenceDates;
use semaforo_core::models::record::{ChildcareRecord, FamilyRecord};
use semaforo_core::models::status::Status;

use super::wrong_record;
use crate::IndicatorFamily;
use crate::error::RuleError;
use crate::rules::{Ladder, RuleKind, SubIndicator, presence};
use crate::window;

pub const FIRST_VISIT_DEADLINE_DAYS: u32 = 30;
pub const CONSULTATION_LADDER: Ladder = Ladder {
    green: 9,
    yellow: 5,
};
pub const ANTHROPOMETRY_LADDER: Ladder = Ladder {
    green: 9,
    yellow: 5,
};

/// Childcare: follow-up of children from birth.
pub struct Childcare;

impl IndicatorFamily for Childcare {
    fn kind(&self) -> FamilyKind {
        FamilyKind::Childcare
    }

    fn name(&self) -> &str {
        "Childcare"
    }

    fn sub_indicators(&self) -> &[SubIndicator] {
        static SUB_INDICATORS: std::sync::LazyLock<Vec<SubIndicator>> =
            std::sync::LazyLock::new(|| {
                vec![
                    SubIndicator::new(
                        "B1",
                        "Timely first consultation",
                        RuleKind::Deadline {
                            deadline_days: FIRST_VISIT_DEADLINE_DAYS,
                        },
                    )
                    .describe("GREEN when the first consultation happens within 30 days of life"),
                    SubIndicator::new(
                        "B2",
                        "Consultation cadence",
                        RuleKind::Ladder(CONSULTATION_LADDER),
                    ),
                    SubIndicator::new(
                        "B3",
                        "Weight and height tracking",
                        RuleKind::Ladder(ANTHROPOMETRY_LADDER),
                    ),
                    SubIndicator::new("B5", "Vaccination up to date", RuleKind::Flag)
                        .describe("Any applied vaccine marks the schedule as current"),
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
        refs: &ReferenceDates,
    ) -> Result<FamilyRecord, RuleError> {
        let FamilyRecord::Childcare(current) = record else {
            return Err(wrong_record(FamilyKind::Childcare, record));
        };

        let mut counters = current.counters.clone();
        match &fact.payload {
            EventPayload::Consultation(consultation) => {
                counters.consultations += 1;
                counters
                    .first_consultation_on
                    .get_or_insert(fact.occurred_on());
                if consultation.anthropometry.is_some() {
                    counters.anthropometry_records += 1;
                }
            }
            EventPayload::Vaccine(_) => {
                counters.vaccines_applied += 1;
                counters.vaccine_up_to_date = true;
            }
            other => {
                return Err(RuleError::UnsupportedFact {
                    family: FamilyKind::Childcare,
                    kind: other.kind(),
                });
            }
        }

        let status = evaluate(&counters, refs.birth_date)?;
        Ok(FamilyRecord::Childcare(ChildcareRecord { counters, status }))
    }
}

/// Recompute every childcare sub-indicator from its counters.
pub fn evaluate(counters: &ChildcareCounters, birth_date: Date) -> Result<ChildcareStatus, RuleError> {
    let b1 = match counters.first_consultation_on {
        None => Status::Red,
        Some(first) => {
            let days_of_life = window::elapsed_days(birth_date, first)?;
            if window::within_deadline(days_of_life, FIRST_VISIT_DEADLINE_DAYS) {
                Status::Green
            } else {
                Status::Yellow
            }
        }
    };

    Ok(ChildcareStatus {
        b1,
        b2: CONSULTATION_LADDER.status(counters.consultations),
        b3: ANTHROPOMETRY_LADDER.status(counters.anthropometry_records),
        b5: presence(counters.vaccine_up_to_date),
    })
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use semaforo_core::models::fact::{Anthropometry, ConsultationFact, VaccineCode, VaccineFact};

    use super::*;

    const BIRTH: Date = date(2024, 3, 1);

    fn refs() -> ReferenceDates {
        ReferenceDates {
            birth_date: BIRTH,
            diagnosed_on: None,
            last_menstrual_on: None,
            delivered_on: None,
        }
    }

    fn consultation(on: Date, measured: bool) -> EventFact {
        EventFact::new(
            on.at(10, 0, 0, 0),
            EventPayload::Consultation(ConsultationFact {
                anthropometry: measured.then_some(Anthropometry {
                    weight_kg: 4.1,
                    height_cm: 53.0,
                }),
                ..Default::default()
            }),
        )
    }

    fn counters_with(consultations: u32) -> ChildcareCounters {
        ChildcareCounters {
            consultations,
            ..Default::default()
        }
    }

    #[test]
    fn b1_boundary_at_thirty_days_of_life() {
        let at_30 = ChildcareCounters {
            first_consultation_on: Some(date(2024, 3, 31)),
            ..Default::default()
        };
        let at_31 = ChildcareCounters {
            first_consultation_on: Some(date(2024, 4, 1)),
            ..Default::default()
        };
        assert_eq!(evaluate(&at_30, BIRTH).unwrap().b1, Status::Green);
        assert_eq!(evaluate(&at_31, BIRTH).unwrap().b1, Status::Yellow);
        assert_eq!(
            evaluate(&ChildcareCounters::default(), BIRTH).unwrap().b1,
            Status::Red
        );
    }

    #[test]
    fn b2_ladder_boundaries() {
        assert_eq!(evaluate(&counters_with(4), BIRTH).unwrap().b2, Status::Red);
        assert_eq!(evaluate(&counters_with(5), BIRTH).unwrap().b2, Status::Yellow);
        assert_eq!(evaluate(&counters_with(8), BIRTH).unwrap().b2, Status::Yellow);
        assert_eq!(evaluate(&counters_with(9), BIRTH).unwrap().b2, Status::Green);
    }

    #[test]
    fn first_consultation_milestone_is_never_overwritten() {
        let family = Childcare;
        let mut record = FamilyRecord::empty(FamilyKind::Childcare);
        for on in [date(2024, 3, 20), date(2024, 5, 2), date(2024, 6, 30)] {
            record = family.apply(&record, &consultation(on, true), &refs()).unwrap();
        }

        let FamilyRecord::Childcare(r) = record else {
            panic!("expected childcare record");
        };
        assert_eq!(r.counters.first_consultation_on, Some(date(2024, 3, 20)));
        assert_eq!(r.counters.consultations, 3);
        assert_eq!(r.counters.anthropometry_records, 3);
        assert_eq!(r.status.b1, Status::Green);
    }

    #[test]
    fn consultation_without_measurement_only_counts_the_visit() {
        let record = Childcare
            .apply(
                &FamilyRecord::empty(FamilyKind::Childcare),
                &consultation(date(2024, 4, 15), false),
                &refs(),
            )
            .unwrap();
        let FamilyRecord::Childcare(r) = record else {
            panic!("expected childcare record");
        };
        assert_eq!(r.counters.consultations, 1);
        assert_eq!(r.counters.anthropometry_records, 0);
        assert_eq!(r.status.b1, Status::Yellow);
        assert_eq!(r.status.b3, Status::Red);
    }

    #[test]
    fn any_vaccine_marks_schedule_current() {
        let fact = EventFact::new(
            date(2024, 3, 2).at(8, 0, 0, 0),
            EventPayload::Vaccine(VaccineFact {
                vaccine: VaccineCode::Bcg,
                dose: 1,
            }),
        );
        let record = Childcare
            .apply(&FamilyRecord::empty(FamilyKind::Childcare), &fact, &refs())
            .unwrap();
        assert_eq!(record.status_of("B5"), Some(Status::Green));
        assert_eq!(record.status_of("B2"), Some(Status::Red));
    }

    #[test]
    fn visit_before_birth_is_rejected() {
        let result = Childcare.apply(
            &FamilyRecord::empty(FamilyKind::Childcare),
            &consultation(date(2024, 2, 28), false),
            &refs(),
        );
        assert!(matches!(result, Err(RuleError::Window(_))));
    }

    #[test]
    fn wrong_record_variant_is_rejected() {
        let result = Childcare.update(
            &FamilyRecord::empty(FamilyKind::Elderly),
            &consultation(date(2024, 3, 10), false),
            &refs(),
        );
        assert_eq!(
            result,
            Err(RuleError::WrongRecord {
                expected: FamilyKind::Childcare,
                actual: FamilyKind::Elderly,
            })
        );
    }
}
