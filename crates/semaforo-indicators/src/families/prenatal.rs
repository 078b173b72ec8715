//! Prenatal and postpartum follow-up, one record per pregnancy episode.
//!
//! Exam panels are recomputed from the full exam history on every event
//! since exams arrive out of order.

use jiff::civil::Date;
use semaforo_core::models::counters::{ExamEntry, PrenatalCounters, PrenatalStatus, Trimester};
use semaforo_core::models::fact::{EventFact, EventKind, EventPayload, ExamType, VaccineCode};
use semaforo_core::models::family::FamilyKind;
use semaforo_core::models::patient::ReferenceDates;
use semaforo_core::models::record::{FamilyRecord, PrenatalRecord};
use semaforo_core::models::status::Status;

use super::wrong_record;
use crate::IndicatorFamily;
use crate::error::RuleError;
use crate::rules::{Ladder, RuleKind, SubIndicator, TimelinessCheck, WindowUnit, presence};
use crate::window;

pub const MIN_CONSULTATIONS: u32 = 7;
pub const PARTIAL_CONSULTATIONS: u32 = 4;
pub const FIRST_VISIT_DEADLINE_WEEKS: u32 = 12;
pub const POSTPARTUM_DEADLINE_DAYS: u32 = 42;
pub const BLOOD_PRESSURE_LADDER: Ladder = Ladder {
    green: 7,
    yellow: 4,
};
pub const ANTHROPOMETRY_LADDER: Ladder = Ladder {
    green: 7,
    yellow: 4,
};

pub const FIRST_TRIMESTER_PANEL: [ExamType; 4] = [
    ExamType::Syphilis,
    ExamType::Hiv,
    ExamType::HepatitisB,
    ExamType::HepatitisC,
];
pub const THIRD_TRIMESTER_PANEL: [ExamType; 2] = [ExamType::Syphilis, ExamType::Hiv];

/// Prenatal: consultations, measurements, vaccination and exams of a pregnancy.
pub struct Prenatal;

impl IndicatorFamily for Prenatal {
    fn kind(&self) -> FamilyKind {
        FamilyKind::Prenatal
    }

    fn name(&self) -> &str {
        "Prenatal"
    }

    fn sub_indicators(&self) -> &[SubIndicator] {
        static SUB_INDICATORS: std::sync::LazyLock<Vec<SubIndicator>> =
            std::sync::LazyLock::new(|| {
                vec![
                    SubIndicator::new("C1", "Consultations and postpartum visit", RuleKind::Combined)
                        .describe(
                            "GREEN: 7+ consultations and postpartum visit. \
                             YELLOW: 7+ consultations, or 4+ with postpartum visit.",
                        ),
                    SubIndicator::new(
                        "C2",
                        "Blood pressure measurements",
                        RuleKind::Ladder(BLOOD_PRESSURE_LADDER),
                    ),
                    SubIndicator::new(
                        "C3",
                        "Weight and height measurements",
                        RuleKind::Ladder(ANTHROPOMETRY_LADDER),
                    ),
                    SubIndicator::new("C4", "dTpa vaccination", RuleKind::Flag),
                    SubIndicator::new("C6", "Trimester exam panels", RuleKind::Panel).describe(
                        "First trimester: syphilis, HIV, hepatitis B, hepatitis C. \
                         Third trimester: syphilis, HIV. All results evaluated.",
                    ),
                ]
            });
        &SUB_INDICATORS
    }

    fn consumes(&self) -> &[EventKind] {
        &[
            EventKind::Consultation,
            EventKind::Vaccine,
            EventKind::Exam,
            EventKind::PostpartumConsultation,
        ]
    }

    fn anchor(&self, refs: &ReferenceDates) -> Result<Date, RuleError> {
        refs.last_menstrual_on
            .ok_or(RuleError::MissingReferenceDate("last menstrual date"))
    }

    fn update(
        &self,
        record: &FamilyRecord,
        fact: &EventFact,
        refs: &ReferenceDates,
    ) -> Result<FamilyRecord, RuleError> {
        let FamilyRecord::Prenatal(current) = record else {
            return Err(wrong_record(FamilyKind::Prenatal, record));
        };
        let last_menstrual_on = self.anchor(refs)?;
        let on = fact.occurred_on();

        let mut counters = current.counters.clone();
        match &fact.payload {
            EventPayload::Consultation(consultation) => {
                counters.consultations += 1;
                counters.first_consultation_on.get_or_insert(on);
                if consultation.blood_pressure.is_some() {
                    counters.blood_pressure_records += 1;
                }
                if consultation.anthropometry.is_some() {
                    counters.anthropometry_records += 1;
                }
            }
            EventPayload::Vaccine(vaccine) => {
                if vaccine.vaccine == VaccineCode::Dtpa {
                    counters.dtpa_applied = true;
                }
            }
            EventPayload::Exam(exam) => {
                let trimester = trimester_of(last_menstrual_on, on)?;
                record_exam(&mut counters.exams, exam.exam, trimester, exam.evaluated, on);
            }
            EventPayload::PostpartumConsultation(_) => {
                counters.postpartum_done = true;
                counters.postpartum_on.get_or_insert(on);
            }
        }

        let status = evaluate(&counters);
        Ok(FamilyRecord::Prenatal(PrenatalRecord { counters, status }))
    }

    fn timeliness(
        &self,
        record: &FamilyRecord,
        fact: &EventFact,
        refs: &ReferenceDates,
    ) -> Result<Vec<TimelinessCheck>, RuleError> {
        let FamilyRecord::Prenatal(current) = record else {
            return Err(wrong_record(FamilyKind::Prenatal, record));
        };
        let on = fact.occurred_on();

        let mut checks = Vec::new();
        match &fact.payload {
            EventPayload::Consultation(_) if current.counters.first_consultation_on.is_none() => {
                let weeks = window::elapsed_weeks(self.anchor(refs)?, on)?;
                checks.push(TimelinessCheck {
                    check: "first_prenatal_consultation".to_string(),
                    elapsed: weeks,
                    deadline: FIRST_VISIT_DEADLINE_WEEKS,
                    unit: WindowUnit::Weeks,
                    within_deadline: window::within_deadline(weeks, FIRST_VISIT_DEADLINE_WEEKS),
                });
            }
            EventPayload::PostpartumConsultation(postpartum) if !current.counters.postpartum_done => {
                let days = window::elapsed_days(postpartum.delivered_on, on)?;
                checks.push(TimelinessCheck {
                    check: "postpartum_consultation".to_string(),
                    elapsed: days,
                    deadline: POSTPARTUM_DEADLINE_DAYS,
                    unit: WindowUnit::Days,
                    within_deadline: window::within_deadline(days, POSTPARTUM_DEADLINE_DAYS),
                });
            }
            _ => {}
        }
        Ok(checks)
    }
}

/// Gestational trimester of `on`, counted in whole weeks from the last menstrual date.
pub fn trimester_of(last_menstrual_on: Date, on: Date) -> Result<Trimester, RuleError> {
    let weeks = window::elapsed_weeks(last_menstrual_on, on)?;
    Ok(match weeks {
        0..=13 => Trimester::First,
        14..=27 => Trimester::Second,
        _ => Trimester::Third,
    })
}

/// Add an exam to the history. A repeat of the same exam in the same
/// trimester can only turn an unevaluated result into an evaluated one.
fn record_exam(
    exams: &mut Vec<ExamEntry>,
    exam: ExamType,
    trimester: Trimester,
    evaluated: bool,
    on: Date,
) {
    if let Some(entry) = exams
        .iter_mut()
        .find(|e| e.exam == exam && e.trimester == trimester)
    {
        entry.evaluated |= evaluated;
        return;
    }
    exams.push(ExamEntry {
        exam,
        trimester,
        evaluated,
        resulted_on: on,
    });
}

/// Recompute every prenatal sub-indicator from its counters.
pub fn evaluate(counters: &PrenatalCounters) -> PrenatalStatus {
    PrenatalStatus {
        c1: consultation_status(counters.consultations, counters.postpartum_done),
        c2: BLOOD_PRESSURE_LADDER.status(counters.blood_pressure_records),
        c3: ANTHROPOMETRY_LADDER.status(counters.anthropometry_records),
        c4: presence(counters.dtpa_applied),
        c6: exam_panel_status(counters),
    }
}

pub fn consultation_status(consultations: u32, postpartum_done: bool) -> Status {
    let enough = consultations >= MIN_CONSULTATIONS;
    let partial = consultations >= PARTIAL_CONSULTATIONS;
    if enough && postpartum_done {
        Status::Green
    } else if enough || (partial && postpartum_done) {
        Status::Yellow
    } else {
        Status::Red
    }
}

pub fn exam_panel_status(counters: &PrenatalCounters) -> Status {
    let first = FIRST_TRIMESTER_PANEL
        .iter()
        .all(|exam| counters.has_evaluated(*exam, Trimester::First));
    let third = THIRD_TRIMESTER_PANEL
        .iter()
        .all(|exam| counters.has_evaluated(*exam, Trimester::Third));
    match (first, third) {
        (true, true) => Status::Green,
        (true, false) => Status::Yellow,
        _ => Status::Red,
    }
}
