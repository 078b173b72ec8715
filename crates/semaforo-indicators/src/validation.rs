//! Payload checks shared by every family.

use jiff::civil::Date;
use semaforo_core::models::fact::{ConsultationFact, EventPayload, PostpartumFact, VaccineFact};

use crate::error::RuleError;

/// Reject physiologically impossible or inconsistent payloads.
pub fn check_payload(payload: &EventPayload, anchor: Date, occurred_on: Date) -> Result<(), RuleError> {
    match payload {
        EventPayload::Consultation(consultation) => check_consultation(consultation),
        EventPayload::Vaccine(vaccine) => check_vaccine(vaccine),
        EventPayload::Exam(_) => Ok(()),
        EventPayload::PostpartumConsultation(postpartum) => {
            check_postpartum(postpartum, anchor, occurred_on)
        }
    }
}

fn check_consultation(consultation: &ConsultationFact) -> Result<(), RuleError> {
    if let Some(a) = &consultation.anthropometry
        && (!(a.weight_kg > 0.0) || !(a.height_cm > 0.0))
    {
        return Err(RuleError::InvalidFact(format!(
            "anthropometry must be positive (weight {} kg, height {} cm)",
            a.weight_kg, a.height_cm
        )));
    }
    if let Some(bp) = &consultation.blood_pressure {
        if bp.systolic == 0 || bp.diastolic == 0 {
            return Err(RuleError::InvalidFact(
                "blood pressure readings must be positive".to_string(),
            ));
        }
        if bp.systolic < bp.diastolic {
            return Err(RuleError::InvalidFact(format!(
                "systolic {} is below diastolic {}",
                bp.systolic, bp.diastolic
            )));
        }
    }
    Ok(())
}

fn check_vaccine(vaccine: &VaccineFact) -> Result<(), RuleError> {
    if vaccine.dose == 0 {
        return Err(RuleError::InvalidFact(format!(
            "{:?} dose number must start at 1",
            vaccine.vaccine
        )));
    }
    Ok(())
}

fn check_postpartum(
    postpartum: &PostpartumFact,
    anchor: Date,
    occurred_on: Date,
) -> Result<(), RuleError> {
    if postpartum.delivered_on < anchor {
        return Err(RuleError::InvalidFact(format!(
            "delivery on {} precedes last menstrual date {anchor}",
            postpartum.delivered_on
        )));
    }
    if postpartum.delivered_on > occurred_on {
        return Err(RuleError::InvalidFact(format!(
            "delivery on {} is after the postpartum consultation on {occurred_on}",
            postpartum.delivered_on
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use semaforo_core::models::fact::{Anthropometry, BloodPressure, VaccineCode};
    use semaforo_core::models::patient::DeliveryType;

    use super::*;

    const ANCHOR: Date = date(2024, 1, 1);
    const ON: Date = date(2024, 6, 1);

    fn consultation(anthropometry: Option<Anthropometry>, bp: Option<BloodPressure>) -> EventPayload {
        EventPayload::Consultation(ConsultationFact {
            anthropometry,
            blood_pressure: bp,
            ..Default::default()
        })
    }

    #[test]
    fn accepts_plausible_measurements() {
        let payload = consultation(
            Some(Anthropometry {
                weight_kg: 3.4,
                height_cm: 50.0,
            }),
            Some(BloodPressure {
                systolic: 120,
                diastolic: 80,
            }),
        );
        assert_eq!(check_payload(&payload, ANCHOR, ON), Ok(()));
    }

    #[test]
    fn rejects_non_positive_anthropometry() {
        for (weight_kg, height_cm) in [(0.0, 50.0), (-1.0, 50.0), (3.0, 0.0), (f64::NAN, 50.0)] {
            let payload = consultation(
                Some(Anthropometry {
                    weight_kg,
                    height_cm,
                }),
                None,
            );
            assert!(matches!(
                check_payload(&payload, ANCHOR, ON),
                Err(RuleError::InvalidFact(_))
            ));
        }
    }

    #[test]
    fn rejects_inverted_blood_pressure() {
        let payload = consultation(
            None,
            Some(BloodPressure {
                systolic: 70,
                diastolic: 90,
            }),
        );
        assert!(check_payload(&payload, ANCHOR, ON).is_err());
    }

    #[test]
    fn rejects_dose_zero() {
        let payload = EventPayload::Vaccine(VaccineFact {
            vaccine: VaccineCode::Bcg,
            dose: 0,
        });
        assert!(check_payload(&payload, ANCHOR, ON).is_err());
    }

    #[test]
    fn delivery_must_fall_between_lmp_and_visit() {
        let visit = |delivered_on| {
            EventPayload::PostpartumConsultation(PostpartumFact {
                delivered_on,
                delivery_type: DeliveryType::Vaginal,
            })
        };
        assert!(check_payload(&visit(date(2024, 5, 20)), ANCHOR, ON).is_ok());
        assert!(check_payload(&visit(ON), ANCHOR, ON).is_ok());
        assert!(check_payload(&visit(date(2023, 12, 31)), ANCHOR, ON).is_err());
        assert!(check_payload(&visit(date(2024, 6, 2)), ANCHOR, ON).is_err());
    }
}
