#![allow(dead_code)]

use std::sync::Arc;

use jiff::civil::{Date, DateTime, date};
use semaforo_core::models::fact::{
    Anthropometry, BloodPressure, ConsultationFact, EventFact, EventPayload, ExamFact, ExamType,
    PostpartumFact, VaccineCode, VaccineFact,
};
use semaforo_core::models::patient::{
    DeliveryType, FamilyMemberships, Patient, PregnancyEpisode,
};
use semaforo_engine::{EventIntake, IndicatorEngine, RetryPolicy};
use semaforo_storage::memory::MemoryStore;
use uuid::Uuid;

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub engine: IndicatorEngine,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let engine = IndicatorEngine::new(store.clone(), store.clone());
        Self { store, engine }
    }

    pub fn intake(&self, max_attempts: u32) -> EventIntake {
        EventIntake::new(self.engine.clone(), RetryPolicy { max_attempts })
    }

    pub async fn add_patient(&self, birth_date: Date, memberships: FamilyMemberships) -> Patient {
        let patient = Patient {
            id: Uuid::new_v4(),
            name: "Test patient".to_string(),
            birth_date,
            memberships,
            diabetes_diagnosed_on: None,
            hypertension_diagnosed_on: None,
        };
        self.store.insert_patient(patient.clone()).await;
        patient
    }

    pub async fn add_episode(&self, patient_id: Uuid, last_menstrual_on: Date) -> PregnancyEpisode {
        let episode = PregnancyEpisode {
            id: Uuid::new_v4(),
            patient_id,
            last_menstrual_on,
            expected_delivery_on: last_menstrual_on + jiff::Span::new().days(280),
            delivered_on: None,
            delivery_type: None,
            high_risk: false,
            previous_pregnancies: 0,
            previous_deliveries: 0,
        };
        self.store.insert_episode(episode.clone()).await;
        episode
    }
}

pub fn child() -> FamilyMemberships {
    FamilyMemberships {
        is_child: true,
        ..Default::default()
    }
}

pub fn pregnant() -> FamilyMemberships {
    FamilyMemberships {
        is_pregnant: true,
        is_woman: true,
        ..Default::default()
    }
}

pub fn elderly() -> FamilyMemberships {
    FamilyMemberships {
        is_elderly: true,
        ..Default::default()
    }
}

pub fn at(on: Date) -> DateTime {
    on.at(10, 0, 0, 0)
}

pub fn plain_consultation(on: Date) -> EventFact {
    EventFact::new(at(on), EventPayload::Consultation(ConsultationFact::default()))
}

pub fn measured_consultation(on: Date) -> EventFact {
    EventFact::new(
        at(on),
        EventPayload::Consultation(ConsultationFact {
            anthropometry: Some(Anthropometry {
                weight_kg: 62.5,
                height_cm: 164.0,
            }),
            blood_pressure: Some(BloodPressure {
                systolic: 118,
                diastolic: 76,
            }),
            ..Default::default()
        }),
    )
}

pub fn vaccine(on: Date, vaccine: VaccineCode) -> EventFact {
    EventFact::new(at(on), EventPayload::Vaccine(VaccineFact { vaccine, dose: 1 }))
}

pub fn exam(on: Date, exam: ExamType) -> EventFact {
    EventFact::new(
        at(on),
        EventPayload::Exam(ExamFact {
            exam,
            evaluated: true,
            result: None,
        }),
    )
}

pub fn postpartum(on: Date, delivered_on: Date) -> EventFact {
    EventFact::new(
        at(on),
        EventPayload::PostpartumConsultation(PostpartumFact {
            delivered_on,
            delivery_type: DeliveryType::Vaginal,
        }),
    )
}

pub fn birth() -> Date {
    date(2024, 1, 1)
}
