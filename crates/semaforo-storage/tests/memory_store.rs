use std::sync::Arc;

use jiff::civil::date;
use semaforo_core::models::family::FamilyKind;
use semaforo_core::models::patient::{
    DeliveryType, EpisodeClosure, FamilyMemberships, Patient, PregnancyEpisode,
};
use semaforo_core::models::record::{IndicatorRecord, RecordKey};
use semaforo_storage::error::StorageError;
use semaforo_storage::memory::MemoryStore;
use semaforo_storage::store::{CounterStore, PatientStore};
use uuid::Uuid;

fn record(key: &RecordKey) -> IndicatorRecord {
    IndicatorRecord::new(key, jiff::Timestamp::UNIX_EPOCH)
}

fn episode(patient_id: Uuid) -> PregnancyEpisode {
    PregnancyEpisode {
        id: Uuid::new_v4(),
        patient_id,
        last_menstrual_on: date(2024, 1, 1),
        expected_delivery_on: date(2024, 10, 7),
        delivered_on: None,
        delivery_type: None,
        high_risk: false,
        previous_pregnancies: 0,
        previous_deliveries: 0,
    }
}

#[tokio::test]
async fn missing_record_loads_as_none() {
    let store = MemoryStore::new();
    let key = RecordKey::patient(Uuid::new_v4(), FamilyKind::Elderly);
    assert!(store.load_record(key).await.unwrap().is_none());
}

#[tokio::test]
async fn versions_advance_on_each_write() {
    let store = MemoryStore::new();
    let key = RecordKey::patient(Uuid::new_v4(), FamilyKind::Childcare);
    let mut rec = record(&key);

    let v1 = store.save_record(&rec, None).await.unwrap();
    rec.events_applied = 1;
    let v2 = store.save_record(&rec, Some(&v1)).await.unwrap();
    assert_ne!(v1, v2);

    let stored = store.load_record(key).await.unwrap().unwrap();
    assert_eq!(stored.etag, v2);
    assert_eq!(stored.record.events_applied, 1);
}

#[tokio::test]
async fn stale_write_is_rejected() {
    let store = MemoryStore::new();
    let key = RecordKey::patient(Uuid::new_v4(), FamilyKind::Diabetes);
    let rec = record(&key);

    let v1 = store.save_record(&rec, None).await.unwrap();
    store.save_record(&rec, Some(&v1)).await.unwrap();

    let err = store.save_record(&rec, Some(&v1)).await.unwrap_err();
    assert!(matches!(err, StorageError::PreconditionFailed { .. }));
}

#[tokio::test]
async fn create_only_write_fails_when_record_exists() {
    let store = MemoryStore::new();
    let key = RecordKey::patient(Uuid::new_v4(), FamilyKind::Hypertension);
    let rec = record(&key);

    store.save_record(&rec, None).await.unwrap();
    let err = store.save_record(&rec, None).await.unwrap_err();
    assert!(matches!(err, StorageError::PreconditionFailed { .. }));
    assert_eq!(store.record_count().await, 1);
}

#[tokio::test]
async fn concurrent_creates_have_one_winner() {
    let store = Arc::new(MemoryStore::new());
    let key = RecordKey::patient(Uuid::new_v4(), FamilyKind::WomanHealth);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.save_record(&record(&key), None).await.is_ok()
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test]
async fn prenatal_records_are_separate_per_episode() {
    let store = MemoryStore::new();
    let patient_id = Uuid::new_v4();
    let first = RecordKey::prenatal(patient_id, Uuid::new_v4());
    let second = RecordKey::prenatal(patient_id, Uuid::new_v4());

    store.save_record(&record(&first), None).await.unwrap();
    store.save_record(&record(&second), None).await.unwrap();
    assert_eq!(store.record_count().await, 2);
}

#[tokio::test]
async fn closing_episode_hides_it_from_open_lookup() {
    let store = MemoryStore::new();
    let patient = Patient {
        id: Uuid::new_v4(),
        name: "Ana".to_string(),
        birth_date: date(1994, 4, 4),
        memberships: FamilyMemberships {
            is_pregnant: true,
            is_woman: true,
            ..Default::default()
        },
        diabetes_diagnosed_on: None,
        hypertension_diagnosed_on: None,
    };
    let episode = episode(patient.id);
    store.insert_patient(patient.clone()).await;
    store.insert_episode(episode.clone()).await;

    let open = store.get_open_pregnancy_episode(patient.id).await.unwrap();
    assert_eq!(open.map(|e| e.id), Some(episode.id));

    let closure = EpisodeClosure {
        episode_id: episode.id,
        delivered_on: date(2024, 10, 1),
        delivery_type: DeliveryType::Vaginal,
    };
    store.close_pregnancy_episode(patient.id, &closure).await.unwrap();

    assert!(store.get_open_pregnancy_episode(patient.id).await.unwrap().is_none());
    let closed = store.episode(episode.id).await.unwrap();
    assert_eq!(closed.delivered_on, Some(date(2024, 10, 1)));
}

#[tokio::test]
async fn closing_someone_elses_episode_is_not_found() {
    let store = MemoryStore::new();
    let episode = episode(Uuid::new_v4());
    store.insert_episode(episode.clone()).await;

    let closure = EpisodeClosure {
        episode_id: episode.id,
        delivered_on: date(2024, 10, 1),
        delivery_type: DeliveryType::Cesarean,
    };
    let err = store
        .close_pregnancy_episode(Uuid::new_v4(), &closure)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
    assert!(store.episode(episode.id).await.unwrap().is_open());
}
