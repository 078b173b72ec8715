use std::collections::HashMap;

use semaforo_core::models::patient::{EpisodeClosure, Patient, PregnancyEpisode};
use semaforo_core::models::record::{IndicatorRecord, RecordKey};
use semaforo_core::record_keys;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StorageError;
use crate::store::{BoxFuture, CounterStore, PatientStore, StoredRecord};

/// In-process store. Record versions are per-key sequence numbers; the write
/// lock makes compare-and-swap atomic.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<RecordKey, (IndicatorRecord, u64)>>,
    patients: RwLock<HashMap<Uuid, Patient>>,
    episodes: RwLock<HashMap<Uuid, PregnancyEpisode>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_patient(&self, patient: Patient) {
        self.patients.write().await.insert(patient.id, patient);
    }

    pub async fn insert_episode(&self, episode: PregnancyEpisode) {
        self.episodes.write().await.insert(episode.id, episode);
    }

    pub async fn episode(&self, id: Uuid) -> Option<PregnancyEpisode> {
        self.episodes.read().await.get(&id).cloned()
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

impl CounterStore for MemoryStore {
    fn load_record(
        &self,
        key: RecordKey,
    ) -> BoxFuture<'_, Result<Option<StoredRecord>, StorageError>> {
        Box::pin(async move {
            let records = self.records.read().await;
            Ok(records.get(&key).map(|(record, version)| StoredRecord {
                record: record.clone(),
                etag: version.to_string(),
            }))
        })
    }

    fn save_record<'a>(
        &'a self,
        record: &'a IndicatorRecord,
        expected_etag: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(async move {
            let key = record.key();
            let mut records = self.records.write().await;
            let current = records.get(&key).map(|(_, version)| *version);

            let next = match (current, expected_etag) {
                (None, None) => 1,
                (Some(version), Some(expected)) if version.to_string() == expected => version + 1,
                _ => {
                    return Err(StorageError::PreconditionFailed {
                        key: record_keys::indicator_record(&key),
                    });
                }
            };

            records.insert(key, (record.clone(), next));
            tracing::debug!(key = %record_keys::indicator_record(&key), version = next, "record saved");
            Ok(next.to_string())
        })
    }
}

impl PatientStore for MemoryStore {
    fn get_patient(&self, id: Uuid) -> BoxFuture<'_, Result<Option<Patient>, StorageError>> {
        Box::pin(async move { Ok(self.patients.read().await.get(&id).cloned()) })
    }

    fn get_open_pregnancy_episode(
        &self,
        patient_id: Uuid,
    ) -> BoxFuture<'_, Result<Option<PregnancyEpisode>, StorageError>> {
        Box::pin(async move {
            let episodes = self.episodes.read().await;
            Ok(episodes
                .values()
                .find(|e| e.patient_id == patient_id && e.is_open())
                .cloned())
        })
    }

    fn close_pregnancy_episode<'a>(
        &'a self,
        patient_id: Uuid,
        closure: &'a EpisodeClosure,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let mut episodes = self.episodes.write().await;
            let episode = episodes
                .get_mut(&closure.episode_id)
                .filter(|e| e.patient_id == patient_id)
                .ok_or_else(|| StorageError::NotFound {
                    key: record_keys::episode(patient_id, closure.episode_id),
                })?;
            episode.close(closure);
            Ok(())
        })
    }
}
