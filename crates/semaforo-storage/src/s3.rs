use aws_sdk_s3::Client;
use semaforo_core::models::patient::{EpisodeClosure, Patient, PregnancyEpisode};
use semaforo_core::models::record::{IndicatorRecord, RecordKey};
use semaforo_core::record_keys;
use uuid::Uuid;

use crate::error::StorageError;
use crate::objects::{self, WriteCondition};
use crate::state;
use crate::store::{BoxFuture, CounterStore, PatientStore, StoredRecord};

/// Store backed by one JSON object per record in an S3 bucket.
/// Writes are conditional on the ETag of the version they were computed from.
#[derive(Clone)]
pub struct S3Store {
    pub client: Client,
    pub bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Write a patient as-is. Registry data is last-writer-wins.
    pub async fn put_patient(&self, patient: &Patient) -> Result<(), StorageError> {
        let key = record_keys::patient(patient.id);
        state::save_json(&self.client, &self.bucket, &key, patient, WriteCondition::Always).await?;
        tracing::debug!(key = %key, "patient saved");
        Ok(())
    }

    pub async fn put_episode(&self, episode: &PregnancyEpisode) -> Result<(), StorageError> {
        let key = record_keys::episode(episode.patient_id, episode.id);
        state::save_json(&self.client, &self.bucket, &key, episode, WriteCondition::Always).await?;
        tracing::debug!(key = %key, "episode saved");
        Ok(())
    }

    async fn episodes_of(&self, patient_id: Uuid) -> Result<Vec<PregnancyEpisode>, StorageError> {
        let prefix = record_keys::episodes_prefix(patient_id);
        let keys = objects::list_keys(&self.client, &self.bucket, &prefix).await?;

        let mut episodes = Vec::with_capacity(keys.len());
        for key in &keys {
            if let Some((episode, _)) = state::load_json(&self.client, &self.bucket, key).await? {
                episodes.push(episode);
            }
        }
        Ok(episodes)
    }
}

impl CounterStore for S3Store {
    fn load_record(
        &self,
        key: RecordKey,
    ) -> BoxFuture<'_, Result<Option<StoredRecord>, StorageError>> {
        Box::pin(async move {
            let s3_key = record_keys::indicator_record(&key);
            let found = state::load_json::<IndicatorRecord>(&self.client, &self.bucket, &s3_key)
                .await?;
            tracing::debug!(key = %s3_key, found = found.is_some(), "record loaded");
            Ok(found.map(|(record, etag)| StoredRecord { record, etag }))
        })
    }

    fn save_record<'a>(
        &'a self,
        record: &'a IndicatorRecord,
        expected_etag: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(async move {
            let s3_key = record_keys::indicator_record(&record.key());
            let condition = match expected_etag {
                Some(expected) => WriteCondition::IfMatch(expected),
                None => WriteCondition::IfAbsent,
            };
            let etag =
                state::save_json(&self.client, &self.bucket, &s3_key, record, condition).await?;
            tracing::debug!(key = %s3_key, etag = %etag, "record saved");
            Ok(etag)
        })
    }
}

impl PatientStore for S3Store {
    fn get_patient(&self, id: Uuid) -> BoxFuture<'_, Result<Option<Patient>, StorageError>> {
        Box::pin(async move {
            let found =
                state::load_json::<Patient>(&self.client, &self.bucket, &record_keys::patient(id))
                    .await?;
            Ok(found.map(|(patient, _)| patient))
        })
    }

    fn get_open_pregnancy_episode(
        &self,
        patient_id: Uuid,
    ) -> BoxFuture<'_, Result<Option<PregnancyEpisode>, StorageError>> {
        Box::pin(async move {
            let episodes = self.episodes_of(patient_id).await?;
            Ok(episodes.into_iter().find(PregnancyEpisode::is_open))
        })
    }

    fn close_pregnancy_episode<'a>(
        &'a self,
        patient_id: Uuid,
        closure: &'a EpisodeClosure,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let key = record_keys::episode(patient_id, closure.episode_id);
            let (mut episode, etag) =
                state::require_json::<PregnancyEpisode>(&self.client, &self.bucket, &key).await?;
            episode.close(closure);
            state::save_json(
                &self.client,
                &self.bucket,
                &key,
                &episode,
                WriteCondition::IfMatch(&etag),
            )
            .await?;
            tracing::info!(key = %key, delivered_on = %closure.delivered_on, "pregnancy episode closed");
            Ok(())
        })
    }
}
