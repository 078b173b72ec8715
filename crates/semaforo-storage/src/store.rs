use std::future::Future;
use std::pin::Pin;

use semaforo_core::models::patient::{EpisodeClosure, Patient, PregnancyEpisode};
use semaforo_core::models::record::{IndicatorRecord, RecordKey};
use uuid::Uuid;

use crate::error::StorageError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// An indicator record together with the version it was read at.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub record: IndicatorRecord,
    pub etag: String,
}

/// Read-modify-write access to one indicator record per key.
///
/// Writers are serialised per key by the version check in `save_record`:
/// a write based on a stale read fails with `PreconditionFailed` and must be
/// redone from fresh reads.
pub trait CounterStore: Send + Sync {
    /// Current record and its version. None = never written.
    fn load_record(
        &self,
        key: RecordKey,
    ) -> BoxFuture<'_, Result<Option<StoredRecord>, StorageError>>;

    /// Write the full record. `expected_etag` is the version the write was
    /// computed from; `None` means the record must not exist yet.
    /// Returns the new version.
    fn save_record<'a>(
        &'a self,
        record: &'a IndicatorRecord,
        expected_etag: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, StorageError>>;
}

/// Patients and pregnancy episodes, owned by the surrounding registry.
pub trait PatientStore: Send + Sync {
    fn get_patient(&self, id: Uuid) -> BoxFuture<'_, Result<Option<Patient>, StorageError>>;

    /// The patient's open episode, if any. At most one is open at a time.
    fn get_open_pregnancy_episode(
        &self,
        patient_id: Uuid,
    ) -> BoxFuture<'_, Result<Option<PregnancyEpisode>, StorageError>>;

    /// Stamp delivery facts onto an episode. The episode is kept.
    fn close_pregnancy_episode<'a>(
        &'a self,
        patient_id: Uuid,
        closure: &'a EpisodeClosure,
    ) -> BoxFuture<'a, Result<(), StorageError>>;
}
