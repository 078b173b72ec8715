use semaforo_core::models::family::FamilyKind;
use semaforo_indicators::error::RuleError;
use semaforo_storage::error::StorageError;
use thiserror::Error;
use uuid::Uuid;

use crate::engine::RecordOutcome;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("patient not found: {0}")]
    PatientNotFound(Uuid),

    #[error("patient {patient_id} is not enrolled in {family}")]
    FamilyNotApplicable { patient_id: Uuid, family: FamilyKind },

    #[error("patient {0} has no open pregnancy episode")]
    EpisodeNotFound(Uuid),

    #[error("invalid fact: {0}")]
    InvalidFact(#[source] RuleError),

    #[error("indicator record not found: {key}")]
    RecordNotFound { key: String },

    #[error("version conflict on {key}")]
    VersionConflict { key: String },

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] StorageError),

    /// The store answered but refused the request: a missing object or a
    /// body it could not read or write. Repeating the call does not help.
    #[error("store rejected request: {0}")]
    StoreRejected(#[source] StorageError),

    /// The event is committed and must not be submitted again. Only the
    /// episode write failed.
    #[error("event recorded but closing episode {episode_id} failed: {source}")]
    EpisodeCloseFailed {
        episode_id: Uuid,
        outcome: Box<RecordOutcome>,
        #[source]
        source: Box<EngineError>,
    },

    #[error("stored record does not match its family: {0}")]
    CorruptRecord(#[source] RuleError),
}

impl EngineError {
    /// Transient failures. The whole `record_event` call may be repeated
    /// with fresh reads.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::VersionConflict { .. })
    }
}

impl From<StorageError> for EngineError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::PreconditionFailed { key } => Self::VersionConflict { key },
            StorageError::NotFound { .. } | StorageError::Serialization(_) => {
                Self::StoreRejected(err)
            }
            StorageError::S3 { .. } => Self::StoreUnavailable(err),
        }
    }
}

impl From<RuleError> for EngineError {
    fn from(err: RuleError) -> Self {
        match err {
            RuleError::WrongRecord { .. } => Self::CorruptRecord(err),
            other => Self::InvalidFact(other),
        }
    }
}
