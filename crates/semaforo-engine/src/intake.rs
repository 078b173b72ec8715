use semaforo_core::models::fact::EventFact;
use semaforo_core::models::family::FamilyKind;
use semaforo_core::models::patient::EpisodeClosure;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::engine::{IndicatorEngine, RecordOutcome};
use crate::error::EngineError;

/// How many times a transient failure is retried before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Front door for incoming events.
///
/// Re-runs `record_event` from fresh reads on `VersionConflict` and
/// `StoreUnavailable`, and closes the pregnancy episode after a committed
/// postpartum consultation. Once the record is committed no retryable error
/// is returned, so a caller retry cannot apply the same fact twice.
#[derive(Clone)]
pub struct EventIntake {
    engine: IndicatorEngine,
    policy: RetryPolicy,
}

impl EventIntake {
    pub fn new(engine: IndicatorEngine, policy: RetryPolicy) -> Self {
        Self { engine, policy }
    }

    pub async fn submit(
        &self,
        patient_id: Uuid,
        family: FamilyKind,
        fact: &EventFact,
    ) -> Result<RecordOutcome, EngineError> {
        let max_attempts = self.policy.attempts();
        let mut attempt = 1;
        let outcome = loop {
            match self.engine.record_event(patient_id, family, fact).await {
                Ok(outcome) => break outcome,
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    warn!(
                        patient_id = %patient_id,
                        family = %family,
                        attempt,
                        max_attempts,
                        error = %err,
                        "retrying event"
                    );
                    attempt += 1;
                    tokio::task::yield_now().await;
                }
                Err(err) => return Err(err),
            }
        };

        let Some(closure) = outcome.closure.clone() else {
            return Ok(outcome);
        };
        match self.close_episode(patient_id, &closure).await {
            Ok(()) => Ok(outcome),
            Err(err) => {
                error!(
                    patient_id = %patient_id,
                    episode_id = %closure.episode_id,
                    events_applied = outcome.record.events_applied,
                    error = %err,
                    "event recorded but episode left open"
                );
                Err(EngineError::EpisodeCloseFailed {
                    episode_id: closure.episode_id,
                    outcome: Box::new(outcome),
                    source: Box::new(err),
                })
            }
        }
    }

    /// The record is already committed at this point, so only the episode
    /// write is repeated.
    async fn close_episode(
        &self,
        patient_id: Uuid,
        closure: &EpisodeClosure,
    ) -> Result<(), EngineError> {
        let max_attempts = self.policy.attempts();
        let mut attempt = 1;
        loop {
            match self
                .engine
                .patients
                .close_pregnancy_episode(patient_id, closure)
                .await
            {
                Ok(()) => {
                    info!(
                        patient_id = %patient_id,
                        episode_id = %closure.episode_id,
                        delivered_on = %closure.delivered_on,
                        "pregnancy episode closed"
                    );
                    return Ok(());
                }
                Err(err) => {
                    let err = EngineError::from(err);
                    if !err.is_retryable() || attempt >= max_attempts {
                        return Err(err);
                    }
                    warn!(
                        patient_id = %patient_id,
                        episode_id = %closure.episode_id,
                        attempt,
                        error = %err,
                        "retrying episode close"
                    );
                    attempt += 1;
                    tokio::task::yield_now().await;
                }
            }
        }
    }
}
