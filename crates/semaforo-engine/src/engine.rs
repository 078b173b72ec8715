use std::sync::Arc;

use jiff::Timestamp;
use semaforo_core::models::fact::{EventFact, EventPayload};
use semaforo_core::models::family::FamilyKind;
use semaforo_core::models::patient::{EpisodeClosure, Patient, PregnancyEpisode, ReferenceDates};
use semaforo_core::models::record::{IndicatorRecord, RecordKey};
use semaforo_core::record_keys;
use semaforo_indicators::get_family;
use semaforo_indicators::rules::TimelinessCheck;
use semaforo_storage::store::{CounterStore, PatientStore};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::audit::IndicatorAuditEvent;
use crate::error::EngineError;

/// Result of one committed event.
#[derive(Debug, Clone)]
pub struct RecordOutcome {
    pub record: IndicatorRecord,
    /// Version the record was written at.
    pub etag: String,
    /// True when this event created the record.
    pub created: bool,
    /// Delivery facts to stamp onto the pregnancy episode, for postpartum events.
    pub closure: Option<EpisodeClosure>,
    /// Deadline checks triggered by this event. Reported only.
    pub timeliness: Vec<TimelinessCheck>,
}

/// Applies event facts to indicator records.
///
/// Holds explicit store handles; performs no retries of its own.
#[derive(Clone)]
pub struct IndicatorEngine {
    pub(crate) counters: Arc<dyn CounterStore>,
    pub(crate) patients: Arc<dyn PatientStore>,
}

impl IndicatorEngine {
    pub fn new(counters: Arc<dyn CounterStore>, patients: Arc<dyn PatientStore>) -> Self {
        Self { counters, patients }
    }

    /// Fold one fact into the patient's record for `family` and commit it in
    /// a single write.
    ///
    /// Either the record is fully updated or nothing is written.
    /// `VersionConflict` means another writer committed first.
    pub async fn record_event(
        &self,
        patient_id: Uuid,
        family: FamilyKind,
        fact: &EventFact,
    ) -> Result<RecordOutcome, EngineError> {
        let patient = self.load_patient(patient_id).await?;
        if !patient.belongs_to(family) {
            warn!(patient_id = %patient_id, family = %family, "family not applicable");
            return Err(EngineError::FamilyNotApplicable { patient_id, family });
        }

        let episode = if family.is_episodic() {
            Some(self.open_episode(patient_id).await?)
        } else {
            None
        };
        let refs = ReferenceDates::for_family(&patient, family, episode.as_ref());
        let key = match &episode {
            Some(episode) => RecordKey::prenatal(patient_id, episode.id),
            None => RecordKey::patient(patient_id, family),
        };

        let now = Timestamp::now();
        let (current, expected_etag) = match self.counters.load_record(key).await? {
            Some(stored) => (stored.record, Some(stored.etag)),
            None => (IndicatorRecord::new(&key, now), None),
        };
        debug!(
            key = %record_keys::indicator_record(&key),
            etag = ?expected_etag,
            "indicator record loaded"
        );

        let rules = get_family(family);
        let indicators = rules
            .apply(&current.indicators, fact, &refs)
            .inspect_err(|e| {
                warn!(patient_id = %patient_id, family = %family, fact_id = %fact.id, error = %e, "fact rejected");
            })?;
        let timeliness = rules.timeliness(&current.indicators, fact, &refs)?;
        log_timeliness(patient_id, &timeliness);

        let created = expected_etag.is_none();
        let record = IndicatorRecord {
            indicators,
            events_applied: current.events_applied + 1,
            updated_at: now,
            ..current
        };
        let etag = self
            .counters
            .save_record(&record, expected_etag.as_deref())
            .await?;

        let action = if created {
            "indicator.created"
        } else {
            "indicator.updated"
        };
        info!(
            patient_id = %patient_id,
            family = %family,
            events_applied = record.events_applied,
            "{action}"
        );
        IndicatorAuditEvent::new(action, &record)
            .with_fact(fact.id)
            .emit();

        Ok(RecordOutcome {
            closure: episode.as_ref().and_then(|e| closure_for(e, fact)),
            record,
            etag,
            created,
            timeliness,
        })
    }

    /// Current record for a patient and family. Never recomputes.
    ///
    /// Prenatal resolves to the open episode's record; closed episodes are
    /// read with `get_episode_record`.
    pub async fn get_indicator_record(
        &self,
        patient_id: Uuid,
        family: FamilyKind,
    ) -> Result<IndicatorRecord, EngineError> {
        let key = if family.is_episodic() {
            let episode = self.open_episode(patient_id).await?;
            RecordKey::prenatal(patient_id, episode.id)
        } else {
            RecordKey::patient(patient_id, family)
        };
        self.read(key).await
    }

    /// Prenatal record of a specific episode, open or closed.
    pub async fn get_episode_record(
        &self,
        patient_id: Uuid,
        episode_id: Uuid,
    ) -> Result<IndicatorRecord, EngineError> {
        self.read(RecordKey::prenatal(patient_id, episode_id)).await
    }

    /// Families the patient's membership flags admit.
    pub async fn applicable_families(&self, patient_id: Uuid) -> Result<Vec<FamilyKind>, EngineError> {
        let patient = self.load_patient(patient_id).await?;
        Ok(patient.memberships.families())
    }

    async fn read(&self, key: RecordKey) -> Result<IndicatorRecord, EngineError> {
        self.counters
            .load_record(key)
            .await?
            .map(|stored| stored.record)
            .ok_or_else(|| EngineError::RecordNotFound {
                key: record_keys::indicator_record(&key),
            })
    }

    async fn load_patient(&self, patient_id: Uuid) -> Result<Patient, EngineError> {
        self.patients
            .get_patient(patient_id)
            .await?
            .ok_or(EngineError::PatientNotFound(patient_id))
    }

    async fn open_episode(&self, patient_id: Uuid) -> Result<PregnancyEpisode, EngineError> {
        self.patients
            .get_open_pregnancy_episode(patient_id)
            .await?
            .ok_or(EngineError::EpisodeNotFound(patient_id))
    }
}

fn closure_for(episode: &PregnancyEpisode, fact: &EventFact) -> Option<EpisodeClosure> {
    match &fact.payload {
        EventPayload::PostpartumConsultation(postpartum) => Some(EpisodeClosure {
            episode_id: episode.id,
            delivered_on: postpartum.delivered_on,
            delivery_type: postpartum.delivery_type,
        }),
        _ => None,
    }
}

fn log_timeliness(patient_id: Uuid, checks: &[TimelinessCheck]) {
    for check in checks {
        if check.within_deadline {
            info!(
                patient_id = %patient_id,
                check = %check.check,
                elapsed = check.elapsed,
                deadline = check.deadline,
                unit = ?check.unit,
                "deadline met"
            );
        } else {
            warn!(
                patient_id = %patient_id,
                check = %check.check,
                elapsed = check.elapsed,
                deadline = check.deadline,
                unit = ?check.unit,
                "deadline missed"
            );
        }
    }
}
