//! Scenario replay: seed patients and episodes, push events through intake
//! in file order, report the resulting records.

use std::collections::HashMap;
use std::path::Path;

use jiff::civil::DateTime;
use semaforo_core::models::fact::{EventFact, EventPayload};
use semaforo_core::models::family::FamilyKind;
use semaforo_core::models::patient::{Patient, PregnancyEpisode};
use semaforo_core::models::record::{IndicatorRecord, RecordKey};
use semaforo_engine::EventIntake;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub patients: Vec<Patient>,
    #[serde(default)]
    pub episodes: Vec<PregnancyEpisode>,
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioEvent {
    pub patient_id: Uuid,
    pub family: FamilyKind,
    /// Fact id. Generated when absent.
    #[serde(default)]
    pub id: Option<Uuid>,
    pub occurred_at: DateTime,
    pub payload: EventPayload,
}

impl ScenarioEvent {
    pub fn to_fact(&self) -> EventFact {
        EventFact {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            occurred_at: self.occurred_at,
            payload: self.payload.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Rejection {
    /// Position of the event in the scenario file.
    pub index: usize,
    pub patient_id: Uuid,
    pub family: FamilyKind,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    pub applied: usize,
    pub records: Vec<IndicatorRecord>,
    pub rejected: Vec<Rejection>,
}

pub fn load_scenario(path: &Path) -> eyre::Result<Scenario> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read scenario at {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Submit every event in order. A rejected event is reported and skipped;
/// replay carries on with the next one.
pub async fn replay(intake: &EventIntake, events: &[ScenarioEvent]) -> ReplayReport {
    let mut order: Vec<RecordKey> = Vec::new();
    let mut latest: HashMap<RecordKey, IndicatorRecord> = HashMap::new();
    let mut report = ReplayReport::default();

    for (index, event) in events.iter().enumerate() {
        let fact = event.to_fact();
        match intake.submit(event.patient_id, event.family, &fact).await {
            Ok(outcome) => {
                report.applied += 1;
                let key = outcome.record.key();
                if !latest.contains_key(&key) {
                    order.push(key);
                }
                latest.insert(key, outcome.record);
            }
            Err(err) => {
                warn!(index, patient_id = %event.patient_id, family = %event.family, error = %err, "event rejected");
                report.rejected.push(Rejection {
                    index,
                    patient_id: event.patient_id,
                    family: event.family,
                    error: err.to_string(),
                });
            }
        }
    }

    report.records = order
        .into_iter()
        .filter_map(|key| latest.remove(&key))
        .collect();
    info!(
        applied = report.applied,
        rejected = report.rejected.len(),
        records = report.records.len(),
        "scenario replayed"
    );
    report
}
