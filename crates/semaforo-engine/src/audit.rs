use semaforo_core::models::family::FamilyKind;
use semaforo_core::models::record::IndicatorRecord;
use semaforo_core::models::status::Status;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// A structured audit event for committed indicator changes.
///
/// Logged via `tracing` under the `audit.*` field namespace.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorAuditEvent {
    pub action: String,
    pub family: FamilyKind,
    pub patient_id: Uuid,
    pub episode_id: Option<Uuid>,
    pub fact_id: Option<Uuid>,
    pub statuses: Vec<(&'static str, Status)>,
}

impl IndicatorAuditEvent {
    pub fn new(action: impl Into<String>, record: &IndicatorRecord) -> Self {
        Self {
            action: action.into(),
            family: record.family(),
            patient_id: record.patient_id,
            episode_id: record.episode_id,
            fact_id: None,
            statuses: record.indicators.statuses(),
        }
    }

    pub fn with_fact(mut self, fact_id: Uuid) -> Self {
        self.fact_id = Some(fact_id);
        self
    }

    /// Compact status line, e.g. `B1=GREEN B2=YELLOW`.
    pub fn summary(&self) -> String {
        self.statuses
            .iter()
            .map(|(code, status)| format!("{code}={status}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Emit this audit event via tracing.
    pub fn emit(&self) {
        info!(
            audit.action = %self.action,
            audit.family = %self.family,
            audit.patient_id = %self.patient_id,
            audit.episode_id = ?self.episode_id,
            audit.fact_id = ?self.fact_id,
            audit.statuses = %self.summary(),
            "audit event"
        );
    }
}

#[cfg(test)]
mod tests {
    use semaforo_core::models::record::RecordKey;

    use super::*;

    #[test]
    fn summary_lists_every_code_in_order() {
        let key = RecordKey::patient(Uuid::new_v4(), FamilyKind::Hypertension);
        let record = IndicatorRecord::new(&key, jiff::Timestamp::UNIX_EPOCH);
        let event = IndicatorAuditEvent::new("indicator.created", &record);
        assert_eq!(event.summary(), "H1=RED H2=RED H3=RED H4=RED");
        assert_eq!(event.episode_id, None);
    }
}
