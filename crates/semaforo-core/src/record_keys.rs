//! Storage key conventions.
//!
//! Pure string functions with no storage dependency. These define the canonical
//! layout of objects in the indicator bucket.

use uuid::Uuid;

use crate::models::family::FamilyKind;
use crate::models::record::RecordKey;

pub fn patient(id: Uuid) -> String {
    format!("patients/{id}.json")
}

pub fn episode(patient_id: Uuid, episode_id: Uuid) -> String {
    format!("episodes/{patient_id}/{episode_id}.json")
}

pub fn episodes_prefix(patient_id: Uuid) -> String {
    format!("episodes/{patient_id}/")
}

/// Prenatal records are keyed by pregnancy episode, every other family by patient.
pub fn indicator_record(key: &RecordKey) -> String {
    match (key.family, key.episode_id) {
        (FamilyKind::Prenatal, Some(episode_id)) => {
            format!("indicators/{}/prenatal/{episode_id}.json", key.patient_id)
        }
        (family, _) => format!("indicators/{}/{family}.json", key.patient_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prenatal_records_are_keyed_by_episode() {
        let patient_id = Uuid::new_v4();
        let episode_id = Uuid::new_v4();
        let key = RecordKey::prenatal(patient_id, episode_id);
        assert_eq!(
            indicator_record(&key),
            format!("indicators/{patient_id}/prenatal/{episode_id}.json")
        );
    }

    #[test]
    fn other_families_are_keyed_by_patient() {
        let patient_id = Uuid::new_v4();
        let key = RecordKey::patient(patient_id, FamilyKind::WomanHealth);
        assert_eq!(
            indicator_record(&key),
            format!("indicators/{patient_id}/woman_health.json")
        );
    }
}
