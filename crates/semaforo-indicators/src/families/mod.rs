pub mod childcare;
pub mod diabetes;
pub mod elderly;
pub mod hypertension;
pub mod prenatal;
pub mod woman_health;

use semaforo_core::models::family::FamilyKind;
use semaforo_core::models::record::FamilyRecord;

use crate::error::RuleError;

pub(crate) fn wrong_record(expected: FamilyKind, record: &FamilyRecord) -> RuleError {
    RuleError::WrongRecord {
        expected,
        actual: record.family(),
    }
}
