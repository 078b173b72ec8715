use semaforo_core::models::fact::EventKind;
use semaforo_core::models::family::FamilyKind;
use thiserror::Error;

use crate::window::WindowError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("{family} indicators do not consume {kind:?} events")]
    UnsupportedFact { family: FamilyKind, kind: EventKind },

    #[error("record holds {actual} counters, expected {expected}")]
    WrongRecord {
        expected: FamilyKind,
        actual: FamilyKind,
    },

    #[error("missing reference date: {0}")]
    MissingReferenceDate(&'static str),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error("invalid fact: {0}")]
    InvalidFact(String),
}
