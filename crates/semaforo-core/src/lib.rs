//! semaforo-core
//!
//! Pure domain types and record key conventions.
//! No storage dependency. This is the shared vocabulary of the indicator
//! engine: patients, pregnancy episodes, event facts and indicator records.

pub mod error;
pub mod models;
pub mod record_keys;
