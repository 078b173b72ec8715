//! semaforo-engine
//!
//! Orchestrates one event at a time: reads the patient and the current
//! indicator record, runs the family rule set and commits the result in a
//! single versioned write. `EventIntake` sits in front of it and owns retries.

pub mod audit;
pub mod engine;
pub mod error;
pub mod intake;

pub use engine::{IndicatorEngine, RecordOutcome};
pub use error::EngineError;
pub use intake::{EventIntake, RetryPolicy};
