//! semaforo-storage
//!
//! Counter store and patient store contracts, with an in-memory backend and
//! an S3 backend that serialises writers per record through ETag preconditions.

pub mod client;
pub mod error;
pub mod memory;
pub mod objects;
pub mod s3;
pub mod state;
pub mod store;
