//! Integration test support
//!
//! Runs the reaction services end to end against in-memory ports, and
//! against PostgreSQL when `DATABASE_URL` is set.

pub mod fixtures;

pub use fixtures::Board;
pub use helpers::{check_test_env, error_code, PgBoard};
pub use memory::{EventRecorder, MemoryCatalogCache, MemoryStore, RecordingPublisher};
