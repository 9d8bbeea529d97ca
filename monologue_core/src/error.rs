//! Error taxonomy for the monologue engine.
//!
//! No error here is fatal to a host process: a missing seed degrades to the
//! placeholder text, blank submissions degrade to a plain refresh, and a
//! persistence failure leaves the engine operating on its in-memory state
//! while the caller decides whether to retry.

use thiserror::Error;

/// Failures from the persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read persisted state: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write persisted state: {0}")]
    Write(#[source] std::io::Error),

    #[error("persisted state is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Failures surfaced by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The in-memory mutation succeeded but could not be persisted. The
    /// engine keeps the mutation and stays dirty until a save goes through.
    #[error("persistence unavailable: {0}")]
    Persistence(#[from] StoreError),
}
