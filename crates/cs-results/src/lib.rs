//! cs-results: run-scoped sample storage.

pub mod disk;
pub mod hash;
pub mod store;
pub mod types;

pub use disk::JsonlResultStore;
pub use hash::scenario_fingerprint;
pub use store::{InMemoryResultStore, ResultStore};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },
}

impl From<ResultsError> for cs_core::SimError {
    fn from(err: ResultsError) -> Self {
        match err {
            ResultsError::RunNotFound { run_id } => cs_core::SimError::UnknownRun { run_id },
            other => cs_core::SimError::backend(other.to_string()),
        }
    }
}

/// Formats the run id for the `n`th run of a store.
pub fn run_id_for(n: u64) -> RunId {
    format!("run_{n}")
}

/// Parses the counter back out of a `run_<n>` id.
pub fn parse_run_number(run_id: &str) -> Option<u64> {
    run_id.strip_prefix("run_")?.parse().ok()
}
