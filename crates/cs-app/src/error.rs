//! Error types for front ends built on cs-app.

/// Application error type that wraps errors from the backend crates for the
/// command-line front end.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Simulation error: {0}")]
    Simulation(#[from] cs_core::SimError),

    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Unknown cell preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cs-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<cs_scenario::ScenarioError> for AppError {
    fn from(err: cs_scenario::ScenarioError) -> Self {
        AppError::Scenario(err.to_string())
    }
}

impl From<cs_results::ResultsError> for AppError {
    fn from(err: cs_results::ResultsError) -> Self {
        match err {
            cs_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}
