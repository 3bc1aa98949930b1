use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

/// Errors surfaced by scenario setup, models, solvers and result stores.
///
/// Every variant is fatal to the call that produced it. Nothing in the
/// engine retries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Invalid or missing scenario fields, unregistered model/solver.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Mutation against a run id the store never opened.
    #[error("Unknown run: {run_id}")]
    UnknownRun { run_id: String },

    /// Malformed external input (e.g. an unparseable numeric field).
    #[error("Format error: {message}")]
    Format { message: String },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

impl SimError {
    pub fn configuration(message: impl Into<String>) -> Self {
        SimError::Configuration {
            message: message.into(),
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        SimError::Format {
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        SimError::Backend {
            message: message.into(),
        }
    }

    /// True for every configuration-class failure, including appends to an
    /// unknown run.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SimError::Configuration { .. } | SimError::UnknownRun { .. }
        )
    }

    pub fn is_format(&self) -> bool {
        matches!(self, SimError::Format { .. })
    }
}
