use crate::models::SlotId;
use thiserror::Error;

/// Errors surfaced by the reconciliation workflow.
///
/// Every backend failure is converted into one of these at the boundary of the
/// component that issued the call, and is then stored in that component's
/// state (per-file error, run error, profile error). They are `Clone` so the
/// same value can live in [`crate::models::WorkflowState`] and be returned to
/// the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconError {
    /// Column inference failed for one of the input files
    #[error("Error reading {slot} file columns: {message}")]
    Discovery { slot: SlotId, message: String },

    /// A run was requested while the configuration was not runnable
    #[error("Comparison is not runnable: {0}")]
    Precondition(String),

    /// The backend could not be reached or rejected a profile request
    #[error("Backend request failed: {0}")]
    Transport(String),

    /// Input rejected client-side before any request was made
    #[error("{0}")]
    Validation(String),

    /// The backend accepted the comparison but reported a failure
    #[error("{0}")]
    Run(String),
}

impl ReconError {
    /// Message suitable for an inline error next to the affected area.
    pub fn message(&self) -> String {
        match self {
            ReconError::Discovery { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
