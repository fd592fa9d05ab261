//! Review Pipeline Errors
//!
//! The two collaborator failures display a fixed user-facing message; the
//! underlying cause is kept as the error source for diagnostics only.

use contract_risk_core::CollaboratorError;
use thiserror::Error;

use super::state::ReviewStatus;

/// Message shown when party identification fails.
pub const IDENTIFICATION_FAILED_MESSAGE: &str =
    "Failed to read document parties. Please try a clearer document.";

/// Message shown when clause analysis fails.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Analysis failed. The AI could not process this document.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("{}", IDENTIFICATION_FAILED_MESSAGE)]
    Identification(#[source] CollaboratorError),

    #[error("{}", ANALYSIS_FAILED_MESSAGE)]
    Analysis(#[source] CollaboratorError),

    /// The requested action is not an edge out of the current state.
    #[error("Cannot {action} while {from}")]
    InvalidTransition {
        from: ReviewStatus,
        action: &'static str,
    },

    #[error("Invalid party selection: {0}")]
    InvalidSelection(String),

    /// A reset or a newer submission replaced the run this call belonged to.
    #[error("Review was reset before the response arrived")]
    Superseded,
}

impl PipelineError {
    pub fn invalid_selection(msg: impl Into<String>) -> Self {
        Self::InvalidSelection(msg.into())
    }

    /// The collaborator failure behind this error, if any.
    pub fn cause(&self) -> Option<&CollaboratorError> {
        match self {
            PipelineError::Identification(cause) | PipelineError::Analysis(cause) => Some(cause),
            _ => None,
        }
    }
}
