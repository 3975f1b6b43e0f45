use thiserror::Error;

use crate::compose::ComposeStep;
use crate::llm::LlmError;

/// Errors from draft generation.
///
/// `Unavailable` means the collaborator never answered usefully
/// (unreachable, unauthenticated, timed out) and a retry is reasonable.
/// `Failed` means it answered badly (unparseable reply, missing fields);
/// the caller may retry or edit the draft manually.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("draft generation unavailable: {0}")]
    Unavailable(String),

    #[error("draft generation failed: {0}")]
    Failed(String),

    #[error("draft generation cancelled")]
    Cancelled,
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Deserialization(msg) => GenerationError::Failed(msg),
            LlmError::InvalidRequest(msg) => GenerationError::Failed(msg),
            other => GenerationError::Unavailable(other.to_string()),
        }
    }
}

/// Setup-level errors that abort a dispatch call before any delivery is
/// attempted. Per-recipient delivery failures are never raised; they are
/// recorded in the batch result.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("audience '{0}' not found")]
    AudienceNotFound(String),

    #[error("delivery transport not authorized: {0}")]
    Unauthorized(String),

    #[error("contact directory error: {0}")]
    Directory(String),
}

/// Errors from the contact-directory collaborator.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("audience '{0}' not found")]
    AudienceNotFound(String),

    #[error("contact directory unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the delivery transport collaborator.
///
/// `Unauthorized` during the readiness check is a setup failure; `Rejected`
/// and `Network` during delivery become per-recipient failure reasons.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("delivery rejected: {0}")]
    Rejected(String),

    #[error("network error: {0}")]
    Network(String),
}

/// Errors from misusing the compose workflow.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("operation '{operation}' is not valid in step '{step}'")]
    InvalidTransition {
        step: ComposeStep,
        operation: &'static str,
    },

    #[error("cannot go back from the first step")]
    AtFirstStep,

    #[error("no audience selected")]
    NoAudienceSelected,
}
