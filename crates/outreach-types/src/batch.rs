use serde::{Deserialize, Serialize};

/// One recipient whose submission did not succeed, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendFailure {
    pub recipient_email: String,
    pub reason: String,
}

/// Batch-level outcome of one dispatch call.
///
/// Immutable after construction. `failures` preserves the order recipients
/// were resolved from the audience. Invariant:
/// `total_sent + failures.len() == total_requested`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendBatchResult {
    pub total_requested: usize,
    pub total_sent: usize,
    pub failures: Vec<SendFailure>,
}

impl SendBatchResult {
    /// Build a result, deriving `total_sent` from the failure count.
    ///
    /// More failures than requested recipients is a caller bug; debug
    /// builds assert on it, release builds clamp `total_sent` to zero so
    /// the constructor never panics on its own.
    pub fn new(total_requested: usize, failures: Vec<SendFailure>) -> Self {
        debug_assert!(
            failures.len() <= total_requested,
            "more failures ({}) than requested recipients ({total_requested})",
            failures.len()
        );
        Self {
            total_requested,
            total_sent: total_requested.saturating_sub(failures.len()),
            failures,
        }
    }

    /// Whether every recipient in the batch was accounted for.
    pub fn is_consistent(&self) -> bool {
        self.total_sent + self.failures.len() == self.total_requested
    }

    /// Whether every submission in the batch succeeded.
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty() && self.total_sent == self.total_requested
    }
}
