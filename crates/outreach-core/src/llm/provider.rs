//! LlmProvider trait definition.
//!
//! The abstraction a text-generation backend implements. Uses native async
//! fn in traits (RPITIT, Rust 2024 edition); implementations live in
//! outreach-infra (e.g., `OpenAiCompatProvider`).

use outreach_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities};

/// Trait for text-generation provider backends.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// What this provider supports (JSON output, token limits).
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
