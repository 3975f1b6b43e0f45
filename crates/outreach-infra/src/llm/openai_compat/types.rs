//! OpenAI-compatible Chat Completions API types.
//!
//! These are wire structures for HTTP communication with any endpoint
//! speaking the OpenAI `/chat/completions` dialect. They are NOT the
//! generic LLM types from outreach-types -- those are provider-agnostic.

use serde::{Deserialize, Serialize};

/// Request body for the Chat Completions API.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// JSON-mode constraint. When present, the endpoint is required to
    /// reply with a single valid JSON object. Skipped when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

/// A single message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// The `response_format` object for JSON mode.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

/// Response from the Chat Completions API.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub id: String,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: ChatUsage,
}

/// One completion choice; non-streaming requests produce exactly one.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}

/// Token usage from an OpenAI-compatible endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

/// Error envelope from an OpenAI-compatible endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatErrorEnvelope {
    pub error: ChatError,
}

/// An error object from the endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatError {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}
