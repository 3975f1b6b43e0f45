//! OpenAiCompatProvider -- concrete [`LlmProvider`] implementation for
//! OpenAI-compatible Chat Completions endpoints.
//!
//! Sends non-streaming requests to `{base_url}/chat/completions` with
//! bearer authentication. Works against api.openai.com and any
//! self-hosted endpoint speaking the same dialect.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

pub mod types;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use outreach_core::llm::provider::LlmProvider;
use outreach_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StopReason, Usage,
};

use self::types::{ChatErrorEnvelope, ChatMessage, ChatRequest, ChatResponse, ResponseFormat};

/// OpenAI-compatible LLM provider.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing the `Authorization` header. It never appears in Debug
/// output, Display output, or tracing logs.
pub struct OpenAiCompatProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    capabilities: ProviderCapabilities,
}

impl OpenAiCompatProvider {
    /// Create a new provider against the given base URL (e.g.
    /// `https://api.openai.com/v1`).
    pub fn new(api_key: SecretString, base_url: String, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_default();

        let capabilities = Self::capabilities_for_model(&model);

        Self {
            client,
            api_key,
            base_url,
            model,
            capabilities,
        }
    }

    /// The default model for this provider.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Determine capabilities based on model name.
    fn capabilities_for_model(model: &str) -> ProviderCapabilities {
        if model.starts_with("gpt-4o") {
            ProviderCapabilities {
                json_output: true,
                max_context_tokens: 128_000,
                max_output_tokens: 16_384,
            }
        } else {
            // Conservative defaults for unknown models; JSON mode is part
            // of the dialect, so it stays on.
            ProviderCapabilities {
                json_output: true,
                max_context_tokens: 32_000,
                max_output_tokens: 4_096,
            }
        }
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a generic [`CompletionRequest`] into a [`ChatRequest`].
    ///
    /// The generic `system` field becomes a leading system-role message;
    /// `json_output` becomes `response_format: {"type": "json_object"}`.
    fn to_chat_request(&self, request: &CompletionRequest) -> ChatRequest {
        let mut messages: Vec<ChatMessage> = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.extend(request.messages.iter().map(|m| ChatMessage {
            role: m.role.to_string(),
            content: m.content.clone(),
        }));

        ChatRequest {
            model: request.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: request.json_output.then(ResponseFormat::json_object),
        }
    }

    /// Map a non-success HTTP status and body to an [`LlmError`].
    fn error_for_status(status: reqwest::StatusCode, body: String) -> LlmError {
        // Prefer the endpoint's own error message when the body parses.
        let message = serde_json::from_str::<ChatErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        match status.as_u16() {
            401 | 403 => LlmError::AuthenticationFailed,
            429 => LlmError::RateLimited {
                retry_after_ms: None,
            },
            400 | 422 => LlmError::InvalidRequest(message),
            503 => LlmError::Overloaded(message),
            _ => LlmError::Provider {
                message: format!("HTTP {status}: {message}"),
            },
        }
    }
}

// OpenAiCompatProvider intentionally does NOT derive Debug to prevent
// accidental exposure of internal state.

impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai_compat"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_chat_request(request);
        let url = self.url("/chat/completions");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::error_for_status(status, error_body));
        }

        let chat_resp: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let choice = chat_resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Deserialization("response contained no choices".to_string()))?;

        let stop_reason = match choice.finish_reason.as_deref() {
            Some("length") => StopReason::MaxTokens,
            Some("content_filter") => StopReason::StopSequence,
            _ => StopReason::EndTurn,
        };

        Ok(CompletionResponse {
            id: chat_resp.id,
            content: choice.message.content,
            model: chat_resp.model,
            stop_reason,
            usage: Usage {
                input_tokens: chat_resp.usage.prompt_tokens,
                output_tokens: chat_resp.usage.completion_tokens,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use outreach_types::llm::{Message, MessageRole};

    fn make_provider() -> OpenAiCompatProvider {
        OpenAiCompatProvider::new(
            SecretString::from("test-key-not-real"),
            "https://api.openai.com/v1".to_string(),
            "gpt-4o".to_string(),
        )
    }

    fn request(json_output: bool) -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o".to_string(),
            messages: vec![Message {
                role: MessageRole::User,
                content: "Hello".to_string(),
            }],
            system: Some("Be helpful".to_string()),
            max_tokens: 1024,
            temperature: Some(0.7),
            json_output,
        }
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(make_provider().name(), "openai_compat");
    }

    #[test]
    fn test_gpt_4o_capabilities() {
        let caps = make_provider().capabilities().clone();
        assert!(caps.json_output);
        assert_eq!(caps.max_context_tokens, 128_000);
        assert_eq!(caps.max_output_tokens, 16_384);
    }

    #[test]
    fn test_unknown_model_capabilities() {
        let provider = OpenAiCompatProvider::new(
            SecretString::from("test-key"),
            "http://localhost:11434/v1".to_string(),
            "llama3".to_string(),
        );
        let caps = provider.capabilities();
        assert_eq!(caps.max_output_tokens, 4_096);
        assert!(caps.json_output);
    }

    #[test]
    fn test_system_becomes_leading_message() {
        let chat_req = make_provider().to_chat_request(&request(false));
        assert_eq!(chat_req.messages.len(), 2);
        assert_eq!(chat_req.messages[0].role, "system");
        assert_eq!(chat_req.messages[0].content, "Be helpful");
        assert_eq!(chat_req.messages[1].role, "user");
        assert!(chat_req.response_format.is_none());
    }

    #[test]
    fn test_json_output_sets_response_format() {
        let chat_req = make_provider().to_chat_request(&request(true));
        let format = chat_req.response_format.expect("response_format set");
        assert_eq!(format.format_type, "json_object");
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let provider = OpenAiCompatProvider::new(
            SecretString::from("test-key"),
            "http://localhost:8080/v1".to_string(),
            "gpt-4o".to_string(),
        );
        assert_eq!(
            provider.url("/chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_error_for_status_mapping() {
        let err = OpenAiCompatProvider::error_for_status(
            reqwest::StatusCode::UNAUTHORIZED,
            String::new(),
        );
        assert!(matches!(err, LlmError::AuthenticationFailed));

        let err = OpenAiCompatProvider::error_for_status(
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            String::new(),
        );
        assert!(matches!(err, LlmError::RateLimited { .. }));

        let err = OpenAiCompatProvider::error_for_status(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"error": {"message": "bad prompt", "type": "invalid_request_error"}}"#.to_string(),
        );
        match err {
            LlmError::InvalidRequest(msg) => assert_eq!(msg, "bad prompt"),
            other => panic!("expected InvalidRequest, got: {other:?}"),
        }

        let err = OpenAiCompatProvider::error_for_status(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            "boom".to_string(),
        );
        match err {
            LlmError::Provider { message } => assert!(message.contains("boom")),
            other => panic!("expected Provider, got: {other:?}"),
        }
    }
}
