//! Draft generator: AI-assisted template drafting.
//!
//! `DraftGenerator` makes exactly one provider call per invocation and
//! normalizes the structured reply into a [`GeneratedDraft`]. Retry policy,
//! if any, belongs to the caller; so do the timeout budget and the
//! cancellation token.

pub mod parse;
pub mod prompt;

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use outreach_types::draft::{DraftContext, GeneratedDraft};
use outreach_types::error::GenerationError;
use outreach_types::llm::{CompletionRequest, Message, MessageRole};

use crate::llm::box_provider::BoxLlmProvider;

use self::parse::parse_reply;
use self::prompt::{DRAFT_SYSTEM_PROMPT, build_draft_prompt};

/// Output budget for one generation call.
const MAX_DRAFT_TOKENS: u32 = 2048;

/// Sampling temperature for template drafting.
const DRAFT_TEMPERATURE: f64 = 0.7;

/// AI draft generator over a type-erased provider.
pub struct DraftGenerator {
    provider: BoxLlmProvider,
    model: String,
}

impl DraftGenerator {
    /// Create a generator bound to a provider and model.
    pub fn new(provider: BoxLlmProvider, model: String) -> Self {
        Self { provider, model }
    }

    /// Generate a draft candidate from the current draft content.
    ///
    /// Makes one outbound provider call bounded by `timeout`; expiry maps
    /// to [`GenerationError::Unavailable`] ("didn't answer"), while a reply
    /// that cannot be parsed or validated maps to
    /// [`GenerationError::Failed`] ("answered badly"). The token aborts the
    /// call without waiting for the provider.
    pub async fn generate(
        &self,
        context: &DraftContext,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<GeneratedDraft, GenerationError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: MessageRole::User,
                content: build_draft_prompt(context),
            }],
            system: Some(DRAFT_SYSTEM_PROMPT.to_string()),
            max_tokens: MAX_DRAFT_TOKENS,
            temperature: Some(DRAFT_TEMPERATURE),
            json_output: true,
        };

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(GenerationError::Cancelled),
            outcome = tokio::time::timeout(timeout, self.provider.complete(&request)) => {
                match outcome {
                    Err(_elapsed) => {
                        return Err(GenerationError::Unavailable(format!(
                            "provider '{}' did not answer within {}ms",
                            self.provider.name(),
                            timeout.as_millis()
                        )));
                    }
                    Ok(result) => result?,
                }
            }
        };

        tracing::debug!(
            provider = self.provider.name(),
            model = %self.model,
            output_tokens = response.usage.output_tokens,
            "draft generation reply received"
        );

        parse_reply(&response.content, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use outreach_types::llm::{
        CompletionResponse, LlmError, ProviderCapabilities, StopReason, Usage,
    };

    use crate::llm::provider::LlmProvider;

    /// A minimal mock provider that returns a static reply, optionally
    /// after a delay.
    struct MockProvider {
        reply: Result<String, LlmError>,
        delay: Duration,
    }

    impl MockProvider {
        fn with_reply(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                delay: Duration::ZERO,
            }
        }

        fn with_error(err: LlmError) -> Self {
            Self {
                reply: Err(err),
                delay: Duration::ZERO,
            }
        }

        fn with_delay(reply: &str, delay: Duration) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                delay,
            }
        }
    }

    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        fn capabilities(&self) -> &ProviderCapabilities {
            &ProviderCapabilities {
                json_output: true,
                max_context_tokens: 128_000,
                max_output_tokens: 4096,
            }
        }

        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match &self.reply {
                Ok(content) => Ok(CompletionResponse {
                    id: "cmpl_mock_1".to_string(),
                    content: content.clone(),
                    model: "mock-model".to_string(),
                    stop_reason: StopReason::EndTurn,
                    usage: Usage {
                        input_tokens: 100,
                        output_tokens: 50,
                    },
                }),
                Err(err) => Err(match err {
                    LlmError::AuthenticationFailed => LlmError::AuthenticationFailed,
                    LlmError::Provider { message } => LlmError::Provider {
                        message: message.clone(),
                    },
                    LlmError::Deserialization(msg) => LlmError::Deserialization(msg.clone()),
                    LlmError::RateLimited { retry_after_ms } => LlmError::RateLimited {
                        retry_after_ms: *retry_after_ms,
                    },
                    LlmError::Overloaded(msg) => LlmError::Overloaded(msg.clone()),
                    LlmError::InvalidRequest(msg) => LlmError::InvalidRequest(msg.clone()),
                }),
            }
        }
    }

    fn generator(provider: MockProvider) -> DraftGenerator {
        DraftGenerator::new(BoxLlmProvider::new(provider), "mock-model".to_string())
    }

    fn never_cancelled() -> CancellationToken {
        CancellationToken::new()
    }

    #[tokio::test]
    async fn test_generate_returns_normalized_draft() {
        let g = generator(MockProvider::with_reply(
            r#"{"content":"Hi {{firstName}},\n\nJoel","suggestedVariables":["firstName"]}"#,
        ));
        let draft = g
            .generate(
                &DraftContext::default(),
                Duration::from_secs(5),
                &never_cancelled(),
            )
            .await
            .unwrap();
        assert!(draft.body.contains("{{firstName}}"));
        assert_eq!(draft.subject, "Reaching out");
    }

    #[tokio::test]
    async fn test_generate_keeps_context_subject() {
        let g = generator(MockProvider::with_reply(r#"{"content":"Hi {{goesBy}}"}"#));
        let context = DraftContext {
            current_title: String::new(),
            current_subject: "Quarterly hello".to_string(),
            current_body: String::new(),
        };
        let draft = g
            .generate(&context, Duration::from_secs(5), &never_cancelled())
            .await
            .unwrap();
        assert_eq!(draft.subject, "Quarterly hello");
    }

    #[tokio::test]
    async fn test_prose_wrapped_reply_is_salvaged() {
        let g = generator(MockProvider::with_reply(
            "Of course! {\"content\": \"Hi {{firstName}}!\"} Enjoy!",
        ));
        let draft = g
            .generate(
                &DraftContext::default(),
                Duration::from_secs(5),
                &never_cancelled(),
            )
            .await
            .unwrap();
        assert_eq!(draft.body, "Hi {{firstName}}!");
    }

    #[tokio::test]
    async fn test_missing_content_is_generation_failed() {
        let g = generator(MockProvider::with_reply(r#"{"subject": "Hello"}"#));
        let err = g
            .generate(
                &DraftContext::default(),
                Duration::from_secs(5),
                &never_cancelled(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Failed(_)));
    }

    #[tokio::test]
    async fn test_provider_auth_error_is_unavailable() {
        let g = generator(MockProvider::with_error(LlmError::AuthenticationFailed));
        let err = g
            .generate(
                &DraftContext::default(),
                Duration::from_secs(5),
                &never_cancelled(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Unavailable(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_unavailable_not_failed() {
        let g = generator(MockProvider::with_delay(
            r#"{"content": "too late"}"#,
            Duration::from_secs(60),
        ));
        let err = g
            .generate(
                &DraftContext::default(),
                Duration::from_millis(100),
                &never_cancelled(),
            )
            .await
            .unwrap_err();
        match err {
            GenerationError::Unavailable(msg) => assert!(msg.contains("did not answer")),
            other => panic!("expected Unavailable, got: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_aborts_the_call() {
        let g = generator(MockProvider::with_delay(
            r#"{"content": "never delivered"}"#,
            Duration::from_secs(60),
        ));
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = g
            .generate(&DraftContext::default(), Duration::from_secs(120), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Cancelled));
    }
}
