//! Application state wiring all services together.
//!
//! The core engines are generic over collaborator traits; AppState pins
//! them to the concrete HTTP implementations from outreach-infra and holds
//! the in-memory compose session registry.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use outreach_core::compose::session::ComposeSession;
use outreach_core::dispatch::dispatcher::BulkDispatcher;
use outreach_core::generator::DraftGenerator;
use outreach_core::llm::box_provider::BoxLlmProvider;
use outreach_infra::contacts::HttpContactDirectory;
use outreach_infra::delivery::HttpDeliveryTransport;
use outreach_infra::llm::openai_compat::OpenAiCompatProvider;
use outreach_types::config::AppConfig;

/// Concrete dispatcher type pinned to the HTTP collaborators.
pub type ConcreteDispatcher = BulkDispatcher<HttpContactDirectory, HttpDeliveryTransport>;

/// Shared application state holding the engines and session registry.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<DraftGenerator>,
    pub dispatcher: Arc<ConcreteDispatcher>,
    /// Live compose sessions, keyed by session id. Sessions are in-memory
    /// only and do not survive a restart.
    pub sessions: Arc<DashMap<Uuid, ComposeSession>>,
    /// Budget for one draft-generation provider call.
    pub generation_timeout: Duration,
    /// Cancelled on shutdown; aborts in-flight generation and stops
    /// batches between submissions.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Wire the engines from configuration. Secrets come from the
    /// environment variables the config names; they are never read from
    /// the config file itself.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let api_key = std::env::var(&config.provider.api_key_env).map_err(|_| {
            anyhow::anyhow!(
                "provider API key missing: set the {} environment variable",
                config.provider.api_key_env
            )
        })?;
        let mail_token = std::env::var(&config.delivery.token_env).map_err(|_| {
            anyhow::anyhow!(
                "mail token missing: set the {} environment variable",
                config.delivery.token_env
            )
        })?;

        let provider = OpenAiCompatProvider::new(
            SecretString::from(api_key),
            config.provider.base_url.clone(),
            config.provider.model.clone(),
        );
        let generator = DraftGenerator::new(
            BoxLlmProvider::new(provider),
            config.provider.model.clone(),
        );

        let directory = HttpContactDirectory::new(config.contacts.base_url.clone());
        let transport = HttpDeliveryTransport::new(
            config.delivery.base_url.clone(),
            SecretString::from(mail_token),
        );

        Ok(Self {
            generator: Arc::new(generator),
            dispatcher: Arc::new(BulkDispatcher::new(directory, transport)),
            sessions: Arc::new(DashMap::new()),
            generation_timeout: Duration::from_millis(config.generation_timeout_ms),
            shutdown: CancellationToken::new(),
        })
    }
}
