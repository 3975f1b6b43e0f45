use serde::{Deserialize, Serialize};

/// Application configuration, loaded from `outreach.toml`.
///
/// Secrets are never stored in the file; each section names the
/// environment variable holding its credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Draft generator call budget in milliseconds; on expiry the call
    /// reports `GenerationUnavailable`, not `GenerationFailed`.
    #[serde(default = "default_generation_timeout_ms")]
    pub generation_timeout_ms: u64,

    #[serde(default)]
    pub provider: ProviderSettings,

    #[serde(default)]
    pub contacts: ContactsSettings,

    #[serde(default)]
    pub delivery: DeliverySettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generation_timeout_ms: default_generation_timeout_ms(),
            provider: ProviderSettings::default(),
            contacts: ContactsSettings::default(),
            delivery: DeliverySettings::default(),
        }
    }
}

/// Settings for the OpenAI-compatible text-generation provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: default_provider_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

/// Settings for the contact-directory collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactsSettings {
    #[serde(default = "default_contacts_base_url")]
    pub base_url: String,
}

impl Default for ContactsSettings {
    fn default() -> Self {
        Self {
            base_url: default_contacts_base_url(),
        }
    }
}

/// Settings for the mail delivery transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliverySettings {
    #[serde(default = "default_delivery_base_url")]
    pub base_url: String,
    /// Environment variable holding the bearer token.
    #[serde(default = "default_delivery_token_env")]
    pub token_env: String,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            base_url: default_delivery_base_url(),
            token_env: default_delivery_token_env(),
        }
    }
}

fn default_generation_timeout_ms() -> u64 {
    30_000
}

fn default_provider_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_api_key_env() -> String {
    "OUTREACH_LLM_API_KEY".to_string()
}

fn default_contacts_base_url() -> String {
    "http://localhost:5080/api".to_string()
}

fn default_delivery_base_url() -> String {
    "http://localhost:5090/api".to_string()
}

fn default_delivery_token_env() -> String {
    "OUTREACH_MAIL_TOKEN".to_string()
}
