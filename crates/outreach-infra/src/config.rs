//! Application configuration loader for Outreach.
//!
//! Reads `outreach.toml` from a directory and deserializes it into
//! [`AppConfig`]. Falls back to defaults when the file is missing or
//! malformed, so the service always starts with a usable configuration.

use std::path::Path;

use outreach_types::config::AppConfig;

/// Load application configuration from `{config_dir}/outreach.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(config_dir: &Path) -> AppConfig {
    let config_path = config_dir.join("outreach.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No outreach.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}
