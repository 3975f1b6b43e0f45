//! HttpContactDirectory -- [`ContactDirectory`] backed by the supporter
//! CRM's REST API.
//!
//! Fetches audience members from `{base_url}/contact-lists/{id}/contacts`.
//! The directory is read-only; membership is managed elsewhere in the CRM.

use std::time::Duration;

use outreach_core::dispatch::directory::ContactDirectory;
use outreach_types::compose::AudienceId;
use outreach_types::contact::Contact;
use outreach_types::error::DirectoryError;

/// Contact directory over HTTP.
#[derive(Debug, Clone)]
pub struct HttpContactDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpContactDirectory {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl ContactDirectory for HttpContactDirectory {
    async fn list_contacts(
        &self,
        audience_id: &AudienceId,
    ) -> Result<Vec<Contact>, DirectoryError> {
        let url = self.url(&format!("/contact-lists/{audience_id}/contacts"));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DirectoryError::Unavailable(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DirectoryError::AudienceNotFound(audience_id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Unavailable(format!("HTTP {status}: {body}")));
        }

        // The CRM returns a JSON array of contacts in list order; that
        // order fixes batch-result ordering downstream.
        response
            .json::<Vec<Contact>>()
            .await
            .map_err(|e| DirectoryError::Unavailable(format!("failed to parse contacts: {e}")))
    }
}
