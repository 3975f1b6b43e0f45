//! HttpDeliveryTransport -- [`DeliveryTransport`] backed by the mail
//! provider's REST API.
//!
//! Readiness is checked against `{base_url}/profile` (a cheap
//! authenticated endpoint) once per batch; individual messages are
//! submitted to `{base_url}/messages`.
//!
//! The bearer token is wrapped in [`secrecy::SecretString`] and is never
//! logged or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use outreach_core::dispatch::transport::DeliveryTransport;
use outreach_types::error::TransportError;

/// Request body for message submission.
#[derive(Debug, Clone, Serialize)]
struct SubmitMessage<'a> {
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Mail delivery transport over HTTP.
pub struct HttpDeliveryTransport {
    client: reqwest::Client,
    base_url: String,
    token: SecretString,
}

impl HttpDeliveryTransport {
    pub fn new(base_url: String, token: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url,
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

// HttpDeliveryTransport intentionally does NOT derive Debug to prevent
// accidental exposure of internal state.

impl DeliveryTransport for HttpDeliveryTransport {
    async fn ensure_authorized(&self) -> Result<(), TransportError> {
        let url = self.url("/profile");

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(|e| TransportError::Network(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(TransportError::Unauthorized(
                "mail provider rejected credentials".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Network(format!("HTTP {status}: {body}")));
        }
        Ok(())
    }

    async fn deliver(
        &self,
        recipient_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), TransportError> {
        let url = self.url("/messages");
        let payload = SubmitMessage {
            to: recipient_email,
            subject,
            body,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.token.expose_secret())
            .header("content-type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| TransportError::Network(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(TransportError::Unauthorized(
                "mail provider rejected credentials".to_string(),
            ));
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(TransportError::Rejected(format!("HTTP {status}: {error_body}")));
        }
        Ok(())
    }
}
