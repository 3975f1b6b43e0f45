//! DeliveryTransport trait definition.

use outreach_types::error::TransportError;

/// Port for the mail delivery collaborator.
///
/// Implementations live in outreach-infra (e.g., `HttpDeliveryTransport`).
/// Authentication state belongs entirely to the implementation; the core
/// only checks readiness before a batch.
pub trait DeliveryTransport: Send + Sync {
    /// Verify the transport is ready to send (credentials present and
    /// accepted). Runs once per batch, before any delivery is attempted.
    fn ensure_authorized(
        &self,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;

    /// Submit one personalized message. A failure here is per-recipient;
    /// it never aborts the batch.
    fn deliver(
        &self,
        recipient_email: &str,
        subject: &str,
        body: &str,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;
}
