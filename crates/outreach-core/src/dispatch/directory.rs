//! ContactDirectory trait definition.

use outreach_types::compose::AudienceId;
use outreach_types::contact::Contact;
use outreach_types::error::DirectoryError;

/// Port for the contact/list store collaborator.
///
/// Implementations live in outreach-infra (e.g., `HttpContactDirectory`).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait
/// macro). The directory is read-only from the core's perspective.
pub trait ContactDirectory: Send + Sync {
    /// Resolve an audience to its member contacts, in the directory's
    /// enumeration order. That order fixes the ordering of the batch
    /// result's failures.
    fn list_contacts(
        &self,
        audience_id: &AudienceId,
    ) -> impl std::future::Future<Output = Result<Vec<Contact>, DirectoryError>> + Send;
}
