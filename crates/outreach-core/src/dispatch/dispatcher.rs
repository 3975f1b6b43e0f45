//! BulkDispatcher: expand an audience against a draft and submit
//! personalized messages, aggregating per-recipient outcomes.
//!
//! Setup failures (missing audience, unauthorized transport) abort the
//! call before any delivery is attempted. Per-recipient failures are
//! recorded in the batch result and never raised. Submissions are
//! one-by-one in audience order with no retries and no rollback
//! (at-most-once per recipient per call, not all-or-nothing).

use tokio_util::sync::CancellationToken;

use outreach_types::batch::{SendBatchResult, SendFailure};
use outreach_types::compose::AudienceId;
use outreach_types::contact::Recipient;
use outreach_types::draft::MessageDraft;
use outreach_types::error::{DirectoryError, DispatchError, TransportError};

use crate::resolver;

use super::directory::ContactDirectory;
use super::transport::DeliveryTransport;

/// Failure reason recorded for recipients never attempted because the
/// caller cancelled the batch. Keeps the batch invariant
/// `total_sent + failures == total_requested` intact.
const CANCELLED_REASON: &str = "send cancelled before submission";

/// Bulk send engine, generic over the directory and transport ports.
pub struct BulkDispatcher<D: ContactDirectory, T: DeliveryTransport> {
    directory: D,
    transport: T,
}

impl<D: ContactDirectory, T: DeliveryTransport> BulkDispatcher<D, T> {
    pub fn new(directory: D, transport: T) -> Self {
        Self { directory, transport }
    }

    /// Send a draft to every member of an audience.
    ///
    /// Produces exactly one [`SendBatchResult`] per call; `failures`
    /// preserves audience enumeration order. Cancellation stops further
    /// submissions (in-flight deliveries are not rolled back) and records
    /// the remaining recipients as failures.
    pub async fn send(
        &self,
        audience_id: &AudienceId,
        draft: &MessageDraft,
        cancel: &CancellationToken,
    ) -> Result<SendBatchResult, DispatchError> {
        self.transport
            .ensure_authorized()
            .await
            .map_err(|e| match e {
                TransportError::Unauthorized(msg) => DispatchError::Unauthorized(msg),
                other => DispatchError::Unauthorized(other.to_string()),
            })?;

        let contacts = self
            .directory
            .list_contacts(audience_id)
            .await
            .map_err(|e| match e {
                DirectoryError::AudienceNotFound(_) => {
                    DispatchError::AudienceNotFound(audience_id.to_string())
                }
                DirectoryError::Unavailable(msg) => DispatchError::Directory(msg),
            })?;

        let total_requested = contacts.len();
        let mut failures: Vec<SendFailure> = Vec::new();

        tracing::info!(
            audience_id = %audience_id,
            recipients = total_requested,
            "dispatching batch"
        );

        for contact in &contacts {
            if cancel.is_cancelled() {
                failures.push(SendFailure {
                    recipient_email: contact.email.clone(),
                    reason: CANCELLED_REASON.to_string(),
                });
                continue;
            }

            let recipient = match Recipient::project(contact) {
                Ok(recipient) => recipient,
                Err(reason) => {
                    failures.push(SendFailure {
                        recipient_email: contact.email.clone(),
                        reason,
                    });
                    continue;
                }
            };

            // Unresolved placeholders go out as-is; resolution never gates
            // a submission.
            let subject = resolver::resolve(&draft.subject, &recipient.attributes);
            let body = resolver::resolve(&draft.body, &recipient.attributes);

            if let Err(err) = self.transport.deliver(&recipient.email, &subject, &body).await {
                tracing::warn!(
                    recipient = %recipient.email,
                    error = %err,
                    "delivery failed"
                );
                failures.push(SendFailure {
                    recipient_email: recipient.email,
                    reason: err.to_string(),
                });
            }
        }

        let result = SendBatchResult::new(total_requested, failures);
        tracing::info!(
            audience_id = %audience_id,
            total_requested = result.total_requested,
            total_sent = result.total_sent,
            failed = result.failures.len(),
            "batch complete"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use outreach_types::contact::Contact;

    struct StaticDirectory {
        contacts: Result<Vec<Contact>, DirectoryError>,
    }

    impl ContactDirectory for StaticDirectory {
        async fn list_contacts(
            &self,
            _audience_id: &AudienceId,
        ) -> Result<Vec<Contact>, DirectoryError> {
            match &self.contacts {
                Ok(contacts) => Ok(contacts.clone()),
                Err(DirectoryError::AudienceNotFound(id)) => {
                    Err(DirectoryError::AudienceNotFound(id.clone()))
                }
                Err(DirectoryError::Unavailable(msg)) => {
                    Err(DirectoryError::Unavailable(msg.clone()))
                }
            }
        }
    }

    /// Transport that fails for configured recipients and records every
    /// delivered message.
    struct RecordingTransport {
        authorized: bool,
        fail_for: Vec<String>,
        delivered: Mutex<Vec<(String, String, String)>>,
        /// When set, cancels this token after the given number of deliveries.
        cancel_after: Option<(usize, CancellationToken)>,
    }

    impl RecordingTransport {
        fn new() -> Self {
            Self {
                authorized: true,
                fail_for: Vec::new(),
                delivered: Mutex::new(Vec::new()),
                cancel_after: None,
            }
        }

        fn failing_for(emails: &[&str]) -> Self {
            Self {
                fail_for: emails.iter().map(|e| e.to_string()).collect(),
                ..Self::new()
            }
        }

        fn unauthorized() -> Self {
            Self {
                authorized: false,
                ..Self::new()
            }
        }
    }

    impl DeliveryTransport for RecordingTransport {
        async fn ensure_authorized(&self) -> Result<(), TransportError> {
            if self.authorized {
                Ok(())
            } else {
                Err(TransportError::Unauthorized("token expired".to_string()))
            }
        }

        async fn deliver(
            &self,
            recipient_email: &str,
            subject: &str,
            body: &str,
        ) -> Result<(), TransportError> {
            if self.fail_for.iter().any(|e| e == recipient_email) {
                return Err(TransportError::Rejected("mailbox unavailable".to_string()));
            }
            let mut delivered = self.delivered.lock().unwrap();
            delivered.push((
                recipient_email.to_string(),
                subject.to_string(),
                body.to_string(),
            ));
            if let Some((after, token)) = &self.cancel_after {
                if delivered.len() >= *after {
                    token.cancel();
                }
            }
            Ok(())
        }
    }

    fn contact(email: &str, first: &str, last: &str) -> Contact {
        Contact {
            email: email.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            goes_by: None,
            company_name: None,
            title: None,
        }
    }

    fn three_contacts() -> Vec<Contact> {
        vec![
            contact("a@example.org", "Ana", "Silva"),
            contact("b@example.org", "Ben", "Okafor"),
            contact("c@example.org", "Chen", "Wu"),
        ]
    }

    fn draft() -> MessageDraft {
        MessageDraft {
            title: "Reconnect".to_string(),
            subject: "Hello {{firstName}}".to_string(),
            body: "Hi {{goesBy}}, from {{companyName}}.".to_string(),
            source_template_id: None,
        }
    }

    fn dispatcher(
        contacts: Result<Vec<Contact>, DirectoryError>,
        transport: RecordingTransport,
    ) -> BulkDispatcher<StaticDirectory, RecordingTransport> {
        BulkDispatcher::new(StaticDirectory { contacts }, transport)
    }

    #[tokio::test]
    async fn test_all_recipients_sent_with_personalization() {
        let d = dispatcher(Ok(three_contacts()), RecordingTransport::new());
        let result = d
            .send(&AudienceId::from("list-1"), &draft(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.total_requested, 3);
        assert_eq!(result.total_sent, 3);
        assert!(result.failures.is_empty());

        let delivered = d.transport.delivered.lock().unwrap();
        assert_eq!(delivered[0].1, "Hello Ana");
        // goesBy defaults to firstName; companyName is unknown and passes through.
        assert_eq!(delivered[1].2, "Hi Ben, from {{companyName}}.");
    }

    #[tokio::test]
    async fn test_one_failure_is_recorded_without_aborting() {
        // Spec scenario: three recipients, delivery fails for #2.
        let d = dispatcher(
            Ok(three_contacts()),
            RecordingTransport::failing_for(&["b@example.org"]),
        );
        let result = d
            .send(&AudienceId::from("list-1"), &draft(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.total_requested, 3);
        assert_eq!(result.total_sent, 2);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].recipient_email, "b@example.org");
        assert!(result.failures[0].reason.contains("mailbox unavailable"));
        assert!(result.is_consistent());
    }

    #[tokio::test]
    async fn test_failure_order_matches_audience_order() {
        let d = dispatcher(
            Ok(three_contacts()),
            RecordingTransport::failing_for(&["c@example.org", "a@example.org"]),
        );
        let result = d
            .send(&AudienceId::from("list-1"), &draft(), &CancellationToken::new())
            .await
            .unwrap();

        let failed: Vec<&str> = result
            .failures
            .iter()
            .map(|f| f.recipient_email.as_str())
            .collect();
        assert_eq!(failed, vec!["a@example.org", "c@example.org"]);
    }

    #[tokio::test]
    async fn test_missing_audience_aborts_before_delivery() {
        let d = dispatcher(
            Err(DirectoryError::AudienceNotFound("list-9".to_string())),
            RecordingTransport::new(),
        );
        let err = d
            .send(&AudienceId::from("list-9"), &draft(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::AudienceNotFound(_)));
        assert!(d.transport.delivered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_transport_aborts_before_delivery() {
        let d = dispatcher(Ok(three_contacts()), RecordingTransport::unauthorized());
        let err = d
            .send(&AudienceId::from("list-1"), &draft(), &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            DispatchError::Unauthorized(msg) => assert!(msg.contains("token expired")),
            other => panic!("expected Unauthorized, got: {other:?}"),
        }
        assert!(d.transport.delivered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_email_is_per_recipient_failure() {
        let mut contacts = three_contacts();
        contacts[1].email = "not-an-email".to_string();
        let d = dispatcher(Ok(contacts), RecordingTransport::new());
        let result = d
            .send(&AudienceId::from("list-1"), &draft(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.total_sent, 2);
        assert_eq!(result.failures[0].recipient_email, "not-an-email");
        assert!(result.failures[0].reason.contains("invalid email"));
    }

    #[tokio::test]
    async fn test_cancellation_stops_further_submissions() {
        let cancel = CancellationToken::new();
        let mut transport = RecordingTransport::new();
        transport.cancel_after = Some((1, cancel.clone()));

        let d = dispatcher(Ok(three_contacts()), transport);
        let result = d.send(&AudienceId::from("list-1"), &draft(), &cancel).await.unwrap();

        assert_eq!(result.total_requested, 3);
        assert_eq!(result.total_sent, 1);
        assert_eq!(result.failures.len(), 2);
        assert!(result.failures.iter().all(|f| f.reason.contains("cancelled")));
        assert!(result.is_consistent());
        assert_eq!(d.transport.delivered.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_audience_yields_empty_result() {
        let d = dispatcher(Ok(Vec::new()), RecordingTransport::new());
        let result = d
            .send(&AudienceId::from("list-1"), &draft(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result.total_requested, 0);
        assert!(result.is_complete_success());
    }
}
