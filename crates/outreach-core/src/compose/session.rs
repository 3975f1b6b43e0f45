//! ComposeSession: finite-state wizard over
//! `ChoosingTemplate -> ChoosingAudience -> Editing -> PreviewAndSend`.
//!
//! One session owns one [`MessageDraft`]; all mutation goes through the
//! session's step-gated operations. A single backward transition to the
//! immediate predecessor is allowed from any step, and backward navigation
//! never loses field values. Sessions live in memory for the duration of
//! one compose flow and are not resumable across process restarts.

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use outreach_types::compose::{AudienceId, ComposeStep};
use outreach_types::draft::{DraftContext, GeneratedDraft, MessageDraft};
use outreach_types::error::ComposeError;
use outreach_types::template::Template;

use crate::resolver;

/// Partial update to the draft's editable fields.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct DraftEdit {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

/// The draft rendered against a representative sample attribute set, for
/// human review before sending. Carries no guarantee against real
/// recipient data.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPreview {
    pub subject: String,
    pub body: String,
    /// Placeholder identifiers the sample attribute set could not resolve.
    pub unresolved: Vec<String>,
}

/// One compose session: current step plus the exclusively-owned draft.
#[derive(Debug, Serialize)]
pub struct ComposeSession {
    pub id: Uuid,
    step: ComposeStep,
    draft: MessageDraft,
    audience_id: Option<AudienceId>,
}

impl ComposeSession {
    /// Start a fresh session at the template-selection step.
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            step: ComposeStep::ChoosingTemplate,
            draft: MessageDraft::default(),
            audience_id: None,
        }
    }

    pub fn step(&self) -> ComposeStep {
        self.step
    }

    pub fn draft(&self) -> &MessageDraft {
        &self.draft
    }

    pub fn audience_id(&self) -> Option<&AudienceId> {
        self.audience_id.as_ref()
    }

    /// Seed the draft from a template and advance to audience selection.
    pub fn select_template(&mut self, template: &Template) -> Result<(), ComposeError> {
        self.require_step(ComposeStep::ChoosingTemplate, "select_template")?;
        self.draft = MessageDraft::from_template(template);
        self.step = ComposeStep::ChoosingAudience;
        Ok(())
    }

    /// Store the audience reference and advance to editing.
    pub fn select_audience(&mut self, audience_id: AudienceId) -> Result<(), ComposeError> {
        self.require_step(ComposeStep::ChoosingAudience, "select_audience")?;
        self.audience_id = Some(audience_id);
        self.step = ComposeStep::Editing;
        Ok(())
    }

    /// Apply a free-form edit to the draft. Only fields present in the
    /// edit change; absent fields keep their values.
    pub fn edit(&mut self, edit: DraftEdit) -> Result<(), ComposeError> {
        self.require_step(ComposeStep::Editing, "edit")?;
        if let Some(title) = edit.title {
            self.draft.title = title;
        }
        if let Some(subject) = edit.subject {
            self.draft.subject = subject;
        }
        if let Some(body) = edit.body {
            self.draft.body = body;
        }
        Ok(())
    }

    /// Snapshot the draft as context for a generation call. Generation is
    /// an Editing-step operation; a successful result is applied via
    /// [`ComposeSession::apply_generated`], never automatically.
    pub fn generation_context(&self) -> Result<DraftContext, ComposeError> {
        self.require_step(ComposeStep::Editing, "generate")?;
        Ok(DraftContext::from_draft(&self.draft))
    }

    /// Merge a generated draft candidate into the current draft.
    ///
    /// Generated fields overwrite; fields the generator omitted keep their
    /// prior values. The step does not change.
    pub fn apply_generated(&mut self, generated: GeneratedDraft) -> Result<(), ComposeError> {
        self.require_step(ComposeStep::Editing, "apply_generated")?;
        if let Some(title) = generated.title {
            self.draft.title = title;
        }
        self.draft.subject = generated.subject;
        self.draft.body = generated.body;
        Ok(())
    }

    /// Explicitly advance from editing to preview.
    pub fn advance_to_preview(&mut self) -> Result<(), ComposeError> {
        self.require_step(ComposeStep::Editing, "advance_to_preview")?;
        self.step = ComposeStep::PreviewAndSend;
        Ok(())
    }

    /// Render the draft with the representative sample attribute set.
    pub fn preview(&self) -> Result<RenderedPreview, ComposeError> {
        self.require_step(ComposeStep::PreviewAndSend, "preview")?;
        let sample = sample_attributes();
        let mut unresolved = resolver::unresolved_placeholders(&self.draft.subject, &sample);
        for identifier in resolver::unresolved_placeholders(&self.draft.body, &sample) {
            if !unresolved.contains(&identifier) {
                unresolved.push(identifier);
            }
        }
        Ok(RenderedPreview {
            subject: resolver::resolve(&self.draft.subject, &sample),
            body: resolver::resolve(&self.draft.body, &sample),
            unresolved,
        })
    }

    /// The audience to dispatch to, gated on the preview step. The caller
    /// invokes the dispatcher and discards the session on success.
    pub fn confirm_send(&self) -> Result<(&AudienceId, &MessageDraft), ComposeError> {
        self.require_step(ComposeStep::PreviewAndSend, "send")?;
        let audience_id = self
            .audience_id
            .as_ref()
            .ok_or(ComposeError::NoAudienceSelected)?;
        Ok((audience_id, &self.draft))
    }

    /// Go back one step. Field values and the audience selection survive;
    /// re-entering a selection step simply allows a different choice.
    pub fn back(&mut self) -> Result<ComposeStep, ComposeError> {
        let previous = self.step.predecessor().ok_or(ComposeError::AtFirstStep)?;
        self.step = previous;
        Ok(previous)
    }

    fn require_step(
        &self,
        expected: ComposeStep,
        operation: &'static str,
    ) -> Result<(), ComposeError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(ComposeError::InvalidTransition {
                step: self.step,
                operation,
            })
        }
    }
}

impl Default for ComposeSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Representative attribute set used for preview rendering.
fn sample_attributes() -> BTreeMap<String, String> {
    [
        ("firstName", "Jordan"),
        ("lastName", "Avery"),
        ("fullName", "Jordan Avery"),
        ("goesBy", "Jordan"),
        ("companyName", "Acme Foundation"),
        ("title", "Program Director"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
