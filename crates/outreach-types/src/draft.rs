use serde::{Deserialize, Serialize};

use crate::template::{Template, TemplateId};

/// An in-progress, not-yet-sent message owned by one compose session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageDraft {
    /// Working title for the draft (not sent to recipients).
    pub title: String,
    pub subject: String,
    pub body: String,
    /// The template this draft was seeded from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_template_id: Option<TemplateId>,
}

impl MessageDraft {
    /// Seed a draft from a template selection.
    pub fn from_template(template: &Template) -> Self {
        Self {
            title: template.name.clone(),
            subject: template.subject.clone(),
            body: template.body.clone(),
            source_template_id: Some(template.id.clone()),
        }
    }
}

/// The current draft content handed to the draft generator as context.
#[derive(Debug, Clone, Default)]
pub struct DraftContext {
    pub current_title: String,
    pub current_subject: String,
    pub current_body: String,
}

impl DraftContext {
    /// Snapshot a draft as generation context.
    pub fn from_draft(draft: &MessageDraft) -> Self {
        Self {
            current_title: draft.title.clone(),
            current_subject: draft.subject.clone(),
            current_body: draft.body.clone(),
        }
    }
}

/// A validated, normalized draft candidate produced by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub subject: String,
    pub body: String,
}

/// Raw structured reply from the text-generation collaborator.
///
/// The collaborator is instructed to return `{content, suggestedVariables}`;
/// some replies use `body` for the template text and may add a `subject`.
/// Both spellings are honored on the consuming side.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftReply {
    /// The generated template text. Absence or emptiness fails validation.
    #[serde(alias = "body")]
    pub content: Option<String>,
    #[serde(default)]
    pub suggested_variables: Vec<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_template_seeds_all_fields() {
        let template = Template::new(
            TemplateId::new(),
            "Reconnect".to_string(),
            "Catching up".to_string(),
            "Hi {{firstName}}".to_string(),
        );
        let draft = MessageDraft::from_template(&template);
        assert_eq!(draft.title, "Reconnect");
        assert_eq!(draft.subject, "Catching up");
        assert_eq!(draft.body, "Hi {{firstName}}");
        assert_eq!(draft.source_template_id, Some(template.id));
    }

    #[test]
    fn test_draft_reply_accepts_content_field() {
        let reply: DraftReply = serde_json::from_str(
            r#"{"content":"Hi {{firstName}}","suggestedVariables":["firstName"]}"#,
        )
        .unwrap();
        assert_eq!(reply.content.as_deref(), Some("Hi {{firstName}}"));
        assert_eq!(reply.suggested_variables, vec!["firstName"]);
    }

    #[test]
    fn test_draft_reply_accepts_body_alias_and_subject() {
        let reply: DraftReply =
            serde_json::from_str(r#"{"subject":"Hello","body":"Hi {{goesBy}}"}"#).unwrap();
        assert_eq!(reply.content.as_deref(), Some("Hi {{goesBy}}"));
        assert_eq!(reply.subject.as_deref(), Some("Hello"));
        assert!(reply.suggested_variables.is_empty());
    }

    #[test]
    fn test_draft_reply_tolerates_missing_content() {
        let reply: DraftReply = serde_json::from_str(r#"{"subject":"Hello"}"#).unwrap();
        assert!(reply.content.is_none());
    }
}
