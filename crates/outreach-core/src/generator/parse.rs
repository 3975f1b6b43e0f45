//! Reply parsing and normalization for the draft generator.
//!
//! The collaborator is instructed to return a bare JSON object, but replies
//! sometimes arrive wrapped in prose or markdown fences. Parsing is direct
//! `serde_json` first, then a single bounded scan for an embedded object
//! (first `{` through its matching `}`); anything past that fails.

use outreach_types::draft::{DraftContext, DraftReply, GeneratedDraft};
use outreach_types::error::GenerationError;

/// Default subject when neither the reply nor the context provides one.
const FALLBACK_SUBJECT: &str = "Reaching out";

/// Parse a raw collaborator reply into a validated [`GeneratedDraft`].
///
/// Validation: the reply must carry a non-empty `content` (or `body`)
/// string. The subject falls back to the context's current subject, then
/// to a fixed default.
pub fn parse_reply(raw: &str, context: &DraftContext) -> Result<GeneratedDraft, GenerationError> {
    let reply = parse_reply_object(raw)?;

    let body = reply
        .content
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| GenerationError::Failed("missing content field".to_string()))?;

    let subject = reply
        .subject
        .filter(|s| !s.trim().is_empty())
        .or_else(|| {
            let current = context.current_subject.trim();
            (!current.is_empty()).then(|| current.to_string())
        })
        .unwrap_or_else(|| FALLBACK_SUBJECT.to_string());

    Ok(GeneratedDraft {
        title: reply.title.filter(|t| !t.trim().is_empty()),
        subject,
        body,
    })
}

fn parse_reply_object(raw: &str) -> Result<DraftReply, GenerationError> {
    if let Ok(reply) = serde_json::from_str::<DraftReply>(raw) {
        return Ok(reply);
    }

    let embedded = extract_embedded_object(raw)
        .ok_or_else(|| GenerationError::Failed("reply is not a JSON object".to_string()))?;

    serde_json::from_str::<DraftReply>(embedded)
        .map_err(|e| GenerationError::Failed(format!("embedded object is not valid JSON: {e}")))
}

/// Locate the first balanced `{...}` object in `raw`.
///
/// A single forward pass tracking brace depth and JSON string/escape state;
/// deliberately not a recursive-descent parser so the failure mode stays
/// bounded. Returns `None` when no brace opens or none balances.
pub fn extract_embedded_object(raw: &str) -> Option<&str> {
    let bytes = raw.as_bytes();
    let start = raw.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_with_subject(subject: &str) -> DraftContext {
        DraftContext {
            current_title: String::new(),
            current_subject: subject.to_string(),
            current_body: String::new(),
        }
    }

    #[test]
    fn test_parses_clean_json_reply() {
        let draft = parse_reply(
            r#"{"content":"Hi {{firstName}},\n\nCheers,\nJoel","suggestedVariables":["firstName"],"subject":"Catching up"}"#,
            &DraftContext::default(),
        )
        .unwrap();
        assert_eq!(draft.subject, "Catching up");
        assert!(draft.body.starts_with("Hi {{firstName}}"));
    }

    #[test]
    fn test_extracts_object_embedded_in_prose() {
        // Spec scenario: plain text wrapped around an embedded object.
        let raw = r#"Sure! Here's your template:

{"content": "Hi {{firstName}}, hope all is well at {{companyName}}.", "suggestedVariables": ["firstName", "companyName"]}

Let me know if you'd like changes."#;
        let draft = parse_reply(raw, &context_with_subject("Hello again")).unwrap();
        assert!(draft.body.contains("{{companyName}}"));
        assert_eq!(draft.subject, "Hello again");
    }

    #[test]
    fn test_extracts_object_from_markdown_fence() {
        let raw = "```json\n{\"content\": \"Hi {{goesBy}}!\"}\n```";
        let draft = parse_reply(raw, &DraftContext::default()).unwrap();
        assert_eq!(draft.body, "Hi {{goesBy}}!");
    }

    #[test]
    fn test_missing_content_field_fails() {
        // Spec scenario: reply with no content or body field.
        let err = parse_reply(r#"{"subject": "Hello"}"#, &DraftContext::default()).unwrap_err();
        match err {
            GenerationError::Failed(msg) => assert!(msg.contains("missing content field")),
            other => panic!("expected Failed, got: {other:?}"),
        }
    }

    #[test]
    fn test_empty_content_fails() {
        let err = parse_reply(r#"{"content": "   "}"#, &DraftContext::default()).unwrap_err();
        assert!(matches!(err, GenerationError::Failed(_)));
    }

    #[test]
    fn test_unparseable_reply_fails() {
        let err = parse_reply("no json here at all", &DraftContext::default()).unwrap_err();
        match err {
            GenerationError::Failed(msg) => assert!(msg.contains("not a JSON object")),
            other => panic!("expected Failed, got: {other:?}"),
        }
    }

    #[test]
    fn test_unbalanced_object_fails() {
        let err =
            parse_reply(r#"here it is: {"content": "Hi"#, &DraftContext::default()).unwrap_err();
        assert!(matches!(err, GenerationError::Failed(_)));
    }

    #[test]
    fn test_subject_falls_back_to_fixed_default() {
        let draft = parse_reply(r#"{"content": "Hi there"}"#, &DraftContext::default()).unwrap();
        assert_eq!(draft.subject, "Reaching out");
    }

    #[test]
    fn test_braces_inside_strings_do_not_end_the_scan() {
        let raw = r#"prefix {"content": "object {{firstName}} with } brace", "subject": "ok"} suffix"#;
        let draft = parse_reply(raw, &DraftContext::default()).unwrap();
        assert!(draft.body.contains("with } brace"));
        assert_eq!(draft.subject, "ok");
    }

    #[test]
    fn test_extract_embedded_object_spans_nested_objects() {
        let raw = r#"x {"a": {"b": 1}, "c": 2} y"#;
        assert_eq!(extract_embedded_object(raw), Some(r#"{"a": {"b": 1}, "c": 2}"#));
    }
}
