//! Placeholder resolution: `{{identifier}}` substitution against a
//! recipient's attribute map.
//!
//! Pure functions, no I/O, no shared state; safe to call concurrently
//! over distinct inputs. One linear scan per call.

use std::collections::BTreeMap;

/// Replace every `{{identifier}}` placeholder whose identifier is a key of
/// `attributes` with the attribute's value, in a single left-to-right scan.
///
/// Policy:
/// - Known identifier: the whole placeholder (braces included) becomes the
///   attribute value; an empty value yields an empty substitution.
/// - Unknown identifier: the placeholder is left verbatim. Partial
///   personalization is allowed; a missing field never blocks a batch.
/// - Identifiers are ASCII alphanumeric; anything else between braces is
///   not a placeholder and passes through untouched.
pub fn resolve(template: &str, attributes: &BTreeMap<String, String>) -> String {
    let bytes = template.as_bytes();
    let mut out = String::with_capacity(template.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'{' && i + 1 < bytes.len() && bytes[i + 1] == b'{' {
            let start = i + 2;
            let mut end = start;
            while end < bytes.len() && bytes[end].is_ascii_alphanumeric() {
                end += 1;
            }
            if end > start
                && end + 1 < bytes.len()
                && bytes[end] == b'}'
                && bytes[end + 1] == b'}'
            {
                let identifier = &template[start..end];
                if let Some(value) = attributes.get(identifier) {
                    out.push_str(value);
                } else {
                    // Unknown identifier: silent passthrough.
                    out.push_str(&template[i..end + 2]);
                }
                i = end + 2;
                continue;
            }
        }
        // Placeholder scanning works on byte positions; copy whole UTF-8
        // characters so multi-byte text survives intact.
        let ch_len = utf8_len(bytes[i]);
        out.push_str(&template[i..i + ch_len]);
        i += ch_len;
    }

    out
}

/// Identifiers of placeholders in `text` that have no key in `attributes`,
/// in order of first appearance. Used to surface preview warnings; never
/// gates a send.
pub fn unresolved_placeholders(text: &str, attributes: &BTreeMap<String, String>) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut unresolved = Vec::new();
    let mut i = 0;

    while i + 1 < bytes.len() {
        if bytes[i] == b'{' && bytes[i + 1] == b'{' {
            let start = i + 2;
            let mut end = start;
            while end < bytes.len() && bytes[end].is_ascii_alphanumeric() {
                end += 1;
            }
            if end > start && end + 1 < bytes.len() && bytes[end] == b'}' && bytes[end + 1] == b'}'
            {
                let identifier = &text[start..end];
                if !attributes.contains_key(identifier)
                    && !unresolved.iter().any(|seen| seen == identifier)
                {
                    unresolved.push(identifier.to_string());
                }
                i = end + 2;
                continue;
            }
        }
        i += 1;
    }

    unresolved
}

fn utf8_len(first_byte: u8) -> usize {
    match first_byte {
        b if b < 0x80 => 1,
        b if b >= 0xF0 => 4,
        b if b >= 0xE0 => 3,
        _ => 2,
    }
}
