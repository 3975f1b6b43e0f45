use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The fixed set of placeholder identifiers the system recognizes for
/// substitution. Identifiers outside this vocabulary are legal in a
/// template body but are never populated by the recipient projection.
pub const CONTROLLED_VOCABULARY: [&str; 6] = [
    "firstName",
    "lastName",
    "companyName",
    "title",
    "fullName",
    "goesBy",
];

/// Unique identifier for a message template, wrapping a UUID v7.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub Uuid);

impl TemplateId {
    /// Create a new TemplateId using UUID v7 (time-sortable).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create a TemplateId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for TemplateId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TemplateId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A reusable message template with `{{identifier}}` placeholders.
///
/// `variable_names` is the set of distinct placeholder identifiers found
/// in the subject and body. It is derived, never user-supplied; use
/// [`Template::new`] to keep it consistent with the text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    /// Freeform display name for listings.
    pub name: String,
    pub subject: String,
    pub body: String,
    /// Distinct placeholder identifiers appearing in subject or body.
    pub variable_names: BTreeSet<String>,
}

impl Template {
    /// Build a template, deriving `variable_names` from the text.
    pub fn new(id: TemplateId, name: String, subject: String, body: String) -> Self {
        let mut variable_names = scan_placeholders(&subject);
        variable_names.extend(scan_placeholders(&body));
        Self {
            id,
            name,
            subject,
            body,
            variable_names,
        }
    }

    /// Placeholder identifiers used by this template that are outside the
    /// controlled vocabulary. These survive resolution verbatim.
    pub fn unknown_variables(&self) -> BTreeSet<String> {
        self.variable_names
            .iter()
            .filter(|name| !CONTROLLED_VOCABULARY.contains(&name.as_str()))
            .cloned()
            .collect()
    }
}

/// Scan a template string for `{{identifier}}` placeholders and return the
/// distinct identifiers found.
///
/// Identifiers are alphanumeric (no nested braces, no whitespace). Anything
/// else between braces is not a placeholder and is ignored here, matching
/// the resolver's passthrough behavior.
pub fn scan_placeholders(text: &str) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let bytes = text.as_bytes();
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
                // Safe: the identifier range is ASCII alphanumeric.
                found.insert(text[start..end].to_string());
                i = end + 2;
                continue;
            }
        }
        i += 1;
    }

    found
}
