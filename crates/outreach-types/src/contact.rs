use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

/// A contact record as returned by the contact-directory collaborator.
///
/// Field names are camelCase on the wire (`firstName`, `goesBy`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Preferred name/nickname; falls back to `first_name` at projection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goes_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Job title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A send-ready recipient: a validated email plus the attribute projection
/// used for placeholder resolution.
///
/// Constructed fresh per send operation from the current audience; never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    pub attributes: BTreeMap<String, String>,
}

impl Recipient {
    /// Project a contact onto the controlled vocabulary.
    ///
    /// Derived attributes: `fullName` is `firstName + " " + lastName`;
    /// `goesBy` defaults to `firstName` when absent. Empty optional fields
    /// are omitted from the map so their placeholders pass through the
    /// resolver verbatim.
    ///
    /// Returns an error describing the problem when the contact's email
    /// does not have a plausible mailbox shape; the dispatcher records
    /// this as a per-recipient failure.
    pub fn project(contact: &Contact) -> Result<Self, String> {
        if !is_valid_email(&contact.email) {
            return Err(format!("invalid email address: '{}'", contact.email));
        }

        let mut attributes = BTreeMap::new();
        attributes.insert("firstName".to_string(), contact.first_name.clone());
        attributes.insert("lastName".to_string(), contact.last_name.clone());
        attributes.insert(
            "fullName".to_string(),
            format!("{} {}", contact.first_name, contact.last_name),
        );

        let goes_by = contact
            .goes_by
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&contact.first_name);
        attributes.insert("goesBy".to_string(), goes_by.to_string());

        if let Some(company) = contact.company_name.as_deref().filter(|s| !s.trim().is_empty()) {
            attributes.insert("companyName".to_string(), company.to_string());
        }
        if let Some(title) = contact.title.as_deref().filter(|s| !s.trim().is_empty()) {
            attributes.insert("title".to_string(), title.to_string());
        }

        Ok(Self {
            email: contact.email.clone(),
            attributes,
        })
    }
}

/// Minimal mailbox-shape check: non-empty local part, a single `@`, and a
/// domain containing a dot. Deliverability is the transport's problem.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
