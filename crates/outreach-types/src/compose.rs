use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Steps of the compose wizard, in forward order.
///
/// Transitions are strictly sequential: each step advances to its
/// successor on a completed selection, and a single backward transition
/// to the immediate predecessor is allowed from any step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComposeStep {
    ChoosingTemplate,
    ChoosingAudience,
    Editing,
    PreviewAndSend,
}

impl ComposeStep {
    /// The immediate predecessor, or `None` at the first step.
    pub fn predecessor(self) -> Option<ComposeStep> {
        match self {
            ComposeStep::ChoosingTemplate => None,
            ComposeStep::ChoosingAudience => Some(ComposeStep::ChoosingTemplate),
            ComposeStep::Editing => Some(ComposeStep::ChoosingAudience),
            ComposeStep::PreviewAndSend => Some(ComposeStep::Editing),
        }
    }
}

impl fmt::Display for ComposeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeStep::ChoosingTemplate => write!(f, "choosing_template"),
            ComposeStep::ChoosingAudience => write!(f, "choosing_audience"),
            ComposeStep::Editing => write!(f, "editing"),
            ComposeStep::PreviewAndSend => write!(f, "preview_and_send"),
        }
    }
}

impl FromStr for ComposeStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "choosing_template" => Ok(ComposeStep::ChoosingTemplate),
            "choosing_audience" => Ok(ComposeStep::ChoosingAudience),
            "editing" => Ok(ComposeStep::Editing),
            "preview_and_send" => Ok(ComposeStep::PreviewAndSend),
            other => Err(format!("invalid compose step: '{other}'")),
        }
    }
}

/// Identifier of an audience (contact list) held by the directory
/// collaborator. Opaque to the core; resolved to members at send time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudienceId(pub String);

impl fmt::Display for AudienceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AudienceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
