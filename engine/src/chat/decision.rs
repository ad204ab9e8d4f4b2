//! Router decision types
//!
//! The closed set of shapes a chat turn can resolve to, plus the raw form
//! the classifier's JSON is parsed into before dispatch. Consumers match
//! exhaustively on [`RouterDecision`]; there is no fourth shape.

use crate::catalog::{ToolId, ToolPayload};
use crate::llm::extract_json_object;
use crate::studio::ProjectBundle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Client-side navigation targets a redirect can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// The studio workspace, where a full project bundle is displayed
    Studio,
    /// The user's past projects
    Gallery,
    /// Account and provider settings
    Settings,
}

impl Destination {
    pub fn parse(s: &str) -> Option<Destination> {
        match s.trim().to_ascii_lowercase().as_str() {
            "studio" => Some(Destination::Studio),
            "gallery" => Some(Destination::Gallery),
            "settings" => Some(Destination::Settings),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Destination::Studio => "studio",
            Destination::Gallery => "gallery",
            Destination::Settings => "settings",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A capability the classifier can ask the router to invoke: either one
/// catalog tool, or the compound studio orchestration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatCapability {
    /// The orchestrator itself, exposed to the classifier as "studio"
    Studio,
    /// A single catalog tool
    Tool(ToolId),
}

impl ChatCapability {
    pub fn parse(s: &str) -> Option<ChatCapability> {
        let normalized = s.trim().to_ascii_lowercase();
        if normalized == "studio" || normalized == "project" {
            return Some(ChatCapability::Studio);
        }
        ToolId::parse(s).map(ChatCapability::Tool)
    }
}

/// Exactly one of these is produced per router invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouterDecision {
    /// A direct conversational reply; no capability was invoked
    Response { message: String },

    /// A single capability ran and its payload can be rendered inline.
    /// Never carries the studio; its output always leaves as a redirect.
    ToolResult {
        tool: ToolId,
        message: String,
        payload: ToolPayload,
    },

    /// The caller should switch execution context instead of rendering
    /// anything inline
    Redirect {
        destination: Destination,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        forwarded_prompt: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bundle: Option<ProjectBundle>,
    },
}

/// The classifier's answer, before dispatch
#[derive(Debug, Deserialize)]
pub(crate) struct RawDecision {
    pub action: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub tool: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Pull the raw decision out of the classifier's completion
pub(crate) fn parse_raw(content: &str) -> Option<RawDecision> {
    let json = extract_json_object(content)?;
    serde_json::from_str::<RawDecision>(json).ok()
}
