//! Capability Catalog
//!
//! The closed registry of generation capabilities the platform can invoke.
//! Every tool is a variant of [`ToolId`]; dispatch is an exhaustive match,
//! so adding a tool forces every consumer (selection prompt, dispatch,
//! aggregation) to handle it. The catalog is immutable after construction
//! and safe to share across concurrent tasks.

pub mod payload;

pub use payload::{
    AgendaEvent, Branch, CodeSnippet, CopyBlock, Deck, MindMap, Palette, PaletteColor, Persona,
    ProjectPlan, Slide, ToolPayload,
};

use crate::generators;
use crate::llm::failover::ModelRouter;
use crate::llm::LLMError;
use std::fmt;
use std::sync::Arc;

/// Errors from invoking a generation capability
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The model call itself failed
    #[error("model call failed: {0}")]
    Model(#[from] LLMError),

    /// The model answered, but the payload could not be parsed or validated
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Identifier of a generation capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolId {
    /// Project plan: the seed capability; runs before everything else
    Plan,
    /// Marketing copy block
    Copy,
    /// Color palette
    Palette,
    /// Audience persona
    Persona,
    /// Slide deck outline
    Deck,
    /// Starter code snippet
    Code,
    /// Mind map
    MindMap,
    /// Kickoff agenda event
    Agenda,
}

impl ToolId {
    /// Every capability, in catalog order
    pub const ALL: [ToolId; 8] = [
        ToolId::Plan,
        ToolId::Copy,
        ToolId::Palette,
        ToolId::Persona,
        ToolId::Deck,
        ToolId::Code,
        ToolId::MindMap,
        ToolId::Agenda,
    ];

    /// Stable string identifier, as used in classification prompts and output
    pub fn id(self) -> &'static str {
        match self {
            ToolId::Plan => "plan",
            ToolId::Copy => "copy",
            ToolId::Palette => "palette",
            ToolId::Persona => "persona",
            ToolId::Deck => "deck",
            ToolId::Code => "code",
            ToolId::MindMap => "mind_map",
            ToolId::Agenda => "agenda",
        }
    }

    /// Human-readable description, used only for tool selection
    pub fn description(self) -> &'static str {
        match self {
            ToolId::Plan => "Project plan with a title and creative brief. Always required.",
            ToolId::Copy => "Marketing copy: a headline, body text, and call to action.",
            ToolId::Palette => "A color palette suited to the project's identity.",
            ToolId::Persona => "A target-audience persona with goals and frustrations.",
            ToolId::Deck => "A pitch deck outline with titled slides and bullet points.",
            ToolId::Code => "A starter code snippet for technical projects.",
            ToolId::MindMap => "A mind map breaking the project into themed branches.",
            ToolId::Agenda => "A kickoff agenda event to get the project moving.",
        }
    }

    /// Parse a string identifier, tolerating common classifier spellings
    pub fn parse(s: &str) -> Option<ToolId> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "plan" | "project_plan" => Some(ToolId::Plan),
            "copy" | "text" => Some(ToolId::Copy),
            "palette" | "colors" | "color_palette" => Some(ToolId::Palette),
            "persona" => Some(ToolId::Persona),
            "deck" | "slides" | "slide_deck" => Some(ToolId::Deck),
            "code" | "snippet" => Some(ToolId::Code),
            "mindmap" | "mind_map" => Some(ToolId::MindMap),
            "agenda" | "event" => Some(ToolId::Agenda),
            _ => None,
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The capability catalog: closed dispatch over every known tool
pub struct Catalog {
    model: Arc<ModelRouter>,
}

impl Catalog {
    pub fn new(model: Arc<ModelRouter>) -> Self {
        Self { model }
    }

    /// List every capability with its description, in catalog order.
    /// Feeds the selection and chat classification prompts.
    pub fn describe_all(&self) -> Vec<(&'static str, &'static str)> {
        ToolId::ALL
            .iter()
            .map(|tool| (tool.id(), tool.description()))
            .collect()
    }

    /// Invoke a capability against the shared context string.
    ///
    /// Dispatch is exhaustive over [`ToolId`]; each arm delegates to the
    /// tool's generator, which owns its prompt template and payload parsing.
    pub async fn invoke(&self, tool: ToolId, context: &str) -> Result<ToolPayload, GenerationError> {
        tracing::debug!(tool = %tool, "invoking generator");
        match tool {
            ToolId::Plan => generators::plan::generate(&self.model, context)
                .await
                .map(ToolPayload::Plan),
            ToolId::Copy => generators::copy::generate(&self.model, context)
                .await
                .map(ToolPayload::Copy),
            ToolId::Palette => generators::palette::generate(&self.model, context)
                .await
                .map(ToolPayload::Palette),
            ToolId::Persona => generators::persona::generate(&self.model, context)
                .await
                .map(ToolPayload::Persona),
            ToolId::Deck => generators::deck::generate(&self.model, context)
                .await
                .map(ToolPayload::Deck),
            ToolId::Code => generators::code::generate(&self.model, context)
                .await
                .map(ToolPayload::Code),
            ToolId::MindMap => generators::mindmap::generate(&self.model, context)
                .await
                .map(ToolPayload::MindMap),
            ToolId::Agenda => generators::agenda::generate(&self.model, context)
                .await
                .map(ToolPayload::Agenda),
        }
    }

    /// Typed entry point for the seed capability.
    ///
    /// The orchestrator calls this directly so the plan arrives as a
    /// [`ProjectPlan`] rather than a [`ToolPayload`] needing unwrapping.
    pub async fn generate_plan(&self, goal: &str) -> Result<ProjectPlan, GenerationError> {
        generators::plan::generate(&self.model, goal).await
    }
}
