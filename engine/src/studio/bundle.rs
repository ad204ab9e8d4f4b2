//! Bundle aggregation
//!
//! Folds settled fan-out outcomes into the final [`ProjectBundle`]. Each
//! fulfilled payload lands in its typed slot; a rejected outcome attaches
//! nothing and is logged with its tool id and reason. A consumer looking at
//! the bundle cannot tell a failed tool from an unselected one; that
//! ambiguity is deliberate and the log line is the operational escape hatch.

use super::fanout::TaskOutcome;
use crate::catalog::{
    AgendaEvent, CodeSnippet, CopyBlock, Deck, MindMap, Palette, Persona, ProjectPlan, ToolPayload,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The aggregated output of one orchestration run.
///
/// `plan` is always present (the run fails fast without it); every other
/// slot is present only when its tool was selected AND succeeded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectBundle {
    pub id: Uuid,

    /// The original user goal
    pub goal: String,

    /// Seed output every other payload was generated from
    pub plan: ProjectPlan,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy: Option<CopyBlock>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<Palette>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<Persona>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck: Option<Deck>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeSnippet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mind_map: Option<MindMap>,

    /// Agenda entries. The agenda tool yields a single event; it is stored
    /// here as a one-element collection because every consumer of this slot
    /// treats it as a list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agenda: Option<Vec<AgendaEvent>>,

    pub created_at: DateTime<Utc>,
}

impl ProjectBundle {
    /// Number of fan-out slots that made it into the bundle (plan excluded)
    pub fn fulfilled_count(&self) -> usize {
        [
            self.copy.is_some(),
            self.palette.is_some(),
            self.persona.is_some(),
            self.deck.is_some(),
            self.code.is_some(),
            self.mind_map.is_some(),
            self.agenda.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

/// Accumulates outcomes into a [`ProjectBundle`]
pub struct BundleBuilder {
    goal: String,
    plan: ProjectPlan,
    copy: Option<CopyBlock>,
    palette: Option<Palette>,
    persona: Option<Persona>,
    deck: Option<Deck>,
    code: Option<CodeSnippet>,
    mind_map: Option<MindMap>,
    agenda: Option<Vec<AgendaEvent>>,
}

impl BundleBuilder {
    pub fn new(goal: impl Into<String>, plan: ProjectPlan) -> Self {
        Self {
            goal: goal.into(),
            plan,
            copy: None,
            palette: None,
            persona: None,
            deck: None,
            code: None,
            mind_map: None,
            agenda: None,
        }
    }

    /// Fold one settled outcome into the bundle.
    ///
    /// Fulfilled payloads attach to their slot; rejections are logged and
    /// dropped; a failed tool never fails the bundle.
    pub fn settle(mut self, outcome: TaskOutcome) -> Self {
        match outcome.result {
            Ok(payload) => self.attach(payload),
            Err(e) => {
                tracing::warn!(
                    tool = %outcome.tool,
                    error = %e,
                    "generator failed; omitting from bundle"
                );
            }
        }
        self
    }

    fn attach(&mut self, payload: ToolPayload) {
        match payload {
            // The seed never fans out; a plan payload here means a caller
            // wired the pipeline wrong. Keep the original plan.
            ToolPayload::Plan(_) => {
                tracing::warn!("ignoring plan payload from fan-out");
            }
            ToolPayload::Copy(copy) => self.copy = Some(copy),
            ToolPayload::Palette(palette) => self.palette = Some(palette),
            ToolPayload::Persona(persona) => self.persona = Some(persona),
            ToolPayload::Deck(deck) => self.deck = Some(deck),
            ToolPayload::Code(code) => self.code = Some(code),
            ToolPayload::MindMap(map) => self.mind_map = Some(map),
            // Single event, collection slot
            ToolPayload::Agenda(event) => {
                self.agenda.get_or_insert_with(Vec::new).push(event);
            }
        }
    }

    pub fn finish(self) -> ProjectBundle {
        ProjectBundle {
            id: Uuid::new_v4(),
            goal: self.goal,
            plan: self.plan,
            copy: self.copy,
            palette: self.palette,
            persona: self.persona,
            deck: self.deck,
            code: self.code,
            mind_map: self.mind_map,
            agenda: self.agenda,
            created_at: Utc::now(),
        }
    }
}
