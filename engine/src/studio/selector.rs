//! Tool Selector
//!
//! Decides which catalog tools apply to a request. The actual choice is
//! delegated to the model (a classification call over the catalog listing);
//! this module owns the contract around it: unknown ids are dropped,
//! duplicates removed, and the plan tool is always present: it seeds the
//! context every other tool consumes, so a selection without it is not a
//! selection.

use super::StudioError;
use crate::catalog::ToolId;
use crate::llm::failover::ModelRouter;
use crate::llm::{extract_json_array, Message};
use std::sync::Arc;

/// A single orchestration request
#[derive(Debug, Clone)]
pub struct SelectionRequest {
    /// Free-form user objective
    pub goal: String,

    /// Optional role/profession hint ("I am a director")
    pub role_hint: Option<String>,
}

impl SelectionRequest {
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            role_hint: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role_hint = Some(role.into());
        self
    }
}

/// Sanitized selection: non-empty, deduplicated, contains [`ToolId::Plan`]
/// exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    tools: Vec<ToolId>,
}

impl Selection {
    /// Build a selection from raw classifier candidates.
    ///
    /// Ids that don't resolve to a catalog tool are dropped (with a warning);
    /// duplicates are removed preserving first occurrence; the plan tool is
    /// inserted at the front when the classifier omitted it (its position is
    /// kept when present). Fails when no candidate resolves at all.
    pub fn from_candidates<I, S>(candidates: I) -> Result<Selection, StudioError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tools: Vec<ToolId> = Vec::new();

        for candidate in candidates {
            let raw = candidate.as_ref();
            match ToolId::parse(raw) {
                Some(tool) => {
                    if !tools.contains(&tool) {
                        tools.push(tool);
                    }
                }
                None => {
                    tracing::warn!(id = raw, "classifier proposed unknown tool; dropping");
                }
            }
        }

        if tools.is_empty() {
            return Err(StudioError::SelectionFailed(
                "classifier returned no usable tool ids".to_string(),
            ));
        }

        if !tools.contains(&ToolId::Plan) {
            tools.insert(0, ToolId::Plan);
        }

        Ok(Selection { tools })
    }

    /// Every selected tool, in selection order
    pub fn tools(&self) -> &[ToolId] {
        &self.tools
    }

    /// The selected tools minus the seed, in selection order
    pub fn fan_out_tools(&self) -> Vec<ToolId> {
        self.tools
            .iter()
            .copied()
            .filter(|&t| t != ToolId::Plan)
            .collect()
    }
}

const SYSTEM: &str = "You are the dispatcher of a creative studio. Given a user's \
goal, decide which studio tools should run for it.\n\
Reply with ONLY a JSON array of tool ids, e.g. [\"plan\", \"palette\"].\n\
Pick every tool that is genuinely useful for the goal, and nothing else.";

/// Chooses the tool set for a request via a model classification call
pub struct Selector {
    model: Arc<ModelRouter>,
}

impl Selector {
    pub fn new(model: Arc<ModelRouter>) -> Self {
        Self { model }
    }

    /// Select the tools for a request.
    ///
    /// Any outcome that yields no usable ids (model failure, unparseable
    /// output, or an all-unknown list) is `SelectionFailed`.
    pub async fn select(&self, request: &SelectionRequest) -> Result<Selection, StudioError> {
        let mut listing = String::from("Available tools:\n");
        for tool in ToolId::ALL {
            listing.push_str(&format!("- {}: {}\n", tool.id(), tool.description()));
        }

        let mut user = format!("{listing}\nGoal: {}", request.goal);
        if let Some(role) = &request.role_hint {
            user.push_str(&format!("\nThe user is a {role}."));
        }

        let messages = [Message::system(SYSTEM), Message::user(user)];

        let completion = self
            .model
            .complete(&messages)
            .await
            .map_err(|e| StudioError::SelectionFailed(e.to_string()))?;

        let candidates = parse_candidates(&completion)
            .ok_or_else(|| StudioError::SelectionFailed("unparseable classifier output".to_string()))?;

        Selection::from_candidates(candidates)
    }
}

/// Pull the raw id list out of the classifier's completion
fn parse_candidates(content: &str) -> Option<Vec<String>> {
    let json = extract_json_array(content)?;
    serde_json::from_str::<Vec<String>>(json).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_candidates_keeps_classifier_order() {
        let selection =
            Selection::from_candidates(["plan", "deck", "palette"]).unwrap();
        assert_eq!(
            selection.tools(),
            &[ToolId::Plan, ToolId::Deck, ToolId::Palette]
        );
    }

    #[test]
    fn test_from_candidates_inserts_missing_plan_first() {
        let selection = Selection::from_candidates(["deck", "palette"]).unwrap();
        assert_eq!(
            selection.tools(),
            &[ToolId::Plan, ToolId::Deck, ToolId::Palette]
        );
    }

    #[test]
    fn test_from_candidates_keeps_plan_position_when_present() {
        let selection = Selection::from_candidates(["deck", "plan", "palette"]).unwrap();
        assert_eq!(
            selection.tools(),
            &[ToolId::Deck, ToolId::Plan, ToolId::Palette]
        );
    }

    #[test]
    fn test_from_candidates_dedupes() {
        let selection =
            Selection::from_candidates(["deck", "deck", "plan", "deck"]).unwrap();
        assert_eq!(selection.tools(), &[ToolId::Deck, ToolId::Plan]);
    }

    #[test]
    fn test_from_candidates_drops_unknown_ids() {
        let selection =
            Selection::from_candidates(["hologram", "palette", "telepathy"]).unwrap();
        assert_eq!(selection.tools(), &[ToolId::Plan, ToolId::Palette]);
    }

    #[test]
    fn test_from_candidates_fails_when_nothing_usable() {
        let err = Selection::from_candidates(["hologram", "telepathy"]).unwrap_err();
        assert!(matches!(err, StudioError::SelectionFailed(_)));

        let err = Selection::from_candidates(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, StudioError::SelectionFailed(_)));
    }

    #[test]
    fn test_fan_out_tools_excludes_plan() {
        let selection = Selection::from_candidates(["deck", "plan", "palette"]).unwrap();
        assert_eq!(
            selection.fan_out_tools(),
            vec![ToolId::Deck, ToolId::Palette]
        );
    }

    #[test]
    fn test_fan_out_tools_empty_for_plan_only_selection() {
        let selection = Selection::from_candidates(["plan"]).unwrap();
        assert!(selection.fan_out_tools().is_empty());
    }

    #[test]
    fn test_parse_candidates_from_prose() {
        let content = "I would pick:\n```json\n[\"plan\", \"mind_map\"]\n```";
        let candidates = parse_candidates(content).unwrap();
        assert_eq!(candidates, vec!["plan", "mind_map"]);
    }

    #[test]
    fn test_parse_candidates_rejects_non_array() {
        assert!(parse_candidates("no JSON here").is_none());
        assert!(parse_candidates(r#"{"tool": "plan"}"#).is_none());
    }
}
