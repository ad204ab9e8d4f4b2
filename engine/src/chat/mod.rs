//! Conversational Router
//!
//! Classifies a single chat turn into exactly one response shape (a direct
//! reply, a single-tool result, or a redirect) and dispatches it. The
//! classifier (a model call) proposes the shape; the router owns the
//! contract around it: unknown actions fail the turn as a classification
//! error, and an invocation of the compound studio capability ALWAYS leaves
//! as a redirect carrying the bundle, never as an inline tool result.
//!
//! The router holds no state between turns; the caller supplies the rolling
//! history and only the last [`HISTORY_WINDOW`] turns are shown to the
//! classifier.

pub mod decision;

pub use decision::{ChatCapability, Destination, RouterDecision};

use crate::catalog::{Catalog, GenerationError, ToolId};
use crate::llm::failover::ModelRouter;
use crate::llm::Message;
use crate::studio::{SelectionRequest, Studio, StudioError};
use decision::{parse_raw, RawDecision};
use std::sync::Arc;

/// How many history turns the classifier sees
pub const HISTORY_WINDOW: usize = 10;

/// Fixed human-readable message attached to a studio redirect
pub const STUDIO_REDIRECT_MESSAGE: &str =
    "I put a full project together for you. Opening the studio.";

/// One turn of rolling conversation history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Errors a router turn can surface to its caller.
///
/// None of these is process-fatal: the conversational surface renders them
/// as an error turn and the session continues.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// The classifier failed outright or returned no usable decision
    #[error("could not classify the request: {0}")]
    ClassificationFailed(String),

    /// A single-tool invocation failed
    #[error("capability '{tool}' failed: {source}")]
    Generation {
        tool: ToolId,
        #[source]
        source: GenerationError,
    },

    /// The compound studio capability failed fatally
    #[error(transparent)]
    Studio(#[from] StudioError),
}

const SYSTEM_HEADER: &str = "You are the conversational dispatcher of Atelier, a \
creative studio. For each user message decide ONE of:\n\
- reply directly: {\"action\": \"reply\", \"message\": \"...\"}\n\
- run one capability: {\"action\": \"tool\", \"tool\": \"<id>\", \"message\": \"...\", \"prompt\": \"...\"}\n\
- open a destination: {\"action\": \"open\", \"destination\": \"studio|gallery|settings\", \"message\": \"...\", \"prompt\": \"...\"}\n\
\"prompt\" is the request to forward, rephrased as a standalone goal.\n\
Reply with ONLY the JSON object.";

/// The classify-and-dispatch router over one chat turn
pub struct ChatRouter {
    model: Arc<ModelRouter>,
    catalog: Arc<Catalog>,
    studio: Arc<Studio>,
    history_window: usize,
}

impl ChatRouter {
    pub fn new(model: Arc<ModelRouter>, catalog: Arc<Catalog>, studio: Arc<Studio>) -> Self {
        Self {
            model,
            catalog,
            studio,
            history_window: HISTORY_WINDOW,
        }
    }

    /// Override the history window (primarily for tests)
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    /// Route one utterance into exactly one [`RouterDecision`].
    pub async fn route(
        &self,
        utterance: &str,
        context_tag: Option<&str>,
        history: &[ChatTurn],
    ) -> Result<RouterDecision, RouterError> {
        let raw = self.classify(utterance, context_tag, history).await?;
        self.dispatch(raw, utterance).await
    }

    /// One model call over the utterance, context tag, and trimmed history
    async fn classify(
        &self,
        utterance: &str,
        context_tag: Option<&str>,
        history: &[ChatTurn],
    ) -> Result<RawDecision, RouterError> {
        let mut system = String::from(SYSTEM_HEADER);
        system.push_str("\n\nCapabilities:\n- studio: builds a complete project (plan plus every useful asset). Use it for broad \"help me launch/build/create X\" requests.\n");
        for (id, description) in self.catalog.describe_all() {
            system.push_str(&format!("- {id}: {description}\n"));
        }

        let mut user = String::new();
        if let Some(tag) = context_tag {
            user.push_str(&format!("Context: {tag}\n"));
        }
        let start = history.len().saturating_sub(self.history_window);
        for turn in &history[start..] {
            let role = match turn.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            };
            user.push_str(&format!("{role}: {}\n", turn.content));
        }
        user.push_str(&format!("user: {utterance}"));

        let messages = [Message::system(system), Message::user(user)];

        let completion = self
            .model
            .complete(&messages)
            .await
            .map_err(|e| RouterError::ClassificationFailed(e.to_string()))?;

        parse_raw(&completion).ok_or_else(|| {
            RouterError::ClassificationFailed("unparseable classifier output".to_string())
        })
    }

    /// Deterministic dispatch of a raw decision into its final shape
    async fn dispatch(
        &self,
        raw: RawDecision,
        utterance: &str,
    ) -> Result<RouterDecision, RouterError> {
        match raw.action.as_str() {
            "reply" => {
                let message = raw.message.filter(|m| !m.trim().is_empty()).ok_or_else(|| {
                    RouterError::ClassificationFailed("reply without a message".to_string())
                })?;
                Ok(RouterDecision::Response { message })
            }
            "open" => {
                let destination = raw
                    .destination
                    .as_deref()
                    .and_then(Destination::parse)
                    .ok_or_else(|| {
                        RouterError::ClassificationFailed(format!(
                            "unknown destination '{}'",
                            raw.destination.unwrap_or_default()
                        ))
                    })?;
                Ok(RouterDecision::Redirect {
                    destination,
                    message: raw
                        .message
                        .unwrap_or_else(|| format!("Opening {destination}.")),
                    forwarded_prompt: raw.prompt,
                    bundle: None,
                })
            }
            "tool" => {
                let capability = raw
                    .tool
                    .as_deref()
                    .and_then(ChatCapability::parse)
                    .ok_or_else(|| {
                        RouterError::ClassificationFailed(format!(
                            "unknown capability '{}'",
                            raw.tool.unwrap_or_default()
                        ))
                    })?;
                self.invoke(capability, raw.message, raw.prompt, utterance)
                    .await
            }
            other => Err(RouterError::ClassificationFailed(format!(
                "unknown action '{other}'"
            ))),
        }
    }

    /// Invoke a capability. The match over [`ChatCapability`] is where the
    /// studio normalization lives: the compound capability cannot produce a
    /// `ToolResult`, its bundle always leaves as a redirect.
    async fn invoke(
        &self,
        capability: ChatCapability,
        message: Option<String>,
        prompt: Option<String>,
        utterance: &str,
    ) -> Result<RouterDecision, RouterError> {
        match capability {
            ChatCapability::Studio => {
                let goal = prompt.unwrap_or_else(|| utterance.to_string());
                let bundle = self.studio.run(SelectionRequest::new(goal.clone())).await?;
                Ok(RouterDecision::Redirect {
                    destination: Destination::Studio,
                    message: STUDIO_REDIRECT_MESSAGE.to_string(),
                    forwarded_prompt: Some(goal),
                    bundle: Some(bundle),
                })
            }
            ChatCapability::Tool(tool) => {
                let context = prompt.as_deref().unwrap_or(utterance);
                let payload = self
                    .catalog
                    .invoke(tool, context)
                    .await
                    .map_err(|source| RouterError::Generation { tool, source })?;
                Ok(RouterDecision::ToolResult {
                    tool,
                    message: message.unwrap_or_else(|| format!("Here is your {tool}.")),
                    payload,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LLMProvider;
    use crate::studio::Selector;
    use async_trait::async_trait;
    use std::time::Duration;

    struct SilentModel;

    #[async_trait]
    impl LLMProvider for SilentModel {
        fn name(&self) -> &str {
            "mock"
        }

        async fn generate(&self, _messages: &[Message]) -> crate::llm::Result<String> {
            Ok(String::new())
        }
    }

    fn router() -> ChatRouter {
        let model = Arc::new(ModelRouter::new(
            vec![Box::new(SilentModel)],
            "mock",
            Duration::from_secs(5),
        ));
        let catalog = Arc::new(Catalog::new(Arc::clone(&model)));
        let studio = Arc::new(Studio::new(
            Selector::new(Arc::clone(&model)),
            Arc::clone(&catalog),
        ));
        ChatRouter::new(model, catalog, studio)
    }

    fn raw(action: &str) -> RawDecision {
        RawDecision {
            action: action.to_string(),
            message: None,
            tool: None,
            destination: None,
            prompt: None,
        }
    }

    #[tokio::test]
    async fn test_dispatch_reply() {
        let mut decision = raw("reply");
        decision.message = Some("Bonjour!".to_string());

        let result = router().dispatch(decision, "hi").await.unwrap();
        assert_eq!(
            result,
            RouterDecision::Response {
                message: "Bonjour!".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_dispatch_reply_without_message_fails_classification() {
        let result = router().dispatch(raw("reply"), "hi").await;
        assert!(matches!(result, Err(RouterError::ClassificationFailed(_))));
    }

    #[tokio::test]
    async fn test_dispatch_open_gallery() {
        let mut decision = raw("open");
        decision.destination = Some("gallery".to_string());

        let result = router().dispatch(decision, "show my projects").await.unwrap();
        match result {
            RouterDecision::Redirect {
                destination,
                bundle,
                ..
            } => {
                assert_eq!(destination, Destination::Gallery);
                assert!(bundle.is_none());
            }
            other => panic!("expected a redirect, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dispatch_unknown_destination_fails_classification() {
        let mut decision = raw("open");
        decision.destination = Some("basement".to_string());

        let result = router().dispatch(decision, "hi").await;
        assert!(matches!(result, Err(RouterError::ClassificationFailed(_))));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_action_fails_classification() {
        let result = router().dispatch(raw("dance"), "hi").await;
        assert!(matches!(result, Err(RouterError::ClassificationFailed(_))));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool_fails_classification() {
        let mut decision = raw("tool");
        decision.tool = Some("hologram".to_string());

        let result = router().dispatch(decision, "hi").await;
        assert!(matches!(result, Err(RouterError::ClassificationFailed(_))));
    }

    #[test]
    fn test_history_trimming_window() {
        let history: Vec<ChatTurn> = (0..25).map(|i| ChatTurn::user(format!("turn {i}"))).collect();
        let window = HISTORY_WINDOW;
        let start = history.len().saturating_sub(window);
        let kept = &history[start..];
        assert_eq!(kept.len(), window);
        assert_eq!(kept[0].content, "turn 15");
    }
}
