//! Integration tests for the conversational router
//!
//! Validates the classify-and-dispatch protocol over a wiremock model
//! endpoint: exactly one decision shape per turn, and a studio invocation
//! always leaving as a redirect with the bundle attached.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use atelier_engine::catalog::{Catalog, ToolId, ToolPayload};
use atelier_engine::chat::{ChatRouter, ChatTurn, Destination, RouterDecision, RouterError};
use atelier_engine::llm::failover::ModelRouter;
use atelier_engine::llm::ollama::OllamaProvider;
use atelier_engine::llm::LLMProvider;
use atelier_engine::studio::{Selector, Studio};

fn ollama_reply(content: &str) -> serde_json::Value {
    json!({
        "model": "llama3.1:8b",
        "created_at": "2024-01-01T00:00:00Z",
        "message": { "role": "assistant", "content": content },
        "done": true
    })
}

fn router_for(server: &MockServer) -> ChatRouter {
    let provider =
        Box::new(OllamaProvider::new(server.uri(), "llama3.1:8b")) as Box<dyn LLMProvider>;
    let model = Arc::new(ModelRouter::new(
        vec![provider],
        "ollama",
        Duration::from_secs(5),
    ));
    let catalog = Arc::new(Catalog::new(Arc::clone(&model)));
    let studio = Arc::new(Studio::new(
        Selector::new(Arc::clone(&model)),
        Arc::clone(&catalog),
    ));
    ChatRouter::new(model, catalog, studio)
}

async fn mount_reply(server: &MockServer, marker: &str, content: &str) {
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_string_contains(marker))
        .respond_with(ResponseTemplate::new(200).set_body_json(ollama_reply(content)))
        .mount(server)
        .await;
}

/// Marker unique to the chat classification prompt
const CLASSIFY: &str = "conversational dispatcher";

#[tokio::test]
async fn test_direct_reply() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        CLASSIFY,
        r#"{"action": "reply", "message": "Hello! What shall we create today?"}"#,
    )
    .await;

    let router = router_for(&server);
    let decision = router.route("hi there", None, &[]).await.unwrap();

    assert_eq!(
        decision,
        RouterDecision::Response {
            message: "Hello! What shall we create today?".to_string()
        }
    );
}

#[tokio::test]
async fn test_single_tool_result_rendered_inline() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        CLASSIFY,
        r#"{"action": "tool", "tool": "palette", "message": "Here is a palette.", "prompt": "colors for a seaside bakery"}"#,
    )
    .await;
    mount_reply(
        &server,
        "art director",
        r##"{"colors": [{"hex": "#f4e8d7", "name": "Shortbread"}]}"##,
    )
    .await;

    let router = router_for(&server);
    let decision = router
        .route("I need colors for my bakery", None, &[])
        .await
        .unwrap();

    match decision {
        RouterDecision::ToolResult {
            tool,
            message,
            payload,
        } => {
            assert_eq!(tool, ToolId::Palette);
            assert_eq!(message, "Here is a palette.");
            assert!(matches!(payload, ToolPayload::Palette(_)));
        }
        other => panic!("expected a tool result, got {other:?}"),
    }
}

#[tokio::test]
async fn test_studio_invocation_always_redirects() {
    let server = MockServer::start().await;

    // The classifier picks the compound studio capability
    mount_reply(
        &server,
        CLASSIFY,
        r#"{"action": "tool", "tool": "studio", "prompt": "launch a podcast about AI"}"#,
    )
    .await;

    // The orchestration behind it
    mount_reply(&server, "dispatcher of a creative studio", r#"["plan", "palette"]"#).await;
    mount_reply(
        &server,
        "project planner",
        r#"{"title": "Signal & Noise", "brief": "A podcast about AI for filmmakers."}"#,
    )
    .await;
    mount_reply(
        &server,
        "art director",
        r##"{"colors": [{"hex": "#0a0a23", "name": "Midnight"}]}"##,
    )
    .await;

    let router = router_for(&server);
    let decision = router
        .route("help me launch a podcast about AI", None, &[])
        .await
        .unwrap();

    // Never a ToolResult: the bundle is not inline-renderable
    match decision {
        RouterDecision::Redirect {
            destination,
            forwarded_prompt,
            bundle,
            ..
        } => {
            assert_eq!(destination, Destination::Studio);
            assert_eq!(
                forwarded_prompt.as_deref(),
                Some("launch a podcast about AI")
            );
            let bundle = bundle.expect("redirect should carry the bundle");
            assert_eq!(bundle.plan.title, "Signal & Noise");
            assert!(bundle.palette.is_some());
        }
        other => panic!("expected a studio redirect, got {other:?}"),
    }
}

#[tokio::test]
async fn test_explicit_open_destination() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        CLASSIFY,
        r#"{"action": "open", "destination": "gallery", "message": "Opening your projects."}"#,
    )
    .await;

    let router = router_for(&server);
    let decision = router.route("show me my past projects", None, &[]).await.unwrap();

    match decision {
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
async fn test_unusable_classification_is_a_router_error() {
    let server = MockServer::start().await;
    mount_reply(&server, CLASSIFY, "Let me think about that out loud...").await;

    let router = router_for(&server);
    let result = router.route("hello?", None, &[]).await;

    assert!(matches!(result, Err(RouterError::ClassificationFailed(_))));
}

#[tokio::test]
async fn test_history_is_forwarded_to_the_classifier() {
    let server = MockServer::start().await;

    // Only answer when the history line is present in the prompt
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_string_contains(CLASSIFY))
        .and(body_string_contains("we talked about a bakery"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ollama_reply(
            r#"{"action": "reply", "message": "Back to the bakery."}"#,
        )))
        .mount(&server)
        .await;

    let router = router_for(&server);
    let history = vec![
        ChatTurn::user("we talked about a bakery"),
        ChatTurn::assistant("We did."),
    ];
    let decision = router.route("continue", Some("home"), &history).await.unwrap();

    assert!(matches!(decision, RouterDecision::Response { .. }));
}
