//! Command handlers for CLI operations
//!
//! This module implements the handlers for all CLI commands:
//! - run: Execute a full studio orchestration
//! - chat: Route one message through the conversational router
//! - tools: List the tool catalog
//! - doctor: Validate configuration and check provider health

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::Catalog;
use crate::chat::{ChatRouter, RouterDecision, RouterError};
use crate::config::Config;
use crate::llm::anthropic::{self, AnthropicProvider};
use crate::llm::failover::ModelRouter;
use crate::llm::ollama::OllamaProvider;
use crate::llm::openai::{self, OpenAIProvider};
use crate::llm::LLMProvider;
use crate::studio::{ProjectBundle, SelectionRequest, Selector, Studio};

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

/// Assemble the model router from configuration.
///
/// Ollama is always registered. Cloud providers are registered only when
/// their API key is present in the environment, so a bare install still
/// works against a local model.
fn build_model_router(config: &Config) -> Arc<ModelRouter> {
    let mut providers: Vec<Box<dyn LLMProvider>> = Vec::new();

    providers.push(Box::new(OllamaProvider::new(
        config.llm.ollama.base_url.clone(),
        config.llm.ollama.model.clone(),
    )));

    if std::env::var(openai::API_KEY_ENV).is_ok() {
        providers.push(Box::new(OpenAIProvider::new(config.llm.openai.clone())));
    }

    if std::env::var(anthropic::API_KEY_ENV).is_ok() {
        providers.push(Box::new(AnthropicProvider::new(
            config.llm.anthropic.clone(),
        )));
    }

    Arc::new(ModelRouter::new(
        providers,
        config.llm.default_provider.clone(),
        Duration::from_secs(config.llm.request_timeout_secs),
    ))
}

fn build_studio(model: &Arc<ModelRouter>) -> (Arc<Catalog>, Arc<Studio>) {
    let catalog = Arc::new(Catalog::new(Arc::clone(model)));
    let studio = Arc::new(Studio::new(
        Selector::new(Arc::clone(model)),
        Arc::clone(&catalog),
    ));
    (catalog, studio)
}

/// Run a full studio orchestration for a goal
pub async fn handle_run(
    goal: String,
    role: Option<String>,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let model = build_model_router(config);
    let (_catalog, studio) = build_studio(&model);

    let mut request = SelectionRequest::new(goal);
    if let Some(role) = role {
        request = request.with_role(role);
    }

    let bundle = studio
        .run(request)
        .await
        .context("studio orchestration failed")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&bundle)?);
        }
        OutputFormat::Text => print_bundle(&bundle),
    }

    Ok(())
}

fn print_bundle(bundle: &ProjectBundle) {
    println!("# {}", bundle.plan.title);
    println!("{}\n", bundle.plan.brief);

    if let Some(copy) = &bundle.copy {
        println!("Copy: {} / {}", copy.headline, copy.body);
    }
    if let Some(palette) = &bundle.palette {
        let swatches: Vec<String> = palette
            .colors
            .iter()
            .map(|c| format!("{} {}", c.hex, c.name))
            .collect();
        println!("Palette: {}", swatches.join(", "));
    }
    if let Some(persona) = &bundle.persona {
        println!("Persona: {} / {}", persona.name, persona.bio);
    }
    if let Some(deck) = &bundle.deck {
        println!("Deck: {} ({} slides)", deck.title, deck.slides.len());
    }
    if let Some(code) = &bundle.code {
        println!("Code: {} snippet ({} bytes)", code.language, code.code.len());
    }
    if let Some(map) = &bundle.mind_map {
        println!("Mind map: {} ({} branches)", map.root, map.branches.len());
    }
    if let Some(agenda) = &bundle.agenda {
        for event in agenda {
            println!("Agenda: {}", event.title);
        }
    }

    println!("\nBundle {} ({} assets)", bundle.id, bundle.fulfilled_count());
}

/// Route one message through the conversational router.
///
/// Router errors are conversational, not fatal: they are printed as an
/// error turn and the command still exits cleanly.
pub async fn handle_chat(
    message: String,
    context_tag: Option<String>,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let model = build_model_router(config);
    let (catalog, studio) = build_studio(&model);
    let router = ChatRouter::new(model, catalog, studio)
        .with_history_window(config.chat.history_window);

    let decision = router.route(&message, context_tag.as_deref(), &[]).await;

    match decision {
        Ok(decision) => match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&decision)?);
            }
            OutputFormat::Text => print_decision(&decision),
        },
        Err(e) => {
            let turn = error_turn(&e);
            match format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::json!({ "kind": "error", "message": turn })
                    );
                }
                OutputFormat::Text => println!("{turn}"),
            }
        }
    }

    Ok(())
}

fn print_decision(decision: &RouterDecision) {
    match decision {
        RouterDecision::Response { message } => println!("{message}"),
        RouterDecision::ToolResult {
            tool,
            message,
            payload,
        } => {
            println!("{message}");
            println!(
                "[{tool}] {}",
                serde_json::to_string_pretty(payload).unwrap_or_default()
            );
        }
        RouterDecision::Redirect {
            destination,
            message,
            bundle,
            ..
        } => {
            println!("{message}");
            println!("-> open {destination}");
            if let Some(bundle) = bundle {
                print_bundle(bundle);
            }
        }
    }
}

/// Human-readable error turn for a failed router invocation
fn error_turn(error: &RouterError) -> String {
    match error {
        RouterError::ClassificationFailed(_) => {
            "Sorry, I could not work out what to do with that. Could you rephrase?".to_string()
        }
        RouterError::Generation { tool, .. } => {
            format!("Sorry, the {tool} tool failed this time. Please try again.")
        }
        RouterError::Studio(_) => {
            "Sorry, I could not generate a plan for that project.".to_string()
        }
    }
}

/// List the studio tool catalog
pub fn handle_tools(config: &Config, format: OutputFormat) -> Result<()> {
    let model = build_model_router(config);
    let catalog = Catalog::new(model);

    match format {
        OutputFormat::Json => {
            let listing: Vec<_> = catalog
                .describe_all()
                .into_iter()
                .map(|(id, description)| serde_json::json!({ "id": id, "description": description }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        OutputFormat::Text => {
            for (id, description) in catalog.describe_all() {
                println!("{id:<10} {description}");
            }
        }
    }

    Ok(())
}

/// Validate configuration and check provider health
pub async fn handle_doctor(config: &Config, format: OutputFormat) -> Result<()> {
    config.validate().context("configuration is invalid")?;

    let model = build_model_router(config);
    let health = model.check_health().await;

    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = health
                .iter()
                .map(|(name, healthy)| serde_json::json!({ "provider": name, "healthy": healthy }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text => {
            println!("Configuration: OK");
            for (name, healthy) in health {
                let status = if healthy { "available" } else { "unavailable" };
                println!("{name:<10} {status}");
            }
        }
    }

    Ok(())
}
