//! Studio Orchestrator
//!
//! Turns one free-form request into a bundle of generated assets:
//!
//! 1. The selector classifies the request into a set of catalog tools.
//! 2. The plan tool runs alone first; its title and brief seed the shared
//!    context string.
//! 3. The remaining tools fan out concurrently over that context.
//! 4. The settled outcomes are folded into a [`ProjectBundle`]; individual
//!    failures are tolerated and logged, only selection or seed failures
//!    abort the run.
//!
//! A run is stateless: everything it needs is in the request, and nothing
//! survives it but the returned bundle.

pub mod bundle;
pub mod fanout;
pub mod selector;

pub use bundle::{BundleBuilder, ProjectBundle};
pub use fanout::TaskOutcome;
pub use selector::{Selection, SelectionRequest, Selector};

use crate::catalog::{Catalog, GenerationError, ProjectPlan};
use std::sync::Arc;

/// Fatal orchestration errors. Fan-out failures are NOT represented here;
/// they are tolerated per task and only visible in logs.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// The classifier produced no usable tool ids
    #[error("tool selection failed: {0}")]
    SelectionFailed(String),

    /// The seed plan failed or came back incomplete
    #[error("project plan generation failed: {0}")]
    SeedFailed(#[source] GenerationError),
}

/// The orchestration engine
pub struct Studio {
    selector: Selector,
    catalog: Arc<Catalog>,
}

impl Studio {
    pub fn new(selector: Selector, catalog: Arc<Catalog>) -> Self {
        Self { selector, catalog }
    }

    /// Run one orchestration: select, seed, fan out, aggregate.
    pub async fn run(&self, request: SelectionRequest) -> Result<ProjectBundle, StudioError> {
        tracing::info!(goal = %request.goal, "starting studio run");

        let selection = self.selector.select(&request).await?;
        tracing::info!(tools = ?selection.tools(), "tools selected");

        // Seed: strictly before fan-out; any failure here is fatal.
        let plan = self
            .catalog
            .generate_plan(&request.goal)
            .await
            .map_err(StudioError::SeedFailed)?;
        tracing::info!(title = %plan.title, "project plan ready");

        // Derived exactly once; read-only for every fan-out task.
        let context = compose_context(&request.goal, &plan);

        let fan_out = selection.fan_out_tools();
        let outcomes = fanout::run(&self.catalog, &fan_out, &context).await;

        let bundle = outcomes
            .into_iter()
            .fold(BundleBuilder::new(request.goal, plan), BundleBuilder::settle)
            .finish();

        tracing::info!(
            bundle_id = %bundle.id,
            fulfilled = bundle.fulfilled_count(),
            requested = fan_out.len(),
            "studio run complete"
        );

        Ok(bundle)
    }
}

/// The shared context string handed to every fan-out task
fn compose_context(goal: &str, plan: &ProjectPlan) -> String {
    format!(
        "Project goal: {goal}\nProject title: {}\nCreative brief: {}",
        plan.title, plan.brief
    )
}
