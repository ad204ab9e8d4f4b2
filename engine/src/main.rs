// Atelier Creative Engine
// Main entry point for the atelier binary

use clap::Parser;

use atelier_engine::cli::{Cli, Command};
use atelier_engine::config::Config;
use atelier_engine::handlers::{
    handle_chat, handle_doctor, handle_run, handle_tools, OutputFormat,
};
use atelier_engine::telemetry::{init_telemetry, init_telemetry_with_level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Pick up API keys from a local .env, when present
    dotenvy::dotenv().ok();

    // Initialize basic telemetry first (before config is loaded)
    init_telemetry();

    tracing::info!("Atelier Engine v{}", env!("CARGO_PKG_VERSION"));

    // Determine output format
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    // Re-initialize telemetry with the CLI override or config-driven level
    // (only takes effect if RUST_LOG env var is not set)
    let level = cli.log.as_deref().unwrap_or(&config.core.log_level);
    init_telemetry_with_level(level);

    match cli.command {
        Command::Run { goal, role } => handle_run(goal, role, &config, format).await,

        Command::Chat { message, context } => handle_chat(message, context, &config, format).await,

        Command::Tools => handle_tools(&config, format),

        Command::Doctor => handle_doctor(&config, format).await,
    }
}
