//! CLI interface for Atelier
//!
//! This module provides the command-line interface using clap's derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Atelier Creative Engine
///
/// Turns a single free-form request into a bundle of generated assets
/// (plan, copy, palette, persona, deck, code, mind map, agenda) by
/// orchestrating model-backed studio tools.
#[derive(Parser, Debug)]
#[command(name = "atelier")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a full studio orchestration for a goal
    Run {
        /// The project goal, free form
        goal: String,

        /// Optional role/profession hint (e.g. "director")
        #[arg(long)]
        role: Option<String>,
    },

    /// Send one message through the conversational router
    Chat {
        /// The message
        message: String,

        /// Optional context tag describing where the user currently is
        #[arg(long)]
        context: Option<String>,
    },

    /// List the studio tool catalog
    Tools,

    /// Validate configuration and check provider health
    Doctor,
}
