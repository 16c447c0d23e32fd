//! CLI command definitions and dispatch for the `palaver` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a verb-noun
//! pattern (e.g., `palaver history list`, `palaver ask "hello"`).

pub mod ask;
pub mod history;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use palaver_infra::config::{CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE};

/// Relay chat completions and keep a shared conversation history.
#[derive(Parser)]
#[command(name = "palaver", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the configuration file.
    #[arg(long, global = true, env = CONFIG_PATH_ENV, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (overrides config).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config).
        #[arg(long)]
        host: Option<String>,
    },

    /// Send one message to the completion upstream and print the reply.
    Ask {
        /// Message text.
        message: String,
    },

    /// Inspect or modify the stored chat history.
    History {
        #[command(subcommand)]
        action: HistoryCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List every stored message, oldest first.
    #[command(alias = "ls")]
    List,

    /// Append one message.
    Add {
        /// Author role (e.g. user, assistant).
        role: String,

        /// Message text.
        content: String,
    },

    /// Remove every stored message.
    Clear {
        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}
