//! CLI command definitions for the `bytebond` binary.

pub mod chat;
pub mod config;
pub mod memory;
pub mod render;
pub mod say;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Talk to your ByteBond companion.
#[derive(Parser)]
#[command(name = "bytebond", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except replies and errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed logs (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    /// Data directory holding config.toml, profiles.toml and the memory journal.
    #[arg(long, global = true, env = "BYTEBOND_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send one message and print the reply.
    Say {
        /// User id as listed in profiles.toml.
        #[arg(short, long)]
        user: String,

        /// The message to send.
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Start an interactive chat session.
    Chat {
        /// User id as listed in profiles.toml.
        #[arg(short, long)]
        user: String,
    },

    /// Print the resolved configuration.
    Config,

    /// Inspect or erase a user's long-term memory.
    Memory {
        #[command(subcommand)]
        action: memory::MemoryCommand,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_say_joins_words() {
        let cli = Cli::parse_from(["bytebond", "say", "--user", "alex", "hello", "there"]);
        match cli.command {
            Commands::Say { user, message } => {
                assert_eq!(user, "alex");
                assert_eq!(message.join(" "), "hello there");
            }
            _ => panic!("expected say"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["bytebond", "chat", "-u", "alex", "--json", "-vv"]);
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
    }
}
