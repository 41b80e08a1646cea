//! ByteBond command-line entry point.
//!
//! Binary name: `bytebond`
//!
//! Parses arguments, sets up tracing, loads configuration, wires the
//! orchestrator and dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use bytebond_infra::config::load_config;
use bytebond_infra::filesystem::resolve_data_dir;
use bytebond_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_directive = if cli.quiet && cli.verbose == 0 {
        "error"
    } else {
        TracingOptions::directive_for_verbosity(cli.verbose)
    };
    init_tracing(&TracingOptions {
        default_directive: default_directive.to_string(),
        json: cli.log_json,
        enable_otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let data_dir = cli.data_dir.clone().unwrap_or_else(resolve_data_dir);
    let config = load_config(&data_dir).await;

    if let Commands::Config = cli.command {
        return cli::config::show_config(&data_dir, &config, cli.json);
    }

    let state = AppState::init(data_dir, config).await?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted");
            on_interrupt.cancel();
        }
    });

    let verbose = cli.verbose > 0;
    match cli.command {
        Commands::Say { user, message } => {
            let message = message.join(" ");
            cli::say::run_say(&state, &user, &message, &cancel, cli.json, verbose).await?;
        }
        Commands::Chat { user } => {
            cli::chat::run_chat(&state, &user, &cancel, cli.quiet, verbose).await?;
        }
        Commands::Memory { action } => {
            cli::memory::run_memory(&state, action, cli.json).await?;
        }
        Commands::Config => {}
    }

    Ok(())
}
