//! Interactive chat loop over stdin.
//!
//! Each line is one turn. Lines starting with `/` are commands:
//! `/clear` drops the short-term window, `/exit` ends the session.
//! Ctrl-C cancels the turn in flight and ends the session.

use std::io::Write;

use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use bytebond_core::profile::provider::ProfileProvider;
use bytebond_observe::genai_attrs::OP_CHAT;
use bytebond_types::error::TurnError;

use crate::state::AppState;

use super::render::print_reply;

/// Slash commands available in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    Clear,
    Exit,
    Unknown(String),
}

/// Parse input as a slash command; `None` for an ordinary message.
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed.split_whitespace().next().unwrap_or(trimmed).to_lowercase();
    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

fn print_help() {
    println!();
    println!("  {}", style("Commands:").bold());
    println!("  {}   forget the recent conversation", style("/clear").cyan());
    println!("  {}    end the session", style("/exit").cyan());
    println!("  {}    show this help", style("/help").cyan());
    println!();
}

/// Run the chat loop until EOF, `/exit`, or cancellation.
pub async fn run_chat(
    state: &AppState,
    user: &str,
    cancel: &CancellationToken,
    quiet: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    let profile = state
        .orchestrator
        .profiles()
        .get_user_profile(user)
        .await
        .map_err(|_| TurnError::ProfileNotFound {
            user_id: user.to_string(),
        })?;
    let name = state.orchestrator.config().persona.assistant_name.clone();

    if !quiet {
        println!();
        println!(
            "  {} is listening, {} (type {} for commands)",
            style(&name).cyan().bold(),
            style(&profile.name).bold(),
            style("/help").cyan()
        );
        println!();
    }

    let span = tracing::info_span!("cli", gen_ai.operation.name = OP_CHAT, user_id = user);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut turns = 0u32;

    async {
        loop {
            if !quiet {
                print!("{} ", style("you>").green().bold());
                std::io::stdout().flush()?;
            }

            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = cancel.cancelled() => break,
            };
            let Some(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }

            match parse_command(&line) {
                Some(ChatCommand::Exit) => break,
                Some(ChatCommand::Help) => print_help(),
                Some(ChatCommand::Clear) => {
                    let removed = state.orchestrator.clear_history(user).await?;
                    println!("  {} forgot {removed} recent messages", style("~").dim());
                }
                Some(ChatCommand::Unknown(cmd)) => {
                    println!("  {} unknown command {cmd}", style("?").yellow());
                }
                None => match state.orchestrator.process_turn(user, &line, cancel).await {
                    Ok(report) => {
                        turns += 1;
                        print_reply(&name, &report, verbose);
                    }
                    Err(TurnError::Cancelled) => break,
                    Err(e) => return Err(e.into()),
                },
            }
        }
        Ok::<_, anyhow::Error>(())
    }
    .instrument(span)
    .await?;

    tracing::info!(user_id = user, turns, "chat ended");
    if !quiet {
        println!();
        println!("  {} {turns} turns, see you soon", style("bye").dim());
    }
    Ok(())
}
