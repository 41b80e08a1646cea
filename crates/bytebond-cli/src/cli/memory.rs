//! `memory` subcommands: count or erase a user's long-term memory.

use clap::Subcommand;
use console::style;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum MemoryCommand {
    /// Show how many exchanges are remembered for a user.
    Count {
        #[arg(short, long)]
        user: String,
    },

    /// Erase every remembered exchange for a user.
    Forget {
        #[arg(short, long)]
        user: String,

        /// Skip the confirmation check.
        #[arg(long)]
        yes: bool,
    },
}

pub async fn run_memory(state: &AppState, action: MemoryCommand, json: bool) -> anyhow::Result<()> {
    let memory = state.orchestrator.memory();
    match action {
        MemoryCommand::Count { user } => {
            let count = memory.count(&user).await?;
            if json {
                println!("{}", serde_json::json!({ "user_id": user, "records": count }));
            } else {
                println!("  {} remembers {count} exchanges with {user}", style("~").dim());
            }
        }
        MemoryCommand::Forget { user, yes } => {
            if !yes {
                anyhow::bail!("refusing to erase memories for '{user}' without --yes");
            }
            let removed = memory.delete_all(&user).await?;
            if json {
                println!("{}", serde_json::json!({ "user_id": user, "removed": removed }));
            } else {
                println!("  {} erased {removed} memories for {user}", style("✓").green());
            }
        }
    }
    Ok(())
}
