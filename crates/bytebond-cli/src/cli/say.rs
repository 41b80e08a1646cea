//! One-shot `say` command.

use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use bytebond_observe::genai_attrs::OP_SAY;

use crate::state::AppState;

use super::render::print_reply;

/// Run a single turn and print the reply.
pub async fn run_say(
    state: &AppState,
    user: &str,
    message: &str,
    cancel: &CancellationToken,
    json: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    let span = tracing::info_span!("cli", gen_ai.operation.name = OP_SAY, user_id = user);
    let report = state
        .orchestrator
        .process_turn(user, message, cancel)
        .instrument(span)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report.summary_json())?);
    } else {
        let name = &state.orchestrator.config().persona.assistant_name;
        print_reply(name, &report, verbose);
    }
    Ok(())
}
