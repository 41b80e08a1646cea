//! Styled terminal output for turn reports.

use console::style;

use bytebond_core::orchestrator::stage::{Degradation, TurnReport, WriteStatus};

/// Print the companion's reply, and with `verbose` the turn diagnostics.
pub fn print_reply(assistant_name: &str, report: &TurnReport, verbose: bool) {
    let name = style(assistant_name).cyan().bold();
    if report.reply.is_apology() {
        println!("{name}: {}", style(report.reply.text()).dim());
    } else {
        println!("{name}: {}", report.reply.text());
    }

    if verbose {
        print_diagnostics(report);
    }
}

fn print_diagnostics(report: &TurnReport) {
    for hit in &report.retrieved {
        eprintln!(
            "  {} recalled memory {} (similarity {:.3})",
            style("~").dim(),
            hit.record.id,
            hit.similarity
        );
    }
    for degradation in &report.degradations {
        eprintln!("  {} {}", style("!").yellow().bold(), describe(degradation));
    }
    if let WriteStatus::Failed(reason) = &report.persistence.long_term {
        eprintln!("  {} long-term memory not saved: {reason}", style("!").yellow().bold());
    }
}

/// One-line human description of a degradation.
pub fn describe(degradation: &Degradation) -> String {
    match degradation {
        Degradation::EmbeddingFailure(reason) => format!("memory lookup skipped: {reason}"),
        Degradation::RetrievalFailure(reason) => format!("memory lookup failed: {reason}"),
        Degradation::GenerationExhausted { attempts } => {
            format!("no reply after {attempts} attempts")
        }
        Degradation::PersistenceFailure(reason) => format!("memory write failed: {reason}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_exhausted() {
        assert_eq!(
            describe(&Degradation::GenerationExhausted { attempts: 7 }),
            "no reply after 7 attempts"
        );
    }

    #[test]
    fn test_describe_embedding() {
        assert_eq!(
            describe(&Degradation::EmbeddingFailure("empty input".to_string())),
            "memory lookup skipped: empty input"
        );
    }
}
