//! `config` command: show the resolved configuration.

use std::path::Path;

use console::style;

use bytebond_infra::filesystem::{memory_journal_path, profiles_path};
use bytebond_infra::secret::env::{EnvSecretProvider, GEMINI_API_KEY};
use bytebond_types::config::CompanionConfig;

/// Print the configuration after defaults and file overrides are applied.
pub fn show_config(data_dir: &Path, config: &CompanionConfig, json: bool) -> anyhow::Result<()> {
    let key_present = EnvSecretProvider::new().get(GEMINI_API_KEY).is_some();

    if json {
        let out = serde_json::json!({
            "data_dir": data_dir.display().to_string(),
            "profiles": profiles_path(data_dir).display().to_string(),
            "memory_journal": memory_journal_path(data_dir).display().to_string(),
            "gemini_api_key": key_present,
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  {} {}", style("data dir:").bold(), data_dir.display());
    println!("  {} {}", style("profiles:").bold(), profiles_path(data_dir).display());
    println!(
        "  {} {}",
        style("memory:").bold(),
        memory_journal_path(data_dir).display()
    );
    let key_status = if key_present {
        style("set").green()
    } else {
        style("missing, generation unavailable").red()
    };
    println!("  {} {key_status}", style("gemini key:").bold());
    println!();
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
