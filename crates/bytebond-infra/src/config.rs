//! Companion configuration loader for ByteBond.
//!
//! Reads `config.toml` from the data directory (`~/.bytebond/` in production)
//! and deserializes it into [`CompanionConfig`]. Falls back to defaults
//! when the file is missing or malformed.

use std::path::Path;

use bytebond_types::config::CompanionConfig;

/// Load companion configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`CompanionConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config, with `history_window` clamped to
///   the short-term capacity.
pub async fn load_config(data_dir: &Path) -> CompanionConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return CompanionConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return CompanionConfig::default();
        }
    };

    match toml::from_str::<CompanionConfig>(&content) {
        Ok(config) => normalize(config),
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            CompanionConfig::default()
        }
    }
}

fn normalize(mut config: CompanionConfig) -> CompanionConfig {
    if config.memory.history_window > config.memory.short_term_capacity {
        tracing::warn!(
            history_window = config.memory.history_window,
            short_term_capacity = config.memory.short_term_capacity,
            "history_window exceeds short_term_capacity, clamping"
        );
        config.memory.history_window = config.memory.short_term_capacity;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytebond_types::profile::PersonaMode;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config, CompanionConfig::default());
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
apology = "Talk soon!"

[generation]
max_attempts = 4

[persona]
mode = "minimal"
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.apology, "Talk soon!");
        assert_eq!(config.generation.max_attempts, 4);
        assert_eq!(config.persona.mode, PersonaMode::Minimal);
        assert_eq!(config.memory.history_window, 10);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config, CompanionConfig::default());
    }

    #[tokio::test]
    async fn load_config_clamps_history_window() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            "[memory]\nshort_term_capacity = 6\nhistory_window = 20\n",
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.memory.history_window, 6);
    }
}
