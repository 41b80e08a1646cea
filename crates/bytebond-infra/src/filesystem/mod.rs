//! Data directory resolution.

use std::path::{Path, PathBuf};

/// File holding user profiles, personas and concerns.
pub const PROFILES_FILE: &str = "profiles.toml";

/// Append-only journal of long-term memory records.
pub const MEMORY_JOURNAL_FILE: &str = "memory.jsonl";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `BYTEBOND_DATA_DIR` environment variable
/// 2. `~/.bytebond`
/// 3. `.bytebond` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BYTEBOND_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".bytebond");
    }

    PathBuf::from(".bytebond")
}

/// Path of the profiles file inside `data_dir`.
pub fn profiles_path(data_dir: &Path) -> PathBuf {
    data_dir.join(PROFILES_FILE)
}

/// Path of the long-term memory journal inside `data_dir`.
pub fn memory_journal_path(data_dir: &Path) -> PathBuf {
    data_dir.join(MEMORY_JOURNAL_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_path() {
        let path = profiles_path(Path::new("/tmp/bb"));
        assert_eq!(path, PathBuf::from("/tmp/bb/profiles.toml"));
    }

    #[test]
    fn test_memory_journal_path() {
        let path = memory_journal_path(Path::new("/tmp/bb"));
        assert_eq!(path, PathBuf::from("/tmp/bb/memory.jsonl"));
    }

    #[test]
    fn test_resolve_data_dir_is_never_empty() {
        assert!(!resolve_data_dir().as_os_str().is_empty());
    }
}
