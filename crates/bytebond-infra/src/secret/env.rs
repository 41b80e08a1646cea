//! Environment variable secret lookup.
//!
//! Key resolution: `BYTEBOND_{KEY}` first, then `{KEY}` directly
//! (e.g. `BYTEBOND_GEMINI_API_KEY`, then `GEMINI_API_KEY`). Values are
//! wrapped in [`SecretString`] as soon as they are read.

use secrecy::SecretString;

/// Env var holding the Gemini API key.
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Read-only environment variable secret provider.
#[derive(Debug, Default)]
pub struct EnvSecretProvider;

impl EnvSecretProvider {
    pub fn new() -> Self {
        Self
    }

    /// Look up `key`, preferring the `BYTEBOND_`-prefixed variable.
    ///
    /// Empty values and values that are not valid Unicode count as absent.
    pub fn get(&self, key: &str) -> Option<SecretString> {
        [format!("BYTEBOND_{key}"), key.to_string()]
            .iter()
            .find_map(|name| match std::env::var(name) {
                Ok(val) if !val.trim().is_empty() => Some(SecretString::from(val)),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_env_provider_get_existing() {
        // SAFETY: the variable name is unique to this test.
        unsafe { std::env::set_var("BYTEBOND_TEST_SECRET_1", "test-value-123") };

        let provider = EnvSecretProvider::new();
        let result = provider.get("BYTEBOND_TEST_SECRET_1").unwrap();
        assert_eq!(result.expose_secret(), "test-value-123");

        // SAFETY: the variable was set above by this test only.
        unsafe { std::env::remove_var("BYTEBOND_TEST_SECRET_1") };
    }

    #[test]
    fn test_env_provider_prefers_prefixed() {
        // SAFETY: the variable names are unique to this test.
        unsafe {
            std::env::set_var("TEST_SECRET_2", "plain");
            std::env::set_var("BYTEBOND_TEST_SECRET_2", "prefixed");
        }

        let provider = EnvSecretProvider::new();
        assert_eq!(provider.get("TEST_SECRET_2").unwrap().expose_secret(), "prefixed");

        // SAFETY: the variables were set above by this test only.
        unsafe {
            std::env::remove_var("TEST_SECRET_2");
            std::env::remove_var("BYTEBOND_TEST_SECRET_2");
        }
    }

    #[test]
    fn test_env_provider_get_missing() {
        let provider = EnvSecretProvider::new();
        assert!(provider.get("NONEXISTENT_VAR_XYZ_123").is_none());
    }

    #[test]
    fn test_env_provider_blank_is_missing() {
        // SAFETY: the variable name is unique to this test.
        unsafe { std::env::set_var("TEST_SECRET_BLANK_3", "   ") };
        assert!(EnvSecretProvider::new().get("TEST_SECRET_BLANK_3").is_none());
        // SAFETY: set above by this test only.
        unsafe { std::env::remove_var("TEST_SECRET_BLANK_3") };
    }
}
