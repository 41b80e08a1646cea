//! Google Gemini REST backend (generation and embeddings).

pub mod client;
pub mod embedder;
pub mod types;

pub use client::GeminiBackend;
pub use embedder::GeminiEmbedder;

use std::time::Duration;

use bytebond_types::llm::LlmError;

use self::types::GeminiErrorBody;

/// Public Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Upper bound for a single HTTP exchange. Per-attempt timeouts are
/// enforced separately by the generation client.
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

pub(crate) fn http_client() -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| LlmError::Provider {
            message: format!("failed to create HTTP client: {e}"),
        })
}

/// Path of a model method, e.g. `/v1beta/models/gemini-1.5-flash:generateContent`.
pub(crate) fn model_path(model: &str, method: &str) -> String {
    let model = model.strip_prefix("models/").unwrap_or(model);
    format!("/v1beta/models/{model}:{method}")
}

/// Map a non-success HTTP status and body to an [`LlmError`].
pub(crate) fn status_error(status: u16, retry_after_secs: Option<u64>, body: &str) -> LlmError {
    let message = serde_json::from_str::<GeminiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited {
            retry_after_ms: retry_after_secs.map(|s| s * 1000),
        },
        400 | 404 => LlmError::InvalidRequest(message),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {message}"),
        },
    }
}

pub(crate) fn retry_after_secs(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
