//! GeminiBackend -- [`GenerationBackend`] for the Gemini `generateContent` API.
//!
//! The API key is held as a [`SecretString`] and only exposed when the
//! request URL is built. It never appears in logs.

use secrecy::{ExposeSecret, SecretString};

use bytebond_core::llm::backend::GenerationBackend;
use bytebond_types::llm::{GenerationEnvelope, LlmError};

use super::types::GenerateContentRequest;
use super::{DEFAULT_BASE_URL, http_client, model_path, retry_after_secs, status_error};

/// Gemini generation backend.
///
/// Does not derive Debug so the key cannot leak through formatting.
pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    temperature: f64,
}

impl GeminiBackend {
    pub fn new(api_key: SecretString, model: String, temperature: f64) -> Result<Self, LlmError> {
        Ok(Self {
            client: http_client()?,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
            temperature,
        })
    }

    /// Override the base URL (proxies, local test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url, model_path(&self.model, "generateContent"))
    }

    fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest::single_prompt(prompt, self.temperature)
    }
}

impl GenerationBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<Option<GenerationEnvelope>, LlmError> {
        let body = self.build_request(prompt);

        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.expose_secret())])
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {}", e.without_url()),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_secs(response.headers());
            let error_body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), retry_after, &error_body));
        }

        let text = response.text().await.map_err(|e| LlmError::Provider {
            message: format!("failed to read response body: {}", e.without_url()),
        })?;
        parse_envelope(&text)
    }
}

/// Parse a `generateContent` body. An empty body is "no response".
fn parse_envelope(body: &str) -> Result<Option<GenerationEnvelope>, LlmError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(body)
        .map(Some)
        .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))
}
