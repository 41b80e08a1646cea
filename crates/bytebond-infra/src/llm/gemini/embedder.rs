//! GeminiEmbedder -- [`Embedder`] for the Gemini `embedContent` API.

use secrecy::{ExposeSecret, SecretString};

use bytebond_core::memory::embedder::Embedder;
use bytebond_types::error::EmbeddingError;

use super::types::{EmbedContentRequest, EmbedContentResponse, GeminiContent};
use super::{DEFAULT_BASE_URL, http_client, model_path, retry_after_secs, status_error};

/// Gemini embedding backend.
///
/// Requests `output_dimensionality` equal to the configured dimension so
/// vectors line up with the long-term memory index.
pub struct GeminiEmbedder {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    dimension: usize,
}

impl GeminiEmbedder {
    pub fn new(api_key: SecretString, model: String, dimension: usize) -> Result<Self, EmbeddingError> {
        let client = http_client().map_err(|e| EmbeddingError::Backend(e.to_string()))?;
        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
            dimension,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url, model_path(&self.model, "embedContent"))
    }

    fn build_request(&self, text: &str) -> EmbedContentRequest {
        let model = if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        };
        EmbedContentRequest {
            model,
            content: GeminiContent::bare(text),
            output_dimensionality: Some(self.dimension),
        }
    }
}

impl Embedder for GeminiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let body = self.build_request(text);

        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.expose_secret())])
            .json(&body)
            .send()
            .await
            .map_err(|e| EmbeddingError::Backend(format!("HTTP request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_secs(response.headers());
            let error_body = response.text().await.unwrap_or_default();
            let err = status_error(status.as_u16(), retry_after, &error_body);
            return Err(EmbeddingError::Backend(err.to_string()));
        }

        let parsed: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Backend(format!("failed to parse response: {}", e.without_url())))?;

        match parsed.embedding {
            Some(embedding) if !embedding.values.is_empty() => Ok(embedding.values),
            _ => Err(EmbeddingError::Backend("response carried no embedding".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedder() -> GeminiEmbedder {
        GeminiEmbedder::new(
            SecretString::from("test-key".to_string()),
            "text-embedding-004".to_string(),
            256,
        )
        .unwrap()
    }

    #[test]
    fn test_url_and_model_name() {
        let e = embedder();
        assert_eq!(
            e.url(),
            format!("{DEFAULT_BASE_URL}/v1beta/models/text-embedding-004:embedContent")
        );
        assert_eq!(e.model_name(), "text-embedding-004");
        assert_eq!(e.dimension(), 256);
    }

    #[test]
    fn test_request_prefixes_model() {
        let req = embedder().build_request("hello");
        assert_eq!(req.model, "models/text-embedding-004");
        assert_eq!(req.output_dimensionality, Some(256));
        assert_eq!(req.content.parts[0].text, "hello");
    }
}
