//! OpenAI embeddings client implementation.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::config::EmbeddingConfig;
use crate::errors::ServiceError;
use crate::interfaces::EmbeddingService;

/// Embedding client for OpenAI-compatible `/embeddings` endpoints.
///
/// # Example
///
/// ```ignore
/// let config = EmbeddingConfig::new(api_key).with_model("text-embedding-3-small");
/// let client = OpenAiEmbeddingClient::new(config)?;
/// let values = client.compute_embedding("Title\n\nBody").await?;
/// ```
pub struct OpenAiEmbeddingClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl OpenAiEmbeddingClient {
    /// Create a new embeddings client.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenAiEmbeddingClient)` - A new client instance
    /// * `Err(ServiceError)` - If the key is missing, the base URL is invalid or
    ///   the HTTP client cannot be built
    pub fn new(config: EmbeddingConfig) -> Result<Self, ServiceError> {
        if config.api_key.trim().is_empty() {
            return Err(ServiceError::config("missing embedding API key"));
        }
        if config.model.trim().is_empty() {
            return Err(ServiceError::config("missing embedding model name"));
        }

        let base = Url::parse(&config.base_url)
            .map_err(|e| ServiceError::config(format!("Invalid base URL: {}", e)))?;
        let endpoint = format!("{}/embeddings", base.as_str().trim_end_matches('/'));

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", config.api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth).map_err(|_| ServiceError::config("invalid API key"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ServiceError::config(e.to_string()))?;

        info!(endpoint = %endpoint, model = %config.model, "Created embedding client");

        Ok(Self {
            client,
            endpoint,
            model: config.model,
        })
    }
}

#[async_trait]
impl EmbeddingService for OpenAiEmbeddingClient {
    #[instrument(skip(self, text), fields(model = %self.model, text_len = text.len()))]
    async fn compute_embedding(&self, text: &str) -> Result<Vec<Value>, ServiceError> {
        let preview: String = text.chars().take(50).collect();
        debug!(preview = %preview, "Requesting embedding");

        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            error!(status = status.as_u16(), body = %body, "Embedding request failed");
            return Err(ServiceError::StatusError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::invalid_response(e.to_string()))?;

        let embedding = first_embedding(parsed)?;
        debug!(dimensions = embedding.len(), "Received embedding");
        Ok(embedding)
    }
}

fn first_embedding(response: EmbeddingResponse) -> Result<Vec<Value>, ServiceError> {
    response
        .data
        .into_iter()
        .min_by_key(|entry| entry.index)
        .map(|entry| entry.embedding)
        .ok_or_else(|| ServiceError::invalid_response("response contained no embeddings"))
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<Value>,
    #[serde(default)]
    index: usize,
}
