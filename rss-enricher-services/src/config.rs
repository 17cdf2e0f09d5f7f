//! Configuration types for the service clients.

use std::time::Duration;

/// Default OpenAI-compatible API base URL.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Configuration for the embedding client.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// Bearer token for the embeddings endpoint.
    pub api_key: String,
    /// API base URL; `/embeddings` is appended.
    pub base_url: String,
    /// Embedding model name.
    pub model: String,
}

impl EmbeddingConfig {
    /// Create a config for the default endpoint and model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Configuration for the article fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Timeout for the whole HTTP request.
    pub timeout: Duration,
    /// Maximum number of characters of extracted text to keep.
    pub max_chars: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_chars: 4000,
        }
    }
}
