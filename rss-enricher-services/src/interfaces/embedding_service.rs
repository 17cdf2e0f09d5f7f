//! Embedding service trait definition.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ServiceError;

/// Computes an embedding vector for a piece of text.
///
/// The service is a black box: values are returned exactly as the service
/// produced them and the caller decides whether they are numeric. There is no
/// timeout on this call.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Compute the embedding of `text`.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Value>)` - The raw vector entries, in order
    /// * `Err(ServiceError)` - If the service call fails
    async fn compute_embedding(&self, text: &str) -> Result<Vec<Value>, ServiceError>;
}
