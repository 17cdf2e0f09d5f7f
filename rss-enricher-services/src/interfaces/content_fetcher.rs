//! Content fetcher trait definition.

use async_trait::async_trait;

/// Best-effort retrieval of an article's body text.
///
/// Fetching is advisory: implementations never fail, they return an empty
/// string when the content cannot be retrieved or extracted.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch `url` and return its extracted plain text, or `""`.
    async fn fetch_body(&self, url: &str) -> String;
}
