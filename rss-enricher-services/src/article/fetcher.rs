//! HTTP implementation of the content fetcher.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, instrument, warn};

use crate::article::ArticleExtractor;
use crate::config::FetchConfig;
use crate::errors::ServiceError;
use crate::interfaces::ContentFetcher;

/// Fetches article pages over HTTP and extracts their paragraph text.
pub struct HttpArticleFetcher {
    client: Client,
    extractor: ArticleExtractor,
    config: FetchConfig,
}

impl HttpArticleFetcher {
    /// Create a fetcher whose requests are bounded by `config.timeout`.
    pub fn new(config: FetchConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::config(e.to_string()))?;

        Ok(Self {
            client,
            extractor: ArticleExtractor::new()?,
            config,
        })
    }

    async fn try_fetch(&self, url: &str) -> Result<String, ServiceError> {
        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        match self.extractor.extract(&html, self.config.max_chars) {
            Some(text) => {
                debug!(url = %url, chars = text.chars().count(), "Extracted article body");
                Ok(text)
            }
            None => {
                warn!(url = %url, "Could not find article body");
                Ok(String::new())
            }
        }
    }
}

#[async_trait]
impl ContentFetcher for HttpArticleFetcher {
    #[instrument(skip(self))]
    async fn fetch_body(&self, url: &str) -> String {
        if url.is_empty() {
            debug!("No link to fetch");
            return String::new();
        }

        match self.try_fetch(url).await {
            Ok(text) => text,
            Err(e) => {
                error!(url = %url, error = %e, "Error fetching article body");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_empty_link_is_not_fetched() {
        let fetcher = HttpArticleFetcher::new(FetchConfig::default()).unwrap();
        assert_eq!(fetcher.fetch_body("").await, "");
    }

    #[tokio::test]
    async fn test_unreachable_link_degrades_to_empty() {
        let config = FetchConfig {
            timeout: Duration::from_millis(200),
            ..FetchConfig::default()
        };
        let fetcher = HttpArticleFetcher::new(config).unwrap();

        assert_eq!(fetcher.fetch_body("http://127.0.0.1:9/article").await, "");
        assert_eq!(fetcher.fetch_body("not a url").await, "");
    }
}
