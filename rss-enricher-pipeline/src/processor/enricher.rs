//! Feed item enrichment.
//!
//! Resolves the publication time, fetches the article body, embeds the title
//! and body, and assembles the output record and its partition key.

use chrono::{NaiveDateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::errors::PipelineError;
use rss_enricher_services::{ContentFetcher, EmbeddingService};
use rss_enricher_shared::{EnrichedRecord, ParsedMessage, PublishKey, RecordMetadata};

/// Expected format of the `date` field.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Maximum number of characters of `content` kept as the description.
const DESCRIPTION_MAX_CHARS: usize = 500;

/// Enricher that turns feed items into embedded records.
///
/// Enrichment is all-or-nothing: a bad date or a failed or non-numeric
/// embedding fails the whole call. Article fetching is advisory and falls back
/// to an empty body.
pub struct Enricher {
    fetcher: Arc<dyn ContentFetcher>,
    embedder: Arc<dyn EmbeddingService>,
}

impl Enricher {
    /// Create a new enricher with the given collaborators.
    pub fn new(fetcher: Arc<dyn ContentFetcher>, embedder: Arc<dyn EmbeddingService>) -> Self {
        Self { fetcher, embedder }
    }

    /// Enrich a single feed item.
    ///
    /// # Returns
    ///
    /// * `Ok((EnrichedRecord, PublishKey))` - The record and its partition key
    /// * `Err(PipelineError)` - If the date is malformed or embedding fails
    #[instrument(skip(self, message))]
    pub async fn enrich(
        &self,
        message: &ParsedMessage,
    ) -> Result<(EnrichedRecord, PublishKey), PipelineError> {
        let title = message.text("title");
        info!(title = %title, "Transforming RSS message");

        match self.build(message, title).await {
            Ok(result) => {
                info!(id = %result.0.id, "Transformed message");
                Ok(result)
            }
            Err(e) => {
                error!(error = %e, "Error transforming RSS message");
                Err(e)
            }
        }
    }

    async fn build(
        &self,
        message: &ParsedMessage,
        title: String,
    ) -> Result<(EnrichedRecord, PublishKey), PipelineError> {
        let published_at = resolve_timestamp(message.get("date"))?;

        let link = message.text("link");
        let body = self.fetcher.fetch_body(&link).await;

        let chunk = format!("{}\n\n{}", title, body);
        let raw = self.embedder.compute_embedding(&chunk).await?;
        let values = validate_embedding(raw)?;
        debug!(dimensions = values.len(), "Validated embedding");

        let metadata = RecordMetadata {
            title,
            link: link.clone(),
            description: message
                .text("content")
                .chars()
                .take(DESCRIPTION_MAX_CHARS)
                .collect(),
            source: message.feed_title(),
            published_at,
            author: message.text("author"),
            categories: message.categories(),
            chunk,
        };

        let id = match message.text("id") {
            id if !id.is_empty() => id,
            _ => Uuid::new_v4().to_string(),
        };

        Ok((
            EnrichedRecord {
                id,
                metadata,
                values,
            },
            PublishKey::new(link),
        ))
    }
}

/// Seconds since the epoch for the `date` field, or now when it is absent.
fn resolve_timestamp(date: Option<&Value>) -> Result<i64, PipelineError> {
    match date {
        None | Some(Value::Null) => Ok(Utc::now().timestamp()),
        Some(Value::String(s)) if s.is_empty() => Ok(Utc::now().timestamp()),
        Some(Value::String(s)) => NaiveDateTime::parse_from_str(s, DATE_FORMAT)
            .map(|parsed| parsed.and_utc().timestamp())
            .map_err(|e| PipelineError::invalid_date(format!("{:?}: {}", s, e))),
        Some(other) => Err(PipelineError::invalid_date(format!(
            "expected a string, found {}",
            other
        ))),
    }
}

/// Convert raw embedding entries to floats.
///
/// Finite numbers and numeric strings are accepted; any other entry, including
/// `NaN` and infinities, fails the whole vector.
pub fn validate_embedding(raw: Vec<Value>) -> Result<Vec<f64>, PipelineError> {
    raw.iter()
        .enumerate()
        .map(|(index, value)| {
            let parsed = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            parsed.filter(|v| v.is_finite()).ok_or_else(|| {
                PipelineError::validation(format!(
                    "Embedding contains non-float value {} at index {}",
                    value, index
                ))
            })
        })
        .collect()
}
