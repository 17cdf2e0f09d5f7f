//! Loader module for the enrichment pipeline.
//!
//! Publishes enriched records to the output topic.

mod kafka_publisher;

pub use kafka_publisher::KafkaPublisher;

use async_trait::async_trait;

use crate::errors::PipelineError;
use rss_enricher_shared::{EnrichedRecord, PublishKey};

/// Delivers enriched records to the output topic.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the session loop holds them behind
/// an `Arc`.
#[async_trait]
pub trait RecordPublisher: Send + Sync {
    /// Publish `record` keyed by `key`.
    ///
    /// Returns only once the broker has acknowledged the record or delivery
    /// has failed.
    async fn publish(&self, record: &EnrichedRecord, key: &PublishKey) -> Result<(), PipelineError>;
}
