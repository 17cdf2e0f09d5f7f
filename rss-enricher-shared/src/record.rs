//! Enriched records and their output-topic representation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Partition key for the output topic: the article link, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishKey(String);

impl PublishKey {
    pub fn new(link: impl Into<String>) -> Self {
        Self(link.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PublishKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata attached to an enriched record.
///
/// Empty strings are never serialized: a field holding `""` is omitted from
/// the JSON object entirely, and reads back as `""` when absent. An empty
/// category list is omitted the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link: String,
    /// First 500 characters of the item content.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Name of the originating feed.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    /// Publication time in seconds since the Unix epoch.
    #[serde(default)]
    pub published_at: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    /// The text the embedding was computed from.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub chunk: String,
}

impl RecordMetadata {
    /// Serialize to the compact JSON string embedded in [`OutboundMessage`].
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A feed item after enrichment, ready to publish.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    /// Source-provided id, or a generated UUID.
    pub id: String,
    pub metadata: RecordMetadata,
    /// Embedding vector of `metadata.chunk`.
    pub values: Vec<f64>,
}

impl EnrichedRecord {
    /// Build the output-topic representation of this record.
    pub fn to_outbound(&self) -> Result<OutboundMessage, serde_json::Error> {
        Ok(OutboundMessage {
            id: self.id.clone(),
            metadata: self.metadata.to_json()?,
            values: self.values.clone(),
        })
    }
}

/// Wire shape of the output topic.
///
/// `metadata` is itself a JSON document encoded as a string, which is what
/// the downstream vector-index consumers expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub id: String,
    pub metadata: String,
    pub values: Vec<f64>,
}

impl OutboundMessage {
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode the embedded metadata document.
    pub fn decode_metadata(&self) -> Result<RecordMetadata, serde_json::Error> {
        serde_json::from_str(&self.metadata)
    }
}
