//! # RSS Enricher Shared
//!
//! Record types that flow between the stages of the enrichment pipeline.
//!
//! A [`ParsedMessage`] is what the decoder produces from a raw feed item, an
//! [`EnrichedRecord`] is what the enricher hands to the publisher, and an
//! [`OutboundMessage`] is the wire shape written to the output topic.

mod message;
mod record;

pub use message::ParsedMessage;
pub use record::{EnrichedRecord, OutboundMessage, PublishKey, RecordMetadata};
