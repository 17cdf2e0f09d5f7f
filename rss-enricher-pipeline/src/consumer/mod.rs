//! Consumer module for the enrichment pipeline.
//!
//! Provides the Kafka source the session loop polls, and the decoder that
//! turns raw payloads into messages.

mod decoder;
mod kafka_consumer;
mod messages;
mod source;

pub use decoder::{clean_payload, decode, parse, DecodeError};
pub use kafka_consumer::{KafkaConnector, KafkaSource};
pub use messages::{InboundRecord, Polled, RecordPosition};
pub use source::{MessageSource, SourceConnector};
