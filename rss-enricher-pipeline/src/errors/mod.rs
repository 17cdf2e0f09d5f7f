//! Error types for the enrichment pipeline.

use rss_enricher_services::ServiceError;
use thiserror::Error;

/// Errors that can occur in the enrichment pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Kafka-related error.
    #[error("Kafka error: {0}")]
    KafkaError(String),

    /// The message carried a date that is not `YYYY-MM-DDTHH:MM:SSZ`.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Error from an external collaborator.
    #[error("Service error: {0}")]
    ServiceError(#[from] ServiceError),

    /// A collaborator returned data that failed validation.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The output topic did not acknowledge a record.
    #[error("Publish error: {0}")]
    PublishError(String),

    /// A record could not be serialized for the output topic.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl PipelineError {
    /// Create a Kafka error.
    pub fn kafka(msg: impl Into<String>) -> Self {
        Self::KafkaError(msg.into())
    }

    /// Create an invalid date error.
    pub fn invalid_date(msg: impl Into<String>) -> Self {
        Self::InvalidDate(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a publish error.
    pub fn publish(msg: impl Into<String>) -> Self {
        Self::PublishError(msg.into())
    }
}

impl From<rdkafka::error::KafkaError> for PipelineError {
    fn from(err: rdkafka::error::KafkaError) -> Self {
        Self::KafkaError(err.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
