//! # RSS Enricher Pipeline
//!
//! This crate provides the pipeline components that consume raw feed items
//! from Kafka, enrich them with article text and an embedding vector, and
//! publish the result to an output topic.
//!
//! ## Architecture
//!
//! The pipeline follows the Consumer-Processor-Loader pattern:
//!
//! 1. **Consumer**: Polls records from Kafka and decodes their payloads
//! 2. **Processor**: Enriches decoded messages into output records
//! 3. **Loader**: Publishes output records to the output topic
//! 4. **Orchestrator**: Runs one bounded polling session, committing each
//!    record only after it has been published
//! 5. **Supervisor**: Starts sessions repeatedly until interrupted

pub mod config;
pub mod consumer;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod supervisor;

#[cfg(test)]
mod testing;

pub use config::{BrokerConfig, ConsumerGroup, SaslCredentials};
pub use errors::PipelineError;
pub use orchestrator::{SessionConfig, SessionLoop, SessionOutcome};
pub use supervisor::{Decision, Supervisor, SupervisorConfig};
