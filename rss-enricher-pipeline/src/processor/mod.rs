//! Processor module for the enrichment pipeline.
//!
//! Turns decoded feed items into enriched records and hands them to the
//! publisher.

mod enricher;
mod handler;

pub use enricher::{validate_embedding, Enricher, DATE_FORMAT};
pub use handler::{EnrichAndPublish, MessageHandler};
