//! # RSS Enricher
//!
//! Main library for the RSS feed enrichment service.
//!
//! This crate provides the entry point and configuration for running
//! the enrichment pipeline.

pub mod config;
pub mod logging;

pub use config::{load_env_file, Dependencies, EnvFile, Settings};

use thiserror::Error;

/// Errors that can occur during service initialization or execution.
#[derive(Error, Debug)]
pub enum EnricherError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] rss_enricher_pipeline::PipelineError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl EnricherError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
