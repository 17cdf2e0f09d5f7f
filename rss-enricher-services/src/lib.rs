//! # RSS Enricher Services
//!
//! This crate provides the external collaborators of the enrichment pipeline.
//! It includes the abstract interfaces the pipeline depends on, their error
//! type, and concrete HTTP implementations: an OpenAI-compatible embedding
//! client and an article-body fetcher.

pub mod article;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod openai;

pub use article::{ArticleExtractor, HttpArticleFetcher};
pub use config::{EmbeddingConfig, FetchConfig};
pub use errors::ServiceError;
pub use interfaces::{ContentFetcher, EmbeddingService};
pub use openai::OpenAiEmbeddingClient;
