//! Interface definitions for the pipeline's external collaborators.
//!
//! The pipeline only depends on these traits, so the concrete HTTP clients
//! can be swapped for stubs in tests.

mod content_fetcher;
mod embedding_service;

pub use content_fetcher::ContentFetcher;
pub use embedding_service::EmbeddingService;
