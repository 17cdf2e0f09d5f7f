//! OpenAI-compatible implementation of the embedding service.

mod client;

pub use client::OpenAiEmbeddingClient;
