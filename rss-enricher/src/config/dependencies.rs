//! Dependency initialization and wiring for the enrichment service.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

use super::Settings;
use crate::EnricherError;
use rss_enricher_pipeline::{
    consumer::KafkaConnector,
    loader::KafkaPublisher,
    processor::{EnrichAndPublish, Enricher},
    SessionLoop, Supervisor,
};
use rss_enricher_services::{HttpArticleFetcher, OpenAiEmbeddingClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured supervisor ready to run.
    pub supervisor: Supervisor,
}

impl Dependencies {
    /// Wire the pipeline from resolved settings.
    ///
    /// No network connection is made here; the broker is first contacted when
    /// a session starts.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(EnricherError)` - If an HTTP client cannot be built
    pub fn new(settings: Settings, shutdown: watch::Receiver<bool>) -> Result<Self, EnricherError> {
        info!(
            bootstrap_servers = %settings.broker.bootstrap_servers,
            input_topic = %settings.broker.input_topic,
            output_topic = %settings.broker.output_topic,
            consumer_group = ?settings.broker.consumer_group,
            development = settings.development,
            "Initializing dependencies"
        );

        let fetcher = HttpArticleFetcher::new(settings.fetch)
            .map_err(|e| EnricherError::config(format!("Failed to create article fetcher: {}", e)))?;

        let embedder = OpenAiEmbeddingClient::new(settings.embedding)
            .map_err(|e| EnricherError::config(format!("Failed to create embedding client: {}", e)))?;

        let enricher = Enricher::new(Arc::new(fetcher), Arc::new(embedder));
        let publisher = KafkaPublisher::new(settings.broker.clone());
        let handler = EnrichAndPublish::new(enricher, Arc::new(publisher));

        let connector = KafkaConnector::new(settings.broker);
        let session = SessionLoop::new(
            Arc::new(connector),
            Arc::new(handler),
            settings.session,
            shutdown.clone(),
        );

        let supervisor = Supervisor::new(session, settings.supervisor, shutdown);

        Ok(Self { supervisor })
    }
}
