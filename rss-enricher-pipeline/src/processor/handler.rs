//! Message handler run by the session loop for each decoded message.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, instrument};

use crate::errors::PipelineError;
use crate::loader::RecordPublisher;
use crate::processor::Enricher;
use rss_enricher_shared::ParsedMessage;

/// Handles one decoded message. Returning `Ok` allows the session loop to
/// commit the message's offset.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, message: ParsedMessage) -> Result<(), PipelineError>;
}

/// Enriches a message and publishes the result.
pub struct EnrichAndPublish {
    enricher: Enricher,
    publisher: Arc<dyn RecordPublisher>,
}

impl EnrichAndPublish {
    pub fn new(enricher: Enricher, publisher: Arc<dyn RecordPublisher>) -> Self {
        Self {
            enricher,
            publisher,
        }
    }
}

#[async_trait]
impl MessageHandler for EnrichAndPublish {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: ParsedMessage) -> Result<(), PipelineError> {
        let (record, key) = self.enricher.enrich(&message).await?;

        if let Err(e) = self.publisher.publish(&record, &key).await {
            error!(id = %record.id, error = %e, "Error handling message");
            return Err(e);
        }

        Ok(())
    }
}
