//! Orchestrator module for the enrichment pipeline.
//!
//! Runs one polling session: connect, then poll, decode, handle and commit
//! record by record until the session's record cap, the idle deadline, an
//! interrupt or a fatal error ends it. The connection is released on every
//! exit path.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument};

use crate::consumer::{clean_payload, parse, InboundRecord, MessageSource, Polled, SourceConnector};
use crate::errors::PipelineError;
use crate::processor::MessageHandler;

/// Number of characters of each cleaned payload written to the log.
const PREVIEW_CHARS: usize = 100;

/// Configuration for a polling session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Maximum number of records handled per session.
    pub max_messages: usize,
    /// How long a single poll waits for a record.
    pub poll_timeout: Duration,
    /// Once this much time has passed since the session started, an empty
    /// poll ends the session. Receiving records does not extend it.
    pub idle_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_messages: 100,
            poll_timeout: Duration::from_secs(1),
            idle_timeout: Duration::from_secs(30),
        }
    }
}

/// How a session that got past setup ended.
#[derive(Debug)]
pub enum SessionOutcome {
    /// The record cap was reached.
    Completed { processed: usize },
    /// An empty poll happened after the idle deadline.
    IdleTimeout { processed: usize },
    /// A broker, handler or commit error ended the session. The in-flight
    /// record, if any, was not committed.
    FatalError {
        processed: usize,
        cause: PipelineError,
    },
    /// Shutdown was requested between polls.
    Interrupted { processed: usize },
}

impl SessionOutcome {
    /// Number of records handled and committed during the session.
    pub fn processed(&self) -> usize {
        match self {
            Self::Completed { processed }
            | Self::IdleTimeout { processed }
            | Self::FatalError { processed, .. }
            | Self::Interrupted { processed } => *processed,
        }
    }
}

/// One bounded consume-decode-handle-commit session.
///
/// Records are processed strictly one at a time. A record's offset is
/// committed only after its handler succeeds; a record that fails to decode
/// is logged and left uncommitted.
pub struct SessionLoop {
    connector: Arc<dyn SourceConnector>,
    handler: Arc<dyn MessageHandler>,
    config: SessionConfig,
    shutdown: watch::Receiver<bool>,
}

impl SessionLoop {
    /// Create a new session loop.
    pub fn new(
        connector: Arc<dyn SourceConnector>,
        handler: Arc<dyn MessageHandler>,
        config: SessionConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            connector,
            handler,
            config,
            shutdown,
        }
    }

    /// Run one session.
    ///
    /// # Returns
    ///
    /// * `Ok(SessionOutcome)` - How the session ended after a successful setup
    /// * `Err(PipelineError)` - If connecting or subscribing failed
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<SessionOutcome, PipelineError> {
        info!("Starting Kafka polling");

        let mut source = self.connector.connect().map_err(|e| {
            error!(error = %e, "Kafka exception occurred during setup");
            e
        })?;

        let outcome = self.drain(source.as_mut()).await;
        info!(processed = outcome.processed(), "Finished polling");

        source.close();
        Ok(outcome)
    }

    async fn drain(&self, source: &mut dyn MessageSource) -> SessionOutcome {
        let started = Instant::now();
        let mut processed = 0;

        while processed < self.config.max_messages {
            if *self.shutdown.borrow() {
                info!("Shutdown requested, stopping session");
                return SessionOutcome::Interrupted { processed };
            }

            let polled = match source.poll(self.config.poll_timeout).await {
                Ok(polled) => polled,
                Err(e) => {
                    error!(error = %e, "Consumer error");
                    return SessionOutcome::FatalError {
                        processed,
                        cause: e,
                    };
                }
            };

            match polled {
                None => {
                    if started.elapsed() > self.config.idle_timeout {
                        info!("No more messages received. Stopping.");
                        return SessionOutcome::IdleTimeout { processed };
                    }
                }
                Some(Polled::PartitionEof { partition }) => {
                    debug!(partition = partition, "Reached end of partition");
                }
                Some(Polled::Record(record)) => match self.process(source, record).await {
                    Ok(true) => processed += 1,
                    Ok(false) => {}
                    Err(e) => {
                        return SessionOutcome::FatalError {
                            processed,
                            cause: e,
                        }
                    }
                },
            }
        }

        SessionOutcome::Completed { processed }
    }

    /// Decode, handle and commit one record.
    ///
    /// Returns `Ok(false)` when the payload could not be decoded; the record is
    /// then left uncommitted.
    async fn process(
        &self,
        source: &mut dyn MessageSource,
        record: InboundRecord,
    ) -> Result<bool, PipelineError> {
        debug!(
            offset = record.position.offset,
            raw = %BASE64.encode(&record.payload),
            "Raw message (base64)"
        );

        let text = clean_payload(&record.payload);
        info!(
            preview = %text.chars().take(PREVIEW_CHARS).collect::<String>(),
            "Cleaned message"
        );

        let message = match parse(text) {
            Ok(message) => message,
            Err(e) => {
                error!(
                    group_id = %record.group_id,
                    partition = record.position.partition,
                    offset = record.position.offset,
                    error = %e,
                    position = e.position,
                    line = e.line,
                    column = e.column,
                    "Failed to parse JSON"
                );
                error!(text = %e.text, "Full cleaned message");
                error!(
                    code_points = ?e.leading_code_points(20),
                    "Problematic characters"
                );
                return Ok(false);
            }
        };

        info!(keys = ?message.keys().collect::<Vec<_>>(), "Successfully parsed JSON");

        self.handler.handle(message).await?;
        source.commit(&record.position).await?;
        Ok(true)
    }
}
