//! Message source abstractions used by the session loop.

use async_trait::async_trait;
use std::time::Duration;

use crate::consumer::messages::{Polled, RecordPosition};
use crate::errors::PipelineError;

/// A subscribed connection to the input topic.
///
/// A source is owned by exactly one session and is never shared.
#[async_trait]
pub trait MessageSource: Send {
    /// Wait up to `timeout` for the next record.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Polled))` - A record or an end-of-partition marker
    /// * `Ok(None)` - Nothing arrived within `timeout`
    /// * `Err(PipelineError)` - A broker-level error
    async fn poll(&mut self, timeout: Duration) -> Result<Option<Polled>, PipelineError>;

    /// Commit `position`, marking the record and everything before it on the
    /// same partition as consumed. Blocks until the broker confirms.
    async fn commit(&mut self, position: &RecordPosition) -> Result<(), PipelineError>;

    /// Release the connection.
    fn close(&mut self);
}

/// Opens fresh subscribed sources, one per session.
pub trait SourceConnector: Send + Sync {
    fn connect(&self) -> Result<Box<dyn MessageSource>, PipelineError>;
}
