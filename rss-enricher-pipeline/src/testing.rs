//! In-memory doubles for the pipeline's collaborators.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use crate::consumer::{InboundRecord, MessageSource, Polled, RecordPosition, SourceConnector};
use crate::errors::PipelineError;
use crate::loader::RecordPublisher;
use crate::processor::MessageHandler;
use rss_enricher_services::{ContentFetcher, EmbeddingService, ServiceError};
use rss_enricher_shared::{EnrichedRecord, ParsedMessage, PublishKey};

pub const TOPIC: &str = "rss.raw";

/// Content fetcher returning a fixed body.
pub struct StubFetcher {
    body: String,
    requested: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentFetcher for StubFetcher {
    async fn fetch_body(&self, url: &str) -> String {
        self.requested.lock().unwrap().push(url.to_string());
        self.body.clone()
    }
}

/// Embedding service returning a fixed vector, or always failing.
pub struct StubEmbedder {
    embedding: Option<Vec<Value>>,
    inputs: Mutex<Vec<String>>,
}

impl StubEmbedder {
    pub fn new(embedding: Vec<Value>) -> Self {
        Self {
            embedding: Some(embedding),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            embedding: None,
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingService for StubEmbedder {
    async fn compute_embedding(&self, text: &str) -> Result<Vec<Value>, ServiceError> {
        self.inputs.lock().unwrap().push(text.to_string());
        self.embedding
            .clone()
            .ok_or_else(|| ServiceError::http("connection refused"))
    }
}

/// Publisher that records `(key, payload)` pairs.
pub struct RecordingPublisher {
    fail: bool,
    published: Mutex<Vec<(String, String)>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self {
            fail: false,
            published: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            published: Mutex::new(Vec::new()),
        }
    }

    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordPublisher for RecordingPublisher {
    async fn publish(&self, record: &EnrichedRecord, key: &PublishKey) -> Result<(), PipelineError> {
        if self.fail {
            return Err(PipelineError::publish("Local: Message timed out"));
        }
        let payload = String::from_utf8(record.to_outbound()?.to_bytes()?).unwrap();
        self.published
            .lock()
            .unwrap()
            .push((key.as_str().to_string(), payload));
        Ok(())
    }
}

/// Handler that records message ids and fails on a chosen id.
pub struct RecordingHandler {
    fail_on: Option<String>,
    handled: Mutex<Vec<String>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self {
            fail_on: None,
            handled: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(id: &str) -> Self {
        Self {
            fail_on: Some(id.to_string()),
            handled: Mutex::new(Vec::new()),
        }
    }

    pub fn handled(&self) -> Vec<String> {
        self.handled.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageHandler for RecordingHandler {
    async fn handle(&self, message: ParsedMessage) -> Result<(), PipelineError> {
        let id = message.text("id");
        self.handled.lock().unwrap().push(id.clone());
        if self.fail_on.as_deref() == Some(id.as_str()) {
            return Err(PipelineError::publish(format!("delivery failed for {}", id)));
        }
        Ok(())
    }
}

/// A JSON feed item payload with the given id.
pub fn item(id: &str) -> Vec<u8> {
    format!(r#"{{"id":"{}","title":"Title {}"}}"#, id, id).into_bytes()
}

#[derive(Default)]
struct BrokerState {
    /// Payloads with their arrival time relative to each session's start.
    records: Vec<(Vec<u8>, Duration)>,
    /// Next offset to deliver to a new session.
    committed: usize,
    commits: Vec<i64>,
    partition_eof: bool,
    fail_poll_after: Option<usize>,
    fail_connect: bool,
}

/// Single-partition in-memory broker. Each connection starts reading at the
/// last committed offset, like a consumer group rejoining a topic.
#[derive(Clone, Default)]
pub struct MockBroker {
    state: Arc<Mutex<BrokerState>>,
    connects: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl MockBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, payload: Vec<u8>) {
        self.push_at(payload, Duration::ZERO);
    }

    /// Make `payload` available `after` the start of every session.
    pub fn push_at(&self, payload: Vec<u8>, after: Duration) {
        self.state.lock().unwrap().records.push((payload, after));
    }

    /// Emit an end-of-partition marker whenever a session catches up.
    pub fn with_partition_eof(self) -> Self {
        self.state.lock().unwrap().partition_eof = true;
        self
    }

    /// Fail polling with a broker error after `count` records per session.
    pub fn fail_poll_after(self, count: usize) -> Self {
        self.state.lock().unwrap().fail_poll_after = Some(count);
        self
    }

    pub fn fail_connect(self) -> Self {
        self.state.lock().unwrap().fail_connect = true;
        self
    }

    pub fn commits(&self) -> Vec<i64> {
        self.state.lock().unwrap().commits.clone()
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl SourceConnector for MockBroker {
    fn connect(&self) -> Result<Box<dyn MessageSource>, PipelineError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let cursor = {
            let state = self.state.lock().unwrap();
            if state.fail_connect {
                return Err(PipelineError::kafka("Failed to resolve bootstrap servers"));
            }
            state.committed
        };

        Ok(Box::new(MockSource {
            broker: self.clone(),
            cursor,
            started: Instant::now(),
            delivered: 0,
            eof_sent: false,
        }))
    }
}

struct MockSource {
    broker: MockBroker,
    cursor: usize,
    started: Instant,
    delivered: usize,
    eof_sent: bool,
}

impl MockSource {
    fn deliver(&mut self, payload: Vec<u8>) -> Polled {
        let offset = self.cursor as i64;
        self.cursor += 1;
        self.delivered += 1;
        self.eof_sent = false;
        Polled::Record(InboundRecord {
            position: RecordPosition {
                topic: TOPIC.to_string(),
                partition: 0,
                offset,
            },
            payload,
            group_id: "test-group".to_string(),
        })
    }
}

#[async_trait]
impl MessageSource for MockSource {
    async fn poll(&mut self, timeout: Duration) -> Result<Option<Polled>, PipelineError> {
        let (next, partition_eof) = {
            let state = self.broker.state.lock().unwrap();
            if matches!(state.fail_poll_after, Some(limit) if self.delivered >= limit) {
                return Err(PipelineError::kafka("Broker: Unknown topic or partition"));
            }
            (state.records.get(self.cursor).cloned(), state.partition_eof)
        };

        match next {
            Some((payload, arrives)) => {
                let elapsed = self.started.elapsed();
                if arrives > elapsed {
                    tokio::time::sleep((arrives - elapsed).min(timeout)).await;
                    if self.started.elapsed() < arrives {
                        return Ok(None);
                    }
                }
                Ok(Some(self.deliver(payload)))
            }
            None if partition_eof && !self.eof_sent => {
                self.eof_sent = true;
                Ok(Some(Polled::PartitionEof { partition: 0 }))
            }
            None => {
                tokio::time::sleep(timeout).await;
                Ok(None)
            }
        }
    }

    async fn commit(&mut self, position: &RecordPosition) -> Result<(), PipelineError> {
        let mut state = self.broker.state.lock().unwrap();
        state.committed = position.offset as usize + 1;
        state.commits.push(position.offset);
        Ok(())
    }

    fn close(&mut self) {
        self.broker.closes.fetch_add(1, Ordering::SeqCst);
    }
}
