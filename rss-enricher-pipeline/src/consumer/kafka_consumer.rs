//! Kafka consumer implementation for the enrichment pipeline.
//!
//! Each session gets its own subscribed consumer. Offsets are never
//! auto-committed: the session loop commits each record after it has been
//! published.

use async_trait::async_trait;
use rdkafka::{
    config::ClientConfig,
    consumer::{CommitMode, Consumer, StreamConsumer},
    error::KafkaError,
    message::Message as KafkaMessage,
    Offset, TopicPartitionList,
};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::BrokerConfig;
use crate::consumer::messages::{InboundRecord, Polled, RecordPosition};
use crate::consumer::source::{MessageSource, SourceConnector};
use crate::errors::PipelineError;

/// Kafka consumer subscribed to the input topic.
pub struct KafkaSource {
    consumer: StreamConsumer,
    group_id: String,
}

impl KafkaSource {
    /// Create a consumer and subscribe it to the input topic.
    ///
    /// # Arguments
    ///
    /// * `broker` - Connection parameters
    /// * `group_id` - Consumer group ID for this session
    ///
    /// # Returns
    ///
    /// * `Ok(KafkaSource)` - A subscribed consumer
    /// * `Err(PipelineError)` - If consumer creation or subscription fails
    pub fn new(broker: &BrokerConfig, group_id: &str) -> Result<Self, PipelineError> {
        let consumer: StreamConsumer = consumer_config(broker, group_id)
            .create()
            .map_err(|e| PipelineError::kafka(e.to_string()))?;

        info!(
            brokers = %broker.bootstrap_servers,
            group_id = %group_id,
            "Created Kafka consumer"
        );

        consumer
            .subscribe(&[broker.input_topic.as_str()])
            .map_err(|e| PipelineError::kafka(e.to_string()))?;

        info!(topic = %broker.input_topic, "Consumer subscribed to topic");

        Ok(Self {
            consumer,
            group_id: group_id.to_string(),
        })
    }
}

/// Consumer settings: offsets are committed manually, new groups start at the
/// earliest offset, and reaching the end of a partition is reported.
fn consumer_config(broker: &BrokerConfig, group_id: &str) -> ClientConfig {
    let mut config = broker.client_config();
    config
        .set("group.id", group_id)
        .set("enable.auto.commit", "false")
        .set("auto.offset.reset", "earliest")
        .set("enable.partition.eof", "true");
    config
}

/// Offsets to commit once the record at `position` has been handled. Kafka
/// stores the offset of the next record to read, hence `offset + 1`.
fn commit_list(position: &RecordPosition) -> Result<TopicPartitionList, PipelineError> {
    let mut tpl = TopicPartitionList::new();
    tpl.add_partition_offset(
        &position.topic,
        position.partition,
        Offset::Offset(position.offset + 1),
    )
    .map_err(|e| PipelineError::kafka(e.to_string()))?;
    Ok(tpl)
}

#[async_trait]
impl MessageSource for KafkaSource {
    async fn poll(&mut self, timeout: Duration) -> Result<Option<Polled>, PipelineError> {
        let received = match tokio::time::timeout(timeout, self.consumer.recv()).await {
            Ok(received) => received,
            Err(_) => return Ok(None),
        };

        match received {
            Ok(msg) => {
                let position = RecordPosition {
                    topic: msg.topic().to_string(),
                    partition: msg.partition(),
                    offset: msg.offset(),
                };

                debug!(
                    topic = %position.topic,
                    partition = position.partition,
                    offset = position.offset,
                    "Received message"
                );

                Ok(Some(Polled::Record(InboundRecord {
                    position,
                    payload: msg.payload().map(<[u8]>::to_vec).unwrap_or_default(),
                    group_id: self.group_id.clone(),
                })))
            }
            Err(KafkaError::PartitionEOF(partition)) => Ok(Some(Polled::PartitionEof { partition })),
            Err(e) => Err(PipelineError::from(e)),
        }
    }

    async fn commit(&mut self, position: &RecordPosition) -> Result<(), PipelineError> {
        let tpl = commit_list(position)?;

        self.consumer
            .commit(&tpl, CommitMode::Sync)
            .map_err(|e| PipelineError::kafka(e.to_string()))?;

        debug!(
            topic = %position.topic,
            partition = position.partition,
            offset = position.offset,
            "Committed offset"
        );
        Ok(())
    }

    fn close(&mut self) {
        info!(group_id = %self.group_id, "Closing Kafka consumer");
        self.consumer.unsubscribe();
    }
}

/// Opens a [`KafkaSource`] per session, resolving the consumer group each time.
pub struct KafkaConnector {
    broker: BrokerConfig,
}

impl KafkaConnector {
    pub fn new(broker: BrokerConfig) -> Self {
        Self { broker }
    }
}

impl SourceConnector for KafkaConnector {
    fn connect(&self) -> Result<Box<dyn MessageSource>, PipelineError> {
        let group_id = self.broker.consumer_group.resolve();
        Ok(Box::new(KafkaSource::new(&self.broker, &group_id)?))
    }
}
