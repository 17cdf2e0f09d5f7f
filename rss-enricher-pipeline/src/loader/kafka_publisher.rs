//! Kafka implementation of the record publisher.

use async_trait::async_trait;
use rdkafka::message::Message;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use tracing::{debug, error, info, instrument};

use crate::config::BrokerConfig;
use crate::errors::PipelineError;
use crate::loader::RecordPublisher;
use rss_enricher_shared::{EnrichedRecord, PublishKey};

/// Publisher that writes records to the output topic.
///
/// Every call creates its own producer, waits for the delivery report and
/// flushes before returning. Nothing is shared between records.
pub struct KafkaPublisher {
    broker: BrokerConfig,
}

impl KafkaPublisher {
    pub fn new(broker: BrokerConfig) -> Self {
        Self { broker }
    }

    fn create_producer(&self) -> Result<FutureProducer, PipelineError> {
        self.broker
            .client_config()
            .create()
            .map_err(|e| PipelineError::kafka(e.to_string()))
    }
}

#[async_trait]
impl RecordPublisher for KafkaPublisher {
    #[instrument(skip(self, record, key), fields(id = %record.id))]
    async fn publish(&self, record: &EnrichedRecord, key: &PublishKey) -> Result<(), PipelineError> {
        let payload = record.to_outbound()?.to_bytes()?;
        let topic = self.broker.output_topic.as_str();
        let producer = self.create_producer()?;

        let delivery = producer
            .send(
                FutureRecord::to(topic)
                    .key(key.as_str())
                    .payload(&payload),
                Timeout::Never,
            )
            .await;

        match delivery {
            Ok((partition, offset)) => {
                info!(
                    topic = %topic,
                    partition = partition,
                    offset = offset,
                    "Message delivered"
                );
            }
            Err((e, message)) => {
                error!(
                    topic = %topic,
                    partition = message.partition(),
                    error = %e,
                    "Message delivery failed"
                );
                return Err(PipelineError::publish(e.to_string()));
            }
        }

        producer
            .flush(Timeout::Never)
            .map_err(|e| PipelineError::publish(e.to_string()))?;

        debug!(topic = %topic, key = %key, "Message written to Kafka topic");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConsumerGroup, SaslCredentials};

    fn broker() -> BrokerConfig {
        BrokerConfig {
            bootstrap_servers: "localhost:9092".to_string(),
            credentials: Some(SaslCredentials {
                username: "key".to_string(),
                password: "secret".to_string(),
            }),
            input_topic: "rss.raw".to_string(),
            output_topic: "rss.enriched".to_string(),
            consumer_group: ConsumerGroup::Fixed("rss-poller-group-default".to_string()),
        }
    }

    #[tokio::test]
    async fn test_producer_is_created_without_connecting() {
        let publisher = KafkaPublisher::new(broker());

        assert!(publisher.create_producer().is_ok());
        assert_eq!(publisher.broker.output_topic, "rss.enriched");
    }
}
