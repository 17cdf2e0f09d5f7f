//! Broker connection settings shared by the consumer and the publisher.

use rdkafka::config::ClientConfig;
use std::fmt;
use uuid::Uuid;

/// SASL/PLAIN credentials for the broker.
#[derive(Clone)]
pub struct SaslCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for SaslCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaslCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// How the consumer group id is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumerGroup {
    /// A fixed group id, shared by every session (production).
    Fixed(String),
    /// A fresh `<prefix>-<uuid>` id per session so development runs never
    /// compete for committed offsets.
    Ephemeral { prefix: String },
}

impl ConsumerGroup {
    /// The group id to use for the next session.
    pub fn resolve(&self) -> String {
        match self {
            Self::Fixed(id) => id.clone(),
            Self::Ephemeral { prefix } => format!("{}-{}", prefix, Uuid::new_v4()),
        }
    }
}

/// Connection parameters for the input and output topics.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Kafka bootstrap servers (comma-separated).
    pub bootstrap_servers: String,
    /// Credentials; when set the client connects with SASL_SSL.
    pub credentials: Option<SaslCredentials>,
    pub input_topic: String,
    pub output_topic: String,
    pub consumer_group: ConsumerGroup,
}

impl BrokerConfig {
    /// Client settings common to consumers and producers.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config.set("bootstrap.servers", &self.bootstrap_servers);

        if let Some(credentials) = &self.credentials {
            config
                .set("security.protocol", "SASL_SSL")
                .set("sasl.mechanisms", "PLAIN")
                .set("sasl.username", &credentials.username)
                .set("sasl.password", &credentials.password);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn broker(credentials: Option<SaslCredentials>) -> BrokerConfig {
        BrokerConfig {
            bootstrap_servers: "localhost:9092".to_string(),
            credentials,
            input_topic: "rss.raw".to_string(),
            output_topic: "rss.enriched".to_string(),
            consumer_group: ConsumerGroup::Fixed("rss-poller-group-default".to_string()),
        }
    }

    #[test]
    fn test_plaintext_without_credentials() {
        let config = broker(None).client_config();
        assert_eq!(config.get("bootstrap.servers"), Some("localhost:9092"));
        assert_eq!(config.get("security.protocol"), None);
    }

    #[test]
    fn test_sasl_with_credentials() {
        let config = broker(Some(SaslCredentials {
            username: "key".to_string(),
            password: "secret".to_string(),
        }))
        .client_config();

        assert_eq!(config.get("security.protocol"), Some("SASL_SSL"));
        assert_eq!(config.get("sasl.mechanisms"), Some("PLAIN"));
        assert_eq!(config.get("sasl.username"), Some("key"));
    }

    #[test]
    fn test_credentials_are_redacted() {
        let credentials = SaslCredentials {
            username: "key".to_string(),
            password: "secret".to_string(),
        };
        assert!(!format!("{:?}", credentials).contains("secret"));
    }

    #[test]
    fn test_consumer_group_resolution() {
        let fixed = ConsumerGroup::Fixed("group".to_string());
        assert_eq!(fixed.resolve(), "group");

        let ephemeral = ConsumerGroup::Ephemeral {
            prefix: "rss-poller-group".to_string(),
        };
        let first = ephemeral.resolve();
        let second = ephemeral.resolve();
        assert!(first.starts_with("rss-poller-group-"));
        assert_ne!(first, second);
    }
}
