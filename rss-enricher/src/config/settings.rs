//! Process settings read once from the environment at startup.

use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::EnricherError;
use rss_enricher_pipeline::{
    BrokerConfig, ConsumerGroup, SaslCredentials, SessionConfig, SupervisorConfig,
};
use rss_enricher_services::config::{DEFAULT_EMBEDDING_MODEL, DEFAULT_OPENAI_BASE_URL};
use rss_enricher_services::{EmbeddingConfig, FetchConfig};

/// Development environment file; its presence selects development mode.
const LOCAL_ENV_FILE: &str = ".env.local";

/// Default environment file.
const DEFAULT_ENV_FILE: &str = ".env";

/// Default production consumer group id.
const DEFAULT_CONSUMER_GROUP_ID: &str = "rss-poller-group-default";

/// Prefix of the per-session consumer group id used in development.
const DEV_CONSUMER_GROUP_PREFIX: &str = "rss-poller-group";

/// Which environment file was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvFile {
    Local,
    Default,
}

/// Load `.env.local` if present, otherwise `.env`.
///
/// Variables already set in the process environment take precedence over
/// the file.
///
/// # Returns
///
/// * `Ok(EnvFile)` - The file that was loaded
/// * `Err(EnricherError)` - If neither file exists or the file is malformed
pub fn load_env_file() -> Result<EnvFile, EnricherError> {
    load_env_file_from(Path::new("."))
}

fn load_env_file_from(dir: &Path) -> Result<EnvFile, EnricherError> {
    let local = dir.join(LOCAL_ENV_FILE);
    let default = dir.join(DEFAULT_ENV_FILE);

    let (path, file) = if local.exists() {
        (local, EnvFile::Local)
    } else if default.exists() {
        (default, EnvFile::Default)
    } else {
        return Err(EnricherError::config(format!(
            "No {} or {} file found",
            LOCAL_ENV_FILE, DEFAULT_ENV_FILE
        )));
    };

    dotenv::from_path(&path).map_err(|e| {
        EnricherError::config(format!("Failed to load {}: {}", path.display(), e))
    })?;
    info!(path = %path.display(), "Loaded environment file");

    Ok(file)
}

/// Everything the service needs to start, resolved from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Development mode uses a fresh consumer group for every session.
    pub development: bool,
    pub broker: BrokerConfig,
    pub embedding: EmbeddingConfig,
    pub fetch: FetchConfig,
    pub session: SessionConfig,
    pub supervisor: SupervisorConfig,
}

impl Settings {
    /// Build settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `CONFLUENT_BOOTSTRAP_SERVERS`: Kafka bootstrap servers (required)
    /// - `CONFLUENT_API_KEY` / `CONFLUENT_API_SECRET`: SASL credentials (optional)
    /// - `CONFLUENT_INPUT_TOPIC`: Topic of raw feed items (required)
    /// - `CONFLUENT_OUTPUT_TOPIC`: Topic for enriched records (required)
    /// - `KAFKA_CONSUMER_GROUP_ID`: Consumer group id (default: rss-poller-group-default)
    /// - `OPENAI_API_KEY`: Embedding API key (required)
    /// - `OPENAI_BASE_URL`: Embedding API base URL (default: https://api.openai.com/v1)
    /// - `EMBEDDING_MODEL`: Embedding model (default: text-embedding-3-small)
    /// - `MAX_MESSAGES_PER_SESSION`: Records per session (default: 100)
    /// - `SESSION_INTERVAL_SECS`: Pause between sessions (default: 300)
    /// - `IDLE_TIMEOUT_SECS`: Idle window that ends a session (default: 30)
    /// - `ENVIRONMENT`: `development` selects development mode
    pub fn from_env(env_file: EnvFile) -> Result<Self, EnricherError> {
        Self::from_lookup(env_file, |key| env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(env_file: EnvFile, lookup: F) -> Result<Self, EnricherError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| {
            var(key).ok_or_else(|| {
                EnricherError::config(format!("Missing required environment variable {}", key))
            })
        };

        let development = env_file == EnvFile::Local
            || var("ENVIRONMENT").as_deref() == Some("development");

        let credentials = match (var("CONFLUENT_API_KEY"), var("CONFLUENT_API_SECRET")) {
            (Some(username), Some(password)) => Some(SaslCredentials { username, password }),
            _ => None,
        };

        let consumer_group = if development {
            ConsumerGroup::Ephemeral {
                prefix: DEV_CONSUMER_GROUP_PREFIX.to_string(),
            }
        } else {
            ConsumerGroup::Fixed(
                var("KAFKA_CONSUMER_GROUP_ID")
                    .unwrap_or_else(|| DEFAULT_CONSUMER_GROUP_ID.to_string()),
            )
        };

        let broker = BrokerConfig {
            bootstrap_servers: required("CONFLUENT_BOOTSTRAP_SERVERS")?,
            credentials,
            input_topic: required("CONFLUENT_INPUT_TOPIC")?,
            output_topic: required("CONFLUENT_OUTPUT_TOPIC")?,
            consumer_group,
        };

        let embedding = EmbeddingConfig::new(required("OPENAI_API_KEY")?)
            .with_base_url(
                var("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            )
            .with_model(
                var("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            );

        let defaults = SessionConfig::default();
        let session = SessionConfig {
            max_messages: parse_or(&var, "MAX_MESSAGES_PER_SESSION", defaults.max_messages)?,
            idle_timeout: Duration::from_secs(parse_or(
                &var,
                "IDLE_TIMEOUT_SECS",
                defaults.idle_timeout.as_secs(),
            )?),
            ..defaults
        };

        let supervisor = SupervisorConfig {
            session_interval: Duration::from_secs(parse_or(
                &var,
                "SESSION_INTERVAL_SECS",
                SupervisorConfig::default().session_interval.as_secs(),
            )?),
        };

        if session.max_messages == 0 {
            return Err(EnricherError::config(
                "MAX_MESSAGES_PER_SESSION must be greater than zero",
            ));
        }

        Ok(Self {
            development,
            broker,
            embedding,
            fetch: FetchConfig::default(),
            session,
            supervisor,
        })
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T, EnricherError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(value) => value.trim().parse().map_err(|e| {
            EnricherError::config(format!("Invalid value for {}: {} ({})", key, value, e))
        }),
        None => Ok(default),
    }
}
