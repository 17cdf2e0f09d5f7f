//! Supervisor module for the enrichment pipeline.
//!
//! Starts a fresh session after each one ends, sleeping a fixed interval in
//! between, until an interrupt arrives or a session fails during setup.

use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::errors::PipelineError;
use crate::orchestrator::{SessionLoop, SessionOutcome};

/// Configuration for the supervisor.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Pause between the end of one session and the start of the next.
    pub session_interval: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            session_interval: Duration::from_secs(300),
        }
    }
}

/// What the supervisor does after a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Sleep the interval, then start another session.
    Retry,
    /// Stop supervising.
    Stop,
}

/// Repeatedly runs sessions until interrupted.
pub struct Supervisor {
    session: SessionLoop,
    config: SupervisorConfig,
    shutdown: watch::Receiver<bool>,
}

impl Supervisor {
    pub fn new(
        session: SessionLoop,
        config: SupervisorConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            session,
            config,
            shutdown,
        }
    }

    /// Decide what follows a session.
    ///
    /// Setup failures and interrupts stop the supervisor; every other outcome,
    /// including a session ended by a fatal error, is retried.
    pub fn decide(result: &Result<SessionOutcome, PipelineError>) -> Decision {
        match result {
            Err(_) | Ok(SessionOutcome::Interrupted { .. }) => Decision::Stop,
            Ok(_) => Decision::Retry,
        }
    }

    /// Run sessions until shutdown.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of sessions started, after an interrupt
    /// * `Err(PipelineError)` - The setup error that stopped supervision
    pub async fn run(&mut self) -> Result<usize, PipelineError> {
        info!("START: Enrichment service is starting");
        let mut sessions = 0;

        let result = loop {
            if *self.shutdown.borrow() {
                info!("Interrupt received, shutting down");
                break Ok(sessions);
            }

            info!(session = sessions + 1, "Starting Kafka polling service");
            sessions += 1;
            let result = self.session.run().await;

            match &result {
                Ok(SessionOutcome::Completed { processed }) => {
                    info!(processed = processed, "Session reached its record limit");
                }
                Ok(SessionOutcome::IdleTimeout { processed }) => {
                    info!(processed = processed, "Session drained after idle timeout");
                }
                Ok(SessionOutcome::FatalError { processed, cause }) => {
                    warn!(processed = processed, error = %cause, "Session ended on error");
                }
                Ok(SessionOutcome::Interrupted { processed }) => {
                    info!(processed = processed, "Session interrupted");
                }
                Err(e) => {
                    error!(error = %e, "Error starting Kafka polling service");
                }
            }

            match Self::decide(&result) {
                Decision::Retry => {}
                Decision::Stop => break result.map(|_| sessions),
            }

            info!(
                seconds = self.config.session_interval.as_secs(),
                "Waiting before next session"
            );
            tokio::select! {
                _ = tokio::time::sleep(self.config.session_interval) => {}
                Ok(()) = self.shutdown.changed() => {}
            }
        };

        info!("STOP: Enrichment service is shutting down");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::SessionConfig;
    use crate::testing::{item, MockBroker, RecordingHandler};
    use std::sync::Arc;
    use tokio::time::Instant;

    fn supervisor(broker: &MockBroker) -> (Supervisor, watch::Sender<bool>) {
        let (tx, rx) = watch::channel(false);
        let session = SessionLoop::new(
            Arc::new(broker.clone()),
            Arc::new(RecordingHandler::new()),
            SessionConfig::default(),
            rx.clone(),
        );
        (Supervisor::new(session, SupervisorConfig::default(), rx), tx)
    }

    #[test]
    fn test_decide() {
        let retry = [
            Ok(SessionOutcome::Completed { processed: 100 }),
            Ok(SessionOutcome::IdleTimeout { processed: 0 }),
            Ok(SessionOutcome::FatalError {
                processed: 3,
                cause: PipelineError::publish("timed out"),
            }),
        ];
        for result in &retry {
            assert_eq!(Supervisor::decide(result), Decision::Retry);
        }

        assert_eq!(
            Supervisor::decide(&Ok(SessionOutcome::Interrupted { processed: 1 })),
            Decision::Stop
        );
        assert_eq!(
            Supervisor::decide(&Err(PipelineError::kafka("no brokers"))),
            Decision::Stop
        );
    }

    #[tokio::test]
    async fn test_setup_failure_stops_supervision() {
        let broker = MockBroker::new().fail_connect();
        let (mut supervisor, _tx) = supervisor(&broker);

        let result = supervisor.run().await;

        assert!(matches!(result, Err(PipelineError::KafkaError(_))));
        assert_eq!(broker.connects(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sessions_repeat_after_interval() {
        let broker = MockBroker::new();
        broker.push(item("a"));
        let (mut supervisor, tx) = supervisor(&broker);
        let start = Instant::now();

        let handle = tokio::spawn(async move { supervisor.run().await });

        // Two idle sessions (~31s each) separated by the 300s interval.
        tokio::time::sleep(Duration::from_secs(31 + 300 + 10)).await;
        assert_eq!(broker.connects(), 2);
        assert_eq!(broker.commits(), vec![0]);

        tx.send(true).unwrap();
        let sessions = handle.await.unwrap().unwrap();

        assert_eq!(sessions, 2);
        assert_eq!(broker.closes(), 2);
        assert!(start.elapsed() < Duration::from_secs(31 + 300 + 31 + 5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_during_interval_stops_immediately() {
        let broker = MockBroker::new();
        let (mut supervisor, tx) = supervisor(&broker);

        let handle = tokio::spawn(async move { supervisor.run().await });

        tokio::time::sleep(Duration::from_secs(60)).await;
        tx.send(true).unwrap();
        let sessions = handle.await.unwrap().unwrap();

        assert_eq!(sessions, 1);
        assert_eq!(broker.connects(), 1);
    }
}
