use std::process;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use rss_enricher::logging::init_tracing;
use rss_enricher::{load_env_file, Dependencies, EnricherError, Settings};

async fn run() -> Result<(), EnricherError> {
    let env_file = load_env_file()?;
    let settings = Settings::from_env(env_file)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt signal received");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for interrupt signal");
                // Keep the sender alive so the supervisor's interval sleep is not cut short.
                std::future::pending::<()>().await;
            }
        }
    });

    let mut dependencies = Dependencies::new(settings, shutdown_rx)?;
    let sessions = dependencies.supervisor.run().await?;
    info!(sessions = sessions, "Supervisor stopped");

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    if let Err(e) = run().await {
        error!(error = %e, "Enrichment service failed");
        process::exit(1);
    }
}
