//! Demo producer: provisions `practice-datastream` and publishes one batch
//! of ten synthetic records against real AWS Kinesis.
//!
//! Credentials and region resolve through the default provider chain.

use aws_config::BehaviorVersion;
use kinesis_producer::{ProducerError, ProducerWorkflow, WorkflowConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let aws_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
    let client = aws_sdk_kinesis::Client::new(&aws_config);

    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = shutdown_tx.send(true);
            }
            // The workflow keeps running without a shutdown signal; a
            // dropped sender is not read as a request to stop.
            Err(e) => error!(error = %e, "Failed to listen for Ctrl-C"),
        }
    });

    let workflow = ProducerWorkflow::new(client, WorkflowConfig::default());
    match workflow.run(&mut shutdown_rx).await {
        Ok(published) => {
            info!(count = published.len(), "All records published");
            Ok(())
        }
        Err(ProducerError::StreamConflict(name)) => {
            error!(stream = %name, "Quitting without publishing: a stream of that name already exists");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
