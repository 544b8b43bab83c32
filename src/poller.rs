//! Readiness polling: wait for a stream to report ACTIVE

use crate::client::{StreamClient, StreamStatus};
use crate::error::{ProducerError, Result};
use crate::shutdown::signalled;
use std::time::Duration;
use tokio::select;
use tokio::time::{sleep, Instant};
use tracing::info;

/// Configuration for readiness polling
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between describe calls
    pub interval: Duration,
    /// Overall deadline for observing ACTIVE
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Poll the stream's status until ACTIVE is observed or the deadline passes.
///
/// Returns immediately on ACTIVE with no trailing sleep. A deadline passing
/// without ACTIVE is a fatal [`ProducerError::ReadinessTimeout`]; this layer
/// never retries past it. Describe errors propagate untouched. The sleep
/// between polls races the shutdown channel; only an explicit signal aborts
/// the poll, a dropped sender does not.
pub async fn await_active<C: StreamClient>(
    client: &C,
    stream_name: &str,
    config: &PollConfig,
    shutdown: &mut tokio::sync::watch::Receiver<bool>,
) -> Result<()> {
    let deadline = Instant::now() + config.timeout;

    while Instant::now() < deadline {
        let status = client.stream_status(stream_name).await?;
        info!(stream = %stream_name, status = %status, "Observed stream status");

        if status == StreamStatus::Active {
            return Ok(());
        }

        select! {
            _ = sleep(config.interval) => {}
            _ = signalled(shutdown) => return Err(ProducerError::Shutdown),
        }
    }

    Err(ProducerError::ReadinessTimeout(
        stream_name.to_string(),
        config.timeout,
    ))
}
