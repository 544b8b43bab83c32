//! Record publishing with bounded retry
//!
//! One publish call is a small state machine: each attempt either succeeds,
//! fails transiently (retried after a backoff delay until the attempt
//! ceiling), or fails fatally (terminal after a single attempt). Both the
//! in-flight call and the backoff sleep race the shutdown channel, so a
//! cancelled workflow never sits out a delay.

use crate::client::{PutRecordAck, StreamClient};
use crate::codec::EncodedRecord;
use crate::error::{ProducerError, Result};
use crate::retry::{Backoff, ExponentialBackoff};
use crate::shutdown::signalled;
use std::time::Duration;
use tokio::select;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Configuration for publish retry behavior
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Total attempt ceiling per record, including the first attempt
    pub max_attempts: u32,
    /// Initial backoff delay after the first transient failure
    pub initial_backoff: Duration,
    /// Backoff cap
    pub max_backoff: Duration,
    /// Jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
            jitter_factor: 0.1,
        }
    }
}

/// Publishes single records to one stream with classified, bounded retry
pub struct RecordPublisher<'a, C: StreamClient, B: Backoff = ExponentialBackoff> {
    client: &'a C,
    stream_name: String,
    config: PublishConfig,
    backoff: B,
}

impl<'a, C: StreamClient> RecordPublisher<'a, C> {
    pub fn new(client: &'a C, stream_name: impl Into<String>, config: PublishConfig) -> Self {
        let backoff = ExponentialBackoff::builder()
            .initial_delay(config.initial_backoff)
            .max_delay(config.max_backoff)
            .jitter_factor(config.jitter_factor)
            .build();
        Self::with_backoff(client, stream_name, config, backoff)
    }
}

impl<'a, C: StreamClient, B: Backoff> RecordPublisher<'a, C, B> {
    /// Construct with an explicit backoff policy
    pub fn with_backoff(
        client: &'a C,
        stream_name: impl Into<String>,
        config: PublishConfig,
        backoff: B,
    ) -> Self {
        Self {
            client,
            stream_name: stream_name.into(),
            config,
            backoff,
        }
    }

    /// Publish one record, retrying transient failures with backoff.
    ///
    /// Terminal outcomes: the service's ack, `PublishExhausted` once
    /// `max_attempts` transient failures have accumulated, a fatal service
    /// error after exactly one attempt, or `Shutdown`. Only an explicit
    /// signal counts as shutdown; a dropped sender does not.
    pub async fn publish(
        &self,
        record: &EncodedRecord,
        shutdown: &mut tokio::sync::watch::Receiver<bool>,
    ) -> Result<PutRecordAck> {
        if self.config.max_attempts == 0 {
            return Err(ProducerError::ConfigError(
                "max_attempts must be at least 1".to_string(),
            ));
        }

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;

            let outcome = select! {
                result = self.client.put_record(
                    &self.stream_name,
                    record.data.clone(),
                    &record.partition_key,
                ) => result,
                _ = signalled(shutdown) => return Err(ProducerError::Shutdown),
            };

            match outcome {
                Ok(ack) => {
                    info!(
                        stream = %self.stream_name,
                        partition_key = %record.partition_key,
                        shard_id = %ack.shard_id,
                        sequence_number = %ack.sequence_number,
                        attempt,
                        "Record published"
                    );
                    return Ok(ack);
                }
                Err(e) if e.is_transient() => {
                    if attempt >= self.config.max_attempts {
                        warn!(
                            stream = %self.stream_name,
                            partition_key = %record.partition_key,
                            attempts = attempt,
                            error = %e,
                            "Publish attempts exhausted"
                        );
                        return Err(ProducerError::PublishExhausted {
                            attempts: attempt,
                            last_error: e,
                        });
                    }

                    let delay = self.backoff.next_delay(attempt);
                    warn!(
                        stream = %self.stream_name,
                        partition_key = %record.partition_key,
                        attempt,
                        delay_ms = ?delay.as_millis(),
                        error = %e,
                        "Transient publish failure, retrying after delay"
                    );

                    select! {
                        _ = sleep(delay) => {}
                        _ = signalled(shutdown) => return Err(ProducerError::Shutdown),
                    }
                }
                Err(e) => {
                    error!(
                        stream = %self.stream_name,
                        partition_key = %record.partition_key,
                        attempt,
                        error = %e,
                        "Fatal publish failure"
                    );
                    return Err(e.into());
                }
            }
        }
    }
}
