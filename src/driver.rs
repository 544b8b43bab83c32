//! Workflow driver: provision, await readiness, publish one batch
//!
//! The workflow is finite by construction: one call publishes one batch and
//! returns the acks. Repetition is the caller's decision, and the shutdown
//! channel can cancel the workflow at any suspension point.

use crate::client::{PutRecordAck, StreamClient};
use crate::codec::{encode, synthetic_fields};
use crate::error::Result;
use crate::poller::{await_active, PollConfig};
use crate::provisioner::{ensure_stream, ProvisionOutcome};
use crate::publisher::{PublishConfig, RecordPublisher};
use chrono::Utc;
use tracing::info;

/// Configuration for one publishing workflow
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub stream_name: String,
    pub shard_count: i32,
    /// Number of records published per run
    pub batch_size: u32,
    pub poll: PollConfig,
    pub publish: PublishConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            stream_name: "practice-datastream".to_string(),
            shard_count: 1,
            batch_size: 10,
            poll: PollConfig::default(),
            publish: PublishConfig::default(),
        }
    }
}

/// Owns the stream service handle and lends it to the workflow stages
pub struct ProducerWorkflow<C: StreamClient> {
    client: C,
    config: WorkflowConfig,
}

impl<C: StreamClient> ProducerWorkflow<C> {
    pub fn new(client: C, config: WorkflowConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Run one batch: ensure the stream exists, wait for ACTIVE, then
    /// encode and publish `batch_size` records with partition keys
    /// `partitionKey-0` through `partitionKey-{n-1}`.
    pub async fn run(
        &self,
        shutdown: &mut tokio::sync::watch::Receiver<bool>,
    ) -> Result<Vec<PutRecordAck>> {
        match ensure_stream(&self.client, &self.config.stream_name, self.config.shard_count)
            .await?
        {
            ProvisionOutcome::Created => {
                info!(stream = %self.config.stream_name, "Stream created, waiting for it to become active")
            }
            ProvisionOutcome::AlreadyExists => {
                info!(stream = %self.config.stream_name, "Stream already exists, reusing")
            }
        }

        await_active(&self.client, &self.config.stream_name, &self.config.poll, shutdown).await?;

        info!(
            stream = %self.config.stream_name,
            count = self.config.batch_size,
            "Publishing record batch"
        );

        let publisher = RecordPublisher::new(
            &self.client,
            self.config.stream_name.clone(),
            self.config.publish.clone(),
        );

        let mut published = Vec::with_capacity(self.config.batch_size as usize);
        for index in 0..self.config.batch_size {
            let fields = synthetic_fields(Utc::now().timestamp());
            let record = encode(&fields, format!("partitionKey-{}", index))?;
            let ack = publisher.publish(&record, shutdown).await?;
            published.push(ack);
        }

        info!(
            stream = %self.config.stream_name,
            count = published.len(),
            "Batch complete"
        );
        Ok(published)
    }
}
