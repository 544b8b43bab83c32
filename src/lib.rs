//! Kinesis Producer - a reliable AWS Kinesis record producer
//!
//! This crate provides the producer-side building blocks for publishing
//! records to a Kinesis data stream: idempotent stream provisioning,
//! readiness polling, single-record publishing with bounded retry and
//! transient/fatal failure classification, and a best-effort diagnostic
//! reader. A small driver composes them into one finite, cancellable
//! batch workflow.

pub mod client;
pub mod codec;
pub mod driver;
pub mod error;
pub mod poller;
pub mod provisioner;
pub mod publisher;
pub mod reader;
pub mod retry;

mod shutdown;

// Make test utilities available for integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test;

pub use error::{ProducerError, Result};
pub use retry::{Backoff, ExponentialBackoff, FixedBackoff};

// Re-export the service abstraction and its value types
pub use client::{
    PutRecordAck, RetrievedRecord, StartPosition, StreamClient, StreamClientError, StreamListing,
    StreamStatus,
};

// Re-export the workflow components
pub use codec::{decode, encode, synthetic_fields, EncodedRecord};
pub use driver::{ProducerWorkflow, WorkflowConfig};
pub use poller::{await_active, PollConfig};
pub use provisioner::{ensure_stream, ProvisionOutcome};
pub use publisher::{PublishConfig, RecordPublisher};
pub use reader::read_once;
