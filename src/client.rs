//! Stream service abstraction and its AWS Kinesis implementation
//!
//! Every component in this crate talks to the stream service through the
//! [`StreamClient`] trait, so the core logic depends only on operation
//! signatures. The production implementation maps `aws_sdk_kinesis::Client`
//! onto the trait and classifies SDK errors into [`StreamClientError`].

use async_trait::async_trait;
use aws_sdk_kinesis::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_kinesis::types::{ShardIteratorType, StreamStatus as SdkStreamStatus};
use aws_sdk_kinesis::Client;
use aws_smithy_types::Blob;
use bytes::Bytes;
use std::fmt;
use thiserror::Error;

/// Error type for stream service operations
///
/// `is_transient` drives the publisher's retry decision: transient errors
/// are retried with backoff, everything else is terminal on first sight.
#[derive(Debug, Error)]
pub enum StreamClientError {
    #[error("Provisioned throughput exceeded")]
    ThroughputExceeded,

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("KMS error: {0}")]
    KmsError(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Resource already in use: {0}")]
    ResourceInUse(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Access denied")]
    AccessDenied,

    #[error("Shard iterator has expired")]
    ExpiredIterator,

    #[error("{0}")]
    Other(String),
}

impl StreamClientError {
    /// Whether the failure is expected to resolve if retried after a delay
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StreamClientError::ThroughputExceeded
                | StreamClientError::Timeout(_)
                | StreamClientError::ConnectionError(_)
                | StreamClientError::KmsError(_)
        )
    }
}

/// Lifecycle status of a stream as reported by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamStatus {
    Creating,
    Active,
    Deleting,
    Updating,
    Unknown(String),
}

impl StreamStatus {
    pub fn as_str(&self) -> &str {
        match self {
            StreamStatus::Creating => "CREATING",
            StreamStatus::Active => "ACTIVE",
            StreamStatus::Deleting => "DELETING",
            StreamStatus::Updating => "UPDATING",
            StreamStatus::Unknown(other) => other,
        }
    }
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&SdkStreamStatus> for StreamStatus {
    fn from(status: &SdkStreamStatus) -> Self {
        match status {
            SdkStreamStatus::Creating => StreamStatus::Creating,
            SdkStreamStatus::Active => StreamStatus::Active,
            SdkStreamStatus::Deleting => StreamStatus::Deleting,
            SdkStreamStatus::Updating => StreamStatus::Updating,
            other => StreamStatus::Unknown(other.as_str().to_string()),
        }
    }
}

/// One page of stream names from a paginated listing
#[derive(Debug, Clone, Default)]
pub struct StreamListing {
    pub names: Vec<String>,
    pub has_more: bool,
}

/// Position assigned to a record by the service on a successful append
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutRecordAck {
    pub shard_id: String,
    pub sequence_number: String,
}

/// Where a one-shot read should start within a shard
#[derive(Debug, Clone)]
pub enum StartPosition {
    TrimHorizon,
    Latest,
    AfterSequence(String),
}

/// A record as returned by the service on the read path
#[derive(Debug, Clone)]
pub struct RetrievedRecord {
    pub data: Bytes,
    pub partition_key: String,
    pub sequence_number: String,
}

#[async_trait]
pub trait StreamClient: Send + Sync {
    /// List up to `limit` stream names starting after `exclusive_start`
    async fn list_streams(
        &self,
        exclusive_start: Option<&str>,
        limit: i32,
    ) -> Result<StreamListing, StreamClientError>;

    async fn create_stream(&self, name: &str, shard_count: i32)
        -> Result<(), StreamClientError>;

    async fn stream_status(&self, name: &str) -> Result<StreamStatus, StreamClientError>;

    async fn put_record(
        &self,
        stream_name: &str,
        data: Bytes,
        partition_key: &str,
    ) -> Result<PutRecordAck, StreamClientError>;

    async fn get_shard_iterator(
        &self,
        stream_name: &str,
        shard_id: &str,
        position: &StartPosition,
    ) -> Result<String, StreamClientError>;

    async fn get_records(
        &self,
        iterator: &str,
        limit: i32,
    ) -> Result<Vec<RetrievedRecord>, StreamClientError>;
}

/// Classify an SDK error by its dispatch variant and service error code
fn classify_error<E, R>(err: SdkError<E, R>) -> StreamClientError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    match &err {
        SdkError::TimeoutError(_) => return StreamClientError::Timeout(err.to_string()),
        SdkError::DispatchFailure(_) => {
            return StreamClientError::ConnectionError(err.to_string())
        }
        _ => {}
    }

    let message = err
        .message()
        .map(String::from)
        .unwrap_or_else(|| err.to_string());

    match err.code() {
        // LimitExceededException is the account-level stream throttle;
        // rate-limit class, same retry treatment as throughput.
        Some("ProvisionedThroughputExceededException") | Some("LimitExceededException") => {
            StreamClientError::ThroughputExceeded
        }
        Some("ResourceInUseException") => StreamClientError::ResourceInUse(message),
        Some("ResourceNotFoundException") => StreamClientError::ResourceNotFound(message),
        Some("InvalidArgumentException") | Some("ValidationException") => {
            StreamClientError::InvalidArgument(message)
        }
        Some("AccessDeniedException") => StreamClientError::AccessDenied,
        Some("ExpiredIteratorException") => StreamClientError::ExpiredIterator,
        Some(code) if code.starts_with("KMS") => StreamClientError::KmsError(message),
        Some(code) => StreamClientError::Other(format!("{}: {}", code, message)),
        None => StreamClientError::Other(message),
    }
}

#[async_trait]
impl StreamClient for Client {
    async fn list_streams(
        &self,
        exclusive_start: Option<&str>,
        limit: i32,
    ) -> Result<StreamListing, StreamClientError> {
        let mut req = self.list_streams().limit(limit);
        if let Some(start) = exclusive_start {
            req = req.exclusive_start_stream_name(start);
        }

        let response = req.send().await.map_err(classify_error)?;
        Ok(StreamListing {
            names: response.stream_names().to_vec(),
            has_more: response.has_more_streams(),
        })
    }

    async fn create_stream(
        &self,
        name: &str,
        shard_count: i32,
    ) -> Result<(), StreamClientError> {
        self.create_stream()
            .stream_name(name)
            .shard_count(shard_count)
            .send()
            .await
            .map_err(classify_error)?;
        Ok(())
    }

    async fn stream_status(&self, name: &str) -> Result<StreamStatus, StreamClientError> {
        let response = self
            .describe_stream()
            .stream_name(name)
            .send()
            .await
            .map_err(classify_error)?;

        match response.stream_description() {
            Some(description) => Ok(StreamStatus::from(description.stream_status())),
            None => Err(StreamClientError::Other(format!(
                "describe_stream returned no description for {}",
                name
            ))),
        }
    }

    async fn put_record(
        &self,
        stream_name: &str,
        data: Bytes,
        partition_key: &str,
    ) -> Result<PutRecordAck, StreamClientError> {
        let response = self
            .put_record()
            .stream_name(stream_name)
            .data(Blob::new(data.to_vec()))
            .partition_key(partition_key)
            .send()
            .await
            .map_err(classify_error)?;

        Ok(PutRecordAck {
            shard_id: response.shard_id().to_string(),
            sequence_number: response.sequence_number().to_string(),
        })
    }

    async fn get_shard_iterator(
        &self,
        stream_name: &str,
        shard_id: &str,
        position: &StartPosition,
    ) -> Result<String, StreamClientError> {
        let mut req = self
            .get_shard_iterator()
            .stream_name(stream_name)
            .shard_id(shard_id);

        req = match position {
            StartPosition::TrimHorizon => req.shard_iterator_type(ShardIteratorType::TrimHorizon),
            StartPosition::Latest => req.shard_iterator_type(ShardIteratorType::Latest),
            StartPosition::AfterSequence(seq) => req
                .shard_iterator_type(ShardIteratorType::AfterSequenceNumber)
                .starting_sequence_number(seq),
        };

        let response = req.send().await.map_err(classify_error)?;
        response
            .shard_iterator()
            .map(String::from)
            .ok_or_else(|| StreamClientError::Other("no shard iterator returned".to_string()))
    }

    async fn get_records(
        &self,
        iterator: &str,
        limit: i32,
    ) -> Result<Vec<RetrievedRecord>, StreamClientError> {
        let response = self
            .get_records()
            .shard_iterator(iterator)
            .limit(limit)
            .send()
            .await
            .map_err(classify_error)?;

        Ok(response
            .records()
            .iter()
            .map(|record| RetrievedRecord {
                data: Bytes::copy_from_slice(record.data().as_ref()),
                partition_key: record.partition_key().to_string(),
                sequence_number: record.sequence_number().to_string(),
            })
            .collect())
    }
}
