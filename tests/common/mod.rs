//! In-memory stream service simulation for end-to-end workflow tests

use async_trait::async_trait;
use bytes::Bytes;
use kinesis_producer::{
    PutRecordAck, RetrievedRecord, StartPosition, StreamClient, StreamClientError, StreamListing,
    StreamStatus,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A single-shard stream service: streams are names, appended records get
/// monotonically increasing sequence numbers, and the first N puts can be
/// scripted to fail with throttling.
#[derive(Clone, Default)]
pub struct SimStreamService {
    streams: Arc<Mutex<Vec<String>>>,
    statuses: Arc<Mutex<VecDeque<StreamStatus>>>,
    stored: Arc<Mutex<Vec<RetrievedRecord>>>,
    transient_put_failures: Arc<AtomicUsize>,
    hidden_from_listing: Arc<AtomicBool>,
    create_calls: Arc<AtomicUsize>,
    put_calls: Arc<AtomicUsize>,
    sequence: Arc<AtomicUsize>,
}

impl SimStreamService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the statuses reported before the stream settles on ACTIVE
    pub async fn script_statuses(&self, statuses: Vec<StreamStatus>) {
        self.statuses.lock().await.extend(statuses);
    }

    /// Fail the next `n` put_record calls with throttling
    pub fn fail_next_puts(&self, n: usize) {
        self.transient_put_failures.store(n, Ordering::SeqCst);
    }

    /// Register a stream directly, as if another producer created it
    pub async fn add_stream(&self, name: &str) {
        self.streams.lock().await.push(name.to_string());
    }

    /// Make listings come back empty while the streams still exist, to
    /// simulate a provisioning race against another producer
    pub fn hide_from_listing(&self) {
        self.hidden_from_listing.store(true, Ordering::SeqCst);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub async fn stored_record_count(&self) -> usize {
        self.stored.lock().await.len()
    }
}

#[async_trait]
impl StreamClient for SimStreamService {
    async fn list_streams(
        &self,
        _exclusive_start: Option<&str>,
        _limit: i32,
    ) -> Result<StreamListing, StreamClientError> {
        let names = if self.hidden_from_listing.load(Ordering::SeqCst) {
            vec![]
        } else {
            self.streams.lock().await.clone()
        };
        Ok(StreamListing {
            names,
            has_more: false,
        })
    }

    async fn create_stream(
        &self,
        name: &str,
        _shard_count: i32,
    ) -> Result<(), StreamClientError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut streams = self.streams.lock().await;
        if streams.iter().any(|existing| existing == name) {
            return Err(StreamClientError::ResourceInUse(format!(
                "stream {} already exists",
                name
            )));
        }
        streams.push(name.to_string());
        Ok(())
    }

    async fn stream_status(&self, name: &str) -> Result<StreamStatus, StreamClientError> {
        if !self.streams.lock().await.iter().any(|s| s == name) {
            return Err(StreamClientError::ResourceNotFound(name.to_string()));
        }
        Ok(self
            .statuses
            .lock()
            .await
            .pop_front()
            .unwrap_or(StreamStatus::Active))
    }

    async fn put_record(
        &self,
        _stream_name: &str,
        data: Bytes,
        partition_key: &str,
    ) -> Result<PutRecordAck, StreamClientError> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);

        let remaining = self.transient_put_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transient_put_failures
                .store(remaining - 1, Ordering::SeqCst);
            return Err(StreamClientError::ThroughputExceeded);
        }

        let sequence_number = format!("{:020}", self.sequence.fetch_add(1, Ordering::SeqCst) + 1);
        self.stored.lock().await.push(RetrievedRecord {
            data,
            partition_key: partition_key.to_string(),
            sequence_number: sequence_number.clone(),
        });

        Ok(PutRecordAck {
            shard_id: "shardId-000000000000".to_string(),
            sequence_number,
        })
    }

    async fn get_shard_iterator(
        &self,
        _stream_name: &str,
        _shard_id: &str,
        _position: &StartPosition,
    ) -> Result<String, StreamClientError> {
        Ok("sim-iterator".to_string())
    }

    async fn get_records(
        &self,
        _iterator: &str,
        limit: i32,
    ) -> Result<Vec<RetrievedRecord>, StreamClientError> {
        let stored = self.stored.lock().await;
        Ok(stored.iter().take(limit as usize).cloned().collect())
    }
}
