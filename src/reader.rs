//! Best-effort diagnostic read-back
//!
//! One shard iterator, one bounded read, whatever came back. This is not a
//! consumer: no looping, no checkpointing, no completeness guarantee.

use crate::client::{RetrievedRecord, StartPosition, StreamClient};
use crate::error::Result;
use tracing::debug;

/// Read up to `limit` currently available records from one shard.
pub async fn read_once<C: StreamClient>(
    client: &C,
    stream_name: &str,
    shard_id: &str,
    position: &StartPosition,
    limit: i32,
) -> Result<Vec<RetrievedRecord>> {
    let iterator = client
        .get_shard_iterator(stream_name, shard_id, position)
        .await?;

    let records = client.get_records(&iterator, limit).await?;
    debug!(
        stream = %stream_name,
        shard_id = %shard_id,
        count = records.len(),
        "Read records from shard"
    );
    Ok(records)
}
