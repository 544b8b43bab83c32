//! Idempotent stream provisioning

use crate::client::{StreamClient, StreamClientError};
use crate::error::{ProducerError, Result};
use tracing::{debug, info};

/// Page size used when listing existing streams
const LIST_PAGE_LIMIT: i32 = 20;

/// Outcome of an ensure_stream call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Created,
    AlreadyExists,
}

/// Ensure a stream of the given name exists, creating it if necessary.
///
/// A stream found during listing is reused without mutation. A create call
/// failing with ResourceInUse means another provisioner created the stream
/// between our listing and our create; that race is a fatal
/// [`ProducerError::StreamConflict`], not a benign reuse.
pub async fn ensure_stream<C: StreamClient>(
    client: &C,
    name: &str,
    shard_count: i32,
) -> Result<ProvisionOutcome> {
    if shard_count < 1 {
        return Err(ProducerError::ConfigError(format!(
            "shard_count must be at least 1, got {}",
            shard_count
        )));
    }

    let mut exclusive_start: Option<String> = None;
    loop {
        let page = client
            .list_streams(exclusive_start.as_deref(), LIST_PAGE_LIMIT)
            .await?;

        if page.names.iter().any(|existing| existing == name) {
            debug!(stream = %name, "Stream already listed, reusing");
            return Ok(ProvisionOutcome::AlreadyExists);
        }

        if !page.has_more {
            break;
        }
        match page.names.last() {
            Some(last) => exclusive_start = Some(last.clone()),
            // The service claims more pages but gave us no name to continue
            // from; creating here could duplicate an unseen stream.
            None => {
                return Err(StreamClientError::Other(format!(
                    "stream listing for {} reported more pages but returned no names",
                    name
                ))
                .into())
            }
        }
    }

    match client.create_stream(name, shard_count).await {
        Ok(()) => {
            info!(stream = %name, shard_count, "Created stream");
            Ok(ProvisionOutcome::Created)
        }
        Err(StreamClientError::ResourceInUse(_)) => {
            Err(ProducerError::StreamConflict(name.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
