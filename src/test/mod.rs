//! Test utilities and mock implementations for the producer components


use crate::client::{PutRecordAck, RetrievedRecord, StreamListing};
use crate::codec::{encode, EncodedRecord};
use bytes::Bytes;
use std::collections::BTreeMap;

/// Helper functions for creating test data
pub struct TestUtils;

impl TestUtils {
    /// Create an encoded record with a couple of fields and the given key
    pub fn create_test_record(partition_key: &str) -> EncodedRecord {
        let mut fields = BTreeMap::new();
        fields.insert("field-a".to_string(), "value-a".to_string());
        fields.insert("field-b".to_string(), "value-b".to_string());
        encode(&fields, partition_key).expect("Failed to encode test record")
    }

    /// Create a listing page from string literals
    pub fn listing(names: &[&str], has_more: bool) -> StreamListing {
        StreamListing {
            names: names.iter().map(|n| n.to_string()).collect(),
            has_more,
        }
    }

    /// Create an ack with the given sequence number on a fixed shard
    pub fn ack(sequence_number: &str) -> PutRecordAck {
        PutRecordAck {
            shard_id: "shardId-000000000000".to_string(),
            sequence_number: sequence_number.to_string(),
        }
    }

    /// Create a retrieved record as the read path would return it
    pub fn retrieved(data: &[u8], partition_key: &str, sequence_number: &str) -> RetrievedRecord {
        RetrievedRecord {
            data: Bytes::copy_from_slice(data),
            partition_key: partition_key.to_string(),
            sequence_number: sequence_number.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode;

    #[test]
    fn test_create_test_record() {
        let record = TestUtils::create_test_record("pk-1");
        assert_eq!(record.partition_key, "pk-1");

        let fields = decode(&record.data).expect("test record should decode");
        assert_eq!(fields.get("field-a").map(String::as_str), Some("value-a"));
    }

    #[test]
    fn test_listing_helper() {
        let page = TestUtils::listing(&["one", "two"], true);
        assert_eq!(page.names, vec!["one", "two"]);
        assert!(page.has_more);
    }
}
