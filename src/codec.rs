//! Payload codec: flat string-field records encoded as JSON bytes
//!
//! A record is a flat mapping of named string fields, serialized once as a
//! JSON object to UTF-8 bytes. The payload stays opaque to the rest of the
//! crate; only the reader path and tests decode it back.

use crate::error::Result;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;

/// A record ready to be published: opaque payload plus partition key
#[derive(Debug, Clone)]
pub struct EncodedRecord {
    pub data: Bytes,
    pub partition_key: String,
}

/// Encode a field mapping as a single JSON object in UTF-8 bytes
pub fn encode(
    fields: &BTreeMap<String, String>,
    partition_key: impl Into<String>,
) -> Result<EncodedRecord> {
    let data = serde_json::to_vec(fields).context("Failed to encode record fields as JSON")?;
    Ok(EncodedRecord {
        data: Bytes::from(data),
        partition_key: partition_key.into(),
    })
}

/// Decode a JSON payload back into its field mapping
pub fn decode(data: &[u8]) -> Result<BTreeMap<String, String>> {
    let fields = serde_json::from_slice(data).context("Failed to decode record payload")?;
    Ok(fields)
}

/// The synthetic record shape published by the demo workflow: seven named
/// fields, all carrying the same epoch-seconds value as a decimal string.
pub fn synthetic_fields(epoch_seconds: i64) -> BTreeMap<String, String> {
    let value = epoch_seconds.to_string();
    [
        "BatchActivityID",
        "MSMInstanceI",
        "SchSourceID",
        "VerSourceID",
        "ImportFileFilter",
        "ImportStarted",
        "ImportDurationSeconds",
    ]
    .iter()
    .map(|name| (name.to_string(), value.clone()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_decode_round_trip() -> Result<()> {
        let mut fields = BTreeMap::new();
        fields.insert("alpha".to_string(), "one".to_string());
        fields.insert("beta".to_string(), "two".to_string());
        fields.insert("unicode".to_string(), "värde-ß-日本".to_string());

        let record = encode(&fields, "partitionKey-0")?;
        let decoded = decode(&record.data)?;

        assert_eq!(decoded, fields);
        assert_eq!(record.partition_key, "partitionKey-0");
        Ok(())
    }

    #[test]
    fn test_payload_is_single_encoded_json_object() -> Result<()> {
        let mut fields = BTreeMap::new();
        fields.insert("key".to_string(), "value".to_string());

        let record = encode(&fields, "pk")?;

        // The payload must parse directly as an object, not as a JSON
        // string literal wrapping another document.
        let parsed: serde_json::Value = serde_json::from_slice(&record.data)
            .expect("payload should be valid JSON");
        assert!(parsed.is_object());
        assert_eq!(parsed["key"], "value");
        Ok(())
    }

    #[test]
    fn test_empty_mapping_is_valid() -> Result<()> {
        let fields = BTreeMap::new();
        let record = encode(&fields, "pk")?;
        assert_eq!(record.data.as_ref(), b"{}");
        assert_eq!(decode(&record.data)?, fields);
        Ok(())
    }

    #[test]
    fn test_decode_rejects_non_object_payload() {
        assert!(decode(b"not json").is_err());
        assert!(decode(b"[1, 2, 3]").is_err());
    }

    #[test]
    fn test_synthetic_fields_shape() {
        let fields = synthetic_fields(1_700_000_000);

        assert_eq!(fields.len(), 7);
        for name in [
            "BatchActivityID",
            "MSMInstanceI",
            "SchSourceID",
            "VerSourceID",
            "ImportFileFilter",
            "ImportStarted",
            "ImportDurationSeconds",
        ] {
            assert_eq!(fields.get(name).map(String::as_str), Some("1700000000"));
        }
    }
}
