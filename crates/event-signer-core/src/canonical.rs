//! Canonical signing bytes for audit events and ingestion receipts.
//!
//! Fields are concatenated in a fixed order, separated by [`DELIMITER`]:
//!
//! ```text
//! event:     event_id | timestamp | source_ip | payload
//! ingestion: hec_token_id | source_ip | event_count | bytes_received | timestamp | nonce
//! ```
//!
//! - Timestamps: UTC, RFC 3339, always nine fractional digits, `Z` suffix
//! - Integers: base-10 ASCII, no padding
//! - Nonce: 32 lowercase hex chars
//! - Payload: raw bytes, appended last and unescaped
//!
//! **CRITICAL**: This encoding is FROZEN. Changes break all existing signatures.

use chrono::{DateTime, Utc};

use crate::ingestion::IngestionNonce;

/// Field separator.
pub const DELIMITER: u8 = b'|';

/// Timestamp layout. Spelled out rather than relying on `Display`, whose
/// fraction width depends on the value.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9fZ";

/// Render a timestamp in the canonical form, e.g. `2024-01-01T12:00:00.000000000Z`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Bytes covered by an audit event signature.
pub fn event_signing_bytes(
    event_id: &str,
    timestamp: &DateTime<Utc>,
    source_ip: &str,
    payload: &[u8],
) -> Vec<u8> {
    let ts = format_timestamp(timestamp);

    let mut buf = Vec::with_capacity(event_id.len() + ts.len() + source_ip.len() + payload.len() + 3);
    buf.extend_from_slice(event_id.as_bytes());
    buf.push(DELIMITER);
    buf.extend_from_slice(ts.as_bytes());
    buf.push(DELIMITER);
    buf.extend_from_slice(source_ip.as_bytes());
    buf.push(DELIMITER);
    buf.extend_from_slice(payload);
    buf
}

/// Bytes covered by an ingestion receipt signature.
pub fn ingestion_signing_bytes(
    hec_token_id: &str,
    source_ip: &str,
    event_count: u64,
    bytes_received: i64,
    timestamp: &DateTime<Utc>,
    nonce: &IngestionNonce,
) -> Vec<u8> {
    let fields = [
        hec_token_id.to_string(),
        source_ip.to_string(),
        event_count.to_string(),
        bytes_received.to_string(),
        format_timestamp(timestamp),
        nonce.to_hex(),
    ];

    let mut buf = Vec::with_capacity(fields.iter().map(|f| f.len() + 1).sum());
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            buf.push(DELIMITER);
        }
        buf.extend_from_slice(field.as_bytes());
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64, nanos: u32) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, nanos).unwrap()
    }

    #[test]
    fn test_timestamp_has_fixed_nanosecond_fraction() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(format_timestamp(&t), "2024-01-01T12:00:00.000000000Z");

        let t = ts(1_704_110_400, 1);
        assert_eq!(format_timestamp(&t), "2024-01-01T12:00:00.000000001Z");

        let t = ts(1_704_110_400, 123_456_789);
        assert_eq!(format_timestamp(&t), "2024-01-01T12:00:00.123456789Z");
    }

    #[test]
    fn test_event_signing_bytes_layout() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let bytes = event_signing_bytes("event-123", &t, "192.168.1.100", br#"{"test":"data"}"#);
        assert_eq!(
            bytes,
            br#"event-123|2024-01-01T12:00:00.000000000Z|192.168.1.100|{"test":"data"}"#.to_vec()
        );
    }

    #[test]
    fn test_event_signing_bytes_empty_fields() {
        let t = ts(0, 0);
        let bytes = event_signing_bytes("", &t, "", &[]);
        assert_eq!(bytes, b"|1970-01-01T00:00:00.000000000Z||".to_vec());
    }

    #[test]
    fn test_payload_is_not_escaped() {
        let t = ts(0, 0);
        let bytes = event_signing_bytes("e", &t, "ip", &[0x00, b'|', 0xff]);
        assert!(bytes.ends_with(&[b'|', 0x00, b'|', 0xff]));
    }

    #[test]
    fn test_ingestion_signing_bytes_layout() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let nonce = IngestionNonce::from_bytes([0x0f; 16]);
        let bytes = ingestion_signing_bytes("hec-token", "10.0.0.1", 42, 1024, &t, &nonce);
        let expected = format!(
            "hec-token|10.0.0.1|42|1024|2024-01-01T12:00:00.000000000Z|{}",
            "0f".repeat(16)
        );
        assert_eq!(bytes, expected.into_bytes());
    }

    #[test]
    fn test_ingestion_signing_bytes_negative_byte_count() {
        let t = ts(0, 0);
        let nonce = IngestionNonce::from_bytes([0; 16]);
        let bytes = ingestion_signing_bytes("", "", 0, -1, &t, &nonce);
        let s = String::from_utf8(bytes).unwrap();
        assert!(s.starts_with("||0|-1|"));
    }
}
