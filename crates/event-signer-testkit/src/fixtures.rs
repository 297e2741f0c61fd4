//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use chrono::{DateTime, Utc};
use event_signer_core::{AuditRecord, EventSigner, IngestionFields, IngestionReceipt};

/// Source address used by fixture records.
pub const FIXTURE_SOURCE_IP: &str = "192.0.2.1";

/// A test fixture with a signer and its secret.
pub struct TestFixture {
    pub secret: Vec<u8>,
    pub signer: EventSigner,
}

impl TestFixture {
    /// Create a new fixture with a fixed secret.
    pub fn new() -> Self {
        Self::with_secret(b"fixture-secret".to_vec())
    }

    /// Create with a specific secret.
    pub fn with_secret(secret: impl Into<Vec<u8>>) -> Self {
        let secret = secret.into();
        Self {
            signer: EventSigner::new(&secret),
            secret,
        }
    }

    /// Seal an audit record stamped with the current time.
    pub fn seal(&self, event_id: &str, payload: &[u8]) -> AuditRecord {
        self.seal_at(event_id, Utc::now(), payload)
    }

    /// Seal an audit record at a given time.
    pub fn seal_at(&self, event_id: &str, timestamp: DateTime<Utc>, payload: &[u8]) -> AuditRecord {
        AuditRecord::seal(
            &self.signer,
            event_id,
            timestamp,
            FIXTURE_SOURCE_IP,
            payload.to_vec(),
        )
    }

    /// Issue a verifiable ingestion receipt for a batch.
    pub fn receipt(&self, hec_token_id: &str, event_count: u64, bytes_received: i64) -> IngestionReceipt {
        self.signer.issue_receipt(IngestionFields {
            hec_token_id: hec_token_id.to_string(),
            source_ip: FIXTURE_SOURCE_IP.to_string(),
            event_count,
            bytes_received,
            timestamp: Utc::now(),
        })
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create fixtures with distinct secrets, one per tenant.
pub fn multi_tenant_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| TestFixture::with_secret(format!("tenant-{i}-secret")))
        .collect()
}
