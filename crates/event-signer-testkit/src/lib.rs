//! # Event Signer Testkit
//!
//! Testing utilities for the event signer.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known inputs with expected signatures for cross-implementation checks
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helper structs for setting up test scenarios
//!
//! ## Golden Vectors
//!
//! Any implementation that signs the same audit trail must reproduce these:
//!
//! ```rust
//! use event_signer_testkit::vectors::{all_vectors, signature_for_vector};
//!
//! for vector in all_vectors() {
//!     assert_eq!(signature_for_vector(&vector).to_hex(), vector.expected_signature);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use event_signer_testkit::generators::EventParams;
//!
//! proptest! {
//!     #[test]
//!     fn sign_is_deterministic(params: EventParams) {
//!         let signer = params.signer();
//!         prop_assert_eq!(params.sign_with(&signer), params.sign_with(&signer));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use event_signer_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let record = fixture.seal("evt-1", b"{}");
//! assert!(record.verify(&fixture.signer));
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_tenant_fixtures, TestFixture};
pub use generators::EventParams;
pub use vectors::{all_vectors, signature_for_vector, verify_all_vectors, GoldenVector};
