//! # Tangle Testkit
//!
//! Test utilities for the tangle exporter.
//!
//! This crate provides:
//! - [`TestTangle`], a store directory in a temporary folder that tests fill
//!   record by record
//! - Deterministic hashes and payloads for readable tests
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tangle_testkit::prelude::*;
//!
//! #[test]
//! fn exports_one_row() {
//!     let mut fixture = TestTangle::new();
//!     fixture.add_entry(&sample_metadata(test_hash("TX")), &transaction_trytes('A'));
//!     let tangle = fixture.open();
//!     // ... run an export
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
