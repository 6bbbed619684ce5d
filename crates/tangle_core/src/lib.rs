//! # Tangle Core
//!
//! Read-only access to a local tangle replica.
//!
//! This crate provides:
//! - The record framing shared by both store logs ([`StoreRecord`])
//! - Keyed object stores with reference-counted handles ([`ObjectStore`],
//!   [`CachedObject`])
//! - A streaming traversal of the metadata index ([`KeyIterator`])
//! - The store directory itself ([`Tangle`])
//!
//! ## Example
//!
//! ```rust,no_run
//! use tangle_core::{StoreConfig, Tangle};
//! use std::path::Path;
//!
//! let tangle = Tangle::open(Path::new("mainnetdb"), &StoreConfig::new())?;
//! for hash in tangle.metadata_hashes() {
//!     let hash = hash?;
//!     if let Some(meta) = tangle.metadata(&hash)? {
//!         println!("{hash} solid={}", meta.is_solid());
//!     }
//! }
//! # Ok::<(), tangle_core::CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cached;
mod config;
mod error;
mod object;
mod record;
mod stats;
mod store;
mod tangle;

pub use cached::CachedObject;
pub use config::StoreConfig;
pub use error::{CoreError, CoreResult};
pub use object::{MetadataFlags, MilestoneIndex, StoredObject, Transaction, TransactionMetadata};
pub use record::{RecordFlags, RecordHeader, StoreRecord};
pub use stats::{HandleStats, HandleStatsSnapshot};
pub use store::{KeyIterator, ObjectStore};
pub use tangle::{metadata_path, transactions_path, Tangle, METADATA_FILE, TRANSACTIONS_FILE};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
