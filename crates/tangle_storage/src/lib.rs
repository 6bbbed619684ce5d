//! # Tangle Storage
//!
//! Byte-store backends underneath the tangle record logs.
//!
//! Backends are **opaque byte stores** - they know nothing about records,
//! hashes or metadata. The `tangle_core` crate owns all format
//! interpretation.
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For tests and fixtures
//! - [`FileBackend`] - OS files, optionally opened read-only under a shared lock
//!
//! ## Example
//!
//! ```rust
//! use tangle_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! let offset = backend.append(b"trunk").unwrap();
//! let data = backend.read_at(offset, 5).unwrap();
//! assert_eq!(&data, b"trunk");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
