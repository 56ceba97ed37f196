#![forbid(unsafe_code)]
//! relalg-io: storage backends and table snapshots.
//!
//! A snapshot is a self-describing, checksummed byte string holding a table's
//! name, schema, index strategy and tuples. `TableStore` maps table names to
//! snapshot paths on any `Storage` backend.

pub mod codec;
pub mod error;
pub mod memory_storage;
pub mod segment;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use codec::Codec;
pub use error::{Error, Result};
pub use memory_storage::MemoryStorage;
pub use storage::{build_storage_from_config, FsStorage, Storage};
pub use store::TableStore;
