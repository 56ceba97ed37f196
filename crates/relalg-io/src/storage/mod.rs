//! Byte-store backends for table snapshots.
//!
//! - `fs`: local filesystem (default).
//! - `MemoryStorage` (crate root): process-local map, selected by `memory://`.

mod fs;
pub use fs::FsStorage;

use relalg_core::config::StorageConfig;

use crate::error::{Error, Result};
use crate::memory_storage::MemoryStorage;

/// Abstract storage interface for snapshot files.
pub trait Storage: Send + Sync {
    /// Write bytes to a path, replacing any previous content. Creates parent
    /// directories if needed.
    fn write(&self, path: &str, bytes: &[u8]) -> Result<()>;

    /// Read the whole object at a path.
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Whether an object exists at a path.
    fn exists(&self, path: &str) -> bool;

    /// Delete a path. Idempotent (no error if path doesn't exist).
    fn delete(&self, path: &str) -> Result<()>;

    /// List all paths under a prefix.
    fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Size of a path in bytes.
    fn size(&self, path: &str) -> Result<u64>;
}

/// Build the correct storage backend using the provided configuration.
pub fn build_storage_from_config(cfg: &StorageConfig) -> Result<Box<dyn Storage>> {
    match cfg.scheme() {
        Some("memory") | Some("mem") => Ok(Box::new(MemoryStorage::new())),
        Some("file") | None => {
            // Default to filesystem (treat URI as file:// or bare path).
            Ok(Box::new(FsStorage::new()))
        }
        Some(other) => Err(Error::Config(format!("unsupported store scheme '{other}'"))),
    }
}
