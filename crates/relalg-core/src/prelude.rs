//! Convenient re-exports for downstream crates.

pub use crate::config::{EngineConfig, StorageConfig};
pub use crate::error::{Error, Result};
pub use crate::matcher::{column_positions, extract, extract_domains};
pub use crate::schema::{Attribute, Domain, Schema};
pub use crate::types::{IndexKind, Key, Tuple, Value};
