//! Engine configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::IndexKind;

/// Default relative directory holding table snapshots.
pub const DEFAULT_STORE_DIR: &str = "store";

/// Default file extension for table snapshots.
pub const DEFAULT_FILE_EXTENSION: &str = "dbf";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory for table snapshots (local-path configuration).
    pub store_dir: String,

    /// Optional fully-qualified store URI (`file:///var/db`, `memory://`).
    pub store_uri: Option<String>,

    /// Extension appended to a table name to form its snapshot file name.
    pub file_extension: String,

    /// Index strategy for tables built by the driver.
    pub index_kind: IndexKind,

    /// Snapshot payload codec (`none`, `lz4`, `zstd` or `zstd:<level>`).
    pub snapshot_codec: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store_dir: DEFAULT_STORE_DIR.to_string(),
            store_uri: None,
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            index_kind: IndexKind::None,
            snapshot_codec: "none".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub uri: Option<String>,
    pub root: String,
    pub extension: String,
    pub codec: String,
}

impl StorageConfig {
    pub fn scheme(&self) -> Option<&str> {
        self.uri
            .as_deref()
            .and_then(|uri| uri.split("://").next())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}

impl EngineConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `RELALG_STORE_DIR`: snapshot directory
    /// - `RELALG_STORE_URI`: snapshot store URI
    /// - `RELALG_FILE_EXT`: snapshot file extension
    /// - `RELALG_INDEX`: index kind (`none`, `ordered`, `hash`)
    /// - `RELALG_CODEC`: snapshot codec (`none`, `lz4`, `zstd`, `zstd:<level>`)
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("RELALG_STORE_DIR") {
            cfg.store_dir = s;
        }

        if let Ok(s) = std::env::var("RELALG_STORE_URI") {
            cfg.store_uri = Some(s);
        }

        if let Ok(s) = std::env::var("RELALG_FILE_EXT") {
            let ext = s.trim_start_matches('.');
            if !ext.is_empty() {
                cfg.file_extension = ext.to_string();
            }
        }

        if let Ok(s) = std::env::var("RELALG_INDEX") {
            if let Ok(v) = s.parse::<IndexKind>() {
                cfg.index_kind = v;
            }
        }

        if let Ok(s) = std::env::var("RELALG_CODEC") {
            cfg.snapshot_codec = s.trim().to_ascii_lowercase();
        }

        cfg
    }

    /// Load a config from a JSON document; missing fields take defaults.
    pub fn from_json(doc: &str) -> Result<Self> {
        Ok(serde_json::from_str(doc)?)
    }

    /// Produce a storage configuration snapshot used by the IO layer.
    pub fn storage_config(&self) -> StorageConfig {
        let scheme = self
            .store_uri
            .as_deref()
            .and_then(|uri| uri.split("://").next())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        let root = match (scheme.as_deref(), self.store_uri.as_ref()) {
            (Some("file"), Some(uri)) => {
                file_uri_to_path(uri).unwrap_or_else(|| self.store_dir.clone())
            }
            (Some(_), Some(uri)) => uri.trim_end_matches('/').to_string(),
            _ => self.store_dir.clone(),
        };

        StorageConfig {
            uri: self.store_uri.clone(),
            root,
            extension: self.file_extension.clone(),
            codec: self.snapshot_codec.clone(),
        }
    }
}

fn file_uri_to_path(uri: &str) -> Option<String> {
    let stripped = uri.strip_prefix("file://")?;
    if stripped.starts_with('/') {
        Some(stripped.to_string())
    } else {
        Some(format!("/{}", stripped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_layout() {
        let cfg = EngineConfig::default();
        let sc = cfg.storage_config();
        assert_eq!(sc.root, "store");
        assert_eq!(sc.extension, "dbf");
        assert_eq!(sc.scheme(), None);
        assert_eq!(cfg.index_kind, IndexKind::None);
    }

    #[test]
    fn file_uri_becomes_root_path() {
        let cfg = EngineConfig {
            store_uri: Some("file:///var/lib/relalg".into()),
            ..Default::default()
        };
        let sc = cfg.storage_config();
        assert_eq!(sc.scheme(), Some("file"));
        assert_eq!(sc.root, "/var/lib/relalg");
    }

    #[test]
    fn memory_uri_keeps_uri_as_root() {
        let cfg = EngineConfig {
            store_uri: Some("memory://tables/".into()),
            ..Default::default()
        };
        let sc = cfg.storage_config();
        assert_eq!(sc.scheme(), Some("memory"));
        assert_eq!(sc.root, "memory://tables");
    }

    #[test]
    fn json_fills_missing_fields() {
        let cfg = EngineConfig::from_json(r#"{"index_kind":"Hash","store_dir":"/tmp/x"}"#).unwrap();
        assert_eq!(cfg.index_kind, IndexKind::Hash);
        assert_eq!(cfg.store_dir, "/tmp/x");
        assert_eq!(cfg.file_extension, "dbf");
        assert!(EngineConfig::from_json("{not json").is_err());
    }
}
