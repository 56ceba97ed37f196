//! Named table persistence on top of a `Storage` backend.

use std::fmt;

use relalg_core::config::StorageConfig;
use relalg_operators::Table;
use tracing::{debug, info};

use crate::codec::Codec;
use crate::error::{Error, Result};
use crate::snapshot::TableSnapshot;
use crate::storage::{build_storage_from_config, Storage};

/// Maps table names to `<root>/<name>.<extension>` snapshots.
pub struct TableStore {
    storage: Box<dyn Storage>,
    root: String,
    extension: String,
    codec: Codec,
}

impl fmt::Debug for TableStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableStore")
            .field("root", &self.root)
            .field("extension", &self.extension)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

impl TableStore {
    pub fn new(
        storage: Box<dyn Storage>,
        root: impl Into<String>,
        extension: impl Into<String>,
        codec: Codec,
    ) -> Self {
        let root = root.into();
        let extension = extension.into();
        Self {
            storage,
            root: root.trim_end_matches('/').to_string(),
            extension: extension.trim_start_matches('.').to_string(),
            codec,
        }
    }

    pub fn from_config(cfg: &StorageConfig) -> Result<Self> {
        let storage = build_storage_from_config(cfg)?;
        let codec: Codec = cfg.codec.parse()?;
        Ok(Self::new(storage, cfg.root.clone(), cfg.extension.clone(), codec))
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// Snapshot path for a table name.
    pub fn path_for(&self, name: &str) -> Result<String> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(Error::Storage(format!("invalid table name '{name}'")));
        }
        if self.extension.is_empty() {
            Ok(format!("{}/{}", self.root, name))
        } else {
            Ok(format!("{}/{}.{}", self.root, name, self.extension))
        }
    }

    /// Write the table under its own name, replacing any earlier snapshot.
    pub fn save(&self, table: &Table) -> Result<()> {
        let path = self.path_for(table.name())?;
        let bytes = TableSnapshot::of(table).to_bytes(self.codec)?;
        self.storage.write(&path, &bytes)?;
        info!(
            table = table.name(),
            tuples = table.tuple_count(),
            bytes = bytes.len(),
            %path,
            "saved table"
        );
        Ok(())
    }

    /// Read the snapshot for `name` back into a table with a rebuilt index.
    pub fn load(&self, name: &str) -> Result<Table> {
        let path = self.path_for(name)?;
        if !self.storage.exists(&path) {
            return Err(Error::NotFound(name.to_string()));
        }
        let bytes = self.storage.read(&path)?;
        let table = TableSnapshot::from_bytes(&bytes)?.restore()?;
        info!(
            table = table.name(),
            tuples = table.tuple_count(),
            %path,
            "loaded table"
        );
        Ok(table)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name)
            .map(|p| self.storage.exists(&p))
            .unwrap_or(false)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        self.storage.delete(&path)?;
        debug!(table = name, %path, "deleted snapshot");
        Ok(())
    }

    /// Names of all stored tables, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let prefix = format!("{}/", self.root);
        let suffix = if self.extension.is_empty() {
            String::new()
        } else {
            format!(".{}", self.extension)
        };
        let mut names: Vec<String> = self
            .storage
            .list(&prefix)?
            .into_iter()
            .filter_map(|path| {
                let rest = path.strip_prefix(&prefix)?;
                let name = rest.strip_suffix(suffix.as_str())?;
                (!name.is_empty() && !name.contains('/')).then(|| name.to_string())
            })
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}
