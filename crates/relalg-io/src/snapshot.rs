//! Serializable image of a table.
//!
//! The index itself is not stored; only its strategy is, and the index is
//! rebuilt from the tuples on restore.

use relalg_core::prelude::{IndexKind, Schema, Tuple};
use relalg_operators::Table;
use serde::{Deserialize, Serialize};

use crate::codec::Codec;
use crate::error::Result;
use crate::segment;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub name: String,
    pub schema: Schema,
    pub index_kind: IndexKind,
    pub tuples: Vec<Tuple>,
}

impl TableSnapshot {
    pub fn of(table: &Table) -> Self {
        Self {
            name: table.name().to_string(),
            schema: table.schema().clone(),
            index_kind: table.index_kind(),
            tuples: table.tuples().to_vec(),
        }
    }

    /// Rebuild the table, re-validating the schema and every tuple.
    pub fn restore(self) -> Result<Table> {
        let schema = Schema::new(self.schema.attributes().to_vec(), self.schema.key().to_vec())?;
        Ok(Table::from_tuples(
            self.name,
            schema,
            self.index_kind,
            self.tuples,
        )?)
    }

    pub fn to_bytes(&self, codec: Codec) -> Result<Vec<u8>> {
        let payload = serde_json::to_vec(self)?;
        segment::encode(codec, &payload)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let payload = segment::decode(bytes)?;
        Ok(serde_json::from_slice(&payload)?)
    }
}
