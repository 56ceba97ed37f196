//! Operator planning surface: `OpPlan`.

use relalg_core::prelude::Schema;
use serde::{Deserialize, Serialize};

/// Operator plan: the derived schema plus any requested attributes that were
/// dropped while deriving it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpPlan {
    pub output_schema: Schema,

    /// Requested attribute names that did not resolve and were skipped.
    pub skipped: Vec<String>,
}

impl OpPlan {
    pub fn new(output_schema: Schema) -> Self {
        Self {
            output_schema,
            skipped: vec![],
        }
    }

    pub fn with_skipped(mut self, cols: Vec<String>) -> Self {
        self.skipped = cols;
        self
    }
}
