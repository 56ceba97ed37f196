//! Operator trait + common interfaces.
//!
//! `Table::apply` calls `plan(...)` to derive the output schema, reports any
//! skipped attributes, then calls `eval(...)` to compute the tuple sequence
//! and wraps both in a fresh table.

use relalg_core::prelude::{Schema, Tuple};
use thiserror::Error;

use crate::plan::OpPlan;
use crate::table::Table;

#[derive(Debug, Error)]
pub enum OpError {
    #[error("planning error: {0}")]
    Plan(String),

    #[error("execution error: {0}")]
    Exec(String),

    #[error(transparent)]
    Core(#[from] relalg_core::Error),
}

/// Trait that all algebra operators implement.
///
/// Invariants:
/// - Inputs are never mutated; `eval` returns a freshly built sequence.
/// - `eval` preserves the relative order of its input tuples.
pub trait Operator {
    /// Human-readable operator name (stable).
    fn name(&self) -> &'static str;

    /// Given input schemas, return the derived schema.
    fn plan(&self, input_schemas: &[&Schema]) -> Result<OpPlan, OpError>;

    /// Compute the output tuples. Unary operators read `inputs[0]`; binary
    /// operators read `inputs[0]` (left) and `inputs[1]` (right).
    fn eval(&self, inputs: &[&Table], plan: &OpPlan) -> Result<Vec<Tuple>, OpError>;
}

pub(crate) fn expect_inputs<'a, T>(
    op: &str,
    inputs: &'a [T],
    n: usize,
) -> Result<&'a [T], OpError> {
    if inputs.len() != n {
        return Err(OpError::Plan(format!(
            "{op} expects {n} input(s), got {}",
            inputs.len()
        )));
    }
    Ok(inputs)
}
