//! Attribute matching and positional extraction.
//!
//! Every operator resolves attribute names to column positions once, then
//! projects rows by position. Request order, not schema order, decides the
//! output column order.

use crate::error::{Error, Result};
use crate::schema::{Domain, Schema};
use crate::types::{Key, Tuple, Value};

/// Resolve each requested name to its column position in `schema`.
pub fn column_positions<S: AsRef<str>>(schema: &Schema, names: &[S]) -> Result<Vec<usize>> {
    names
        .iter()
        .map(|n| {
            let n = n.as_ref();
            schema
                .index_of(n)
                .ok_or_else(|| Error::UnknownAttribute(n.to_string()))
        })
        .collect()
}

/// Build a new tuple from the values of `tuple` at `positions`.
pub fn extract(tuple: &Tuple, positions: &[usize]) -> Tuple {
    positions.iter().map(|&p| tuple[p].clone()).collect()
}

/// Same as [`extract`] but yields a key.
pub fn extract_key(tuple: &Tuple, positions: &[usize]) -> Key {
    Key(extract_values(tuple, positions))
}

pub fn extract_values(tuple: &Tuple, positions: &[usize]) -> Vec<Value> {
    positions.iter().map(|&p| tuple[p].clone()).collect()
}

/// Parallel projection of domains, used when deriving a schema.
pub fn extract_domains(positions: &[usize], domains: &[Domain]) -> Vec<Domain> {
    positions.iter().map(|&p| domains[p]).collect()
}

/// Split a whitespace-separated attribute list.
pub fn split_names(attributes: &str) -> Vec<String> {
    attributes.split_whitespace().map(str::to_string).collect()
}
