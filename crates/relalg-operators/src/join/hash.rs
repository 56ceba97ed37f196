//! Hash and index equi-joins.
//!
//! Both emit tuples in the same order as the nested-loop join: left-major,
//! and right tuples in their table order within one left tuple.

use std::collections::HashMap;

use relalg_core::matcher::{extract_key, extract_values};
use relalg_core::prelude::{Tuple, Value};

use crate::index::KeyIndex;

pub(crate) fn join(left: &[Tuple], right: &[Tuple], lpos: &[usize], rpos: &[usize]) -> Vec<Tuple> {
    let mut buckets: HashMap<Vec<Value>, Vec<&Tuple>> = HashMap::new();
    for r in right {
        buckets.entry(extract_values(r, rpos)).or_default().push(r);
    }

    let mut rows = Vec::new();
    for l in left {
        if let Some(matches) = buckets.get(&extract_values(l, lpos)) {
            rows.extend(matches.iter().map(|r| Tuple::concat(l, r)));
        }
    }
    rows
}

/// Probe `index` with the left comparison columns, which must line up with
/// the right key. Owners of a key come back in table order.
pub(crate) fn index_join(left: &[Tuple], index: &dyn KeyIndex, lpos: &[usize]) -> Vec<Tuple> {
    left.iter()
        .flat_map(|l| {
            index
                .lookup(&extract_key(l, lpos))
                .iter()
                .map(move |r| Tuple::concat(l, r))
        })
        .collect()
}
