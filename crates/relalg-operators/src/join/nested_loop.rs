//! Nested-loop equi-join: O(n·m) comparisons, left-major output order.

use relalg_core::prelude::Tuple;

pub(crate) fn join(left: &[Tuple], right: &[Tuple], lpos: &[usize], rpos: &[usize]) -> Vec<Tuple> {
    let mut rows = Vec::new();
    for l in left {
        for r in right {
            if matches(l, r, lpos, rpos) {
                rows.push(Tuple::concat(l, r));
            }
        }
    }
    rows
}

/// Positional equality of the compared columns.
pub(crate) fn matches(l: &Tuple, r: &Tuple, lpos: &[usize], rpos: &[usize]) -> bool {
    lpos.iter().zip(rpos).all(|(&i, &j)| l[i] == r[j])
}
