//! Set difference over whole-tuple equality.

use std::collections::HashSet;

use relalg_core::prelude::{Schema, Tuple};

use crate::plan::OpPlan;
use crate::table::Table;
use crate::traits::{expect_inputs, OpError, Operator};

/// Left tuples not present in the right table. Each left tuple, duplicates
/// included, is tested on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct Minus;

impl Operator for Minus {
    fn name(&self) -> &'static str {
        "minus"
    }

    fn plan(&self, input_schemas: &[&Schema]) -> Result<OpPlan, OpError> {
        let inputs = expect_inputs(self.name(), input_schemas, 2)?;
        inputs[0].compatible(inputs[1])?;
        Ok(OpPlan::new(inputs[0].clone()))
    }

    fn eval(&self, inputs: &[&Table], _plan: &OpPlan) -> Result<Vec<Tuple>, OpError> {
        let inputs = expect_inputs(self.name(), inputs, 2)?;
        let exclude: HashSet<&Tuple> = inputs[1].tuples().iter().collect();
        Ok(inputs[0]
            .tuples()
            .iter()
            .filter(|t| !exclude.contains(*t))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relalg_core::prelude::IndexKind;
    use relalg_core::tuple;

    fn table(rows: Vec<Tuple>) -> Table {
        let schema = Schema::parse("a", "Integer", "a").unwrap();
        Table::from_tuples("t", schema, IndexKind::None, rows).unwrap()
    }

    #[test]
    fn removes_right_tuples_and_keeps_left_duplicates() {
        let l = table(vec![tuple![1], tuple![2], tuple![2], tuple![3]]);
        let r = table(vec![tuple![3], tuple![4]]);
        let m = l.minus(&r).unwrap();
        assert_eq!(m.tuples(), &[tuple![1], tuple![2], tuple![2]]);
    }

    #[test]
    fn minus_self_is_empty() {
        let l = table(vec![tuple![1], tuple![2]]);
        assert_eq!(l.minus(&l).unwrap().tuple_count(), 0);
    }
}
