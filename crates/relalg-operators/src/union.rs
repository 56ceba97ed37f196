//! Union of two union-compatible tables.

use std::collections::HashSet;

use relalg_core::prelude::{Schema, Tuple};

use crate::plan::OpPlan;
use crate::table::Table;
use crate::traits::{expect_inputs, OpError, Operator};

/// By default every left tuple is kept and a right tuple is appended only if
/// it does not already occur in the left table; duplicates among the right
/// tuples themselves are kept. With `distinct` set, the concatenation is
/// deduplicated as a whole (first occurrence wins).
#[derive(Debug, Clone, Copy, Default)]
pub struct Union {
    pub distinct: bool,
}

impl Union {
    pub fn distinct() -> Self {
        Self { distinct: true }
    }
}

impl Operator for Union {
    fn name(&self) -> &'static str {
        "union"
    }

    fn plan(&self, input_schemas: &[&Schema]) -> Result<OpPlan, OpError> {
        let inputs = expect_inputs(self.name(), input_schemas, 2)?;
        inputs[0].compatible(inputs[1])?;
        Ok(OpPlan::new(inputs[0].clone()))
    }

    fn eval(&self, inputs: &[&Table], _plan: &OpPlan) -> Result<Vec<Tuple>, OpError> {
        let inputs = expect_inputs(self.name(), inputs, 2)?;
        let (left, right) = (inputs[0].tuples(), inputs[1].tuples());
        let mut rows = Vec::with_capacity(left.len() + right.len());

        if self.distinct {
            let mut seen: HashSet<&Tuple> = HashSet::new();
            rows.extend(left.iter().chain(right).filter(|t| seen.insert(*t)).cloned());
        } else {
            let present: HashSet<&Tuple> = left.iter().collect();
            rows.extend(left.iter().cloned());
            rows.extend(right.iter().filter(|t| !present.contains(*t)).cloned());
        }
        Ok(rows)
    }
}
