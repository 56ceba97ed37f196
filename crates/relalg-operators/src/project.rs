//! Projection onto a caller-ordered attribute list (bag semantics).

use relalg_core::matcher::{column_positions, extract, extract_domains};
use relalg_core::prelude::{Attribute, Schema, Tuple};

use crate::plan::OpPlan;
use crate::table::Table;
use crate::traits::{expect_inputs, OpError, Operator};

#[derive(Debug, Clone, Default)]
pub struct Project {
    /// Requested attribute names, in output order.
    pub columns: Vec<String>,
}

impl Project {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Split the request into attributes that resolve and the unknown ones.
    /// A repeated name is kept once.
    fn resolve(&self, schema: &Schema) -> (Vec<String>, Vec<String>) {
        let mut kept: Vec<String> = Vec::new();
        let mut skipped = Vec::new();
        for c in &self.columns {
            if !schema.contains(c) {
                skipped.push(c.clone());
            } else if !kept.contains(c) {
                kept.push(c.clone());
            }
        }
        (kept, skipped)
    }
}

impl Operator for Project {
    fn name(&self) -> &'static str {
        "project"
    }

    fn plan(&self, input_schemas: &[&Schema]) -> Result<OpPlan, OpError> {
        let schema = expect_inputs(self.name(), input_schemas, 1)?[0];
        let (kept, skipped) = self.resolve(schema);
        if kept.is_empty() {
            return Err(OpError::Plan(format!(
                "projection onto ({}) retains no attributes",
                self.columns.join(" ")
            )));
        }

        let positions = column_positions(schema, &kept)?;
        let domains = extract_domains(&positions, &schema.domains());
        let attributes = kept
            .iter()
            .zip(domains)
            .map(|(n, d)| Attribute::new(n.clone(), d))
            .collect();

        let key = if schema.key().iter().all(|k| kept.contains(k)) {
            schema.key().to_vec()
        } else {
            kept.clone()
        };

        Ok(OpPlan::new(Schema::new(attributes, key)?).with_skipped(skipped))
    }

    fn eval(&self, inputs: &[&Table], plan: &OpPlan) -> Result<Vec<Tuple>, OpError> {
        let input = expect_inputs(self.name(), inputs, 1)?[0];
        let names: Vec<&str> = plan.output_schema.names().collect();
        let positions = column_positions(input.schema(), &names)?;
        Ok(input.tuples().iter().map(|t| extract(t, &positions)).collect())
    }
}
