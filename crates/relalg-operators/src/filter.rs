//! Selection: predicate filters and primary-key lookups.

use relalg_core::matcher::extract_values;
use relalg_core::prelude::{Error, Key, Schema, Tuple};

use crate::plan::OpPlan;
use crate::table::Table;
use crate::traits::{expect_inputs, OpError, Operator};

/// Keep the tuples for which the predicate holds.
pub struct Select<F> {
    predicate: F,
}

impl<F> Select<F>
where
    F: Fn(&Tuple) -> bool,
{
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }

    pub fn filter(&self, tuples: &[Tuple]) -> Vec<Tuple> {
        tuples
            .iter()
            .filter(|t| (self.predicate)(t))
            .cloned()
            .collect()
    }
}

impl<F> Operator for Select<F>
where
    F: Fn(&Tuple) -> bool,
{
    fn name(&self) -> &'static str {
        "select"
    }

    fn plan(&self, input_schemas: &[&Schema]) -> Result<OpPlan, OpError> {
        let schema = expect_inputs(self.name(), input_schemas, 1)?[0];
        Ok(OpPlan::new(schema.clone()))
    }

    fn eval(&self, inputs: &[&Table], _plan: &OpPlan) -> Result<Vec<Tuple>, OpError> {
        let input = expect_inputs(self.name(), inputs, 1)?[0];
        Ok(self.filter(input.tuples()))
    }
}

/// Select by primary-key value.
#[derive(Debug, Clone)]
pub struct KeySelect {
    pub key: Key,
}

impl KeySelect {
    pub fn new(key: Key) -> Self {
        Self { key }
    }

    /// Matching tuples: a single index lookup when the table is indexed,
    /// otherwise a scan comparing each tuple's full key to the target.
    pub fn lookup(&self, table: &Table) -> Result<Vec<Tuple>, Error> {
        self.validate(table.schema())?;
        let index = table.index();
        if index.is_enabled() {
            return Ok(index.lookup(&self.key).to_vec());
        }
        let positions = table.key_positions();
        Ok(table
            .tuples()
            .iter()
            .filter(|t| extract_values(t, positions) == self.key.values())
            .cloned()
            .collect())
    }

    fn validate(&self, schema: &Schema) -> Result<(), Error> {
        let key = schema.key();
        if self.key.len() != key.len() {
            return Err(Error::KeyLookupFailure(format!(
                "key has {} value(s) but the primary key ({}) has {}",
                self.key.len(),
                key.join(" "),
                key.len()
            )));
        }
        for (name, value) in key.iter().zip(self.key.values()) {
            let domain = schema
                .index_of(name)
                .map(|i| schema.attributes()[i].domain)
                .ok_or_else(|| Error::KeyLookupFailure(format!("missing key attribute '{name}'")))?;
            if value.domain() != domain {
                return Err(Error::KeyLookupFailure(format!(
                    "value '{value}' for '{name}' is {}, expected {domain}",
                    value.domain()
                )));
            }
        }
        Ok(())
    }
}

impl Operator for KeySelect {
    fn name(&self) -> &'static str {
        "select_key"
    }

    fn plan(&self, input_schemas: &[&Schema]) -> Result<OpPlan, OpError> {
        let schema = expect_inputs(self.name(), input_schemas, 1)?[0];
        Ok(OpPlan::new(schema.clone()))
    }

    fn eval(&self, inputs: &[&Table], _plan: &OpPlan) -> Result<Vec<Tuple>, OpError> {
        let input = expect_inputs(self.name(), inputs, 1)?[0];
        Ok(self.lookup(input)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relalg_core::prelude::{IndexKind, Value};
    use relalg_core::tuple;

    fn people(kind: IndexKind) -> Table {
        let schema = Schema::parse("first last age", "String String Integer", "first last").unwrap();
        let mut t = Table::with_index("people", schema, kind);
        t.insert(tuple!["Ann", "Lee", 30]).unwrap();
        t.insert(tuple!["Lee", "Ann", 40]).unwrap();
        t.insert(tuple!["Bob", "Ray", 50]).unwrap();
        t
    }

    #[test]
    fn predicate_select_preserves_order() {
        let t = people(IndexKind::None);
        let s = t.select(|t| t[2].as_integer().is_some_and(|a| a >= 40));
        assert_eq!(s.tuples(), &[tuple!["Lee", "Ann", 40], tuple!["Bob", "Ray", 50]]);
        assert_eq!(s.schema(), t.schema());
    }

    #[test]
    fn multi_column_key_matches_whole_key() {
        for kind in [IndexKind::None, IndexKind::Ordered, IndexKind::Hash] {
            let t = people(kind);
            let key = Key::new(vec![Value::from("Ann"), Value::from("Lee")]);
            let s = t.select_key(&key);
            assert_eq!(s.tuples(), &[tuple!["Ann", "Lee", 30]], "{kind}");
        }
    }

    #[test]
    fn malformed_key_is_a_lookup_failure() {
        let t = people(IndexKind::None);
        let short = KeySelect::new(Key::from(Value::from("Ann")));
        assert!(matches!(short.lookup(&t), Err(Error::KeyLookupFailure(_))));
        let typed = KeySelect::new(Key::new(vec![Value::Integer(1), Value::from("Lee")]));
        assert!(matches!(typed.lookup(&t), Err(Error::KeyLookupFailure(_))));
        assert_eq!(t.select_key(&short.key).tuple_count(), 0);
    }

    #[test]
    fn select_runs_through_apply() {
        let t = people(IndexKind::None);
        let s = t.apply(&Select::new(|t: &Tuple| t[0] == Value::from("Bob")), &[]).unwrap();
        assert_eq!(s.tuple_count(), 1);
    }
}
