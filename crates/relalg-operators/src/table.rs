//! The `Table`: schema + tuple store + key index, and the entry points for
//! every algebra operator.

use std::sync::atomic::{AtomicU64, Ordering};

use relalg_core::matcher::{extract_key, split_names};
use relalg_core::prelude::{Error, IndexKind, Key, Schema, Tuple};
use relalg_core::Result;
use tracing::{debug, info, warn};

use crate::filter::{KeySelect, Select};
use crate::index::{build_index, KeyIndex};
use crate::join::{Join, JoinStrategy, NaturalJoin};
use crate::minus::Minus;
use crate::project::Project;
use crate::traits::{OpError, Operator};
use crate::union::Union;

/// Counter for naming derived tables.
static DERIVED_COUNT: AtomicU64 = AtomicU64::new(0);

fn derived_name(base: &str) -> String {
    format!("{base}{}", DERIVED_COUNT.fetch_add(1, Ordering::Relaxed))
}

#[derive(Debug)]
pub struct Table {
    name: String,
    schema: Schema,
    tuples: Vec<Tuple>,
    key_positions: Vec<usize>,
    index: Box<dyn KeyIndex>,
}

impl Table {
    /// An empty, unindexed table.
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self::with_index(name, schema, IndexKind::None)
    }

    /// An empty table using the given index strategy.
    pub fn with_index(name: impl Into<String>, schema: Schema, kind: IndexKind) -> Self {
        let key_positions = key_positions(&schema);
        Self {
            name: name.into(),
            schema,
            tuples: Vec::new(),
            key_positions,
            index: build_index(kind),
        }
    }

    /// A table holding `tuples`, each type-checked against `schema`.
    pub fn from_tuples(
        name: impl Into<String>,
        schema: Schema,
        kind: IndexKind,
        tuples: Vec<Tuple>,
    ) -> Result<Self> {
        for t in &tuples {
            schema.check_tuple(t)?;
        }
        Ok(Self::assemble(name.into(), schema, kind, tuples))
    }

    /// Build an empty table from whitespace-separated names, domains and key,
    /// e.g. `Table::parse("movie", "title year", "String Integer", "title year")`.
    pub fn parse(name: &str, attributes: &str, domains: &str, key: &str) -> Result<Self> {
        let schema = Schema::parse(attributes, domains, key)?;
        info!("DDL> create table {name} ({attributes})");
        Ok(Self::new(name, schema))
    }

    /// Result table of an operator over already-validated tuples.
    pub(crate) fn derived(base: &str, schema: Schema, kind: IndexKind, tuples: Vec<Tuple>) -> Self {
        Self::assemble(derived_name(base), schema, kind, tuples)
    }

    fn assemble(name: String, schema: Schema, kind: IndexKind, tuples: Vec<Tuple>) -> Self {
        let key_positions = key_positions(&schema);
        let mut index = build_index(kind);
        if index.is_enabled() {
            for t in &tuples {
                index.insert(extract_key(t, &key_positions), t.clone());
            }
        }
        Self {
            name,
            schema,
            tuples,
            key_positions,
            index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn key(&self) -> &[String] {
        self.schema.key()
    }

    pub fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }

    pub fn tuple_count(&self) -> usize {
        self.tuples.len()
    }

    pub fn tuple_at(&self, i: usize) -> Option<&Tuple> {
        self.tuples.get(i)
    }

    /// Column position of `name`, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.schema.index_of(name)
    }

    pub fn index_kind(&self) -> IndexKind {
        self.index.kind()
    }

    pub fn index(&self) -> &dyn KeyIndex {
        self.index.as_ref()
    }

    pub(crate) fn key_positions(&self) -> &[usize] {
        &self.key_positions
    }

    /// Key projection of `tuple` under this table's primary key.
    pub fn key_of(&self, tuple: &Tuple) -> Key {
        extract_key(tuple, &self.key_positions)
    }

    /// Append a tuple after checking arity and per-column domains.
    /// Nothing is stored when the check fails.
    pub fn insert(&mut self, tuple: Tuple) -> Result<()> {
        info!("DML> insert into {} values ( {tuple} )", self.name);
        if let Err(e) = self.schema.check_tuple(&tuple) {
            warn!(table = %self.name, error = %e, "insert rejected");
            return Err(e);
        }
        if self.index.is_enabled() {
            let key = self.key_of(&tuple);
            let owners = self.index.insert(key.clone(), tuple.clone());
            if owners > 1 {
                debug!(table = %self.name, %key, owners, "repeated key");
            }
        }
        self.tuples.push(tuple);
        Ok(())
    }

    /// Run any operator with `self` as the first input.
    pub fn apply(&self, op: &dyn Operator, others: &[&Table]) -> std::result::Result<Table, OpError> {
        let mut inputs: Vec<&Table> = Vec::with_capacity(1 + others.len());
        inputs.push(self);
        inputs.extend_from_slice(others);

        let schemas: Vec<&Schema> = inputs.iter().map(|t| t.schema()).collect();
        let plan = op.plan(&schemas)?;
        for name in &plan.skipped {
            warn!(table = %self.name, op = op.name(), attribute = %name, "{}", Error::UnknownAttribute(name.clone()));
        }
        let tuples = op.eval(&inputs, &plan)?;
        Ok(Table::derived(&self.name, plan.output_schema, self.index_kind(), tuples))
    }

    /// Keep only the given attributes, in the given order.
    ///
    /// Unknown names are reported and skipped. The key survives if all of its
    /// attributes do; otherwise every kept attribute becomes the key.
    pub fn project(&self, attributes: &str) -> std::result::Result<Table, OpError> {
        info!("RA> {}.project ({attributes})", self.name);
        self.apply(&Project::new(split_names(attributes)), &[])
    }

    /// Tuples satisfying `predicate`, in source order.
    pub fn select<F>(&self, predicate: F) -> Table
    where
        F: Fn(&Tuple) -> bool,
    {
        info!("RA> {}.select (<predicate>)", self.name);
        self.apply(&Select::new(predicate), &[])
            .unwrap_or_else(|e| self.empty_result(&e))
    }

    /// Tuples whose primary key equals `key`, in source order. Uses the index
    /// when there is one. A malformed key is reported and yields an empty
    /// table.
    pub fn select_key(&self, key: &Key) -> Table {
        info!("RA> {}.select ({key})", self.name);
        self.apply(&KeySelect::new(key.clone()), &[])
            .unwrap_or_else(|e| self.empty_result(&e))
    }

    /// Empty table shaped like `self`, for selections that failed.
    fn empty_result(&self, e: &OpError) -> Table {
        warn!(table = %self.name, error = %e, "select returned no rows");
        Table::derived(&self.name, self.schema.clone(), self.index_kind(), Vec::new())
    }

    /// Every tuple of `self`, plus tuples of `other` not already in `self`.
    pub fn union(&self, other: &Table) -> std::result::Result<Table, OpError> {
        info!("RA> {}.union ({})", self.name, other.name);
        self.apply(&Union::default(), &[other]).inspect_err(|e| report(&self.name, e))
    }

    /// Set union over the concatenation: every distinct tuple once, first
    /// occurrence wins.
    pub fn union_distinct(&self, other: &Table) -> std::result::Result<Table, OpError> {
        info!("RA> {}.union_distinct ({})", self.name, other.name);
        self.apply(&Union::distinct(), &[other]).inspect_err(|e| report(&self.name, e))
    }

    /// Tuples of `self` not present in `other`.
    pub fn minus(&self, other: &Table) -> std::result::Result<Table, OpError> {
        info!("RA> {}.minus ({})", self.name, other.name);
        self.apply(&Minus, &[other]).inspect_err(|e| report(&self.name, e))
    }

    /// Nested-loop equi-join on `attributes1` (of `self`) = `attributes2`
    /// (of `other`), e.g. `movie.join("studioName", "name", &studio)`.
    pub fn join(
        &self,
        attributes1: &str,
        attributes2: &str,
        other: &Table,
    ) -> std::result::Result<Table, OpError> {
        self.join_with(attributes1, attributes2, other, JoinStrategy::NestedLoop)
    }

    /// Equi-join using an explicit strategy. All strategies yield the same
    /// tuples in the same order.
    pub fn join_with(
        &self,
        attributes1: &str,
        attributes2: &str,
        other: &Table,
        strategy: JoinStrategy,
    ) -> std::result::Result<Table, OpError> {
        info!(
            "RA> {}.join ({attributes1}, {attributes2}, {}) [{strategy}]",
            self.name, other.name
        );
        let join = Join::new(split_names(attributes1), split_names(attributes2)).strategy(strategy);
        self.apply(&join, &[other]).inspect_err(|e| report(&self.name, e))
    }

    /// Natural join on all identically named attributes; the right copy of
    /// each shared column is dropped.
    pub fn natural_join(&self, other: &Table) -> std::result::Result<Table, OpError> {
        info!("RA> {}.join ({})", self.name, other.name);
        self.apply(&NaturalJoin, &[other]).inspect_err(|e| report(&self.name, e))
    }
}

fn key_positions(schema: &Schema) -> Vec<usize> {
    // Schema::new guarantees every key attribute exists.
    schema
        .key()
        .iter()
        .filter_map(|k| schema.index_of(k))
        .collect()
}

fn report(table: &str, e: &OpError) {
    warn!(%table, error = %e, "operation aborted");
}

#[cfg(test)]
mod tests {
    use super::*;
    use relalg_core::prelude::Value;
    use relalg_core::tuple;

    fn films(kind: IndexKind) -> Table {
        let schema = Schema::parse("id name year", "Integer String Integer", "id").unwrap();
        let mut t = Table::with_index("films", schema, kind);
        t.insert(tuple![1, "A", 1999]).unwrap();
        t.insert(tuple![2, "B", 2001]).unwrap();
        t
    }

    #[test]
    fn introspection() {
        let t = films(IndexKind::None);
        assert_eq!(t.tuple_count(), 2);
        assert_eq!(t.tuple_at(1), Some(&tuple![2, "B", 2001]));
        assert_eq!(t.tuple_at(2), None);
        assert_eq!(t.column_index("year"), Some(2));
        assert_eq!(t.column_index("studio"), None);
        assert_eq!(t.key(), ["id".to_string()]);
    }

    #[test]
    fn insert_rejects_bad_tuples_without_storing() {
        let mut t = films(IndexKind::Ordered);
        assert!(matches!(
            t.insert(tuple![3, "C"]),
            Err(Error::ArityMismatch { expected: 3, found: 2 })
        ));
        assert!(matches!(
            t.insert(tuple!["3", "C", 2002]),
            Err(Error::TypeMismatch { .. })
        ));
        assert_eq!(t.tuple_count(), 2);
        assert_eq!(t.index().len(), 2);
    }

    #[test]
    fn insert_maintains_index() {
        let t = films(IndexKind::Hash);
        let k = Key::from(Value::Integer(2));
        assert_eq!(t.index().lookup(&k), &[tuple![2, "B", 2001]]);
    }

    #[test]
    fn repeated_keys_select_the_same_rows_with_or_without_index() {
        for kind in [IndexKind::None, IndexKind::Ordered, IndexKind::Hash] {
            let mut t = films(kind);
            t.insert(tuple![1, "A2", 2005]).unwrap();
            assert_eq!(t.tuple_count(), 3);
            let s = t.select_key(&Key::from(Value::Integer(1)));
            assert_eq!(s.tuples(), &[tuple![1, "A", 1999], tuple![1, "A2", 2005]], "{kind}");
        }
    }

    #[test]
    fn derived_tables_get_fresh_names_and_rebuilt_index() {
        let t = films(IndexKind::Ordered);
        let s = t.select(|_| true);
        assert_ne!(s.name(), t.name());
        assert!(s.name().starts_with("films"));
        assert_eq!(s.index().len(), 2);
    }

    #[test]
    fn from_tuples_type_checks() {
        let schema = Schema::parse("id", "Integer", "id").unwrap();
        assert!(Table::from_tuples("t", schema.clone(), IndexKind::None, vec![tuple![1]]).is_ok());
        assert!(Table::from_tuples("t", schema, IndexKind::None, vec![tuple!["x"]]).is_err());
    }
}
