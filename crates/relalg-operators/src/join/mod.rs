//! Equi-joins.
//!
//! `Join` compares explicit column lists; `NaturalJoin` compares every
//! identically named column and drops the right copy. Source tables are never
//! touched: colliding right-hand names are renamed in the result schema only.

mod hash;
mod natural;
mod nested_loop;

use std::fmt;
use std::str::FromStr;

use relalg_core::matcher::column_positions;
use relalg_core::prelude::{Attribute, Error, Schema, Tuple};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::plan::OpPlan;
use crate::table::Table;
use crate::traits::{expect_inputs, OpError, Operator};

pub use natural::NaturalJoin;

/// Suffix appended to a right-hand attribute whose name is already taken.
pub const RENAME_SUFFIX: &str = "2";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinStrategy {
    /// Compare every pair of the Cartesian product.
    #[default]
    NestedLoop,
    /// Build a multimap over the right comparison columns, look up each
    /// left tuple.
    Hash,
    /// Probe the right table's key index; falls back to `Hash` when the right
    /// table is unindexed or the comparison columns are not its key.
    Index,
}

impl fmt::Display for JoinStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JoinStrategy::NestedLoop => "nested-loop",
            JoinStrategy::Hash => "hash",
            JoinStrategy::Index => "index",
        })
    }
}

impl FromStr for JoinStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nested-loop" | "nested_loop" | "nlj" | "loop" => Ok(JoinStrategy::NestedLoop),
            "hash" | "h_join" => Ok(JoinStrategy::Hash),
            "index" | "i_join" => Ok(JoinStrategy::Index),
            other => Err(Error::Config(format!("unknown join strategy '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Join {
    /// Comparison columns of the left table.
    pub left_on: Vec<String>,
    /// Comparison columns of the right table, paired positionally.
    pub right_on: Vec<String>,
    pub strategy: JoinStrategy,
}

impl Join {
    pub fn new(left_on: Vec<String>, right_on: Vec<String>) -> Self {
        Self {
            left_on,
            right_on,
            strategy: JoinStrategy::default(),
        }
    }

    pub fn strategy(mut self, strategy: JoinStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

impl Operator for Join {
    fn name(&self) -> &'static str {
        "join"
    }

    fn plan(&self, input_schemas: &[&Schema]) -> Result<OpPlan, OpError> {
        let inputs = expect_inputs(self.name(), input_schemas, 2)?;
        let (left, right) = (inputs[0], inputs[1]);
        if self.left_on.len() != self.right_on.len() {
            return Err(OpError::Plan(format!(
                "join compares {} left attribute(s) with {} right attribute(s)",
                self.left_on.len(),
                self.right_on.len()
            )));
        }

        let lpos = column_positions(left, &self.left_on)?;
        let rpos = column_positions(right, &self.right_on)?;
        for (l, r) in lpos.iter().zip(&rpos) {
            let (la, ra) = (&left.attributes()[*l], &right.attributes()[*r]);
            if la.domain != ra.domain {
                warn!(
                    left = %la.name,
                    right = %ra.name,
                    "join compares {} with {}; no tuples can match",
                    la.domain,
                    ra.domain
                );
            }
        }

        let attributes = concat_disambiguated(left.attributes(), right.attributes());
        let schema = Schema::new(attributes, left.key().to_vec())?;
        Ok(OpPlan::new(schema))
    }

    fn eval(&self, inputs: &[&Table], _plan: &OpPlan) -> Result<Vec<Tuple>, OpError> {
        let inputs = expect_inputs(self.name(), inputs, 2)?;
        let (left, right) = (inputs[0], inputs[1]);
        let lpos = column_positions(left.schema(), &self.left_on)?;
        let rpos = column_positions(right.schema(), &self.right_on)?;

        let rows = match self.strategy {
            JoinStrategy::NestedLoop => nested_loop::join(left.tuples(), right.tuples(), &lpos, &rpos),
            JoinStrategy::Hash => hash::join(left.tuples(), right.tuples(), &lpos, &rpos),
            JoinStrategy::Index => {
                if right.index().is_enabled() && right.key_positions() == rpos.as_slice() {
                    hash::index_join(left.tuples(), right.index(), &lpos)
                } else {
                    debug!(
                        right = right.name(),
                        "index join unavailable; falling back to hash join"
                    );
                    hash::join(left.tuples(), right.tuples(), &lpos, &rpos)
                }
            }
        };
        Ok(rows)
    }
}

/// `left ++ right`, renaming each right attribute whose name is already taken
/// by appending [`RENAME_SUFFIX`] until it is unique.
pub(crate) fn concat_disambiguated(left: &[Attribute], right: &[Attribute]) -> Vec<Attribute> {
    let mut out: Vec<Attribute> = left.to_vec();
    for attr in right {
        let mut name = attr.name.clone();
        while out.iter().any(|a| a.name == name) {
            name.push_str(RENAME_SUFFIX);
        }
        out.push(Attribute::new(name, attr.domain));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use relalg_core::prelude::{Domain, IndexKind};
    use relalg_core::tuple;

    fn movies() -> Table {
        let schema =
            Schema::parse("title year studioName", "String Integer String", "title year").unwrap();
        Table::from_tuples(
            "movie",
            schema,
            IndexKind::None,
            vec![
                tuple!["Star_Wars", 1977, "Fox"],
                tuple!["Rocky", 1985, "Universal"],
                tuple!["Alien", 1979, "Fox"],
                tuple!["Brazil", 1985, "Nowhere"],
            ],
        )
        .unwrap()
    }

    fn studios(kind: IndexKind) -> Table {
        let schema = Schema::parse("name address year", "String String Integer", "name").unwrap();
        Table::from_tuples(
            "studio",
            schema,
            kind,
            vec![
                tuple!["Fox", "Los_Angeles", 1935],
                tuple!["Universal", "Universal_City", 1912],
            ],
        )
        .unwrap()
    }

    #[test]
    fn nested_loop_join_concatenates_matches() {
        let m = movies();
        let s = studios(IndexKind::None);
        let j = m.join("studioName", "name", &s).unwrap();
        assert_eq!(j.schema().arity(), 6);
        assert_eq!(
            j.tuples(),
            &[
                tuple!["Star_Wars", 1977, "Fox", "Fox", "Los_Angeles", 1935],
                tuple!["Rocky", 1985, "Universal", "Universal", "Universal_City", 1912],
                tuple!["Alien", 1979, "Fox", "Fox", "Los_Angeles", 1935],
            ]
        );
        assert_eq!(j.key(), m.key());
    }

    #[test]
    fn colliding_names_are_renamed_in_result_only() {
        let m = movies();
        let s = studios(IndexKind::None);
        let j = m.join("studioName", "name", &s).unwrap();
        let names: Vec<&str> = j.schema().names().collect();
        assert_eq!(names, ["title", "year", "studioName", "name", "address", "year2"]);
        assert_eq!(m.schema().names().collect::<Vec<_>>(), ["title", "year", "studioName"]);
        assert_eq!(s.schema().names().collect::<Vec<_>>(), ["name", "address", "year"]);
    }

    #[test]
    fn rename_repeats_suffix_until_unique() {
        let left = vec![
            Attribute::new("a", Domain::Integer),
            Attribute::new("a2", Domain::Integer),
        ];
        let right = vec![Attribute::new("a", Domain::Text)];
        let out = concat_disambiguated(&left, &right);
        assert_eq!(out[2].name, "a22");
        assert_eq!(out[2].domain, Domain::Text);
    }

    #[test]
    fn strategies_agree() {
        let m = movies();
        for kind in [IndexKind::None, IndexKind::Ordered] {
            let s = studios(kind);
            let expected = m.join("studioName", "name", &s).unwrap();
            for strategy in [JoinStrategy::Hash, JoinStrategy::Index] {
                let got = m.join_with("studioName", "name", &s, strategy).unwrap();
                assert_eq!(got.tuples(), expected.tuples(), "{strategy} over {kind}");
            }
        }
    }

    #[test]
    fn multi_column_join() {
        let m = movies();
        let schema = Schema::parse("studio yr", "String Integer", "studio yr").unwrap();
        let awards = Table::from_tuples(
            "awards",
            schema,
            IndexKind::None,
            vec![tuple!["Fox", 1977], tuple!["Fox", 1985]],
        )
        .unwrap();
        let j = m.join("studioName year", "studio yr", &awards).unwrap();
        assert_eq!(j.tuples(), &[tuple!["Star_Wars", 1977, "Fox", "Fox", 1977]]);
    }

    #[test]
    fn bad_attribute_lists_abort() {
        let m = movies();
        let s = studios(IndexKind::None);
        assert!(matches!(m.join("studioName year", "name", &s), Err(OpError::Plan(_))));
        assert!(matches!(
            m.join("studio", "name", &s),
            Err(OpError::Core(Error::UnknownAttribute(_)))
        ));
    }

    #[test]
    fn strategy_names_parse() {
        assert_eq!("h_join".parse::<JoinStrategy>().unwrap(), JoinStrategy::Hash);
        assert_eq!("index".parse::<JoinStrategy>().unwrap(), JoinStrategy::Index);
        assert!("merge".parse::<JoinStrategy>().is_err());
    }
}
