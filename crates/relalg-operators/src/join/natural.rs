//! Natural join over identically named attributes.

use relalg_core::matcher::{column_positions, extract};
use relalg_core::prelude::{Schema, Tuple};
use tracing::debug;

use super::nested_loop::matches;
use crate::plan::OpPlan;
use crate::table::Table;
use crate::traits::{expect_inputs, OpError, Operator};

/// Right attributes split into those shared with the left schema and those
/// exclusive to the right, both in right-schema order.
fn partition(left: &Schema, right: &Schema) -> (Vec<String>, Vec<String>) {
    right
        .names()
        .map(str::to_string)
        .partition(|n| left.contains(n))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalJoin;

impl Operator for NaturalJoin {
    fn name(&self) -> &'static str {
        "natural_join"
    }

    fn plan(&self, input_schemas: &[&Schema]) -> Result<OpPlan, OpError> {
        let inputs = expect_inputs(self.name(), input_schemas, 2)?;
        let (left, right) = (inputs[0], inputs[1]);
        let (shared, exclusive) = partition(left, right);
        debug!(?shared, ?exclusive, "natural join attributes");

        let mut attributes = left.attributes().to_vec();
        for name in &exclusive {
            if let Some(i) = right.index_of(name) {
                attributes.push(right.attributes()[i].clone());
            }
        }
        Ok(OpPlan::new(Schema::new(attributes, left.key().to_vec())?))
    }

    fn eval(&self, inputs: &[&Table], _plan: &OpPlan) -> Result<Vec<Tuple>, OpError> {
        let inputs = expect_inputs(self.name(), inputs, 2)?;
        let (left, right) = (inputs[0], inputs[1]);
        let (shared, exclusive) = partition(left.schema(), right.schema());
        let lpos = column_positions(left.schema(), &shared)?;
        let rpos = column_positions(right.schema(), &shared)?;
        let xpos = column_positions(right.schema(), &exclusive)?;

        let mut rows = Vec::new();
        for l in left.tuples() {
            for r in right.tuples() {
                if matches(l, r, &lpos, &rpos) {
                    rows.push(Tuple::concat(l, &extract(r, &xpos)));
                }
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use relalg_core::prelude::{Domain, IndexKind};
    use relalg_core::tuple;

    use super::*;

    fn stars() -> Table {
        let schema = Schema::parse("name address gender", "String String Character", "name").unwrap();
        Table::from_tuples(
            "movieStar",
            schema,
            IndexKind::None,
            vec![
                tuple!["Carrie_Fisher", "Hollywood", 'F'],
                tuple!["Mark_Hamill", "Brentwood", 'M'],
                tuple!["Harrison_Ford", "Beverly_Hills", 'M'],
            ],
        )
        .unwrap()
    }

    fn starred() -> Table {
        let schema = Schema::parse("title year name", "String Integer String", "title year name")
            .unwrap();
        Table::from_tuples(
            "starsIn",
            schema,
            IndexKind::None,
            vec![
                tuple!["Star_Wars", 1977, "Carrie_Fisher"],
                tuple!["Star_Wars", 1977, "Harrison_Ford"],
                tuple!["Blade_Runner", 1982, "Harrison_Ford"],
            ],
        )
        .unwrap()
    }

    #[test]
    fn drops_the_right_copy_of_shared_columns() {
        let j = stars().natural_join(&starred()).unwrap();
        let names: Vec<&str> = j.schema().names().collect();
        assert_eq!(names, ["name", "address", "gender", "title", "year"]);
        assert_eq!(
            j.schema().domains(),
            [Domain::Text, Domain::Text, Domain::Character, Domain::Text, Domain::Integer]
        );
        assert_eq!(
            j.tuples(),
            &[
                tuple!["Carrie_Fisher", "Hollywood", 'F', "Star_Wars", 1977],
                tuple!["Harrison_Ford", "Beverly_Hills", 'M', "Star_Wars", 1977],
                tuple!["Harrison_Ford", "Beverly_Hills", 'M', "Blade_Runner", 1982],
            ]
        );
        assert_eq!(j.key(), ["name".to_string()]);
    }

    #[test]
    fn no_shared_attributes_is_a_cartesian_product() {
        let schema = Schema::parse("studio", "String", "studio").unwrap();
        let studios =
            Table::from_tuples("s", schema, IndexKind::None, vec![tuple!["Fox"], tuple!["MGM"]])
                .unwrap();
        let j = stars().natural_join(&studios).unwrap();
        assert_eq!(j.tuple_count(), 6);
        assert_eq!(j.schema().arity(), 4);
    }
}
