//! Logical schema types: domains, attributes, and the primary key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Tuple, Value};

/// The value-kind a column is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Domain {
    Integer,
    Real,
    Text,
    Character,
}

impl Domain {
    pub fn name(self) -> &'static str {
        match self {
            Domain::Integer => "Integer",
            Domain::Real => "Real",
            Domain::Text => "Text",
            Domain::Character => "Character",
        }
    }

    /// Parse a whitespace-separated list of domain names.
    pub fn parse_list(domains: &str) -> Result<Vec<Domain>> {
        domains.split_whitespace().map(str::parse).collect()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Domain {
    type Err = Error;

    /// Accepts the classic boxed type names (`Integer`, `Long`, `Double`,
    /// `String`, ...) as well as short SQL-ish spellings.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" | "long" | "short" | "byte" | "bigint" => Ok(Domain::Integer),
            "real" | "double" | "float" => Ok(Domain::Real),
            "string" | "text" | "str" | "varchar" => Ok(Domain::Text),
            "character" | "char" => Ok(Domain::Character),
            other => Err(Error::Schema(format!("unknown domain '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub domain: Domain,
}

impl Attribute {
    pub fn new(name: impl Into<String>, domain: Domain) -> Self {
        Self {
            name: name.into(),
            domain,
        }
    }
}

/// Ordered attributes plus the primary key.
///
/// Invariants (checked by [`Schema::new`]):
/// - attribute names are unique
/// - the key is non-empty and every key name is an attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    attributes: Vec<Attribute>,
    key: Vec<String>,
}

impl Schema {
    pub fn new(attributes: Vec<Attribute>, key: Vec<String>) -> Result<Self> {
        for (i, a) in attributes.iter().enumerate() {
            if attributes[..i].iter().any(|b| b.name == a.name) {
                return Err(Error::Schema(format!("duplicate attribute '{}'", a.name)));
            }
        }
        if key.is_empty() {
            return Err(Error::Schema("primary key must not be empty".into()));
        }
        if let Some(missing) = key.iter().find(|k| !attributes.iter().any(|a| &a.name == *k)) {
            return Err(Error::Schema(format!(
                "key attribute '{missing}' is not part of the schema"
            )));
        }
        Ok(Self { attributes, key })
    }

    /// Build a schema from parallel name/domain lists.
    pub fn from_parts(names: &[&str], domains: &[Domain], key: &[&str]) -> Result<Self> {
        if names.len() != domains.len() {
            return Err(Error::Schema(format!(
                "{} attribute names but {} domains",
                names.len(),
                domains.len()
            )));
        }
        let attributes = names
            .iter()
            .zip(domains)
            .map(|(n, d)| Attribute::new(*n, *d))
            .collect();
        Self::new(attributes, key.iter().map(|k| k.to_string()).collect())
    }

    /// Build a schema from three whitespace-separated strings, e.g.
    /// `("id name year", "Integer String Integer", "id")`.
    pub fn parse(attributes: &str, domains: &str, key: &str) -> Result<Self> {
        let names: Vec<&str> = attributes.split_whitespace().collect();
        let domains = Domain::parse_list(domains)?;
        let key: Vec<&str> = key.split_whitespace().collect();
        Self::from_parts(&names, &domains, &key)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn key(&self) -> &[String] {
        &self.key
    }

    pub fn arity(&self) -> usize {
        self.attributes.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    pub fn domains(&self) -> Vec<Domain> {
        self.attributes.iter().map(|a| a.domain).collect()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Union compatibility: same arity and pairwise equal domains.
    /// Names and keys are not compared.
    pub fn compatible(&self, other: &Schema) -> Result<()> {
        if self.arity() != other.arity() {
            return Err(Error::SchemaIncompatible(format!(
                "tables have different arity ({} vs {})",
                self.arity(),
                other.arity()
            )));
        }
        for (j, (a, b)) in self.attributes.iter().zip(&other.attributes).enumerate() {
            if a.domain != b.domain {
                return Err(Error::SchemaIncompatible(format!(
                    "tables disagree on domain {j} ({} vs {})",
                    a.domain, b.domain
                )));
            }
        }
        Ok(())
    }

    /// Reject tuples whose arity or per-column domain disagrees with the schema.
    pub fn check_tuple(&self, tuple: &Tuple) -> Result<()> {
        self.check_values(tuple)
    }

    pub(crate) fn check_values(&self, values: &[Value]) -> Result<()> {
        if values.len() != self.arity() {
            return Err(Error::ArityMismatch {
                expected: self.arity(),
                found: values.len(),
            });
        }
        for (attr, value) in self.attributes.iter().zip(values) {
            if value.domain() != attr.domain {
                return Err(Error::TypeMismatch {
                    column: attr.name.clone(),
                    expected: attr.domain,
                    found: value.domain(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols: Vec<String> = self
            .attributes
            .iter()
            .map(|a| format!("{}:{}", a.name, a.domain))
            .collect();
        write!(f, "({}) key ({})", cols.join(", "), self.key.join(", "))
    }
}
