//! Values, tuples, and key tuples.
//!
//! Values of distinct domains never compare equal. Ordering across domains
//! falls back to domain order so mixed keys can still live in ordered maps.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::schema::Domain;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    #[serde(with = "real_repr")]
    Real(f64),
    Text(String),
    Character(char),
}

impl Value {
    pub fn domain(&self) -> Domain {
        match self {
            Value::Integer(_) => Domain::Integer,
            Value::Real(_) => Domain::Real,
            Value::Text(_) => Domain::Text,
            Value::Character(_) => Domain::Character,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Parse a literal in the given domain.
    pub fn parse_as(domain: Domain, literal: &str) -> Result<Value, Error> {
        let bad = || Error::Schema(format!("cannot parse '{literal}' as {domain}"));
        match domain {
            Domain::Integer => literal.trim().parse().map(Value::Integer).map_err(|_| bad()),
            Domain::Real => literal.trim().parse().map(Value::Real).map_err(|_| bad()),
            Domain::Text => Ok(Value::Text(literal.to_string())),
            Domain::Character => {
                let mut chars = literal.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Character(c)),
                    _ => Err(bad()),
                }
            }
        }
    }
}

/// JSON has no NaN or infinities: finite reals are written as numbers, the
/// rest as their raw bit pattern so every value reads back identically.
mod real_repr {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Bits { bits: u64 },
    }

    pub fn serialize<S: Serializer>(v: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if v.is_finite() {
            Repr::Number(*v)
        } else {
            Repr::Bits { bits: v.to_bits() }
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Number(v) => v,
            Repr::Bits { bits } => f64::from_bits(bits),
        })
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        match (self, other) {
            (Integer(x), Integer(y)) => x.cmp(y),
            (Real(x), Real(y)) => x.total_cmp(y),
            (Text(x), Text(y)) => x.cmp(y),
            (Character(x), Character(y)) => x.cmp(y),
            // Mixed domains: order by domain
            _ => self.domain().cmp(&other.domain()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Write domain discriminant first
        self.domain().hash(state);
        match self {
            Value::Integer(i) => i.hash(state),
            Value::Real(f) => f.to_bits().hash(state),
            Value::Text(s) => s.hash(state),
            Value::Character(c) => c.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
            Value::Character(c) => write!(f, "{c}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Character(v)
    }
}

/// An immutable row. Cloning shares the underlying storage, so derived
/// tables can hold the same tuples as their sources.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Vec<Value>", into = "Vec<Value>")]
pub struct Tuple(Arc<[Value]>);

impl Tuple {
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Concatenate two tuples (join output).
    pub fn concat(left: &Tuple, right: &Tuple) -> Tuple {
        left.iter().chain(right.iter()).cloned().collect()
    }
}

impl Deref for Tuple {
    type Target = [Value];

    fn deref(&self) -> &[Value] {
        &self.0
    }
}

impl From<Vec<Value>> for Tuple {
    fn from(values: Vec<Value>) -> Self {
        Tuple(values.into())
    }
}

impl From<Tuple> for Vec<Value> {
    fn from(t: Tuple) -> Self {
        t.0.to_vec()
    }
}

impl FromIterator<Value> for Tuple {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Tuple(iter.into_iter().collect())
    }
}

impl fmt::Debug for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("]")
    }
}

/// Build a [`Tuple`] from anything convertible into [`Value`]:
/// `tuple![1, "Star_Wars", 1977]`.
#[macro_export]
macro_rules! tuple {
    ($($v:expr),* $(,)?) => {
        $crate::types::Tuple::from(vec![$($crate::types::Value::from($v)),*])
    };
}

/// The projection of a tuple onto the primary-key attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key(pub Vec<Value>);

impl Key {
    pub fn new(values: Vec<Value>) -> Self {
        Key(values)
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Value> for Key {
    fn from(v: Value) -> Self {
        Key(vec![v])
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "Key({})", parts.join(", "))
    }
}

/// Which key-index strategy a table is built with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexKind {
    /// No index; key lookups scan the tuple store.
    #[default]
    None,
    /// Ordered B-tree map.
    Ordered,
    /// Hash map; sorted iteration sorts on demand.
    Hash,
}

impl IndexKind {
    pub fn name(self) -> &'static str {
        match self {
            IndexKind::None => "none",
            IndexKind::Ordered => "ordered",
            IndexKind::Hash => "hash",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndexKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "no_map" | "off" => Ok(IndexKind::None),
            "ordered" | "tree" | "btree" | "tree_map" => Ok(IndexKind::Ordered),
            "hash" | "hash_map" => Ok(IndexKind::Hash),
            other => Err(Error::Config(format!("unknown index kind '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_of_different_domains_never_equal() {
        assert_ne!(Value::Integer(1), Value::Real(1.0));
        assert_ne!(Value::Text("a".into()), Value::Character('a'));
        assert_eq!(Value::Real(f64::NAN), Value::Real(f64::NAN));
    }

    #[test]
    fn ordering_within_and_across_domains() {
        assert!(Value::Integer(2) < Value::Integer(10));
        assert!(Value::from("abc") < Value::from("abd"));
        assert!(Value::Integer(100) < Value::Real(0.0));
    }

    #[test]
    fn tuple_macro_and_display() {
        let t = tuple![1, "Star_Wars", 12.5, 'T'];
        assert_eq!(t.len(), 4);
        assert_eq!(t[0].domain(), Domain::Integer);
        assert_eq!(t[3].domain(), Domain::Character);
        assert_eq!(t.to_string(), "[1, Star_Wars, 12.5, T]");
    }

    #[test]
    fn tuple_clone_shares_storage() {
        let t = tuple![1, 2];
        let u = t.clone();
        assert!(std::ptr::eq(t.values().as_ptr(), u.values().as_ptr()));
        assert_eq!(Tuple::concat(&t, &u), tuple![1, 2, 1, 2]);
    }

    #[test]
    fn tuple_serializes_as_plain_list() {
        let t = tuple![7, "x"];
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"[{"Integer":7},{"Text":"x"}]"#);
        let back: Tuple = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn non_finite_reals_survive_json() {
        let t = tuple![f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -0.0, 2.5];
        let json = serde_json::to_string(&t).unwrap();
        assert!(!json.contains("null"));
        assert!(json.contains(r#"{"Real":2.5}"#));
        let back: Tuple = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
        assert!(back[3].as_real().is_some_and(|z| z.is_sign_negative()));
    }

    #[test]
    fn parse_literals_by_domain() {
        assert_eq!(Value::parse_as(Domain::Integer, " 42").unwrap(), Value::Integer(42));
        assert_eq!(Value::parse_as(Domain::Character, "T").unwrap(), Value::Character('T'));
        assert!(Value::parse_as(Domain::Character, "TT").is_err());
        assert!(Value::parse_as(Domain::Real, "x").is_err());
    }

    #[test]
    fn index_kind_names() {
        assert_eq!("TREE_MAP".parse::<IndexKind>().unwrap(), IndexKind::Ordered);
        assert_eq!("hash".parse::<IndexKind>().unwrap(), IndexKind::Hash);
        assert_eq!(IndexKind::default(), IndexKind::None);
        assert!("bptree2".parse::<IndexKind>().is_err());
    }
}
