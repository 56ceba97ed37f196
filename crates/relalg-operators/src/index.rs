//! Key index strategies.
//!
//! An index maps a key tuple to the tuples that own it, in insertion order.
//! It is a lookup accelerator only: a table without one answers the same
//! queries by scanning, with the same results.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use relalg_core::prelude::{IndexKind, Key, Tuple};

pub trait KeyIndex: fmt::Debug + Send + Sync {
    fn kind(&self) -> IndexKind;

    /// Whether lookups are served by this index. `false` means the owner
    /// must fall back to a scan.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Every tuple stored under `key`, oldest first.
    fn lookup(&self, key: &Key) -> &[Tuple];

    /// Add `tuple` under `key`, returning how many tuples the key now owns.
    fn insert(&mut self, key: Key, tuple: Tuple) -> usize;

    /// Entries in ascending key order; tuples sharing a key keep insertion
    /// order.
    fn iter_sorted(&self) -> Vec<(&Key, &Tuple)>;

    /// Number of distinct keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build an empty index of the requested kind.
pub fn build_index(kind: IndexKind) -> Box<dyn KeyIndex> {
    match kind {
        IndexKind::None => Box::new(NoIndex),
        IndexKind::Ordered => Box::<OrderedIndex>::default(),
        IndexKind::Hash => Box::<HashIndex>::default(),
    }
}

fn push_owner(owners: &mut Vec<Tuple>, tuple: Tuple) -> usize {
    owners.push(tuple);
    owners.len()
}

fn flatten<'a>(entries: impl Iterator<Item = (&'a Key, &'a Vec<Tuple>)>) -> Vec<(&'a Key, &'a Tuple)> {
    entries
        .flat_map(|(k, owners)| owners.iter().map(move |t| (k, t)))
        .collect()
}

#[derive(Debug, Default)]
pub struct NoIndex;

impl KeyIndex for NoIndex {
    fn kind(&self) -> IndexKind {
        IndexKind::None
    }

    fn is_enabled(&self) -> bool {
        false
    }

    fn lookup(&self, _key: &Key) -> &[Tuple] {
        &[]
    }

    fn insert(&mut self, _key: Key, _tuple: Tuple) -> usize {
        0
    }

    fn iter_sorted(&self) -> Vec<(&Key, &Tuple)> {
        Vec::new()
    }

    fn len(&self) -> usize {
        0
    }
}

#[derive(Debug, Default)]
pub struct OrderedIndex {
    map: BTreeMap<Key, Vec<Tuple>>,
}

impl KeyIndex for OrderedIndex {
    fn kind(&self) -> IndexKind {
        IndexKind::Ordered
    }

    fn lookup(&self, key: &Key) -> &[Tuple] {
        self.map.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    fn insert(&mut self, key: Key, tuple: Tuple) -> usize {
        push_owner(self.map.entry(key).or_default(), tuple)
    }

    fn iter_sorted(&self) -> Vec<(&Key, &Tuple)> {
        flatten(self.map.iter())
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

#[derive(Debug, Default)]
pub struct HashIndex {
    map: HashMap<Key, Vec<Tuple>>,
}

impl KeyIndex for HashIndex {
    fn kind(&self) -> IndexKind {
        IndexKind::Hash
    }

    fn lookup(&self, key: &Key) -> &[Tuple] {
        self.map.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    fn insert(&mut self, key: Key, tuple: Tuple) -> usize {
        push_owner(self.map.entry(key).or_default(), tuple)
    }

    fn iter_sorted(&self) -> Vec<(&Key, &Tuple)> {
        let mut entries: Vec<_> = self.map.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        flatten(entries.into_iter())
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}
