use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::PackageCoordinates;

/// One element of a dependency chain.
///
/// The index builder emits package strings, but chains are taken as-is from
/// JSON, so anything else is carried along and skipped when rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChainEntry {
    Package(String),
    Other(serde_json::Value),
}

impl ChainEntry {
    pub fn as_package(&self) -> Option<&str> {
        match self {
            ChainEntry::Package(s) => Some(s),
            ChainEntry::Other(_) => None,
        }
    }
}

impl From<&str> for ChainEntry {
    fn from(s: &str) -> Self {
        ChainEntry::Package(s.to_string())
    }
}

/// Path from a consuming package down to the audited one.
pub type DependencyChain = Vec<ChainEntry>;

/// Maps `name-version` keys to the chains that pull that package in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReverseDependencyIndex {
    chains: HashMap<String, Vec<DependencyChain>>,
}

impl ReverseDependencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, chains: Vec<DependencyChain>) {
        self.chains.insert(key.into(), chains);
    }

    pub fn get(&self, key: &str) -> Option<&[DependencyChain]> {
        self.chains.get(key).map(Vec::as_slice)
    }

    pub fn lookup(&self, coords: &PackageCoordinates) -> Option<&[DependencyChain]> {
        self.get(&coords.lookup_key())
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<DependencyChain>)> for ReverseDependencyIndex {
    fn from_iter<I: IntoIterator<Item = (K, Vec<DependencyChain>)>>(iter: I) -> Self {
        Self {
            chains: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Builds a chain from string literals.
pub fn chain<'a>(entries: impl IntoIterator<Item = &'a str>) -> DependencyChain {
    entries.into_iter().map(ChainEntry::from).collect()
}

/// Packages that require `name`, in chain order.
///
/// Entries that are not strings, or that contain `name` as a substring
/// (the package itself included), are left out.
pub fn required_by<'a>(chains: &'a [DependencyChain], name: &str) -> Vec<&'a str> {
    chains
        .iter()
        .flatten()
        .filter_map(ChainEntry::as_package)
        .filter(|entry| !entry.contains(name))
        .collect()
}
