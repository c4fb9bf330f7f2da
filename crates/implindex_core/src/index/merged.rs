//! Consumer-side merged implementor index.
//!
//! # Responsibility
//! - Fold the ordered fragment stream into one symbol -> descriptors view.
//! - Own the symbol-level merge policy that the registry deliberately skips.
//!
//! # Invariants
//! - Symbols keep first-seen order.
//! - `Append` never drops a descriptor; `Replace` keeps only the latest list.

use crate::model::descriptor::Descriptor;
use crate::model::fragment::Fragment;
use crate::registry::consumer::FragmentConsumer;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

/// How descriptor lists for a symbol seen in several fragments are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Concatenate in arrival order.
    #[default]
    Append,
    /// Keep the list from the most recent fragment.
    Replace,
    /// Concatenate, skipping descriptors already present for the symbol.
    Union,
}

impl MergePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Replace => "replace",
            Self::Union => "union",
        }
    }
}

impl Display for MergePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergePolicy {
    type Err = MergePolicyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "append" => Ok(Self::Append),
            "replace" => Ok(Self::Replace),
            "union" => Ok(Self::Union),
            other => Err(MergePolicyParseError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePolicyParseError(pub String);

impl Display for MergePolicyParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported merge policy `{}`; expected append|replace|union",
            self.0
        )
    }
}

impl Error for MergePolicyParseError {}

/// Merged view over every fragment received so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImplementorIndex {
    policy: MergePolicy,
    fragment_count: usize,
    symbols: IndexMap<String, Vec<Descriptor>>,
}

impl ImplementorIndex {
    pub fn new(policy: MergePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Folds one fragment into the index.
    pub fn apply(&mut self, fragment: &Fragment) {
        self.fragment_count += 1;
        for entry in fragment.entries() {
            let merged = self.symbols.entry(entry.symbol.clone()).or_default();
            match self.policy {
                MergePolicy::Append => merged.extend(entry.descriptors.iter().cloned()),
                MergePolicy::Replace => {
                    merged.clear();
                    merged.extend(entry.descriptors.iter().cloned());
                }
                MergePolicy::Union => {
                    for descriptor in &entry.descriptors {
                        if !merged.contains(descriptor) {
                            merged.push(descriptor.clone());
                        }
                    }
                }
            }
        }
    }

    pub fn fragment_count(&self) -> usize {
        self.fragment_count
    }

    /// Returns symbols in first-seen order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }

    pub fn descriptors(&self, symbol: &str) -> Option<&[Descriptor]> {
        self.symbols.get(symbol).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Shareable index handle usable as the registry consumer.
///
/// Clones point at the same index, so a host can attach one clone and read
/// snapshots through another.
#[derive(Debug, Clone, Default)]
pub struct SharedIndex {
    inner: Arc<Mutex<ImplementorIndex>>,
}

impl SharedIndex {
    pub fn new(policy: MergePolicy) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ImplementorIndex::new(policy))),
        }
    }

    /// Returns a copy of the current merged state.
    pub fn snapshot(&self) -> ImplementorIndex {
        self.inner.lock().clone()
    }

    pub fn fragment_count(&self) -> usize {
        self.inner.lock().fragment_count()
    }
}

impl FragmentConsumer for SharedIndex {
    fn accept(&mut self, fragment: Arc<Fragment>) {
        self.inner.lock().apply(&fragment);
    }
}
