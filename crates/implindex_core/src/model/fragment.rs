//! Fragment domain model.
//!
//! # Responsibility
//! - Define the immutable batch of symbol -> descriptor-list data that one
//!   producer hands to the registry.
//! - Provide declaration-level validation used by the registration sink.
//!
//! # Invariants
//! - Symbol order and per-symbol descriptor order are display order and are
//!   preserved exactly as constructed.
//! - A fragment is never mutated after it is shared with the registry.
//! - Scope metadata is informational only and never affects routing.

use crate::model::descriptor::Descriptor;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One symbol's ordered descriptor list inside a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    /// Symbol name, e.g. a crate or type identifier.
    pub symbol: String,
    /// Descriptors in display order. May be empty.
    pub descriptors: Vec<Descriptor>,
}

/// Immutable batch of implementor data submitted as a unit.
///
/// Build with [`Fragment::new`] / [`Fragment::scoped`] and
/// [`Fragment::with_symbol`]; validation happens at submission time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    scope: Option<String>,
    entries: Vec<SymbolEntry>,
}

impl Fragment {
    /// Creates an empty fragment without scope metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty fragment tagged with an externally assigned scope,
    /// e.g. `core::default::Default`.
    pub fn scoped(scope: impl Into<String>) -> Self {
        Self {
            scope: Some(scope.into()),
            entries: Vec::new(),
        }
    }

    /// Appends one symbol entry, preserving insertion order.
    pub fn with_symbol<I, D>(mut self, symbol: impl Into<String>, descriptors: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Descriptor>,
    {
        self.entries.push(SymbolEntry {
            symbol: symbol.into(),
            descriptors: descriptors.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    /// Returns symbol names in fragment order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.symbol.as_str())
    }

    /// Returns the descriptor list for one symbol.
    pub fn get(&self, symbol: &str) -> Option<&[Descriptor]> {
        self.entries
            .iter()
            .find(|entry| entry.symbol == symbol)
            .map(|entry| entry.descriptors.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of descriptors across all symbols.
    pub fn descriptor_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.descriptors.len()).sum()
    }

    /// Validates declaration-level fragment invariants.
    ///
    /// # Errors
    /// - `BlankSymbol` when a symbol name is empty or whitespace.
    /// - `DuplicateSymbol` when a symbol name appears twice in this fragment.
    /// - `BlankDescriptor` when a descriptor carries no content.
    pub fn validate(&self) -> Result<(), FragmentError> {
        let mut seen = BTreeSet::<&str>::new();
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.symbol.trim().is_empty() {
                return Err(FragmentError::BlankSymbol { index });
            }
            if !seen.insert(entry.symbol.as_str()) {
                return Err(FragmentError::DuplicateSymbol(entry.symbol.clone()));
            }
            if let Some(position) = entry
                .descriptors
                .iter()
                .position(|descriptor| !descriptor.is_well_formed())
            {
                return Err(FragmentError::BlankDescriptor {
                    symbol: entry.symbol.clone(),
                    index: position,
                });
            }
        }
        Ok(())
    }
}

/// Fragment validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentError {
    BlankSymbol { index: usize },
    DuplicateSymbol(String),
    BlankDescriptor { symbol: String, index: usize },
}

impl Display for FragmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankSymbol { index } => {
                write!(f, "fragment entry {index} has a blank symbol name")
            }
            Self::DuplicateSymbol(symbol) => {
                write!(f, "fragment declares symbol more than once: {symbol}")
            }
            Self::BlankDescriptor { symbol, index } => {
                write!(f, "descriptor {index} of symbol `{symbol}` is blank")
            }
        }
    }
}

impl Error for FragmentError {}
