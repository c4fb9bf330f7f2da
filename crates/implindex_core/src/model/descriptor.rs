//! Descriptor value model.
//!
//! # Responsibility
//! - Hold one rendered "type X implements trait Y" fact as opaque text.
//!
//! # Invariants
//! - Content is never parsed or rewritten after construction.
//! - A well-formed descriptor contains at least one non-whitespace character.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// One opaque unit of rendered content describing a single implementation.
///
/// The text is commonly pre-rendered markup; core never inspects its structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Descriptor(String);

impl Descriptor {
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether this descriptor carries renderable content.
    pub fn is_well_formed(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl Display for Descriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Descriptor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Descriptor {
    fn from(value: String) -> Self {
        Self(value)
    }
}
