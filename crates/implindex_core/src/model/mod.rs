//! Fragment and descriptor data model.
//!
//! # Responsibility
//! - Define the immutable values producers hand to the registry.
//!
//! # Invariants
//! - Values are never mutated once shared with the registry.
//! - Display order is insertion order at every level.

pub mod descriptor;
pub mod fragment;
