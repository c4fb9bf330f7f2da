//! Consumer-side index assembly.

pub mod merged;
