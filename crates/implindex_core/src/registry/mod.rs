//! Fragment registration protocol.
//!
//! This module holds the two-state registry (`Unattached` -> `Attached`) that
//! routes producer fragments either into a pending queue or directly to the
//! single attached consumer, plus the lazily created process-wide instance.

pub mod consumer;
pub mod error;
mod global;
pub mod sink;

pub use consumer::FragmentConsumer;
pub use error::{RegistryError, RegistryResult};
pub use global::{attach, global, submit};
pub use sink::{AttachReport, ImplementorRegistry, SubmitOutcome};
