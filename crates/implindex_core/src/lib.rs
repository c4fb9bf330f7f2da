//! Incremental implementor index assembly.
//!
//! Independently generated fragments (symbol -> rendered implementor lines)
//! arrive in any order and are routed through one registry to a single
//! rendering consumer: queued until the consumer attaches, flushed in order on
//! attachment, forwarded directly afterwards.

pub mod index;
pub mod loader;
pub mod logging;
pub mod model;
pub mod registry;

pub use index::merged::{ImplementorIndex, MergePolicy, MergePolicyParseError, SharedIndex};
pub use loader::{
    discover_scripts, load_script, parse_implementors_script, scope_from_path, LoadError,
};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingConfig};
pub use model::descriptor::Descriptor;
pub use model::fragment::{Fragment, FragmentError, SymbolEntry};
pub use registry::{
    AttachReport, FragmentConsumer, ImplementorRegistry, RegistryError, RegistryResult,
    SubmitOutcome,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
