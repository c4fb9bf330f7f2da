//! Process-wide registry instance.
//!
//! # Invariants
//! - The instance is created on the first `global`, `submit` or `attach`
//!   call and lives until process exit.
//! - There is no teardown and no way to swap the instance.

use crate::model::fragment::Fragment;
use crate::registry::consumer::FragmentConsumer;
use crate::registry::error::RegistryResult;
use crate::registry::sink::{AttachReport, ImplementorRegistry, SubmitOutcome};
use log::debug;
use once_cell::sync::OnceCell;
use std::sync::Arc;

static GLOBAL_REGISTRY: OnceCell<ImplementorRegistry> = OnceCell::new();

/// Returns the process-wide registry, creating it on first use.
pub fn global() -> &'static ImplementorRegistry {
    GLOBAL_REGISTRY.get_or_init(|| {
        debug!("event=registry_init module=registry status=ok");
        ImplementorRegistry::new()
    })
}

/// Submits one fragment to the process-wide registry.
pub fn submit(fragment: impl Into<Arc<Fragment>>) -> RegistryResult<SubmitOutcome> {
    global().submit(fragment)
}

/// Attaches the consumer of the process-wide registry.
pub fn attach(consumer: impl FragmentConsumer + 'static) -> RegistryResult<AttachReport> {
    global().attach(consumer)
}
