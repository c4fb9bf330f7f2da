//! Registration sink, pending queue and consumer attachment point.
//!
//! # Responsibility
//! - Accept fragments from independent producers in any order.
//! - Buffer fragments until the single consumer attaches, then flush them.
//! - Forward fragments directly once a consumer is attached.
//!
//! # Invariants
//! - Every accepted fragment is delivered exactly once per `submit` call.
//! - Delivery order equals submission order across queued and direct paths.
//! - `attach` is the only state transition; the consumer is never replaced.
//! - The sink never merges fragments; overlapping symbols are delivered as
//!   separate events.

use crate::model::fragment::Fragment;
use crate::registry::consumer::FragmentConsumer;
use crate::registry::error::{RegistryError, RegistryResult};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Where one accepted fragment went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Buffered until a consumer attaches; `pending` is the queue length after
    /// this submission.
    Queued { pending: usize },
    /// Handed to the attached consumer before `submit` returned.
    Forwarded,
}

/// Result of a successful attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachReport {
    /// Number of queued fragments delivered during attachment.
    pub flushed: usize,
}

enum RegistryState {
    Unattached {
        pending: VecDeque<Arc<Fragment>>,
    },
    Attached {
        consumer: Box<dyn FragmentConsumer>,
        delivered: usize,
    },
}

/// Registry that glues fragment producers to the one rendering consumer.
///
/// Construct one per host (or use [`crate::registry::global`]) and share it by
/// reference. All operations are synchronous and safe to call from multiple
/// threads.
pub struct ImplementorRegistry {
    state: Mutex<RegistryState>,
}

impl Default for ImplementorRegistry {
    fn default() -> Self {
        Self {
            state: Mutex::new(RegistryState::Unattached {
                pending: VecDeque::new(),
            }),
        }
    }
}

impl ImplementorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts one fragment.
    ///
    /// Validates the fragment, then either appends it to the pending queue or
    /// forwards it to the attached consumer. The state lock is held across the
    /// whole call, so a racing `attach` sees the fragment either fully queued
    /// or not at all.
    ///
    /// # Errors
    /// - `MalformedFragment` when validation fails. Nothing is registered.
    pub fn submit(&self, fragment: impl Into<Arc<Fragment>>) -> RegistryResult<SubmitOutcome> {
        let fragment = fragment.into();
        if let Err(err) = fragment.validate() {
            warn!(
                "event=fragment_rejected module=registry status=error scope={} reason={}",
                scope_label(&fragment),
                err
            );
            return Err(RegistryError::MalformedFragment(err));
        }

        let scope = scope_label(&fragment).to_string();
        let symbols = fragment.len();
        let mut state = self.state.lock();
        match &mut *state {
            RegistryState::Unattached { pending } => {
                pending.push_back(fragment);
                let queued = pending.len();
                debug!(
                    "event=fragment_queued module=registry status=ok scope={} symbols={} pending={}",
                    scope, symbols, queued
                );
                Ok(SubmitOutcome::Queued { pending: queued })
            }
            RegistryState::Attached {
                consumer,
                delivered,
            } => {
                consumer.accept(fragment);
                *delivered += 1;
                debug!(
                    "event=fragment_forwarded module=registry status=ok scope={} symbols={} delivered={}",
                    scope, symbols, delivered
                );
                Ok(SubmitOutcome::Forwarded)
            }
        }
    }

    /// Installs the live consumer and flushes the pending queue into it.
    ///
    /// The flush completes before this returns; fragments submitted
    /// concurrently wait for the flush and are forwarded afterwards.
    ///
    /// If the consumer panics mid-flush, the registry stays unattached and
    /// the fragments not yet handed over remain pending.
    ///
    /// # Errors
    /// - `DuplicateAttachment` when a consumer is already attached. The new
    ///   consumer is dropped without receiving anything.
    pub fn attach(&self, consumer: impl FragmentConsumer + 'static) -> RegistryResult<AttachReport> {
        self.attach_boxed(Box::new(consumer))
    }

    /// Boxed form of [`ImplementorRegistry::attach`].
    pub fn attach_boxed(
        &self,
        mut consumer: Box<dyn FragmentConsumer>,
    ) -> RegistryResult<AttachReport> {
        let mut state = self.state.lock();
        let pending = match &mut *state {
            RegistryState::Attached { delivered, .. } => {
                error!(
                    "event=duplicate_attachment module=registry status=error delivered={}",
                    delivered
                );
                return Err(RegistryError::DuplicateAttachment);
            }
            RegistryState::Unattached { pending } => pending,
        };

        // Pop one at a time: if the consumer panics, the undelivered tail stays
        // queued for the next attachment.
        let mut flushed = 0;
        while let Some(fragment) = pending.pop_front() {
            consumer.accept(fragment);
            flushed += 1;
        }
        *state = RegistryState::Attached {
            consumer,
            delivered: flushed,
        };

        info!(
            "event=consumer_attached module=registry status=ok flushed={}",
            flushed
        );
        Ok(AttachReport { flushed })
    }

    pub fn is_attached(&self) -> bool {
        matches!(&*self.state.lock(), RegistryState::Attached { .. })
    }

    /// Returns the number of fragments waiting for a consumer.
    ///
    /// Always `0` after attachment.
    pub fn pending_len(&self) -> usize {
        match &*self.state.lock() {
            RegistryState::Unattached { pending } => pending.len(),
            RegistryState::Attached { .. } => 0,
        }
    }

    /// Returns the currently pending fragments in submission order.
    ///
    /// Lets a host pull the current state without becoming the consumer.
    pub fn pending_snapshot(&self) -> Vec<Arc<Fragment>> {
        match &*self.state.lock() {
            RegistryState::Unattached { pending } => pending.iter().cloned().collect(),
            RegistryState::Attached { .. } => Vec::new(),
        }
    }

    /// Returns how many fragments the attached consumer has received.
    pub fn delivered_count(&self) -> usize {
        match &*self.state.lock() {
            RegistryState::Unattached { .. } => 0,
            RegistryState::Attached { delivered, .. } => *delivered,
        }
    }
}

impl Debug for ImplementorRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &*self.state.lock() {
            RegistryState::Unattached { pending } => f
                .debug_struct("ImplementorRegistry")
                .field("attached", &false)
                .field("pending", &pending.len())
                .finish(),
            RegistryState::Attached { delivered, .. } => f
                .debug_struct("ImplementorRegistry")
                .field("attached", &true)
                .field("delivered", delivered)
                .finish(),
        }
    }
}

fn scope_label(fragment: &Fragment) -> &str {
    fragment.scope().unwrap_or("-")
}
