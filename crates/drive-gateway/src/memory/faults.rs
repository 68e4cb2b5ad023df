//! Fault injection for the in-memory store.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use dashmap::DashSet;

use drive_core::types::Collection;

/// Configurable failures, used to exercise degraded paths.
#[derive(Debug, Default)]
pub(crate) struct Faults {
    /// Documents whose lookup fails with a permission error.
    denied: DashSet<(Collection, String)>,
    /// Reject every new live query.
    reject_queries: AtomicBool,
    /// Artificial latency applied to point lookups.
    lookup_delay: Mutex<Duration>,
}

impl Faults {
    pub(crate) fn deny(&self, collection: Collection, id: &str) {
        self.denied.insert((collection, id.to_string()));
    }

    pub(crate) fn allow(&self, collection: Collection, id: &str) {
        self.denied.remove(&(collection, id.to_string()));
    }

    pub(crate) fn is_denied(&self, collection: Collection, id: &str) -> bool {
        self.denied.contains(&(collection, id.to_string()))
    }

    pub(crate) fn set_reject_queries(&self, reject: bool) {
        self.reject_queries.store(reject, Ordering::SeqCst);
    }

    pub(crate) fn rejects_queries(&self) -> bool {
        self.reject_queries.load(Ordering::SeqCst)
    }

    pub(crate) fn set_lookup_delay(&self, delay: Duration) {
        match self.lookup_delay.lock() {
            Ok(mut guard) => *guard = delay,
            Err(poisoned) => *poisoned.into_inner() = delay,
        }
    }

    pub(crate) fn lookup_delay(&self) -> Duration {
        match self.lookup_delay.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
