//! Viewer-side merged implementor index.

use crate::model::payload::Payload;
use crate::model::record::{merge_into, ImplementorMap, ImplementorRecord, Namespace};
use crate::registry::subscriber::Subscriber;
use log::debug;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

/// Queryable union of every payload merged so far.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImplementorIndex {
    entries: ImplementorMap,
    payload_count: usize,
}

impl ImplementorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one payload additively.
    ///
    /// Namespaces already present keep their records; incoming records are
    /// appended after them.
    pub fn merge(&mut self, payload: &Payload) -> usize {
        let appended = merge_into(&mut self.entries, &payload.implementors);
        self.payload_count += 1;
        debug!(
            "event=index_merged module=index payload={} namespaces={} records={}",
            payload.label(),
            payload.namespace_count(),
            appended
        );
        appended
    }

    pub fn get(&self, namespace: &str) -> Option<&[ImplementorRecord]> {
        self.entries.get(namespace).map(Vec::as_slice)
    }

    /// Namespaces in sorted order.
    pub fn namespaces(&self) -> Vec<&Namespace> {
        self.entries.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn payload_count(&self) -> usize {
        self.payload_count
    }

    pub fn as_map(&self) -> &ImplementorMap {
        &self.entries
    }

    pub fn into_map(self) -> ImplementorMap {
        self.entries
    }
}

impl Subscriber for ImplementorIndex {
    fn receive(&mut self, payload: Payload) {
        self.merge(&payload);
    }
}

/// Cloneable handle to an index shared between the registry and readers.
#[derive(Debug, Default, Clone)]
pub struct SharedIndex {
    inner: Arc<RwLock<ImplementorIndex>>,
}

impl SharedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the index.
    ///
    /// A lock poisoned by a panicking writer still yields the last state.
    pub fn read(&self) -> RwLockReadGuard<'_, ImplementorIndex> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Owned copy of the current index.
    pub fn snapshot(&self) -> ImplementorIndex {
        self.read().clone()
    }
}

impl Subscriber for SharedIndex {
    fn receive(&mut self, payload: Payload) {
        let mut index = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        index.merge(&payload);
    }
}
