//! Pending queue for payloads that arrive before a subscriber.

use crate::model::payload::Payload;
use crate::model::record::{merge_into, ImplementorMap};

/// Accumulates parked payloads in arrival order.
///
/// Every payload stays a separate entry; nothing is overwritten.
#[derive(Debug, Default)]
pub struct PendingQueue {
    payloads: Vec<Payload>,
    capacity: Option<usize>,
}

impl PendingQueue {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            payloads: Vec::new(),
            capacity,
        }
    }

    /// Parks one payload. Hands it back when the queue is full.
    pub fn push(&mut self, payload: Payload) -> Result<(), Payload> {
        if self.is_full() {
            return Err(payload);
        }
        self.payloads.push(payload);
        Ok(())
    }

    pub fn is_full(&self) -> bool {
        self.capacity
            .is_some_and(|capacity| self.payloads.len() >= capacity)
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    pub fn payloads(&self) -> &[Payload] {
        &self.payloads
    }

    /// Union of all parked mappings, merged in arrival order.
    pub fn merged(&self) -> ImplementorMap {
        let mut merged = ImplementorMap::new();
        for payload in &self.payloads {
            merge_into(&mut merged, &payload.implementors);
        }
        merged
    }

    /// Takes every parked payload, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<Payload> {
        std::mem::take(&mut self.payloads)
    }
}
