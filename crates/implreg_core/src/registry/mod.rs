//! Implementor registry: register-or-park handshake and merged index.
//!
//! # Responsibility
//! - Deliver each payload to the viewer's subscriber when one is attached.
//! - Park payloads that arrive earlier and forward them once on attach.
//! - Provide the merged, queryable index a viewer builds from payloads.
//!
//! # Invariants
//! - Each publish targets exactly one of {subscriber, pending queue}.
//! - Parked payloads are forwarded in arrival order, once, then discarded.
//! - Merging is additive; no payload drops another payload's namespaces.

pub mod handshake;
pub mod index;
pub mod pending;
pub mod subscriber;
