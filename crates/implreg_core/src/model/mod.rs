//! Implementor data model.
//!
//! # Responsibility
//! - Define the opaque record, namespace and mapping types.
//! - Define the payload envelope and its file-format parsers.
//!
//! # Invariants
//! - Record markup is carried verbatim from generator to viewer.
//! - A namespace's list keeps generator order, duplicates included.

pub mod payload;
pub mod record;
