//! Implementor record and namespace types.
//!
//! # Responsibility
//! - Define the opaque record shape carried from generator to viewer.
//! - Define the per-library mapping built once by every payload.
//!
//! # Invariants
//! - Records are never parsed or rewritten by the registry.
//! - List order is generator order; duplicates are kept.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

static MARKUP_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid markup tag regex"));

/// Library identifier owning one implementor list, e.g. `colstodian`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Namespace {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Namespace {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Namespace {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One pre-rendered "type implements trait" entry.
///
/// The content is opaque markup produced by the doc generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImplementorRecord(String);

impl ImplementorRecord {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    /// Raw markup exactly as produced by the generator.
    pub fn markup(&self) -> &str {
        &self.0
    }

    /// Markup with tags removed and common entities decoded.
    ///
    /// Display helper for terminal listings only; registry code never calls it.
    pub fn plain_text(&self) -> String {
        decode_entities(&MARKUP_TAG_RE.replace_all(&self.0, ""))
    }
}

impl From<&str> for ImplementorRecord {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ImplementorRecord {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Ordered implementor records belonging to one namespace.
pub type ImplementorList = Vec<ImplementorRecord>;

/// Mapping contributed by one payload.
pub type ImplementorMap = BTreeMap<Namespace, ImplementorList>;

/// Appends every list of `incoming` onto `target`, keeping existing entries.
///
/// Returns the number of records appended.
pub fn merge_into(target: &mut ImplementorMap, incoming: &ImplementorMap) -> usize {
    let mut appended = 0;
    for (namespace, records) in incoming {
        target
            .entry(namespace.clone())
            .or_default()
            .extend(records.iter().cloned());
        appended += records.len();
    }
    appended
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
