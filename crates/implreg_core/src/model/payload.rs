//! Payload envelope and file-format parsing.
//!
//! # Responsibility
//! - Wrap one generator mapping with a stable identity.
//! - Parse the two payload shapes: bare JSON literal and generated script.
//!
//! # Invariants
//! - A payload's mapping is built once and never mutated after construction.
//! - Parsing is the only place input can be rejected.

use crate::model::record::{ImplementorList, ImplementorMap, Namespace};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Global name of the viewer's registration function.
pub const REGISTER_FN_NAME: &str = "register_implementors";
/// Global name of the pending holding slot.
pub const PENDING_SLOT_NAME: &str = "pending_implementors";

static LITERAL_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"var\s+implementors\s*=\s*").expect("valid implementors literal regex")
});
static ASSIGNMENT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*implementors\[("(?:[^"\\]|\\.)*")\]\s*=\s*"#)
        .expect("valid implementors assignment regex")
});

/// Identity of one payload, used to keep parked payloads distinguishable.
pub type PayloadId = Uuid;

/// One generator payload: the full mapping plus its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub id: PayloadId,
    /// Optional origin label (trait path or file name), used in log lines.
    pub source: Option<String>,
    pub implementors: ImplementorMap,
}

impl Payload {
    /// Wraps a mapping with a fresh random id.
    pub fn new(implementors: ImplementorMap) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: None,
            implementors,
        }
    }

    /// Builds a payload from `(namespace, records)` pairs.
    pub fn from_entries<N, L>(entries: impl IntoIterator<Item = (N, L)>) -> Self
    where
        N: Into<Namespace>,
        L: Into<ImplementorList>,
    {
        let implementors = entries
            .into_iter()
            .map(|(namespace, records)| -> (Namespace, ImplementorList) {
                (namespace.into(), records.into())
            })
            .collect::<ImplementorMap>();
        Self::new(implementors)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Parses a bare `{"namespace": ["record", ...]}` literal.
    pub fn from_json(text: &str) -> Result<Self, PayloadError> {
        let implementors = serde_json::from_str::<ImplementorMap>(text.trim())
            .map_err(|err| PayloadError::InvalidJson(err.to_string()))?;
        Ok(Self::new(implementors))
    }

    /// Parses a generated payload script.
    ///
    /// Accepts both the single object literal form
    /// (`var implementors = {...};`) and the per-namespace assignment form
    /// (`implementors["ns"] = [...];`). Assignments are applied after the
    /// literal, in file order.
    pub fn from_script(text: &str) -> Result<Self, PayloadError> {
        let prefix = LITERAL_PREFIX
            .find(text)
            .ok_or(PayloadError::MissingLiteral)?;
        let mut implementors = read_first_value::<ImplementorMap>(&text[prefix.end()..])?;

        for caps in ASSIGNMENT_PREFIX.captures_iter(text) {
            let (Some(key), Some(whole)) = (caps.get(1), caps.get(0)) else {
                continue;
            };
            let namespace = serde_json::from_str::<String>(key.as_str())
                .map_err(|err| PayloadError::InvalidJson(err.to_string()))?;
            let records = read_first_value::<ImplementorList>(&text[whole.end()..])?;
            implementors.insert(Namespace::new(namespace), records);
        }

        Ok(Self::new(implementors))
    }

    /// Renders the canonical register-or-stash script for this payload.
    pub fn to_script(&self) -> Result<String, PayloadError> {
        let literal = serde_json::to_string(&self.implementors)
            .map_err(|err| PayloadError::Render(err.to_string()))?;
        Ok(format!(
            "(function() {{var implementors = {literal};\
             if (window.{REGISTER_FN_NAME}) {{window.{REGISTER_FN_NAME}(implementors);}} \
             else {{window.{PENDING_SLOT_NAME} = implementors;}}}})()"
        ))
    }

    pub fn namespace_count(&self) -> usize {
        self.implementors.len()
    }

    pub fn record_count(&self) -> usize {
        self.implementors.values().map(Vec::len).sum()
    }

    /// Label used in log lines: the source when known, otherwise the id.
    pub fn label(&self) -> String {
        match &self.source {
            Some(source) => source.clone(),
            None => self.id.to_string(),
        }
    }
}

/// Reads exactly one JSON value from the start of `rest`, ignoring what follows.
fn read_first_value<T: DeserializeOwned>(rest: &str) -> Result<T, PayloadError> {
    match serde_json::Deserializer::from_str(rest).into_iter::<T>().next() {
        Some(Ok(value)) => Ok(value),
        Some(Err(err)) => Err(PayloadError::InvalidJson(err.to_string())),
        None => Err(PayloadError::MissingLiteral),
    }
}

/// Payload parsing and rendering errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// No `implementors` literal found in the script.
    MissingLiteral,
    /// The literal is not a valid namespace-to-records mapping.
    InvalidJson(String),
    /// The mapping could not be rendered as a script literal.
    Render(String),
}

impl Display for PayloadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingLiteral => write!(f, "payload script has no implementors literal"),
            Self::InvalidJson(err) => write!(f, "payload literal is invalid: {err}"),
            Self::Render(err) => write!(f, "payload literal could not be rendered: {err}"),
        }
    }
}

impl Error for PayloadError {}

#[cfg(test)]
mod tests {
    use super::{Payload, PayloadError};
    use crate::model::record::{ImplementorRecord, Namespace};

    #[test]
    fn from_json_keeps_record_order_and_duplicates() {
        let payload = Payload::from_json(r#"{"alpha": ["y", "x", "y"]}"#)
            .expect("json literal should parse");
        let records = &payload.implementors[&Namespace::from("alpha")];
        assert_eq!(
            records,
            &vec![
                ImplementorRecord::from("y"),
                ImplementorRecord::from("x"),
                ImplementorRecord::from("y"),
            ]
        );
    }

    #[test]
    fn from_json_rejects_non_mapping() {
        let err = Payload::from_json(r#"["alpha"]"#).expect_err("array must be rejected");
        assert!(matches!(err, PayloadError::InvalidJson(_)));
    }

    #[test]
    fn from_script_reads_object_literal_form() {
        let script = r#"(function() {var implementors = {"colstodian":["impl A","impl B"]};if (window.register_implementors) {window.register_implementors(implementors);} else {window.pending_implementors = implementors;}})()"#;
        let payload = Payload::from_script(script).expect("script should parse");
        assert_eq!(payload.namespace_count(), 1);
        assert_eq!(payload.record_count(), 2);
    }

    #[test]
    fn from_script_reads_per_namespace_assignments() {
        let script = "(function() {var implementors = {};\n\
            implementors[\"colstodian\"] = [\"impl <a>A</a>\"];\n\
            implementors[\"glam\"] = [\"impl B\",\"impl C\"];\n\
            if (window.register_implementors) {window.register_implementors(implementors);} \
            else {window.pending_implementors = implementors;}\n})()";
        let payload = Payload::from_script(script).expect("script should parse");
        assert_eq!(payload.namespace_count(), 2);
        assert_eq!(payload.implementors[&Namespace::from("glam")].len(), 2);
    }

    #[test]
    fn from_script_without_literal_fails() {
        let err = Payload::from_script("window.something = 1;")
            .expect_err("script without literal must fail");
        assert_eq!(err, PayloadError::MissingLiteral);
    }

    #[test]
    fn to_script_output_parses_back_to_same_mapping() {
        let payload = Payload::from_entries([("alpha", vec![ImplementorRecord::from("x")])]);
        let script = payload.to_script().expect("script should render");
        assert!(script.contains("window.register_implementors(implementors)"));
        assert!(script.contains("window.pending_implementors = implementors"));

        let parsed = Payload::from_script(&script).expect("rendered script should parse");
        assert_eq!(parsed.implementors, payload.implementors);
    }

    #[test]
    fn to_script_round_trips_records_that_look_like_script_code() {
        let tricky = "impl Foo for Bar {};if (x) {}\nimplementors[\"x\"] = [];";
        let payload = Payload::from_entries([
            ("alpha", vec![ImplementorRecord::from(tricky)]),
            ("beta", vec![ImplementorRecord::from("] ; }")]),
        ]);
        let script = payload.to_script().expect("script should render");

        let parsed = Payload::from_script(&script).expect("rendered script should parse");
        assert_eq!(parsed.implementors, payload.implementors);
        assert_eq!(
            parsed.implementors[&Namespace::from("alpha")][0].markup(),
            tricky
        );
    }

    #[test]
    fn from_script_rejects_truncated_literal() {
        let err = Payload::from_script(r#"var implementors = {"alpha": ["x""#)
            .expect_err("truncated literal must fail");
        assert!(matches!(err, PayloadError::InvalidJson(_)));
    }

    #[test]
    fn render_errors_read_differently_from_parse_errors() {
        let render = PayloadError::Render("key must be a string".to_string());
        let parse = PayloadError::InvalidJson("key must be a string".to_string());
        assert!(render.to_string().contains("could not be rendered"));
        assert_ne!(render.to_string(), parse.to_string());
    }

    #[test]
    fn label_prefers_source() {
        let payload = Payload::from_entries([("alpha", Vec::<ImplementorRecord>::new())]);
        assert_eq!(payload.label(), payload.id.to_string());
        let payload = payload.with_source("trait.ColorEncoding.js");
        assert_eq!(payload.label(), "trait.ColorEncoding.js");
    }
}
