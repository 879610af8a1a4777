//! Registry configuration.

use serde::{Deserialize, Serialize};

/// Registry construction options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Maximum number of payloads parked before a subscriber attaches.
    ///
    /// `None` keeps the pending queue unbounded.
    pub pending_capacity: Option<usize>,
}

impl RegistryConfig {
    pub fn bounded(capacity: usize) -> Self {
        Self {
            pending_capacity: Some(capacity),
        }
    }

    /// Validates option invariants.
    ///
    /// # Errors
    /// - Returns an error when `pending_capacity` is `Some(0)`.
    pub fn validate(&self) -> Result<(), String> {
        if self.pending_capacity == Some(0) {
            return Err("pending_capacity must be at least 1 when set".to_string());
        }
        Ok(())
    }

    /// Parses and validates a JSON config document.
    ///
    /// Missing fields fall back to defaults.
    pub fn from_json_str(text: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(text)
            .map_err(|err| format!("invalid registry config: {err}"))?;
        config.validate()?;
        Ok(config)
    }
}
