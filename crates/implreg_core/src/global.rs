//! Process-wide registry singleton.
//!
//! # Responsibility
//! - Own the one registry every payload in the process publishes to.
//! - Serialize access so check-then-branch in publish is atomic.
//!
//! # Invariants
//! - The registry is constructed once; a conflicting config is rejected.
//! - At most one writer holds the registry at a time.
//! - Lock poisoning surfaces as `RegistryError::Poisoned`, never a panic.

use crate::config::RegistryConfig;
use crate::model::payload::Payload;
use crate::registry::handshake::{Delivery, ImplementorRegistry, RegistryError};
use crate::registry::subscriber::Subscriber;
use log::info;
use once_cell::sync::OnceCell;
use std::sync::{Mutex, MutexGuard};

static GLOBAL_REGISTRY: OnceCell<GlobalRegistry> = OnceCell::new();

struct GlobalRegistry {
    config: RegistryConfig,
    registry: Mutex<ImplementorRegistry>,
}

/// Point-in-time view of the singleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStatus {
    pub config: RegistryConfig,
    pub attached: bool,
    pub pending: usize,
}

/// Initializes the process-wide registry.
///
/// # Invariants
/// - Calling again with the same `config` is idempotent.
/// - Calling with a different `config` is rejected.
///
/// # Errors
/// - Returns `InvalidConfig` when `config` fails validation.
/// - Returns `ConfigConflict` when already initialized differently.
pub fn init_registry(config: RegistryConfig) -> Result<(), RegistryError> {
    config.validate().map_err(RegistryError::InvalidConfig)?;
    let state = GLOBAL_REGISTRY.get_or_init(|| {
        info!(
            "event=registry_init module=global status=ok pending_capacity={:?}",
            config.pending_capacity
        );
        GlobalRegistry {
            config,
            registry: Mutex::new(ImplementorRegistry::new(config)),
        }
    });
    if state.config != config {
        return Err(RegistryError::ConfigConflict {
            active: state.config,
            requested: config,
        });
    }
    Ok(())
}

/// Publishes one payload to the process-wide registry.
///
/// Initializes the registry with the default config when nothing has yet.
pub fn register_implementors(payload: Payload) -> Result<Delivery, RegistryError> {
    lock_registry()?.publish(payload)
}

/// Attaches the viewer's subscriber and forwards parked payloads to it.
pub fn attach_viewer(subscriber: impl Subscriber + 'static) -> Result<usize, RegistryError> {
    lock_registry()?.attach(subscriber)
}

/// Returns the singleton's status, or `None` before initialization.
pub fn registry_status() -> Result<Option<RegistryStatus>, RegistryError> {
    let Some(state) = GLOBAL_REGISTRY.get() else {
        return Ok(None);
    };
    let registry = state.registry.lock().map_err(|_| RegistryError::Poisoned)?;
    Ok(Some(RegistryStatus {
        config: state.config,
        attached: registry.is_attached(),
        pending: registry.pending_len(),
    }))
}

fn lock_registry() -> Result<MutexGuard<'static, ImplementorRegistry>, RegistryError> {
    let state = GLOBAL_REGISTRY.get_or_init(|| GlobalRegistry {
        config: RegistryConfig::default(),
        registry: Mutex::new(ImplementorRegistry::default()),
    });
    state.registry.lock().map_err(|_| RegistryError::Poisoned)
}
