//! Implementor registry for documentation viewers.
//! Payloads publish per-library implementor lists; the viewer collects them
//! whether it initializes before or after the payloads arrive.

pub mod config;
pub mod global;
pub mod logging;
pub mod model;
pub mod registry;
pub mod sample;

pub use config::RegistryConfig;
pub use global::{
    attach_viewer, init_registry, register_implementors, registry_status, RegistryStatus,
};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::payload::{Payload, PayloadError, PayloadId, PENDING_SLOT_NAME, REGISTER_FN_NAME};
pub use model::record::{ImplementorList, ImplementorMap, ImplementorRecord, Namespace};
pub use registry::handshake::{Delivery, ImplementorRegistry, RegistryError};
pub use registry::index::{ImplementorIndex, SharedIndex};
pub use registry::pending::PendingQueue;
pub use registry::subscriber::Subscriber;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
