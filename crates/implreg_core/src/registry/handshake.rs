//! Register-or-park handshake between payloads and the viewer.

use crate::config::RegistryConfig;
use crate::model::payload::Payload;
use crate::model::record::ImplementorMap;
use crate::registry::pending::PendingQueue;
use crate::registry::subscriber::Subscriber;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Outcome of one publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the attached subscriber.
    Delivered,
    /// Parked in the pending queue.
    Parked,
}

/// Registry handshake errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    AlreadyAttached,
    PendingFull { capacity: usize },
    InvalidConfig(String),
    ConfigConflict {
        active: RegistryConfig,
        requested: RegistryConfig,
    },
    Poisoned,
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyAttached => write!(f, "a subscriber is already attached"),
            Self::PendingFull { capacity } => {
                write!(f, "pending queue is full ({capacity} payloads)")
            }
            Self::InvalidConfig(reason) => write!(f, "invalid registry config: {reason}"),
            Self::ConfigConflict { active, requested } => write!(
                f,
                "registry already initialized with {active:?}; refusing to switch to {requested:?}"
            ),
            Self::Poisoned => write!(f, "registry lock poisoned by a panicking subscriber"),
        }
    }
}

impl Error for RegistryError {}

/// Delivers payloads to the viewer, or parks them until it attaches.
///
/// Two terminal states: no subscriber (payloads park) and attached
/// (payloads are delivered). Once attached the registry never detaches.
pub struct ImplementorRegistry {
    subscriber: Option<Box<dyn Subscriber>>,
    pending: PendingQueue,
}

impl std::fmt::Debug for ImplementorRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImplementorRegistry")
            .field("attached", &self.is_attached())
            .field("pending", &self.pending)
            .finish()
    }
}

impl Default for ImplementorRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl ImplementorRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            subscriber: None,
            pending: PendingQueue::new(config.pending_capacity),
        }
    }

    /// Creates a registry after validating `config`.
    pub fn try_new(config: RegistryConfig) -> Result<Self, RegistryError> {
        config.validate().map_err(RegistryError::InvalidConfig)?;
        Ok(Self::new(config))
    }

    /// Hands one payload to the subscriber, or parks it.
    ///
    /// The branch is decided once, on whether a subscriber is attached now.
    ///
    /// # Errors
    /// - Returns `PendingFull` when parking would exceed a configured bound.
    pub fn publish(&mut self, payload: Payload) -> Result<Delivery, RegistryError> {
        if let Some(subscriber) = self.subscriber.as_mut() {
            debug!(
                "event=payload_delivered module=registry payload={} namespaces={} records={}",
                payload.label(),
                payload.namespace_count(),
                payload.record_count()
            );
            subscriber.receive(payload);
            return Ok(Delivery::Delivered);
        }

        let label = payload.label();
        let namespaces = payload.namespace_count();
        if let Err(rejected) = self.pending.push(payload) {
            let capacity = self.pending.capacity().unwrap_or(self.pending.len());
            warn!(
                "event=payload_rejected module=registry status=pending_full payload={} capacity={}",
                rejected.label(),
                capacity
            );
            return Err(RegistryError::PendingFull { capacity });
        }
        debug!(
            "event=payload_parked module=registry payload={} namespaces={} pending={}",
            label,
            namespaces,
            self.pending.len()
        );
        Ok(Delivery::Parked)
    }

    /// Installs the subscriber and forwards every parked payload to it once.
    ///
    /// Returns how many parked payloads were forwarded.
    ///
    /// # Errors
    /// - Returns `AlreadyAttached` when a subscriber is already installed.
    pub fn attach(&mut self, subscriber: impl Subscriber + 'static) -> Result<usize, RegistryError> {
        if self.subscriber.is_some() {
            return Err(RegistryError::AlreadyAttached);
        }

        let mut subscriber: Box<dyn Subscriber> = Box::new(subscriber);
        let parked = self.pending.drain();
        let forwarded = parked.len();
        for payload in parked {
            subscriber.receive(payload);
        }
        self.subscriber = Some(subscriber);

        info!(
            "event=subscriber_attached module=registry status=ok drained={}",
            forwarded
        );
        if forwarded > 0 {
            debug!(
                "event=pending_drained module=registry payloads={}",
                forwarded
            );
        }
        Ok(forwarded)
    }

    pub fn is_attached(&self) -> bool {
        self.subscriber.is_some()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Parked payloads in arrival order.
    pub fn pending_payloads(&self) -> &[Payload] {
        self.pending.payloads()
    }

    /// Union of every parked mapping; does not drain.
    pub fn pending_snapshot(&self) -> ImplementorMap {
        self.pending.merged()
    }
}

#[cfg(test)]
mod tests {
    use super::{Delivery, ImplementorRegistry, RegistryError};
    use crate::config::RegistryConfig;
    use crate::model::payload::Payload;
    use crate::model::record::ImplementorRecord;
    use crate::registry::index::SharedIndex;

    fn payload(namespace: &str, values: &[&str]) -> Payload {
        Payload::from_entries([(
            namespace,
            values
                .iter()
                .map(|value| ImplementorRecord::from(*value))
                .collect::<Vec<_>>(),
        )])
    }

    #[test]
    fn parks_until_attached_then_delivers() {
        let mut registry = ImplementorRegistry::default();
        let delivery = registry
            .publish(payload("alpha", &["x"]))
            .expect("publish should park");
        assert_eq!(delivery, Delivery::Parked);
        assert!(!registry.is_attached());

        let index = SharedIndex::new();
        let forwarded = registry.attach(index.clone()).expect("attach should succeed");
        assert_eq!(forwarded, 1);
        assert_eq!(registry.pending_len(), 0);

        let delivery = registry
            .publish(payload("beta", &["y"]))
            .expect("publish should deliver");
        assert_eq!(delivery, Delivery::Delivered);
        assert_eq!(index.read().len(), 2);
    }

    #[test]
    fn second_attach_is_rejected() {
        let mut registry = ImplementorRegistry::default();
        registry
            .attach(SharedIndex::new())
            .expect("first attach should succeed");
        let err = registry
            .attach(SharedIndex::new())
            .expect_err("second attach must fail");
        assert_eq!(err, RegistryError::AlreadyAttached);
    }

    #[test]
    fn bounded_pending_rejects_overflow() {
        let mut registry =
            ImplementorRegistry::try_new(RegistryConfig::bounded(1)).expect("valid config");
        registry
            .publish(payload("alpha", &["x"]))
            .expect("first payload fits");
        let err = registry
            .publish(payload("beta", &["y"]))
            .expect_err("second payload must overflow");
        assert_eq!(err, RegistryError::PendingFull { capacity: 1 });
        assert_eq!(registry.pending_len(), 1);
    }

    #[test]
    fn bound_does_not_apply_once_attached() {
        let mut registry =
            ImplementorRegistry::try_new(RegistryConfig::bounded(1)).expect("valid config");
        registry.attach(SharedIndex::new()).expect("attach");
        for namespace in ["a", "b", "c"] {
            assert_eq!(
                registry.publish(payload(namespace, &["x"])).expect("deliver"),
                Delivery::Delivered
            );
        }
    }

    #[test]
    fn try_new_rejects_invalid_config() {
        let err = ImplementorRegistry::try_new(RegistryConfig::bounded(0))
            .expect_err("zero capacity must be rejected");
        assert!(matches!(err, RegistryError::InvalidConfig(_)));
    }
}
