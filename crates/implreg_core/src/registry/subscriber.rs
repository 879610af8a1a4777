//! Subscriber contract: the viewer's registration entry point.

use crate::model::payload::Payload;

/// Receives payloads handed off by the registry.
///
/// Called synchronously, once per payload, with the payload unmodified.
/// Panics raised here are not caught by the registry.
pub trait Subscriber: Send {
    fn receive(&mut self, payload: Payload);
}

impl<F> Subscriber for F
where
    F: FnMut(Payload) + Send,
{
    fn receive(&mut self, payload: Payload) {
        self(payload)
    }
}
