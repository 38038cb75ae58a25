//! Generic event bus capability of the session collaborator.
//!
//! The engine never touches a socket; it emits named events and registers
//! handlers against this trait. Registration returns an explicit
//! [`ListenerId`] so teardown is deterministic rather than implicit.

use serde_json::Value;

use super::SessionError;

/// Handle returned at registration time; pass it back to [`EventBus::off`]
/// to release the listener.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ListenerId(pub u64);

/// Handler invoked with the raw payload of a named event. Single-threaded
/// by design, like everything downstream of the transport.
pub type EventHandler = Box<dyn FnMut(&Value)>;

/// Outbound emit plus inbound subscription, the minimum transport surface
/// the engine consumes.
pub trait EventBus {
    /// Fire-and-forget send of a named event.
    fn emit(&mut self, event: &str, payload: Value) -> Result<(), SessionError>;

    /// Register a handler for a named event.
    fn on(&mut self, event: &str, handler: EventHandler) -> ListenerId;

    /// Release a listener. Returns whether it was registered.
    fn off(&mut self, id: ListenerId) -> bool;
}
