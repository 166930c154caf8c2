//! Object events notify interested listeners about something that happened to an object,
//! e.g. two objects colliding.
//!
//! Listeners are notified synchronously, in registration order,
//! after the listener list has been copied out of the context.
//! A listener may therefore register further listeners or dispatch further events.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::object::ObjectId;
use crate::Context;

/// Identifies a kind of object event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectEventId(u32);

impl ObjectEventId {
    /// Wraps a raw identifier.
    pub const fn new(id: u32) -> Self { Self(id) }

    /// Returns the raw identifier.
    pub fn get(self) -> u32 { self.0 }
}

impl fmt::Display for ObjectEventId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { self.0.fmt(f) }
}

/// Dispatched by the [`Collider`](crate::system::Collider) system for each overlapping pair.
pub const COLLISION: ObjectEventId = ObjectEventId::new(0);

/// An event concerning an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectEvent {
    /// The kind of event.
    pub kind:   ObjectEventId,
    /// The object the event is about.
    pub object: ObjectId,
    /// The other object involved, if any.
    pub other:  Option<ObjectId>,
}

/// Receives object events of the kinds it is registered for.
pub trait Listener: Send + Sync + 'static {
    /// Disabled listeners are skipped during dispatch.
    fn is_enabled(&self) -> bool { true }

    /// Handles an event.
    fn notify(&self, ctx: &Context, event: &ObjectEvent);
}

/// The listener table of a context.
#[derive(Default)]
pub(crate) struct Table {
    listeners: IndexMap<ObjectEventId, Vec<Arc<dyn Listener>>>,
}

impl Table {
    pub(crate) fn add(&mut self, kind: ObjectEventId, listener: Arc<dyn Listener>) {
        self.listeners.entry(kind).or_default().push(listener);
    }

    /// Copies the listeners of `kind` so that they can be notified without holding the table.
    pub(crate) fn snapshot(&self, kind: ObjectEventId) -> Vec<Arc<dyn Listener>> {
        self.listeners.get(&kind).cloned().unwrap_or_default()
    }

    pub(crate) fn purge(&mut self) { self.listeners.clear(); }
}
