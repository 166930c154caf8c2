//! Application states such as menus, lobbies and gameplay.
//!
//! States are registered under a [`StateTypeId`].
//! Unlike attribute and system registration,
//! registering a state id twice is an error.
//! The first registered state becomes the current state and is activated immediately.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::error::{Error, Result, Table as ErrorTable};
use crate::window::InputEvent;
use crate::Context;

/// Identifies a registered state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateTypeId(u32);

impl StateTypeId {
    /// Wraps a raw identifier.
    pub const fn new(id: u32) -> Self { Self(id) }

    /// Returns the raw identifier.
    pub fn get(self) -> u32 { self.0 }
}

impl fmt::Display for StateTypeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { self.0.fmt(f) }
}

/// An application state driven by the context.
///
/// Callbacks receive a shared reference to the context.
/// They may mutate objects and attributes freely,
/// and switch states through [`Context::request_state`].
pub trait State: Send + 'static {
    /// Called when the state becomes current.
    fn activate(&mut self, _ctx: &Context) -> Result<()> { Ok(()) }

    /// Called when another state replaces this one as current.
    fn deactivate(&mut self, _ctx: &Context) -> Result<()> { Ok(()) }

    /// Called once per frame.
    fn update(&mut self, ctx: &Context, dt: f32) -> Result<()>;

    /// Called for every input event polled in a frame.
    fn handle_input(&mut self, _ctx: &Context, _event: &InputEvent) -> Result<()> { Ok(()) }
}

/// A shared handle to a registered state.
///
/// The context clones handles out of the table before invoking callbacks,
/// so callbacks never run while the table is locked.
pub(crate) type Handle = Arc<Mutex<Box<dyn State>>>;

/// The state table of a context.
#[derive(Default)]
pub(crate) struct Table {
    states:  IndexMap<StateTypeId, Handle>,
    current: Option<StateTypeId>,
}

/// The handles involved in a state switch.
pub(crate) struct Switch {
    pub(crate) from: Option<(StateTypeId, Handle)>,
    pub(crate) to:   Handle,
}

impl Table {
    /// Registers a state.
    ///
    /// Returns true if this is the first registered state.
    pub(crate) fn add(&mut self, id: StateTypeId, state: Box<dyn State>) -> Result<bool> {
        if self.states.contains_key(&id) {
            return Err(Error::DuplicateState(id));
        }
        let first = self.states.is_empty();
        self.states.insert(id, Arc::new(Mutex::new(state)));
        log::info!("Registered state type {id}");
        Ok(first)
    }

    /// Unregisters a state.
    ///
    /// Returns the handle of the removed state if it was current.
    pub(crate) fn remove(&mut self, id: StateTypeId) -> Result<Option<Handle>> {
        let state = self.states.shift_remove(&id).ok_or_else(|| not_registered(id))?;
        log::info!("Removed state type {id}");
        if self.current == Some(id) {
            self.current = None;
            return Ok(Some(state));
        }
        Ok(None)
    }

    /// Marks `id` as current and returns the handles to deactivate and activate.
    pub(crate) fn switch_to(&mut self, id: StateTypeId) -> Result<Switch> {
        let to = self.handle(id)?;
        let from = match self.current {
            Some(current) => self.states.get(&current).map(|state| (current, Arc::clone(state))),
            None => None,
        };
        log::info!("Switching from state {:?} to state {id}", self.current);
        self.current = Some(id);
        Ok(Switch { from, to })
    }

    pub(crate) fn handle(&self, id: StateTypeId) -> Result<Handle> {
        self.states.get(&id).map(Arc::clone).ok_or_else(|| not_registered(id))
    }

    pub(crate) fn contains(&self, id: StateTypeId) -> bool { self.states.contains_key(&id) }

    pub(crate) fn current(&self) -> Option<StateTypeId> { self.current }

    /// Copies the handles of all states in registration order.
    pub(crate) fn handles(&self) -> Vec<Handle> { self.states.values().cloned().collect() }

    pub(crate) fn purge(&mut self) {
        self.states.clear();
        self.current = None;
    }
}

pub(crate) fn not_registered(id: StateTypeId) -> Error {
    Error::NotRegistered { table: ErrorTable::State, id: id.get() }
}
