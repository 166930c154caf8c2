//! The windowing collaborator.
//!
//! A window is anything that produces [`InputEvent`]s.
//! The context polls every window at the start of each frame
//! and hands the events to states and systems.

use std::fmt;

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Identifies a window owned by the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(u32);

impl WindowId {
    /// Returns the raw identifier.
    pub fn get(self) -> u32 { self.0 }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { self.0.fmt(f) }
}

/// A keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// The up arrow.
    Up,
    /// The down arrow.
    Down,
    /// The left arrow.
    Left,
    /// The right arrow.
    Right,
    /// The enter key.
    Enter,
    /// The escape key.
    Escape,
    /// The space bar.
    Space,
    /// Any other key, identified by a backend-specific code.
    Other(u32),
}

/// A backend-independent input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A key was pressed.
    KeyPressed(Key),
    /// A key was released.
    KeyReleased(Key),
    /// The cursor moved to the given window coordinates.
    MouseMoved {
        /// Horizontal cursor position.
        x: f32,
        /// Vertical cursor position.
        y: f32,
    },
    /// The window was resized.
    Resized {
        /// The new width in pixels.
        width:  u32,
        /// The new height in pixels.
        height: u32,
    },
    /// The user requested to close the window.
    Closed,
}

/// A source of input events.
pub trait Window: Send + 'static {
    /// Returns the next pending event, if any.
    fn poll_event(&mut self) -> Option<InputEvent>;

    /// Whether the window has been asked to close.
    fn should_close(&self) -> bool { false }
}

/// The windows owned by a context.
#[derive(Default)]
pub(crate) struct Table {
    windows: IndexMap<WindowId, Box<dyn Window>>,
    next_id: u32,
}

impl Table {
    pub(crate) fn insert(&mut self, window: Box<dyn Window>) -> WindowId {
        let id = WindowId(self.next_id);
        self.next_id = self.next_id.checked_add(1).expect("integer overflow");
        self.windows.insert(id, window);
        id
    }

    pub(crate) fn get_mut(&mut self, id: WindowId) -> Result<&mut (dyn Window + 'static)> {
        match self.windows.get_mut(&id) {
            Some(window) => Ok(&mut **window),
            None => Err(Error::WindowNotFound(id)),
        }
    }

    pub(crate) fn remove(&mut self, id: WindowId) -> Result<()> {
        match self.windows.shift_remove(&id) {
            Some(_) => Ok(()),
            None => Err(Error::WindowNotFound(id)),
        }
    }

    /// Drains the pending events of every window, in window creation order.
    pub(crate) fn poll_all(&mut self, events: &mut Vec<InputEvent>) {
        for window in self.windows.values_mut() {
            while let Some(event) = window.poll_event() {
                events.push(event);
            }
        }
    }

    pub(crate) fn contains(&self, id: WindowId) -> bool { self.windows.contains_key(&id) }

    pub(crate) fn any_should_close(&self) -> bool {
        self.windows.values().any(|window| window.should_close())
    }

    pub(crate) fn purge(&mut self) {
        self.windows.clear();
        self.next_id = 0;
    }
}
