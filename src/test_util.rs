#![allow(missing_docs)]

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::{Mutex, Once};

use crate::error::{Error, Result};
use crate::event::{Listener, ObjectEvent};
use crate::object::ObjectId;
use crate::render::{Backend, DrawCommand};
use crate::state::{State, StateTypeId};
use crate::system::{Frame, System, SystemTypeId};
use crate::tracer::{SkipReason, Tracer};
use crate::window::{InputEvent, Window};
use crate::{Context, Mask};

pub fn init() {
    static SET_LOGGER_ONCE: Once = Once::new();
    SET_LOGGER_ONCE.call_once(env_logger::init);
}

/// An event observed by [`RecordingTracer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    StartCycle,
    EndCycle,
    StartSystem(SystemTypeId, usize),
    EndSystem(SystemTypeId),
    SkipSystem(SystemTypeId, SkipReason),
    SwitchState(Option<StateTypeId>, StateTypeId),
}

/// Records tracer events in the order they are received.
#[derive(Default)]
pub struct RecordingTracer {
    events: Mutex<Vec<TraceEvent>>,
}

impl RecordingTracer {
    pub fn events(&self) -> Vec<TraceEvent> { self.events.lock().clone() }

    fn push(&self, event: TraceEvent) { self.events.lock().push(event); }
}

impl Tracer for RecordingTracer {
    type CycleContext = ();
    fn start_cycle(&self) { self.push(TraceEvent::StartCycle) }
    fn end_cycle(&self, (): ()) { self.push(TraceEvent::EndCycle) }

    type RunSystemContext = ();
    fn start_run_system(&self, system: SystemTypeId, _: &str, objects: usize) {
        self.push(TraceEvent::StartSystem(system, objects))
    }
    fn end_run_system(&self, (): (), system: SystemTypeId, _: &str) {
        self.push(TraceEvent::EndSystem(system))
    }

    fn skip_system(&self, system: SystemTypeId, _: &str, reason: SkipReason) {
        self.push(TraceEvent::SkipSystem(system, reason))
    }

    fn switch_state(&self, from: Option<StateTypeId>, to: StateTypeId) {
        self.push(TraceEvent::SwitchState(from, to))
    }
}

/// The objects a [`Probe`] saw in each frame.
pub type Sightings = Arc<Mutex<Vec<Vec<ObjectId>>>>;

/// A system that records the objects it is run with.
pub struct Probe {
    pub signature: Mask,
    pub seen:      Sightings,
    /// Fails the frame with this message when set.
    pub fail:      Option<&'static str>,
}

impl Probe {
    pub fn new(signature: Mask) -> (Self, Sightings) {
        let seen = Sightings::default();
        (Self { signature, seen: Arc::clone(&seen), fail: None }, seen)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ProbeError(pub &'static str);

impl System for Probe {
    fn signature(&self) -> Mask { self.signature }

    fn update(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.seen.lock().push(frame.objects().to_vec());
        match self.fail {
            Some(message) => Err(Error::other(ProbeError(message))),
            None => Ok(()),
        }
    }
}

/// A window that yields a fixed sequence of events.
#[derive(Default)]
pub struct ScriptedWindow {
    events: VecDeque<InputEvent>,
    closed: bool,
}

impl ScriptedWindow {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self { events: events.into_iter().collect(), closed: false }
    }
}

impl Window for ScriptedWindow {
    fn poll_event(&mut self) -> Option<InputEvent> {
        let event = self.events.pop_front()?;
        if event == InputEvent::Closed {
            self.closed = true;
        }
        Some(event)
    }

    fn should_close(&self) -> bool { self.closed }
}

/// A render backend that records the commands of each frame.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    frames: Arc<Mutex<Vec<Vec<DrawCommand>>>>,
}

impl RecordingBackend {
    pub fn frames(&self) -> Vec<Vec<DrawCommand>> { self.frames.lock().clone() }
}

impl Backend for RecordingBackend {
    fn begin(&mut self) { self.frames.lock().push(Vec::new()); }

    fn draw(&mut self, command: &DrawCommand) {
        if let Some(frame) = self.frames.lock().last_mut() {
            frame.push(command.clone());
        }
    }
}

/// A shared log of state callbacks, formatted as `"{name}.{callback}"`.
pub type Journal = Arc<Mutex<Vec<String>>>;

/// A state that records its callbacks.
pub struct RecordingState {
    pub name:    &'static str,
    pub journal: Journal,
    /// Requests a switch to this state when updated.
    pub request: Option<StateTypeId>,
}

impl RecordingState {
    pub fn new(name: &'static str, journal: &Journal) -> Self {
        Self { name, journal: Arc::clone(journal), request: None }
    }

    fn record(&self, callback: &str) { self.journal.lock().push(format!("{}.{callback}", self.name)); }
}

impl State for RecordingState {
    fn activate(&mut self, _: &Context) -> Result<()> {
        self.record("activate");
        Ok(())
    }

    fn deactivate(&mut self, _: &Context) -> Result<()> {
        self.record("deactivate");
        Ok(())
    }

    fn update(&mut self, ctx: &Context, _: f32) -> Result<()> {
        self.record("update");
        if let Some(next) = self.request.take() {
            ctx.request_state(next)?;
        }
        Ok(())
    }

    fn handle_input(&mut self, _: &Context, event: &InputEvent) -> Result<()> {
        self.record(&format!("input({event:?})"));
        Ok(())
    }
}

/// A listener that records the events it is notified of.
#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<ObjectEvent>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<ObjectEvent> { self.events.lock().clone() }
}

impl Listener for RecordingListener {
    fn notify(&self, _: &Context, event: &ObjectEvent) { self.events.lock().push(*event); }
}
