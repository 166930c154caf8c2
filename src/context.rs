//! The context owns every table of a running application.
//!
//! A [`Context`] is explicitly constructed, explicitly passed and explicitly torn down
//! through [`Context::purge`].
//!
//! # Locking
//! The attribute registry, the object store and the system memberships
//! are guarded by a single lock.
//! Every object mutation holds that lock for the mutation and the membership sync it triggers,
//! so sync passes of different mutations never interleave.
//! No user callback is invoked while the lock is held.
//!
//! Operations that replace systems or states take `&mut self`,
//! so they cannot be called from within a frame.
//! Everything else takes `&self` and may be called from any thread,
//! including from systems, states and listeners.
//!
//! Handles returned by [`Context::attribute`] and [`Context::window`] hold their table lock.
//! Drop a handle before calling any other method of the context.

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};

use crate::attribute::{AttrTypeId, Attribute, Registry};
use crate::error::{Error, Result, Table as ErrorTable};
use crate::event::{self, Listener, ObjectEvent, ObjectEventId};
use crate::object::{ObjectId, Store};
use crate::resource::{self, Resource, ResourceId};
use crate::state::{self, State, StateTypeId};
use crate::system::{Frame, Memberships, System, SystemTypeId};
use crate::tracer::{SkipReason, Tracer};
use crate::window::{self, InputEvent, Window, WindowId};
use crate::Mask;

mod builder;
pub use builder::Builder;


/// A bundle encapsulates the attributes, systems and states of a specific feature.
/// This can be used by library crates to expose their features as a single API.
pub trait Bundle {
    /// Registers the attribute types, systems and states used by this bundle.
    fn register(&self, _builder: &mut Builder) {}

    /// Populates the context with objects, resources and windows.
    fn populate(&self, _ctx: &mut Context) -> Result<()> { Ok(()) }
}

/// Creates a context from bundles.
///
/// The builtin attribute types and systems are registered first
/// if the `builtin` feature is enabled.
pub fn new<'t>(bundles: impl IntoIterator<Item = &'t dyn Bundle> + Copy) -> Result<Context> {
    let mut builder = Builder::new();

    for bundle in bundles {
        bundle.register(&mut builder);
    }

    let mut ctx = builder.build()?;

    for bundle in bundles {
        bundle.populate(&mut ctx)?;
    }

    Ok(ctx)
}

/// The tables guarded by the object lock.
#[derive(Default)]
struct Inner {
    registry:    Registry,
    objects:     Store,
    memberships: Memberships,
}

/// The facade over all engine tables.
#[derive(Default)]
pub struct Context {
    /// Attribute factories, objects and system memberships.
    inner:         Mutex<Inner>,
    /// System behaviours, only locked while a frame runs systems.
    systems:       Mutex<IndexMap<SystemTypeId, Box<dyn System>>>,
    states:        Mutex<state::Table>,
    /// The state switch requested through [`Context::request_state`].
    pending_state: Mutex<Option<StateTypeId>>,
    resources:     Mutex<resource::Table>,
    windows:       Mutex<window::Table>,
    listeners:     Mutex<event::Table>,
}

static_assertions::assert_impl_all!(Context: Send, Sync);

/// Objects and attributes.
impl Context {
    /// Binds `attr` to the concrete attribute type `T`.
    ///
    /// An existing binding is replaced.
    /// Attributes already attached to objects are not affected.
    pub fn register_attribute<T: Attribute>(&self, attr: AttrTypeId) {
        self.inner.lock().registry.register::<T>(attr);
    }

    /// Whether `attr` has been bound to a concrete type.
    pub fn has_attribute_type(&self, attr: AttrTypeId) -> bool {
        self.inner.lock().registry.contains(attr)
    }

    /// Creates an object without attributes.
    ///
    /// Systems with an empty signature include the object immediately.
    ///
    /// # Panics
    /// Panics if the object identifier space is exhausted.
    pub fn create_object(&self) -> ObjectId {
        let mut inner = self.inner.lock();
        let inner = &mut *inner;

        let id = inner.objects.create();
        inner.memberships.sync(id, Mask::empty());
        log::debug!("Created object {id}");
        id
    }

    /// Creates an object with a default-constructed attribute for every bit in `mask`.
    ///
    /// Memberships are synchronized once with the final mask.
    /// If any attribute type is not registered,
    /// no object is created and no identifier is consumed.
    ///
    /// # Panics
    /// Panics if the object identifier space is exhausted.
    pub fn create_object_with(&self, mask: Mask) -> Result<ObjectId> {
        let mut inner = self.inner.lock();
        let inner = &mut *inner;

        let attrs = mask
            .iter()
            .map(|attr| Ok((attr, inner.registry.construct(attr)?)))
            .collect::<Result<Vec<_>>>()?;
        let (id, mask) = inner.objects.create_with(attrs);
        inner.memberships.sync(id, mask);
        log::debug!("Created object {id} with attributes {mask:?}");
        Ok(id)
    }

    /// Attaches a default-constructed attribute of type `attr` to an object.
    ///
    /// An existing attribute of the same type is replaced by a fresh instance.
    pub fn add_attribute(&self, id: ObjectId, attr: AttrTypeId) -> Result<()> {
        let mut inner = self.inner.lock();
        let inner = &mut *inner;

        if !inner.objects.contains(id) {
            return Err(Error::ObjectNotFound(id));
        }
        let value = inner.registry.construct(attr)?;
        let mask = inner.objects.insert_attribute(id, attr, value)?;
        inner.memberships.sync(id, mask);
        log::debug!("Added attribute {attr} to object {id}");
        Ok(())
    }

    /// Detaches and drops an attribute of an object.
    pub fn remove_attribute(&self, id: ObjectId, attr: AttrTypeId) -> Result<()> {
        let mut inner = self.inner.lock();
        let inner = &mut *inner;

        let mask = inner.objects.remove_attribute(id, attr)?;
        inner.memberships.sync(id, mask);
        log::debug!("Removed attribute {attr} from object {id}");
        Ok(())
    }

    /// Whether the object exists and owns an attribute of type `attr`.
    pub fn has_attribute(&self, id: ObjectId, attr: AttrTypeId) -> bool {
        self.inner.lock().objects.has_attribute(id, attr)
    }

    /// Locks the object table and returns a handle to an attribute of an object.
    ///
    /// The attribute is mutated in place through the handle.
    pub fn attribute<T: Attribute>(
        &self,
        id: ObjectId,
        attr: AttrTypeId,
    ) -> Result<MappedMutexGuard<'_, T>> {
        map_guard(self.inner.lock(), |inner| {
            inner.objects.attribute_mut(id, attr)?.downcast_mut::<T>(attr)
        })
    }

    /// Returns the attribute mask of an object.
    pub fn mask(&self, id: ObjectId) -> Result<Mask> { self.inner.lock().objects.mask(id) }

    /// Whether the object exists.
    pub fn has_object(&self, id: ObjectId) -> bool { self.inner.lock().objects.contains(id) }

    /// The number of live objects.
    pub fn object_count(&self) -> usize { self.inner.lock().objects.len() }

    /// Removes an object from every system and drops all its attributes.
    pub fn remove_object(&self, id: ObjectId) -> Result<()> {
        let mut inner = self.inner.lock();
        let inner = &mut *inner;

        inner.objects.remove(id)?;
        inner.memberships.remove_object(id);
        log::debug!("Removed object {id}");
        Ok(())
    }

    /// Removes all objects, empties every system membership
    /// and restarts object identifiers from zero.
    pub fn purge_objects(&self) {
        let mut inner = self.inner.lock();
        let inner = &mut *inner;

        inner.objects.purge();
        inner.memberships.purge_objects();
        log::info!("Purged all objects");
    }
}

/// Systems.
impl Context {
    /// Installs a system and seeds its membership from all existing objects.
    ///
    /// Registering an id again replaces the system in place,
    /// keeping its position in the update order and its enabled flag.
    pub fn register_system(&mut self, id: SystemTypeId, system: Box<dyn System>) {
        let signature = system.signature();
        let inner = self.inner.get_mut();
        inner.memberships.register(id, signature, inner.objects.iter());
        log::info!(
            "Registered system {id} ({}) with signature {signature:?}",
            system.debug_name()
        );

        self.systems.get_mut().insert(id, system);
    }

    /// Removes a system and its membership.
    pub fn remove_system(&mut self, id: SystemTypeId) -> Result<()> {
        self.inner.get_mut().memberships.remove(id).ok_or_else(|| system_not_registered(id))?;
        self.systems.get_mut().shift_remove(&id);
        log::info!("Removed system {id}");
        Ok(())
    }

    /// Whether a system is registered under `id`.
    pub fn has_system(&self, id: SystemTypeId) -> bool {
        self.inner.lock().memberships.get(id).is_some()
    }

    /// Lets the system run during updates.
    pub fn enable_system(&self, id: SystemTypeId) -> Result<()> {
        self.set_system_enabled(id, true)
    }

    /// Stops the system from running during updates.
    ///
    /// The membership of a disabled system is still maintained.
    pub fn disable_system(&self, id: SystemTypeId) -> Result<()> {
        self.set_system_enabled(id, false)
    }

    fn set_system_enabled(&self, id: SystemTypeId, enabled: bool) -> Result<()> {
        let mut inner = self.inner.lock();
        let membership = inner.memberships.get_mut(id).ok_or_else(|| system_not_registered(id))?;
        membership.set_enabled(enabled);
        log::info!("System {id} is {}", if enabled { "enabled" } else { "disabled" });
        Ok(())
    }

    /// Whether the system runs during updates.
    pub fn is_system_enabled(&self, id: SystemTypeId) -> Result<bool> {
        let inner = self.inner.lock();
        let membership = inner.memberships.get(id).ok_or_else(|| system_not_registered(id))?;
        Ok(membership.is_enabled())
    }

    /// Copies the object-set of a system, in increasing id order.
    pub fn system_objects(&self, id: SystemTypeId) -> Result<Vec<ObjectId>> {
        let inner = self.inner.lock();
        let membership = inner.memberships.get(id).ok_or_else(|| system_not_registered(id))?;
        Ok(membership.objects().collect())
    }

    /// Removes all systems and memberships.
    pub fn purge_systems(&mut self) {
        self.inner.get_mut().memberships.clear();
        self.systems.get_mut().clear();
        log::info!("Purged all systems");
    }
}

/// States.
impl Context {
    /// Registers a state.
    ///
    /// The first registered state becomes current and is activated.
    pub fn add_state(&mut self, id: StateTypeId, state: Box<dyn State>) -> Result<()> {
        let first = self.states.get_mut().add(id, state)?;
        if first {
            self.apply_switch(id)?;
        }
        Ok(())
    }

    /// Deactivates the current state and activates the state `id` immediately.
    pub fn switch_to_state(&mut self, id: StateTypeId) -> Result<()> { self.apply_switch(id) }

    /// Requests a switch to the state `id` at the next [`update`](Self::update).
    ///
    /// This is the way to switch states from within state callbacks.
    /// A later request replaces an earlier one in the same frame.
    pub fn request_state(&self, id: StateTypeId) -> Result<()> {
        if !self.states.lock().contains(id) {
            return Err(state::not_registered(id));
        }
        log::debug!("Requested switch to state {id}");
        *self.pending_state.lock() = Some(id);
        Ok(())
    }

    /// Unregisters a state, deactivating it if it is current.
    pub fn remove_state(&mut self, id: StateTypeId) -> Result<()> {
        let removed = self.states.get_mut().remove(id)?;
        let pending = self.pending_state.get_mut();
        if *pending == Some(id) {
            *pending = None;
        }
        if let Some(state) = removed {
            state.lock().deactivate(self)?;
        }
        Ok(())
    }

    /// Whether a state is registered under `id`.
    pub fn has_state(&self, id: StateTypeId) -> bool { self.states.lock().contains(id) }

    /// The current state, if any.
    pub fn current_state(&self) -> Option<StateTypeId> { self.states.lock().current() }

    /// Removes all states without deactivating them.
    pub fn purge_states(&mut self) {
        self.states.get_mut().purge();
        *self.pending_state.get_mut() = None;
        log::info!("Purged all states");
    }

    fn apply_switch(&self, id: StateTypeId) -> Result<()> {
        let switch = self.states.lock().switch_to(id)?;
        if let Some((from, state)) = switch.from {
            log::debug!("Deactivating state {from}");
            state.lock().deactivate(self)?;
        }
        let mut state = switch.to.lock();
        state.activate(self)
    }
}

/// Resources.
impl Context {
    /// Registers a resource to be loaded from `path` later.
    ///
    /// `kind` is an application-defined tag, e.g. texture or font.
    ///
    /// # Panics
    /// Panics if the resource identifier space is exhausted.
    pub fn register_resource(&self, kind: u32, path: Option<PathBuf>) -> ResourceId {
        self.resources.lock().register(kind, path)
    }

    /// Returns the loaded resource, loading it first if necessary.
    ///
    /// The loader runs without holding the resource table,
    /// so it may access the context.
    pub fn load_resource<R: Resource>(&self, id: ResourceId) -> Result<Arc<R>> {
        let lookup = self.resources.lock().lookup::<R>(id)?;
        let path = match lookup {
            Ok(loaded) => return Ok(loaded),
            Err(path) => path,
        };

        log::info!("Loading resource {id} from {path:?}");
        let value = Arc::new(R::load(path.as_deref())?);
        self.resources.lock().insert_loaded(id, value)
    }

    /// The application-defined kind of a resource.
    pub fn resource_kind(&self, id: ResourceId) -> Result<u32> { self.resources.lock().kind(id) }

    /// Drops the loaded value of a resource, keeping it registered.
    pub fn unload_resource(&self, id: ResourceId) -> Result<()> { self.resources.lock().unload(id) }

    /// Unregisters a resource, unloading it if it is loaded.
    pub fn remove_resource(&self, id: ResourceId) -> Result<()> { self.resources.lock().remove(id) }

    /// Whether the resource is registered.
    pub fn has_resource(&self, id: ResourceId) -> bool { self.resources.lock().contains(id) }

    /// Whether the resource is loaded.
    pub fn has_loaded_resource(&self, id: ResourceId) -> bool {
        self.resources.lock().is_loaded(id)
    }

    /// Unregisters all resources and restarts resource identifiers from zero.
    pub fn purge_resources(&self) {
        self.resources.lock().purge();
        log::info!("Purged all resources");
    }
}

/// Windows.
impl Context {
    /// Takes ownership of a window, which is polled at the start of every frame.
    ///
    /// # Panics
    /// Panics if the window identifier space is exhausted.
    pub fn create_window(&self, window: Box<dyn Window>) -> WindowId {
        let id = self.windows.lock().insert(window);
        log::info!("Created window {id}");
        id
    }

    /// Locks the window table and returns a handle to a window.
    pub fn window(&self, id: WindowId) -> Result<MappedMutexGuard<'_, dyn Window + 'static>> {
        map_guard(self.windows.lock(), |windows| windows.get_mut(id))
    }

    /// Whether the window exists.
    pub fn has_window(&self, id: WindowId) -> bool { self.windows.lock().contains(id) }

    /// Drops a window.
    pub fn delete_window(&self, id: WindowId) -> Result<()> {
        self.windows.lock().remove(id)?;
        log::info!("Deleted window {id}");
        Ok(())
    }

    /// Whether any window has been asked to close.
    pub fn should_close(&self) -> bool { self.windows.lock().any_should_close() }

    /// Drops all windows and restarts window identifiers from zero.
    pub fn purge_windows(&self) {
        self.windows.lock().purge();
        log::info!("Purged all windows");
    }
}

/// Object events.
impl Context {
    /// Registers a listener for events of `kind`.
    pub fn add_listener(&self, kind: ObjectEventId, listener: Arc<dyn Listener>) {
        self.listeners.lock().add(kind, listener);
    }

    /// Notifies every enabled listener of `event.kind` in registration order.
    ///
    /// Listeners registered during the dispatch are not notified of this event.
    pub fn dispatch(&self, event: ObjectEvent) {
        let listeners = self.listeners.lock().snapshot(event.kind);
        for listener in listeners {
            if listener.is_enabled() {
                listener.notify(self, &event);
            }
        }
    }

    /// Removes all listeners.
    pub fn purge_listeners(&self) {
        self.listeners.lock().purge();
        log::info!("Purged all listeners");
    }
}

impl Context {
    /// Advances the application by one frame.
    ///
    /// The frame polls every window,
    /// passes each polled event to every state,
    /// updates every state,
    /// applies the state switch requested in this frame,
    /// and finally runs every enabled system with a non-empty membership in registration order.
    ///
    /// The first error returned by a state or system aborts the frame.
    /// Must not be called from within a frame.
    pub fn update(&self, dt: f32, tracer: &impl Tracer) -> Result<()> {
        let cycle = tracer.start_cycle();
        let result = self.run_frame(dt, tracer);
        tracer.end_cycle(cycle);
        result
    }

    fn run_frame(&self, dt: f32, tracer: &impl Tracer) -> Result<()> {
        let mut input = Vec::new();
        self.windows.lock().poll_all(&mut input);

        let states = self.states.lock().handles();
        for event in &input {
            for state in &states {
                state.lock().handle_input(self, event)?;
            }
        }
        for state in &states {
            state.lock().update(self, dt)?;
        }

        let pending = self.pending_state.lock().take();
        if let Some(next) = pending {
            let from = self.current_state();
            self.apply_switch(next)?;
            tracer.switch_state(from, next);
        }

        self.run_systems(dt, &input, tracer)
    }

    fn run_systems(&self, dt: f32, input: &[InputEvent], tracer: &impl Tracer) -> Result<()> {
        let mut systems = self.systems.lock();
        for (&id, system) in systems.iter_mut() {
            let debug_name = system.debug_name();

            let snapshot = {
                let inner = self.inner.lock();
                let snapshot = match inner.memberships.get(id) {
                    Some(membership) if !membership.is_enabled() => Err(SkipReason::Disabled),
                    Some(membership) if membership.is_empty() => Err(SkipReason::Empty),
                    Some(membership) => Ok(membership.objects().collect::<Vec<_>>()),
                    None => continue,
                };
                snapshot
            };
            let objects = match snapshot {
                Ok(objects) => objects,
                Err(reason) => {
                    tracer.skip_system(id, &debug_name, reason);
                    continue;
                }
            };

            let run = tracer.start_run_system(id, &debug_name, objects.len());
            let result = system.update(&Frame::new(self, dt, &objects, input));
            tracer.end_run_system(run, id, &debug_name);

            if let Err(err) = result {
                log::error!("System {id} ({debug_name}) failed: {err}");
                return Err(err);
            }
        }
        Ok(())
    }

    /// Clears every table and restarts all identifiers from zero.
    pub fn purge(&mut self) {
        let inner = self.inner.get_mut();
        inner.registry.clear();
        inner.objects.purge();
        inner.memberships.clear();

        self.systems.get_mut().clear();
        self.states.get_mut().purge();
        *self.pending_state.get_mut() = None;
        self.resources.get_mut().purge();
        self.windows.get_mut().purge();
        self.listeners.get_mut().purge();

        log::info!("Purged context");
    }
}

/// Maps a guard to a part of the guarded value, or returns the error from the projection.
fn map_guard<'t, T, U: ?Sized>(
    guard: MutexGuard<'t, T>,
    project: impl FnOnce(&mut T) -> Result<&mut U>,
) -> Result<MappedMutexGuard<'t, U>> {
    let mut error = None;
    MutexGuard::try_map(guard, |value| project(value).map_err(|err| error = Some(err)).ok())
        .map_err(|_| match error {
            Some(err) => err,
            None => unreachable!("projection failed without an error"),
        })
}

fn system_not_registered(id: SystemTypeId) -> Error {
    Error::NotRegistered { table: ErrorTable::System, id: id.get() }
}
