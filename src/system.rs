//! Systems are actions performed every frame on the objects they are interested in.
//!
//! A system declares a *signature*, the set of attribute types it requires.
//! The context keeps a [`Membership`] for every registered system,
//! which is the set of objects whose attribute mask contains the signature.
//! Memberships are maintained by the context, never by the system itself:
//! every attribute mutation re-evaluates the mutated object against every signature,
//! and registering a system scans all existing objects once.
//!
//! Systems run in registration order.
//! Disabled systems and systems with an empty membership are skipped.

use std::any;
use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;

use crate::error::Result;
use crate::object::ObjectId;
use crate::window::InputEvent;
use crate::{Context, Mask};

pub mod collider;
pub use collider::Collider;
pub mod controller;
pub use controller::Controller;
pub mod renderer;
pub use renderer::Renderer;
pub mod translator;
pub use translator::Translator;

#[cfg(test)]
mod tests;

/// Identifies a registered system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SystemTypeId(u32);

impl SystemTypeId {
    /// Wraps a raw identifier.
    pub const fn new(id: u32) -> Self { Self(id) }

    /// Returns the raw identifier.
    pub fn get(self) -> u32 { self.0 }
}

impl fmt::Display for SystemTypeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { self.0.fmt(f) }
}

/// The id of [`Translator`].
pub const TRANSLATOR: SystemTypeId = SystemTypeId::new(0);
/// The id of [`Renderer`].
pub const RENDERER: SystemTypeId = SystemTypeId::new(1);
/// The id of [`Controller`].
pub const CONTROLLER: SystemTypeId = SystemTypeId::new(2);
/// The id of [`Collider`].
pub const COLLIDER: SystemTypeId = SystemTypeId::new(3);

/// A per-frame action over the objects matching its signature.
pub trait System: Send + 'static {
    /// The debug name of the system.
    fn debug_name(&self) -> String { any::type_name::<Self>().to_string() }

    /// The attribute types an object must own to be processed by this system.
    ///
    /// This method is only called when the system is registered,
    /// but it should return a consistent value.
    fn signature(&self) -> Mask;

    /// Advances the system by one frame.
    ///
    /// [`Frame::objects`] holds the membership of this system
    /// as of the moment the system started running.
    fn update(&mut self, frame: &Frame<'_>) -> Result<()>;
}

/// The arguments passed to [`System::update`].
pub struct Frame<'t> {
    ctx:     &'t Context,
    dt:      f32,
    objects: &'t [ObjectId],
    input:   &'t [InputEvent],
}

impl<'t> Frame<'t> {
    pub(crate) fn new(
        ctx: &'t Context,
        dt: f32,
        objects: &'t [ObjectId],
        input: &'t [InputEvent],
    ) -> Self {
        Self { ctx, dt, objects, input }
    }

    /// The context running the frame.
    ///
    /// Attribute handles obtained from the context lock the object table;
    /// drop each handle before requesting the next one.
    pub fn ctx(&self) -> &'t Context { self.ctx }

    /// The time elapsed since the previous frame, in seconds.
    pub fn dt(&self) -> f32 { self.dt }

    /// The objects matching the system signature, in increasing id order.
    pub fn objects(&self) -> &'t [ObjectId] { self.objects }

    /// The input events polled from all windows in this frame.
    pub fn input(&self) -> &'t [InputEvent] { self.input }
}

/// Treats an object or attribute that disappeared during the frame as absent.
///
/// Systems see a snapshot of their object-set,
/// so an object removed by an earlier system or listener may still be listed.
pub(crate) fn skip_missing<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => {
            log::trace!("Skipping object: {err}");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// The object-set of a system, together with its signature and enabled flag.
#[derive(Debug, Clone)]
pub struct Membership {
    signature: Mask,
    objects:   BTreeSet<ObjectId>,
    enabled:   bool,
}

impl Membership {
    pub(crate) fn new(signature: Mask) -> Self {
        Self { signature, objects: BTreeSet::new(), enabled: true }
    }

    /// The signature of the system.
    pub fn signature(&self) -> Mask { self.signature }

    /// Whether an object with attribute mask `mask` belongs to this system.
    pub fn matches(&self, mask: Mask) -> bool { mask.contains(&self.signature) }

    /// Whether the object is in this system's object-set.
    pub fn has_object(&self, id: ObjectId) -> bool { self.objects.contains(&id) }

    /// Iterates over the object-set in increasing id order.
    ///
    /// Identifiers increase with creation, so this is also the order objects were created in.
    pub fn objects(&self) -> impl Iterator<Item = ObjectId> + '_ { self.objects.iter().copied() }

    /// The number of objects in the object-set.
    pub fn len(&self) -> usize { self.objects.len() }

    /// Whether the object-set is empty.
    pub fn is_empty(&self) -> bool { self.objects.is_empty() }

    /// Whether the system runs during updates.
    pub fn is_enabled(&self) -> bool { self.enabled }

    pub(crate) fn set_enabled(&mut self, enabled: bool) { self.enabled = enabled; }

    fn add_object(&mut self, id: ObjectId) -> bool { self.objects.insert(id) }

    fn remove_object(&mut self, id: ObjectId) -> bool { self.objects.remove(&id) }
}

/// The memberships of all registered systems, in registration order.
#[derive(Default)]
pub(crate) struct Memberships {
    map: IndexMap<SystemTypeId, Membership>,
}

impl Memberships {
    /// Installs the membership of a system and seeds it from the given objects.
    ///
    /// A previous membership of the same system is replaced in place,
    /// keeping its registration position and enabled flag.
    pub(crate) fn register(
        &mut self,
        system: SystemTypeId,
        signature: Mask,
        objects: impl IntoIterator<Item = (ObjectId, Mask)>,
    ) {
        let mut membership = Membership::new(signature);
        for (id, mask) in objects {
            if membership.matches(mask) {
                membership.add_object(id);
            }
        }
        log::debug!("System {system} starts with {} objects", membership.len());

        match self.map.get_mut(&system) {
            Some(prev) => {
                membership.enabled = prev.enabled;
                *prev = membership;
            }
            None => {
                self.map.insert(system, membership);
            }
        }
    }

    /// Reconciles every membership with the new mask of `id`.
    pub(crate) fn sync(&mut self, id: ObjectId, mask: Mask) {
        for (system, membership) in &mut self.map {
            let matches = membership.matches(mask);
            let present = membership.has_object(id);
            if matches && !present {
                membership.add_object(id);
                log::trace!("Object {id} joined system {system}");
            } else if !matches && present {
                membership.remove_object(id);
                log::trace!("Object {id} left system {system}");
            }
        }
    }

    /// Removes `id` from every membership regardless of signature.
    pub(crate) fn remove_object(&mut self, id: ObjectId) {
        for membership in self.map.values_mut() {
            membership.remove_object(id);
        }
    }

    /// Empties every membership.
    pub(crate) fn purge_objects(&mut self) {
        for membership in self.map.values_mut() {
            membership.objects.clear();
        }
    }

    pub(crate) fn remove(&mut self, system: SystemTypeId) -> Option<Membership> {
        self.map.shift_remove(&system)
    }

    pub(crate) fn get(&self, system: SystemTypeId) -> Option<&Membership> { self.map.get(&system) }

    pub(crate) fn get_mut(&mut self, system: SystemTypeId) -> Option<&mut Membership> {
        self.map.get_mut(&system)
    }

    pub(crate) fn clear(&mut self) { self.map.clear(); }
}
