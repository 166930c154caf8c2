//! Objects are identifiers that own a set of attributes.
//!
//! Each live object has a record pairing its attribute [`Mask`]
//! with the attribute instances it owns.
//! The mask always equals the set of attribute types present in the record.

use std::collections::BTreeMap;
use std::fmt;

use crate::attribute::{AnyAttribute, AttrTypeId};
use crate::error::{Error, Result};
use crate::Mask;

/// Identifies an object.
///
/// Identifiers are assigned in increasing order and are never reused
/// until the store is purged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Wraps a raw identifier.
    pub const fn new(id: u32) -> Self { Self(id) }

    /// Returns the raw identifier.
    pub fn get(self) -> u32 { self.0 }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { self.0.fmt(f) }
}

/// The attributes owned by a single object.
#[derive(Default)]
pub(crate) struct Record {
    mask:  Mask,
    attrs: BTreeMap<AttrTypeId, Box<dyn AnyAttribute>>,
}

impl Record {
    pub(crate) fn mask(&self) -> Mask { self.mask }

    /// Inserts an attribute, returning the instance it replaced.
    fn insert(
        &mut self,
        attr: AttrTypeId,
        value: Box<dyn AnyAttribute>,
    ) -> Option<Box<dyn AnyAttribute>> {
        self.mask.set(attr);
        let prev = self.attrs.insert(attr, value);
        self.debug_check();
        prev
    }

    fn remove(&mut self, attr: AttrTypeId) -> Option<Box<dyn AnyAttribute>> {
        let value = self.attrs.remove(&attr)?;
        self.mask.clear(attr);
        self.debug_check();
        Some(value)
    }

    fn debug_check(&self) {
        debug_assert_eq!(
            self.mask,
            self.attrs.keys().copied().collect::<Mask>(),
            "attribute mask diverged from attribute map"
        );
    }
}

/// The object table.
#[derive(Default)]
pub struct Store {
    records: BTreeMap<ObjectId, Record>,
    next_id: u32,
}

impl Store {
    fn next_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id = self.next_id.checked_add(1).expect("integer overflow");
        id
    }

    /// Allocates a new object without attributes.
    pub fn create(&mut self) -> ObjectId {
        let id = self.next_id();
        self.records.insert(id, Record::default());
        id
    }

    /// Allocates a new object owning the given attributes.
    pub fn create_with(
        &mut self,
        attrs: impl IntoIterator<Item = (AttrTypeId, Box<dyn AnyAttribute>)>,
    ) -> (ObjectId, Mask) {
        let id = self.next_id();
        let mut record = Record::default();
        for (attr, value) in attrs {
            record.insert(attr, value);
        }
        let mask = record.mask();
        self.records.insert(id, record);
        (id, mask)
    }

    /// Removes an object and drops all its attributes.
    pub fn remove(&mut self, id: ObjectId) -> Result<Mask> {
        match self.records.remove(&id) {
            Some(record) => Ok(record.mask()),
            None => Err(Error::ObjectNotFound(id)),
        }
    }

    /// Attaches an attribute to an object, replacing any existing one of the same type.
    ///
    /// Returns the updated mask.
    pub fn insert_attribute(
        &mut self,
        id: ObjectId,
        attr: AttrTypeId,
        value: Box<dyn AnyAttribute>,
    ) -> Result<Mask> {
        let record = self.records.get_mut(&id).ok_or(Error::ObjectNotFound(id))?;
        if let Some(prev) = record.insert(attr, value) {
            log::trace!("Replaced attribute {} of type {attr} on object {id}", prev.type_name());
        }
        Ok(record.mask())
    }

    /// Detaches an attribute from an object.
    ///
    /// Returns the updated mask.
    pub fn remove_attribute(&mut self, id: ObjectId, attr: AttrTypeId) -> Result<Mask> {
        let record = self.records.get_mut(&id).ok_or(Error::ObjectNotFound(id))?;
        match record.remove(attr) {
            Some(_) => Ok(record.mask()),
            None => Err(Error::AttributeNotFound { object: id, attr }),
        }
    }

    /// Gets a shared reference to an attribute.
    pub fn attribute(
        &self,
        id: ObjectId,
        attr: AttrTypeId,
    ) -> Result<&(dyn AnyAttribute + 'static)> {
        let record = self.records.get(&id).ok_or(Error::ObjectNotFound(id))?;
        match record.attrs.get(&attr) {
            Some(value) => Ok(&**value),
            None => Err(Error::AttributeNotFound { object: id, attr }),
        }
    }

    /// Gets a mutable reference to an attribute.
    pub fn attribute_mut(
        &mut self,
        id: ObjectId,
        attr: AttrTypeId,
    ) -> Result<&mut (dyn AnyAttribute + 'static)> {
        let record = self.records.get_mut(&id).ok_or(Error::ObjectNotFound(id))?;
        match record.attrs.get_mut(&attr) {
            Some(value) => Ok(&mut **value),
            None => Err(Error::AttributeNotFound { object: id, attr }),
        }
    }

    /// Whether the object exists and owns an attribute of type `attr`.
    pub fn has_attribute(&self, id: ObjectId, attr: AttrTypeId) -> bool {
        self.records.get(&id).map_or(false, |record| record.mask().test(attr))
    }

    /// Returns the attribute mask of an object.
    pub fn mask(&self, id: ObjectId) -> Result<Mask> {
        self.records.get(&id).map(Record::mask).ok_or(Error::ObjectNotFound(id))
    }

    /// Whether the object exists.
    pub fn contains(&self, id: ObjectId) -> bool { self.records.contains_key(&id) }

    /// The number of live objects.
    pub fn len(&self) -> usize { self.records.len() }

    /// Whether there are no live objects.
    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Iterates over live objects and their masks in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, Mask)> + '_ {
        self.records.iter().map(|(&id, record)| (id, record.mask()))
    }

    /// Removes all objects and restarts identifier allocation from zero.
    pub fn purge(&mut self) {
        self.records.clear();
        self.next_id = 0;
    }
}
