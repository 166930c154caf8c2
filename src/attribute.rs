//! Attributes are the typed state held by objects.
//!
//! An attribute type is any `Default` type implementing [`Attribute`].
//! Each concrete type is bound to a runtime [`AttrTypeId`] through the
//! [`Registry`], which stores a factory producing default instances.
//! Objects own their attributes exclusively;
//! an instance is never shared between two objects.
//!
//! # Registration
//! Registering a type requires `T: Attribute`,
//! so a type that does not satisfy the attribute capability
//! is rejected when the registration call is compiled.
//! Registering the same [`AttrTypeId`] twice replaces the factory,
//! which lets games override the engine default attributes.

use std::any::{self, Any};
use std::fmt;

use crate::error::{Error, Result};
use crate::mask::MASK_BITS;

pub mod builtin;

mod registry;
pub use registry::Registry;

/// A resettable, default-constructible state holder attached to objects.
pub trait Attribute: Default + Send + Sync + 'static {
    /// Restores the attribute to its default state.
    fn reset(&mut self) { *self = Self::default(); }
}

/// Identifies an attribute type, and the bit it occupies in a [`Mask`](crate::Mask).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttrTypeId(u8);

impl AttrTypeId {
    /// Creates an attribute type identifier.
    ///
    /// # Panics
    /// Panics if `id` is not less than [`MASK_BITS`].
    /// Use [`try_new`](Self::try_new) for identifiers computed at runtime.
    pub const fn new(id: u32) -> Self {
        assert!((id as usize) < MASK_BITS, "attribute type id does not fit in the mask");
        Self(id as u8)
    }

    /// Creates an attribute type identifier, checking that it fits in the mask.
    pub fn try_new(id: u32) -> Result<Self> {
        match usize::try_from(id) {
            Ok(index) if index < MASK_BITS => Ok(Self::from_index(index)),
            _ => Err(Error::AttrTypeOutOfRange(id)),
        }
    }

    /// Returns the numeric identifier.
    pub fn get(self) -> u32 { u32::from(self.0) }

    pub(crate) fn index(self) -> usize { usize::from(self.0) }

    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index < MASK_BITS);
        Self(index as u8)
    }
}

impl fmt::Display for AttrTypeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { self.0.fmt(f) }
}

/// Object-safe view of an [`Attribute`], used for type-erased storage.
pub trait AnyAttribute: Send + Sync + 'static {
    /// Restores the attribute to its default state.
    fn reset(&mut self);

    /// The name of the concrete type, for diagnostics.
    fn type_name(&self) -> &'static str;

    /// Upcasts to [`Any`] for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Upcasts to [`Any`] for downcasting to the concrete type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Attribute> AnyAttribute for T {
    fn reset(&mut self) { Attribute::reset(self) }

    fn type_name(&self) -> &'static str { any::type_name::<T>() }

    fn as_any(&self) -> &dyn Any { self }

    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}

impl dyn AnyAttribute {
    /// Downcasts to the concrete attribute type.
    pub(crate) fn downcast_ref<T: Attribute>(&self, attr: AttrTypeId) -> Result<&T> {
        let actual = self.type_name();
        self.as_any().downcast_ref::<T>().ok_or(Error::TypeMismatch {
            attr,
            expected: any::type_name::<T>(),
            actual,
        })
    }

    /// Downcasts to the concrete attribute type.
    pub(crate) fn downcast_mut<T: Attribute>(&mut self, attr: AttrTypeId) -> Result<&mut T> {
        let actual = self.type_name();
        self.as_any_mut().downcast_mut::<T>().ok_or(Error::TypeMismatch {
            attr,
            expected: any::type_name::<T>(),
            actual,
        })
    }
}
