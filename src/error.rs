//! Errors returned by context operations.
//!
//! Every variant belongs to exactly one [`ErrorKind`].
//! Only the kind is meant to be matched on;
//! the message text is for humans.

use std::fmt;

use thiserror::Error;

use crate::attribute::AttrTypeId;
use crate::object::ObjectId;
use crate::resource::ResourceId;
use crate::state::StateTypeId;
use crate::window::WindowId;

/// Shorthand for results with the crate [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error type for all fallible operations in this crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The object does not exist.
    #[error("object {0} does not exist")]
    ObjectNotFound(ObjectId),

    /// The object exists but does not own an attribute of the given type.
    #[error("object {object} does not contain attribute type {attr}")]
    AttributeNotFound {
        /// The object that was queried.
        object: ObjectId,
        /// The missing attribute type.
        attr:   AttrTypeId,
    },

    /// A type identifier has no associated factory or instance.
    #[error("{table} type {id} has not been registered")]
    NotRegistered {
        /// The table that was searched.
        table: Table,
        /// The unregistered identifier.
        id:    u32,
    },

    /// An attribute was requested as a concrete type it is not.
    #[error("attribute type {attr} holds {actual}, not {expected}")]
    TypeMismatch {
        /// The attribute type identifier.
        attr:     AttrTypeId,
        /// The requested concrete type.
        expected: &'static str,
        /// The concrete type actually stored.
        actual:   &'static str,
    },

    /// An attribute type identifier does not fit in an attribute mask.
    #[error("attribute type {0} does not fit in a {bits}-bit mask", bits = crate::mask::MASK_BITS)]
    AttrTypeOutOfRange(u32),

    /// A state type was registered twice.
    #[error("state type {0} has already been registered")]
    DuplicateState(StateTypeId),

    /// The resource was never registered.
    #[error("resource {0} has not been registered")]
    ResourceNotFound(ResourceId),

    /// The resource is registered but not loaded.
    #[error("resource {0} has not been loaded")]
    ResourceNotLoaded(ResourceId),

    /// A loaded resource was requested as a type it is not.
    #[error("resource {resource} is not a {expected}")]
    ResourceTypeMismatch {
        /// The requested resource.
        resource: ResourceId,
        /// The requested concrete type.
        expected: &'static str,
    },

    /// The window does not exist.
    #[error("window {0} does not exist")]
    WindowNotFound(WindowId),

    /// A failure reported by a collaborator, e.g. a resource loader or a system.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// The abstract category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced object, attribute, resource or window does not exist.
    NotFound,
    /// A type identifier has no factory or instance.
    NotRegistered,
    /// A type does not satisfy the required capability.
    Type,
    /// A registration that must be unique was attempted twice.
    DuplicateRegistration,
    /// A collaborator failure.
    Other,
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ObjectNotFound(_)
            | Self::AttributeNotFound { .. }
            | Self::ResourceNotFound(_)
            | Self::ResourceNotLoaded(_)
            | Self::WindowNotFound(_) => ErrorKind::NotFound,
            Self::NotRegistered { .. } => ErrorKind::NotRegistered,
            Self::TypeMismatch { .. }
            | Self::ResourceTypeMismatch { .. }
            | Self::AttrTypeOutOfRange(_) => ErrorKind::Type,
            Self::DuplicateState(_) => ErrorKind::DuplicateRegistration,
            Self::Other(_) => ErrorKind::Other,
        }
    }

    /// Whether this error is of kind [`ErrorKind::NotFound`].
    pub fn is_not_found(&self) -> bool { self.kind() == ErrorKind::NotFound }

    /// Whether this error is of kind [`ErrorKind::NotRegistered`].
    pub fn is_not_registered(&self) -> bool { self.kind() == ErrorKind::NotRegistered }

    /// Wraps a collaborator error.
    pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other(Box::new(err))
    }

    pub(crate) fn attr_not_registered(attr: AttrTypeId) -> Self {
        Self::NotRegistered { table: Table::Attribute, id: attr.get() }
    }
}

/// The registration tables that can report [`Error::NotRegistered`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// The attribute factory table.
    Attribute,
    /// The system table.
    System,
    /// The state table.
    State,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Attribute => "attribute",
            Self::System => "system",
            Self::State => "state",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind, Table};
    use crate::attribute::AttrTypeId;
    use crate::object::ObjectId;

    #[test]
    fn test_kinds() {
        assert_eq!(Error::ObjectNotFound(ObjectId::new(3)).kind(), ErrorKind::NotFound);
        assert_eq!(
            Error::AttributeNotFound { object: ObjectId::new(3), attr: AttrTypeId::new(1) }.kind(),
            ErrorKind::NotFound,
        );
        assert_eq!(
            Error::NotRegistered { table: Table::System, id: 9 }.kind(),
            ErrorKind::NotRegistered,
        );
        assert_eq!(Error::AttrTypeOutOfRange(40).kind(), ErrorKind::Type);
    }

    #[test]
    fn test_display() {
        let err = Error::AttributeNotFound { object: ObjectId::new(4), attr: AttrTypeId::new(2) };
        assert_eq!(err.to_string(), "object 4 does not contain attribute type 2");

        let err = Error::NotRegistered { table: Table::Attribute, id: 7 };
        assert_eq!(err.to_string(), "attribute type 7 has not been registered");

        assert_eq!(
            Error::AttrTypeOutOfRange(32).to_string(),
            "attribute type 32 does not fit in a 32-bit mask",
        );
    }
}
