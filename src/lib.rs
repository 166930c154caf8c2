//! An Object/Attribute/System coordination engine for real-time applications.
//!
//! # Objects, attributes and systems
//! An *object* is an identifier owning a bag of typed *attributes*.
//! Attribute types are bound to small integer identifiers at runtime,
//! so the set of attribute types an object owns fits in a 32-bit [`Mask`].
//!
//! A *system* declares a *signature*, the attribute types it requires,
//! and runs every frame on the objects whose mask contains the signature.
//! The engine maintains the object-set of every system:
//! adding or removing an attribute immediately re-evaluates the object against every signature,
//! and registering a system seeds its object-set from all existing objects.
//! At any moment outside a mutation,
//! an object is in the object-set of a system if and only if its mask contains the signature.
//!
//! ```
//! use oasys::attribute::builtin::{Translation, Vec2, Velocity, TRANSLATION, VELOCITY};
//! use oasys::system::{Translator, TRANSLATOR};
//!
//! let mut ctx = oasys::context::Builder::without_builtins();
//! ctx.builtin_attributes();
//! ctx.system(TRANSLATOR, Box::new(Translator));
//! let ctx = ctx.build()?;
//!
//! let id = ctx.create_object_with(oasys::mask![TRANSLATION])?;
//! assert!(ctx.system_objects(TRANSLATOR)?.is_empty());
//!
//! ctx.add_attribute(id, VELOCITY)?;
//! assert_eq!(ctx.system_objects(TRANSLATOR)?, vec![id]);
//!
//! ctx.attribute::<Velocity>(id, VELOCITY)?.0 = Vec2::new(1.0, 0.0);
//! ctx.update(2.0, &oasys::tracer::Noop)?;
//! assert_eq!(ctx.attribute::<Translation>(id, TRANSLATION)?.position, Vec2::new(2.0, 0.0));
//! # Ok::<(), oasys::Error>(())
//! ```
//!
//! # The context
//! All tables live in a [`Context`],
//! which also drives application [states](state), [resources](resource),
//! [windows](window) and [object events](event).
//! The context is shared by reference;
//! object and attribute operations may be called from any thread while a frame is running.
//! See the [`context`] module for the locking rules.

#![cfg_attr(not(debug_assertions), deny(missing_docs))]
#![cfg_attr(doc, warn(missing_docs))]

mod macros;

pub mod attribute;
pub use attribute::{AttrTypeId, Attribute};

pub mod context;
pub use context::{new, Bundle, Context};

pub mod error;
pub use error::{Error, ErrorKind, Result};

pub mod event;

pub mod mask;
pub use mask::Mask;

pub mod object;
pub use object::ObjectId;

pub mod render;

pub mod resource;
pub use resource::{Resource, ResourceId};

pub mod state;
pub use state::{State, StateTypeId};

pub mod system;
pub use system::{System, SystemTypeId};

#[cfg(any(test, feature = "internal-bench"))]
pub mod test_util;

pub mod tracer;
pub use tracer::Tracer;

pub mod window;
pub use window::{Window, WindowId};
