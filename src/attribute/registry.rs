use std::any;

use super::{AnyAttribute, AttrTypeId, Attribute};
use crate::error::{Error, Result};
use crate::mask::MASK_BITS;

/// Stores the type-erased factory of an attribute type.
#[derive(Clone, Copy)]
struct Factory {
    construct: fn() -> Box<dyn AnyAttribute>,
    type_name: &'static str,
}

impl Factory {
    fn of<T: Attribute>() -> Self {
        Self {
            construct: || Box::<T>::default() as Box<dyn AnyAttribute>,
            type_name: any::type_name::<T>(),
        }
    }
}

/// Maps attribute type identifiers to the factories of their concrete types.
///
/// There is one slot per mask bit.
pub struct Registry {
    factories: [Option<Factory>; MASK_BITS],
}

impl Default for Registry {
    fn default() -> Self { Self { factories: [None; MASK_BITS] } }
}

impl Registry {
    /// Binds `attr` to the concrete type `T`.
    ///
    /// An existing binding of `attr` is replaced.
    pub fn register<T: Attribute>(&mut self, attr: AttrTypeId) {
        let slot = &mut self.factories[attr.index()];
        if let Some(prev) = slot.replace(Factory::of::<T>()) {
            log::debug!(
                "Attribute type {attr} is rebound from {} to {}",
                prev.type_name,
                any::type_name::<T>()
            );
        } else {
            log::info!("Registered attribute type {attr} as {}", any::type_name::<T>());
        }
    }

    /// Constructs a default instance of the type bound to `attr`.
    pub fn construct(&self, attr: AttrTypeId) -> Result<Box<dyn AnyAttribute>> {
        match self.factories[attr.index()] {
            Some(factory) => Ok((factory.construct)()),
            None => Err(Error::attr_not_registered(attr)),
        }
    }

    /// Whether `attr` has a factory.
    pub fn contains(&self, attr: AttrTypeId) -> bool { self.factories[attr.index()].is_some() }

    /// The name of the concrete type bound to `attr`.
    pub fn type_name(&self, attr: AttrTypeId) -> Option<&'static str> {
        self.factories[attr.index()].map(|factory| factory.type_name)
    }

    /// Iterates over the registered attribute types in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = AttrTypeId> + '_ {
        self.factories
            .iter()
            .enumerate()
            .filter(|(_, factory)| factory.is_some())
            .map(|(index, _)| AttrTypeId::from_index(index))
    }

    /// Removes all factories.
    pub fn clear(&mut self) { self.factories = [None; MASK_BITS]; }
}

#[cfg(test)]
mod tests {
    use super::Registry;
    use crate::attribute::builtin::{Translation, Velocity};
    use crate::attribute::AttrTypeId;
    use crate::error::ErrorKind;
    use crate::test_util;

    const POS: AttrTypeId = AttrTypeId::new(0);
    const VEL: AttrTypeId = AttrTypeId::new(1);

    #[test]
    fn test_construct_registered() {
        test_util::init();

        let mut registry = Registry::default();
        registry.register::<Translation>(POS);

        let attr = registry.construct(POS).expect("registered");
        assert_eq!(attr.type_name(), std::any::type_name::<Translation>());
        assert!(registry.contains(POS));
        assert!(!registry.contains(VEL));
    }

    #[test]
    fn test_construct_unregistered() {
        let registry = Registry::default();
        let err = registry.construct(VEL).err().expect("unregistered");
        assert_eq!(err.kind(), ErrorKind::NotRegistered);
    }

    #[test]
    fn test_last_registration_wins() {
        test_util::init();

        let mut registry = Registry::default();
        registry.register::<Translation>(POS);
        registry.register::<Velocity>(POS);

        assert_eq!(registry.type_name(POS), Some(std::any::type_name::<Velocity>()));
        let attr = registry.construct(POS).expect("registered");
        assert!(attr.as_any().is::<Velocity>());
    }

    #[test]
    fn test_clear() {
        let mut registry = Registry::default();
        registry.register::<Translation>(POS);
        registry.register::<Velocity>(VEL);
        assert_eq!(registry.iter().collect::<Vec<_>>(), vec![POS, VEL]);

        registry.clear();
        assert_eq!(registry.iter().count(), 0);
    }
}
