//! Resources are external assets (textures, shaders, fonts) tracked by the context.
//!
//! A resource is first *registered*, which only records where it comes from,
//! and later *loaded* on demand through [`Resource::load`].
//! Loaded values are cached and shared until unloaded.

use std::any::{self, Any};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Result};

/// Identifies a registered resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(u32);

impl ResourceId {
    /// Returns the raw identifier.
    pub fn get(self) -> u32 { self.0 }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { self.0.fmt(f) }
}

/// A loadable asset.
pub trait Resource: Send + Sync + Sized + 'static {
    /// Loads the resource from the path it was registered with.
    fn load(path: Option<&Path>) -> Result<Self>;
}

struct Entry {
    kind: u32,
    path: Option<PathBuf>,
}

/// The resource table of a context.
#[derive(Default)]
pub(crate) struct Table {
    entries: BTreeMap<ResourceId, Entry>,
    loaded:  HashMap<ResourceId, Arc<dyn Any + Send + Sync>>,
    next_id: u32,
}

impl Table {
    pub(crate) fn register(&mut self, kind: u32, path: Option<PathBuf>) -> ResourceId {
        let id = ResourceId(self.next_id);
        self.next_id = self.next_id.checked_add(1).expect("integer overflow");
        log::debug!("Registered resource {id} of kind {kind} at {path:?}");
        self.entries.insert(id, Entry { kind, path });
        id
    }

    pub(crate) fn contains(&self, id: ResourceId) -> bool { self.entries.contains_key(&id) }

    pub(crate) fn is_loaded(&self, id: ResourceId) -> bool { self.loaded.contains_key(&id) }

    pub(crate) fn kind(&self, id: ResourceId) -> Result<u32> {
        self.entries.get(&id).map(|entry| entry.kind).ok_or(Error::ResourceNotFound(id))
    }

    /// Returns the cached value if the resource is loaded,
    /// otherwise the path to load it from.
    pub(crate) fn lookup<R: Resource>(
        &self,
        id: ResourceId,
    ) -> Result<Result<Arc<R>, Option<PathBuf>>> {
        let entry = self.entries.get(&id).ok_or(Error::ResourceNotFound(id))?;
        match self.loaded.get(&id) {
            Some(value) => downcast(id, Arc::clone(value)).map(Ok),
            None => Ok(Err(entry.path.clone())),
        }
    }

    /// Caches a loaded value.
    ///
    /// If another value was cached in the meantime, that value is kept and returned.
    pub(crate) fn insert_loaded<R: Resource>(
        &mut self,
        id: ResourceId,
        value: Arc<R>,
    ) -> Result<Arc<R>> {
        if !self.entries.contains_key(&id) {
            return Err(Error::ResourceNotFound(id));
        }
        let cached = self.loaded.entry(id).or_insert(value);
        downcast(id, Arc::clone(cached))
    }

    pub(crate) fn unload(&mut self, id: ResourceId) -> Result<()> {
        match self.loaded.remove(&id) {
            Some(_) => {
                log::info!("Unloaded resource {id}");
                Ok(())
            }
            None => Err(Error::ResourceNotLoaded(id)),
        }
    }

    pub(crate) fn remove(&mut self, id: ResourceId) -> Result<()> {
        if self.entries.remove(&id).is_none() {
            return Err(Error::ResourceNotFound(id));
        }
        if let Err(err) = self.unload(id) {
            log::info!("Resource being removed: {err}");
        }
        log::info!("Removed resource {id}");
        Ok(())
    }

    pub(crate) fn purge(&mut self) {
        self.entries.clear();
        self.loaded.clear();
        self.next_id = 0;
    }
}

fn downcast<R: Resource>(id: ResourceId, value: Arc<dyn Any + Send + Sync>) -> Result<Arc<R>> {
    value
        .downcast::<R>()
        .map_err(|_| Error::ResourceTypeMismatch { resource: id, expected: any::type_name::<R>() })
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use super::{Resource, Table};
    use crate::error::{ErrorKind, Result};

    #[derive(Debug, PartialEq)]
    struct Shader(String);

    impl Resource for Shader {
        fn load(path: Option<&Path>) -> Result<Self> {
            Ok(Shader(path.map(|path| path.display().to_string()).unwrap_or_default()))
        }
    }

    #[derive(Debug)]
    struct Font;

    impl Resource for Font {
        fn load(_: Option<&Path>) -> Result<Self> { Ok(Font) }
    }

    #[test]
    fn test_lookup_then_cache() {
        let mut table = Table::default();
        let id = table.register(1, Some(PathBuf::from("shader/default.vert")));

        let path = match table.lookup::<Shader>(id).expect("registered") {
            Ok(_) => panic!("not loaded yet"),
            Err(path) => path,
        };
        let loaded = Arc::new(Shader::load(path.as_deref()).expect("load succeeds"));
        let cached = table.insert_loaded(id, loaded).expect("registered");
        assert_eq!(cached.0, "shader/default.vert");
        assert!(table.is_loaded(id));

        let again = table.lookup::<Shader>(id).expect("registered").expect("loaded");
        assert!(Arc::ptr_eq(&cached, &again));

        let err = table.lookup::<Font>(id).expect_err("wrong type");
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn test_insert_loaded_keeps_first() {
        let mut table = Table::default();
        let id = table.register(0, None);
        let first = table.insert_loaded(id, Arc::new(Shader("a".into()))).expect("registered");
        let second = table.insert_loaded(id, Arc::new(Shader("b".into()))).expect("registered");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_remove_best_effort_unload() {
        crate::test_util::init();

        let mut table = Table::default();
        let id = table.register(0, None);

        table.remove(id).expect("registered, never loaded");
        assert!(!table.contains(id));
        assert!(table.remove(id).expect_err("already removed").is_not_found());
        assert!(table.unload(id).expect_err("never loaded").is_not_found());
    }

    #[test]
    #[should_panic = "integer overflow"]
    fn test_id_overflow_panics() {
        let mut table = Table::default();
        table.next_id = u32::MAX;
        table.register(0, None);
    }
}
