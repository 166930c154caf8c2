use crate::attribute::{builtin, AttrTypeId, Attribute, Registry};
use crate::error::Result;
use crate::state::{State, StateTypeId};
use crate::system::{self, Collider, Controller, System, SystemTypeId, Translator};
use crate::Context;

/// This type is used to build a context.
///
/// Systems are registered in the order they are added,
/// before any state is added.
pub struct Builder {
    registry: Registry,
    systems:  Vec<(SystemTypeId, Box<dyn System>)>,
    states:   Vec<(StateTypeId, Box<dyn State>)>,
}

impl Default for Builder {
    fn default() -> Self { Self::new() }
}

impl Builder {
    /// Creates a builder.
    ///
    /// With the `builtin` feature,
    /// the builtin attribute types and the builtin translator, controller and collider systems
    /// are registered.
    /// The renderer system needs a backend and is never registered automatically.
    pub fn new() -> Self {
        let mut builder = Self::without_builtins();
        if cfg!(feature = "builtin") {
            builder.builtin_attributes();
            builder.builtin_systems();
        }
        builder
    }

    /// Creates a builder with nothing registered.
    pub fn without_builtins() -> Self {
        Self { registry: Registry::default(), systems: Vec::new(), states: Vec::new() }
    }

    /// Registers the builtin attribute types under their reserved ids.
    pub fn builtin_attributes(&mut self) { builtin::register_all(&mut self.registry); }

    /// Registers the builtin systems that need no collaborator.
    pub fn builtin_systems(&mut self) {
        self.system(system::TRANSLATOR, Box::new(Translator));
        self.system(system::CONTROLLER, Box::new(Controller));
        self.system(system::COLLIDER, Box::new(Collider));
    }

    /// Binds `attr` to the concrete attribute type `T`, replacing any previous binding.
    pub fn attribute<T: Attribute>(&mut self, attr: AttrTypeId) {
        self.registry.register::<T>(attr);
    }

    /// Adds a system.
    ///
    /// Adding the same id again replaces the system but keeps its original position.
    pub fn system(&mut self, id: SystemTypeId, system: Box<dyn System>) {
        self.systems.push((id, system));
    }

    /// Adds a state.
    ///
    /// The first state added becomes current when the context is built.
    pub fn state(&mut self, id: StateTypeId, state: Box<dyn State>) {
        self.states.push((id, state));
    }

    /// Constructs the context from the builder.
    ///
    /// Fails if a state id was added twice or the first state fails to activate.
    pub fn build(self) -> Result<Context> {
        let mut ctx = Context::default();

        ctx.inner.get_mut().registry = self.registry;

        for (id, system) in self.systems {
            ctx.register_system(id, system);
        }
        for (id, state) in self.states {
            ctx.add_state(id, state)?;
        }

        Ok(ctx)
    }
}
