//! Registration modules
//!
//! A registration module is a self-describing unit that wires a related set
//! of service mappings into the container. Each module declares, statically,
//! which other module types must be applied before it; the declaration lives
//! on the module type itself rather than in runtime metadata.
//!
//! Module types are advertised through a linkme inventory, mirroring the
//! constructor inventory in [`crate::factory`]:
//!
//! ```ignore
//! use wireup::module::{ModuleEntry, MODULES};
//!
//! #[linkme::distributed_slice(MODULES)]
//! static ENGINE_MODULE: ModuleEntry = ModuleEntry::of::<EngineModule>();
//! ```
//!
//! Identity is the module's type: the registrar deduplicates by `TypeId`, so
//! a module reachable through several dependency paths is applied once.

use std::any::TypeId;

use crate::container::{Container, ServiceKey};
use crate::error::Result;
use crate::factory::{Construct, FactoryCache};

/// A unit of container wiring with statically declared dependencies
pub trait RegistrationModule: Send + Sync {
    /// Module types that must be applied before this one, in declaration order
    fn dependencies(&self) -> &'static [ModuleId] {
        &[]
    }

    /// Perform this module's registrations against the container
    ///
    /// Returns the service keys it registered (may be empty). Failures are
    /// not caught by the registrar; they abort the bootstrap sequence.
    fn apply(&self, container: &mut dyn Container) -> Result<Vec<ServiceKey>>;
}

/// Type identifier handle for a module
///
/// Deliberately unconstrained: any `'static` type can be named in a
/// dependency list, and naming a type that is not in the module inventory is
/// diagnosed at resolution time as an invalid declaration.
#[derive(Clone, Copy)]
pub struct ModuleId {
    name: fn() -> &'static str,
    id: fn() -> TypeId,
}

impl ModuleId {
    /// Identifier for the module type `M`
    pub const fn of<M: 'static>() -> Self {
        Self {
            name: std::any::type_name::<M>,
            id: TypeId::of::<M>,
        }
    }

    /// Canonical name of the module type
    pub fn name(&self) -> &'static str {
        (self.name)()
    }

    /// Type identity of the module
    pub fn type_id(&self) -> TypeId {
        (self.id)()
    }
}

impl PartialEq for ModuleId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id()
    }
}

impl Eq for ModuleId {}

impl std::fmt::Debug for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ModuleId").field(&self.name()).finish()
    }
}

/// Inventory entry advertising one registration module type
pub struct ModuleEntry {
    /// Canonical name of the module type
    pub name: fn() -> &'static str,
    /// Type identity of the module
    pub id: fn() -> TypeId,
    /// Build the module through its parameter-less constructor
    pub construct: fn(&FactoryCache) -> Result<Box<dyn RegistrationModule>>,
}

// Auto-collection via linkme distributed slices - modules submit entries at compile time
#[linkme::distributed_slice]
pub static MODULES: [ModuleEntry] = [..];

impl ModuleEntry {
    /// Entry for the module type `M`
    ///
    /// `M` must expose a parameter-less constructor reachable through the
    /// factory cache, so remember to also register
    /// `ConstructorEntry::of::<M, ()>()`.
    pub const fn of<M>() -> Self
    where
        M: RegistrationModule + Construct<()> + 'static,
    {
        Self {
            name: std::any::type_name::<M>,
            id: TypeId::of::<M>,
            construct: construct_module::<M>,
        }
    }
}

fn construct_module<M>(cache: &FactoryCache) -> Result<Box<dyn RegistrationModule>>
where
    M: RegistrationModule + Construct<()> + 'static,
{
    let factory = cache.get_or_build::<M, ()>()?;
    Ok(Box::new(factory.invoke(())))
}

/// Look up the inventory entry for a module type
pub fn lookup_module(id: TypeId) -> Option<&'static ModuleEntry> {
    MODULES.iter().find(|entry| (entry.id)() == id)
}

/// List the names of all registered module types
pub fn list_modules() -> Vec<&'static str> {
    MODULES.iter().map(|entry| (entry.name)()).collect()
}

#[cfg(test)]
mod tests {
    use crate::factory::{ConstructorEntry, CONSTRUCTORS};

    use super::*;

    struct InventoriedModule;

    impl Construct<()> for InventoriedModule {
        fn construct(_: ()) -> Self {
            InventoriedModule
        }
    }

    impl RegistrationModule for InventoriedModule {
        fn apply(&self, _container: &mut dyn Container) -> Result<Vec<ServiceKey>> {
            Ok(Vec::new())
        }
    }

    #[linkme::distributed_slice(MODULES)]
    static INVENTORIED_MODULE: ModuleEntry = ModuleEntry::of::<InventoriedModule>();

    #[linkme::distributed_slice(CONSTRUCTORS)]
    static INVENTORIED_MODULE_CTOR: ConstructorEntry =
        ConstructorEntry::of::<InventoriedModule, ()>();

    struct NotAModule;

    #[test]
    fn test_lookup_finds_inventoried_module() {
        let entry = lookup_module(TypeId::of::<InventoriedModule>()).unwrap();
        assert!((entry.name)().contains("InventoriedModule"));

        let cache = FactoryCache::new();
        let module = (entry.construct)(&cache).unwrap();
        assert!(module.dependencies().is_empty());
    }

    #[test]
    fn test_lookup_misses_unregistered_type() {
        assert!(lookup_module(TypeId::of::<NotAModule>()).is_none());
    }

    #[test]
    fn test_module_id_compares_by_type() {
        assert_eq!(
            ModuleId::of::<InventoriedModule>(),
            ModuleId::of::<InventoriedModule>()
        );
        assert_ne!(ModuleId::of::<InventoriedModule>(), ModuleId::of::<NotAModule>());
    }

    #[test]
    fn test_list_contains_inventoried_module() {
        assert!(list_modules()
            .iter()
            .any(|name| name.contains("InventoriedModule")));
    }
}
