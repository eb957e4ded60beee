//! wireup - bootstrap wiring core
//!
//! Bootstraps a process's object graph from two independent, composable
//! pieces:
//!
//! - **Module registrar**: resolves a static declarative dependency graph of
//!   registration modules rooted at a given module and applies each module's
//!   container registrations exactly once, dependencies first.
//! - **Factory cache**: hands out reusable construction trampolines keyed by
//!   the exact constructor signature (including nested generic arguments),
//!   so instantiation never repeats the constructor lookup.
//!
//! ## Architecture
//!
//! ```text
//! ModuleId::of::<RootModule>()
//!         │
//!         ▼
//! ┌──────────────────┐   parameter-less ctor   ┌──────────────────┐
//! │ ModuleRegistrar  │ ──────────────────────▶ │ FactoryCache     │
//! │ (graph walk)     │                         │ (trampolines)    │
//! └──────────────────┘                         └──────────────────┘
//!         │ apply, dependency-first
//!         ▼
//! ┌──────────────────┐
//! │ dyn Container    │  register_type / register_instance only
//! └──────────────────┘
//! ```
//!
//! Both module types and constructors are advertised through linkme
//! distributed slices, collected at compile time and scanned at runtime; the
//! mutable pieces (cache, registrar, container) are explicit values owned by
//! the caller, never process-wide singletons.
//!
//! ## Usage
//!
//! ```ignore
//! let factories = Arc::new(FactoryCache::new());
//! let registrar = ModuleRegistrar::new(factories.clone());
//! let mut container = MemoryContainer::new();
//!
//! registrar.register(&mut container, ModuleId::of::<HostModule>())?;
//! let engine = container.service::<dyn Engine>().expect("wired by EngineModule");
//! ```

pub mod container;
pub mod error;
pub mod factory;
pub mod module;
pub mod registrar;

pub use container::{register_shared, Binding, Container, Lifetime, MemoryContainer, ServiceKey};
pub use error::{Error, Result};
pub use factory::{ArgTuple, Construct, ConstructorEntry, Factory, FactoryCache, CONSTRUCTORS};
pub use module::{
    list_modules, lookup_module, ModuleEntry, ModuleId, RegistrationModule, MODULES,
};
pub use registrar::ModuleRegistrar;
