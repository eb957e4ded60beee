//! Host registration modules
//!
//! One module per subsystem, each advertising its upstream modules. The
//! registrar walks the graph from [`HostModule`] and applies every module
//! exactly once, dependencies first:
//!
//! ```text
//! HostModule ──▶ ConfigModule
//!     │
//!     └────────▶ ProcessorModule ──▶ EngineModule ──▶ BusModule
//! ```
//!
//! Modules register mappings and shared instances only. Object graph
//! assembly happens at the composition root, which resolves the registered
//! pieces through the factory cache.

use std::sync::Arc;

use tracing::debug;
use wireup::{
    register_shared, Construct, ConstructorEntry, Container, Lifetime, ModuleEntry, ModuleId,
    RegistrationModule, Result, ServiceKey, CONSTRUCTORS, MODULES,
};

use crate::bus::{LoggingServiceBus, ServiceBus};
use crate::config::{AppConfig, ConfigLoader};
use crate::engine::{Engine, EngineManager};
use crate::service::{ProcessorService, ServiceLifecycle};

// ============================================================================
// ConfigModule
// ============================================================================

/// Loads configuration and shares it as a singleton
pub struct ConfigModule;

impl Construct<()> for ConfigModule {
    fn construct(_: ()) -> Self {
        ConfigModule
    }
}

impl RegistrationModule for ConfigModule {
    fn apply(&self, container: &mut dyn Container) -> Result<Vec<ServiceKey>> {
        let config = Arc::new(ConfigLoader::new().load()?);
        debug!(service = %config.service.name, "configuration loaded");
        let key = register_shared::<AppConfig>(container, config, Lifetime::Singleton);
        Ok(vec![key])
    }
}

#[linkme::distributed_slice(MODULES)]
static CONFIG_MODULE: ModuleEntry = ModuleEntry::of::<ConfigModule>();

#[linkme::distributed_slice(CONSTRUCTORS)]
static CONFIG_MODULE_CTOR: ConstructorEntry = ConstructorEntry::of::<ConfigModule, ()>();

// ============================================================================
// BusModule
// ============================================================================

/// Shares the service bus as a singleton
pub struct BusModule;

impl Construct<()> for BusModule {
    fn construct(_: ()) -> Self {
        BusModule
    }
}

impl RegistrationModule for BusModule {
    fn apply(&self, container: &mut dyn Container) -> Result<Vec<ServiceKey>> {
        let bus: Arc<dyn ServiceBus> = Arc::new(LoggingServiceBus::new());
        let key = register_shared::<dyn ServiceBus>(container, bus, Lifetime::Singleton);
        Ok(vec![key])
    }
}

#[linkme::distributed_slice(MODULES)]
static BUS_MODULE: ModuleEntry = ModuleEntry::of::<BusModule>();

#[linkme::distributed_slice(CONSTRUCTORS)]
static BUS_MODULE_CTOR: ConstructorEntry = ConstructorEntry::of::<BusModule, ()>();

// ============================================================================
// EngineModule
// ============================================================================

/// Maps the engine trait to its bus-backed implementation
pub struct EngineModule;

impl Construct<()> for EngineModule {
    fn construct(_: ()) -> Self {
        EngineModule
    }
}

impl RegistrationModule for EngineModule {
    fn dependencies(&self) -> &'static [ModuleId] {
        static DEPS: &[ModuleId] = &[ModuleId::of::<BusModule>()];
        DEPS
    }

    fn apply(&self, container: &mut dyn Container) -> Result<Vec<ServiceKey>> {
        let service = ServiceKey::of::<dyn Engine>();
        container.register_type(
            service,
            ServiceKey::of::<EngineManager>(),
            Lifetime::Singleton,
        );
        Ok(vec![service])
    }
}

#[linkme::distributed_slice(MODULES)]
static ENGINE_MODULE: ModuleEntry = ModuleEntry::of::<EngineModule>();

#[linkme::distributed_slice(CONSTRUCTORS)]
static ENGINE_MODULE_CTOR: ConstructorEntry = ConstructorEntry::of::<EngineModule, ()>();

// ============================================================================
// ProcessorModule
// ============================================================================

/// Maps the lifecycle trait to the processor service
pub struct ProcessorModule;

impl Construct<()> for ProcessorModule {
    fn construct(_: ()) -> Self {
        ProcessorModule
    }
}

impl RegistrationModule for ProcessorModule {
    fn dependencies(&self) -> &'static [ModuleId] {
        static DEPS: &[ModuleId] = &[ModuleId::of::<EngineModule>()];
        DEPS
    }

    fn apply(&self, container: &mut dyn Container) -> Result<Vec<ServiceKey>> {
        let service = ServiceKey::of::<dyn ServiceLifecycle>();
        container.register_type(
            service,
            ServiceKey::of::<ProcessorService>(),
            Lifetime::Transient,
        );
        Ok(vec![service])
    }
}

#[linkme::distributed_slice(MODULES)]
static PROCESSOR_MODULE: ModuleEntry = ModuleEntry::of::<ProcessorModule>();

#[linkme::distributed_slice(CONSTRUCTORS)]
static PROCESSOR_MODULE_CTOR: ConstructorEntry = ConstructorEntry::of::<ProcessorModule, ()>();

// ============================================================================
// HostModule
// ============================================================================

/// Root module pulling in everything the host needs
pub struct HostModule;

impl Construct<()> for HostModule {
    fn construct(_: ()) -> Self {
        HostModule
    }
}

impl RegistrationModule for HostModule {
    fn dependencies(&self) -> &'static [ModuleId] {
        static DEPS: &[ModuleId] = &[
            ModuleId::of::<ConfigModule>(),
            ModuleId::of::<ProcessorModule>(),
        ];
        DEPS
    }

    fn apply(&self, _container: &mut dyn Container) -> Result<Vec<ServiceKey>> {
        Ok(Vec::new())
    }
}

#[linkme::distributed_slice(MODULES)]
static HOST_MODULE: ModuleEntry = ModuleEntry::of::<HostModule>();

#[linkme::distributed_slice(CONSTRUCTORS)]
static HOST_MODULE_CTOR: ConstructorEntry = ConstructorEntry::of::<HostModule, ()>();

#[cfg(test)]
mod tests {
    use wireup::{FactoryCache, MemoryContainer, ModuleRegistrar};

    use super::*;

    #[test]
    fn test_host_graph_applies_dependency_first() {
        let factories = Arc::new(FactoryCache::new());
        let registrar = ModuleRegistrar::new(factories);
        let mut container = MemoryContainer::new();

        let applied = registrar
            .register(&mut container, ModuleId::of::<HostModule>())
            .unwrap();

        assert_eq!(applied.len(), 5);
        assert!(applied[0].contains("ConfigModule"));
        assert!(applied[1].contains("BusModule"));
        assert!(applied[2].contains("EngineModule"));
        assert!(applied[3].contains("ProcessorModule"));
        assert!(applied[4].contains("HostModule"));
    }

    #[test]
    fn test_host_graph_populates_the_container() {
        let factories = Arc::new(FactoryCache::new());
        let registrar = ModuleRegistrar::new(factories);
        let mut container = MemoryContainer::new();

        registrar
            .register(&mut container, ModuleId::of::<HostModule>())
            .unwrap();

        let config = container.service::<AppConfig>().unwrap();
        assert!(!config.service.name.is_empty());

        assert!(container.service::<dyn ServiceBus>().is_some());

        let engine = container.binding(ServiceKey::of::<dyn Engine>()).unwrap();
        assert_eq!(engine.implementation, ServiceKey::of::<EngineManager>());

        let lifecycle = container
            .binding(ServiceKey::of::<dyn ServiceLifecycle>())
            .unwrap();
        assert_eq!(lifecycle.implementation, ServiceKey::of::<ProcessorService>());
    }

    #[test]
    fn test_registered_pieces_assemble_into_a_service() {
        let factories = Arc::new(FactoryCache::new());
        let registrar = ModuleRegistrar::new(factories.clone());
        let mut container = MemoryContainer::new();

        registrar
            .register(&mut container, ModuleId::of::<HostModule>())
            .unwrap();

        // Same resolution dance the composition root performs.
        let bus = container.service::<dyn ServiceBus>().unwrap();
        let engine: Arc<dyn Engine> = Arc::new(
            factories
                .get_or_build::<EngineManager, (Arc<dyn ServiceBus>,)>()
                .unwrap()
                .invoke((bus,)),
        );
        let service = factories
            .get_or_build::<ProcessorService, (Arc<dyn Engine>,)>()
            .unwrap()
            .invoke((engine.clone(),));

        service.start();
        assert!(engine.is_running());
        service.stop();
        assert!(!engine.is_running());
    }
}
