//! End-to-end bootstrap flow
//!
//! Wires a small service graph the way a process entry point would: module
//! inventory entries declared outside the library crate, a registrar walk
//! into an in-memory container, and instance construction through the
//! factory cache.

use std::sync::Arc;

use wireup::{
    register_shared, Construct, ConstructorEntry, Container, FactoryCache, Lifetime,
    MemoryContainer, ModuleEntry, ModuleId, ModuleRegistrar, RegistrationModule, Result,
    ServiceKey, CONSTRUCTORS, MODULES,
};

trait AuditSink: Send + Sync {
    fn record(&self, event: &str) -> usize;
}

struct NullAuditSink;

impl AuditSink for NullAuditSink {
    fn record(&self, event: &str) -> usize {
        event.len()
    }
}

trait Store: Send + Sync {}

struct MemoryStore;

impl Store for MemoryStore {}

/// Consumer built through the multi-argument factory path.
struct Reporter {
    sink: Arc<dyn AuditSink>,
}

impl Construct<(Arc<dyn AuditSink>,)> for Reporter {
    fn construct((sink,): (Arc<dyn AuditSink>,)) -> Self {
        Reporter { sink }
    }
}

#[linkme::distributed_slice(CONSTRUCTORS)]
static REPORTER_CTOR: ConstructorEntry =
    ConstructorEntry::of::<Reporter, (Arc<dyn AuditSink>,)>();

struct AuditModule;

impl Construct<()> for AuditModule {
    fn construct(_: ()) -> Self {
        AuditModule
    }
}

impl RegistrationModule for AuditModule {
    fn apply(&self, container: &mut dyn Container) -> Result<Vec<ServiceKey>> {
        let sink: Arc<dyn AuditSink> = Arc::new(NullAuditSink);
        let key = register_shared::<dyn AuditSink>(container, sink, Lifetime::Singleton);
        Ok(vec![key])
    }
}

#[linkme::distributed_slice(MODULES)]
static AUDIT_MODULE: ModuleEntry = ModuleEntry::of::<AuditModule>();

#[linkme::distributed_slice(CONSTRUCTORS)]
static AUDIT_MODULE_CTOR: ConstructorEntry = ConstructorEntry::of::<AuditModule, ()>();

struct StoreModule;

impl Construct<()> for StoreModule {
    fn construct(_: ()) -> Self {
        StoreModule
    }
}

impl RegistrationModule for StoreModule {
    fn dependencies(&self) -> &'static [ModuleId] {
        static DEPS: &[ModuleId] = &[ModuleId::of::<AuditModule>()];
        DEPS
    }

    fn apply(&self, container: &mut dyn Container) -> Result<Vec<ServiceKey>> {
        let service = ServiceKey::of::<dyn Store>();
        container.register_type(service, ServiceKey::of::<MemoryStore>(), Lifetime::Transient);
        Ok(vec![service])
    }
}

#[linkme::distributed_slice(MODULES)]
static STORE_MODULE: ModuleEntry = ModuleEntry::of::<StoreModule>();

#[linkme::distributed_slice(CONSTRUCTORS)]
static STORE_MODULE_CTOR: ConstructorEntry = ConstructorEntry::of::<StoreModule, ()>();

struct AppModule;

impl Construct<()> for AppModule {
    fn construct(_: ()) -> Self {
        AppModule
    }
}

impl RegistrationModule for AppModule {
    fn dependencies(&self) -> &'static [ModuleId] {
        static DEPS: &[ModuleId] = &[
            ModuleId::of::<StoreModule>(),
            ModuleId::of::<AuditModule>(),
        ];
        DEPS
    }

    fn apply(&self, _container: &mut dyn Container) -> Result<Vec<ServiceKey>> {
        Ok(Vec::new())
    }
}

#[linkme::distributed_slice(MODULES)]
static APP_MODULE: ModuleEntry = ModuleEntry::of::<AppModule>();

#[linkme::distributed_slice(CONSTRUCTORS)]
static APP_MODULE_CTOR: ConstructorEntry = ConstructorEntry::of::<AppModule, ()>();

#[test]
fn bootstrap_wires_the_graph_dependency_first() {
    let factories = Arc::new(FactoryCache::new());
    let registrar = ModuleRegistrar::new(factories.clone());
    let mut container = MemoryContainer::new();

    let applied = registrar
        .register(&mut container, ModuleId::of::<AppModule>())
        .unwrap();

    assert_eq!(applied.len(), 3);
    assert!(applied[0].contains("AuditModule"));
    assert!(applied[1].contains("StoreModule"));
    assert!(applied[2].contains("AppModule"));

    // Instance registered by AuditModule resolves as the trait object.
    let sink = container.service::<dyn AuditSink>().unwrap();
    assert_eq!(sink.record("boot"), 4);

    // Type mapping registered by StoreModule is visible.
    let binding = container.binding(ServiceKey::of::<dyn Store>()).unwrap();
    assert_eq!(binding.implementation, ServiceKey::of::<MemoryStore>());

    // The resolved instance feeds the multi-argument constructor path.
    let reporter = factories
        .get_or_build::<Reporter, (Arc<dyn AuditSink>,)>()
        .unwrap()
        .invoke((sink,));
    assert_eq!(reporter.sink.record("x"), 1);
}

#[test]
fn bootstrap_is_idempotent_across_roots() {
    let factories = Arc::new(FactoryCache::new());
    let registrar = ModuleRegistrar::new(factories);
    let mut container = MemoryContainer::new();

    let applied = registrar
        .register_all(
            &mut container,
            &[ModuleId::of::<AppModule>(), ModuleId::of::<StoreModule>()],
        )
        .unwrap();

    // StoreModule was already applied under the AppModule root.
    assert_eq!(applied.len(), 3);
    assert_eq!(container.instance_count(), 1);
}
