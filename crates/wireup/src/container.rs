//! Container abstraction
//!
//! The container is an external collaborator: registration modules write
//! type mappings and instances into it, and the process entry point resolves
//! the root service out of it. This module defines only the write surface the
//! registrar needs, plus an in-memory implementation used by the host and by
//! tests.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Lifetime policy for a registered service
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifetime {
    /// A new instance per resolution
    Transient,
    /// One instance for the container's lifetime
    Singleton,
}

/// Identity of a service type
///
/// Works for concrete types and `dyn Trait` service types alike. The name is
/// carried for diagnostics only; identity is the `TypeId`.
#[derive(Clone, Copy)]
pub struct ServiceKey {
    id: TypeId,
    name: &'static str,
}

impl ServiceKey {
    /// Key for the service type `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Canonical name of the service type
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type identity of the service
    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for ServiceKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceKey {}

impl std::hash::Hash for ServiceKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Debug for ServiceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ServiceKey").field(&self.name).finish()
    }
}

/// Write surface of the service container
///
/// Registration modules call only these two operations; resolution is the
/// container's own concern and stays outside this crate.
pub trait Container {
    /// Map a service type to an implementation type under a lifetime policy
    fn register_type(&mut self, service: ServiceKey, implementation: ServiceKey, lifetime: Lifetime);

    /// Bind a service type to an already-built instance
    fn register_instance(
        &mut self,
        service: ServiceKey,
        instance: Arc<dyn Any + Send + Sync>,
        lifetime: Lifetime,
    );
}

/// Register a shared instance for the service type `S`
///
/// Establishes the payload convention used by [`MemoryContainer::service`]:
/// the `Any` payload stored under `ServiceKey::of::<S>()` is an `Arc<S>`, so
/// `dyn Trait` services round-trip through the type-erased instance table.
pub fn register_shared<S: ?Sized + Send + Sync + 'static>(
    container: &mut dyn Container,
    instance: Arc<S>,
    lifetime: Lifetime,
) -> ServiceKey {
    let key = ServiceKey::of::<S>();
    container.register_instance(key, Arc::new(instance), lifetime);
    key
}

/// A recorded type mapping
#[derive(Clone, Copy, Debug)]
pub struct Binding {
    /// The implementation type mapped to the service
    pub implementation: ServiceKey,
    /// Lifetime policy of the mapping
    pub lifetime: Lifetime,
}

/// In-memory container
///
/// Stand-in for a full resolving container: records mappings and instances
/// and offers read accessors for the host and for tests. Later registrations
/// for the same service key overwrite earlier ones.
#[derive(Default)]
pub struct MemoryContainer {
    bindings: HashMap<ServiceKey, Binding>,
    instances: HashMap<ServiceKey, (Arc<dyn Any + Send + Sync>, Lifetime)>,
}

impl MemoryContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the implementation type mapped to a service
    pub fn binding(&self, service: ServiceKey) -> Option<Binding> {
        self.bindings.get(&service).copied()
    }

    /// Look up a shared instance registered via [`register_shared`]
    pub fn service<S: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<S>> {
        let (payload, _) = self.instances.get(&ServiceKey::of::<S>())?;
        payload
            .clone()
            .downcast::<Arc<S>>()
            .ok()
            .map(|shared| (*shared).clone())
    }

    /// Number of recorded type mappings
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Number of recorded instances
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }
}

impl Container for MemoryContainer {
    fn register_type(&mut self, service: ServiceKey, implementation: ServiceKey, lifetime: Lifetime) {
        self.bindings.insert(
            service,
            Binding {
                implementation,
                lifetime,
            },
        );
    }

    fn register_instance(
        &mut self,
        service: ServiceKey,
        instance: Arc<dyn Any + Send + Sync>,
        lifetime: Lifetime,
    ) {
        self.instances.insert(service, (instance, lifetime));
    }
}

impl std::fmt::Debug for MemoryContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryContainer")
            .field("bindings", &self.bindings.len())
            .field("instances", &self.instances.len())
            .finish()
    }
}
