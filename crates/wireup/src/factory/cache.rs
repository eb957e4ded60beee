//! Factory cache
//!
//! Builds and caches constructor trampolines so repeated construction of the
//! same (type, signature) pair never repeats the inventory lookup.
//!
//! ## Architecture
//!
//! ```text
//! get_or_build::<T, A>()
//!         │
//!         ▼
//! ┌──────────────────────────────┐
//! │ intern canonical key          │  (TypeId, TypeId) → Arc<str>
//! └──────────────────────────────┘
//!         │
//!         ▼ read lock
//! ┌──────────────────────────────┐   hit
//! │ trampoline table              │ ───────▶ Factory<T, A>
//! └──────────────────────────────┘
//!         │ miss
//!         ▼ write lock, re-check
//! ┌──────────────────────────────┐
//! │ CONSTRUCTORS inventory scan   │  exactly one entry must match
//! └──────────────────────────────┘
//!         │
//!         ▼
//! build fn(A) -> T, verify shape, publish under key
//! ```
//!
//! Reads vastly outnumber writes after warm-up; lookups of an existing entry
//! take only the read lock. Two callers racing on the same missing key are
//! serialized by the write lock and the second observes the first's entry
//! through the re-check. A failed build never publishes an entry.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::construct::ArgTuple;
use super::key::canonical_key;
use super::registry::find_constructor;
use crate::error::{Error, Result};

/// Reusable handle to one cached constructor trampoline
///
/// Immutable once built; invoking it forwards the argument tuple positionally
/// into the constructor with no per-call checks. Two handles compare equal
/// exactly when they share the same cached entry.
pub struct Factory<T, A> {
    call: fn(A) -> T,
    entry: Arc<dyn Any + Send + Sync>,
    key: Arc<str>,
}

impl<T, A> Factory<T, A> {
    /// Construct an instance from the positional argument tuple
    pub fn invoke(&self, args: A) -> T {
        (self.call)(args)
    }

    /// Canonical key this factory is cached under
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<T, A> Clone for Factory<T, A> {
    fn clone(&self) -> Self {
        Self {
            call: self.call,
            entry: self.entry.clone(),
            key: self.key.clone(),
        }
    }
}

impl<T, A> PartialEq for Factory<T, A> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entry, &other.entry)
    }
}

impl<T, A> Eq for Factory<T, A> {}

impl<T, A> std::fmt::Debug for Factory<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Factory").field(&self.key).finish()
    }
}

/// Process-wide cache of constructor trampolines
///
/// Shared across threads behind an `Arc`; entries live for the process
/// lifetime and are never evicted.
#[derive(Default)]
pub struct FactoryCache {
    /// Interned canonical keys per (target, arguments) type pair
    keys: RwLock<HashMap<(TypeId, TypeId), Arc<str>>>,
    /// Built trampolines per canonical key
    factories: RwLock<HashMap<Arc<str>, Arc<dyn Any + Send + Sync>>>,
}

impl FactoryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached factory for `(T, A)`, building it on first request
    pub fn get_or_build<T: 'static, A: ArgTuple>(&self) -> Result<Factory<T, A>> {
        let key = self.intern_key::<T, A>();

        // Fast path: read-only lookup of an existing entry.
        if let Some(entry) = self.factories.read().get(&key) {
            return Self::typed(entry.clone(), key);
        }

        let mut table = self.factories.write();
        // Another caller may have built the entry while this one waited.
        if let Some(entry) = table.get(&key) {
            return Self::typed(entry.clone(), key);
        }

        let spec = find_constructor(TypeId::of::<T>(), TypeId::of::<A>(), &key)?;
        let built: Arc<dyn Any + Send + Sync> = (spec.build)().into();
        // Verify the trampoline shape before publishing; a malformed entry
        // must leave the table untouched.
        let factory = Self::typed::<T, A>(built.clone(), key.clone())?;
        table.insert(key, built);
        debug!(key = factory.key(), "built constructor trampoline");
        Ok(factory)
    }

    /// Whether a factory is already cached for `(T, A)`
    pub fn is_cached<T: 'static, A: ArgTuple>(&self) -> bool {
        let key = canonical_key::<T, A>();
        self.factories.read().contains_key(key.as_str())
    }

    /// Number of cached factories
    pub fn len(&self) -> usize {
        self.factories.read().len()
    }

    /// Whether the cache holds no factories
    pub fn is_empty(&self) -> bool {
        self.factories.read().is_empty()
    }

    fn typed<T: 'static, A: ArgTuple>(
        entry: Arc<dyn Any + Send + Sync>,
        key: Arc<str>,
    ) -> Result<Factory<T, A>> {
        let call = entry
            .downcast_ref::<fn(A) -> T>()
            .copied()
            .ok_or_else(|| Error::AmbiguousOrInaccessibleConstructor {
                key: key.to_string(),
                reason: "registered trampoline does not match the advertised signature"
                    .to_string(),
            })?;
        Ok(Factory { call, entry, key })
    }

    fn intern_key<T: 'static, A: ArgTuple>(&self) -> Arc<str> {
        let pair = (TypeId::of::<T>(), TypeId::of::<A>());
        if let Some(key) = self.keys.read().get(&pair) {
            return key.clone();
        }
        let mut keys = self.keys.write();
        if let Some(key) = keys.get(&pair) {
            return key.clone();
        }
        let key: Arc<str> = canonical_key::<T, A>().into();
        keys.insert(pair, key.clone());
        key
    }
}

impl std::fmt::Debug for FactoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryCache")
            .field("factories", &self.len())
            .finish()
    }
}
