//! Constructor inventory
//!
//! Auto-registration of constructor signatures using linkme distributed
//! slices. Each `ConstructorEntry` advertises one constructor of one type at
//! compile time; the factory cache consults the inventory on a cache miss,
//! which is the Rust counterpart of a reflective constructor lookup.
//!
//! ## Registering a constructor
//!
//! ```ignore
//! use wireup::factory::{Construct, ConstructorEntry, CONSTRUCTORS};
//!
//! impl Construct<(AppConfig,)> for Widget {
//!     fn construct((config,): (AppConfig,)) -> Self {
//!         Widget { config }
//!     }
//! }
//!
//! #[linkme::distributed_slice(CONSTRUCTORS)]
//! static WIDGET_FROM_CONFIG: ConstructorEntry = ConstructorEntry::of::<Widget, (AppConfig,)>();
//! ```

use std::any::{Any, TypeId};

use super::construct::{ArgTuple, Construct};
use super::key::canonical_key;
use crate::error::{Error, Result};

/// Registry entry advertising one constructor of one type
///
/// Fields are function pointers rather than values because `TypeId::of` and
/// key building are not const-evaluable in a static initializer.
#[derive(Debug)]
pub struct ConstructorEntry {
    /// Identity of the constructed type
    pub target: fn() -> TypeId,
    /// Identity of the argument tuple type
    pub args: fn() -> TypeId,
    /// Canonical key producer for diagnostics and cache indexing
    pub key: fn() -> String,
    /// Materialize the trampoline; the payload must be `fn(A) -> T`
    pub build: fn() -> Box<dyn Any + Send + Sync>,
}

// Auto-collection via linkme distributed slices - constructors submit entries at compile time
#[linkme::distributed_slice]
pub static CONSTRUCTORS: [ConstructorEntry] = [..];

impl ConstructorEntry {
    /// Entry for the `Construct<A>` impl of `T`
    pub const fn of<T, A>() -> Self
    where
        T: Construct<A> + 'static,
        A: ArgTuple,
    {
        Self {
            target: TypeId::of::<T>,
            args: TypeId::of::<A>,
            key: canonical_key::<T, A>,
            build: build_trampoline::<T, A>,
        }
    }

    /// Whether this entry advertises the requested (type, signature) pair
    pub fn matches(&self, target: TypeId, args: TypeId) -> bool {
        (self.target)() == target && (self.args)() == args
    }
}

fn build_trampoline<T: Construct<A> + 'static, A: ArgTuple>() -> Box<dyn Any + Send + Sync> {
    Box::new(T::construct as fn(A) -> T)
}

/// Locate the single inventory entry for the requested signature
///
/// Exactly one entry must match: none at all is a missing constructor, more
/// than one means the declaration surface is ambiguous and no winner can be
/// picked deterministically.
pub(crate) fn find_constructor(
    target: TypeId,
    args: TypeId,
    key: &str,
) -> Result<&'static ConstructorEntry> {
    let mut matches = CONSTRUCTORS.iter().filter(|e| e.matches(target, args));
    let Some(first) = matches.next() else {
        return Err(Error::NoMatchingConstructor {
            key: key.to_string(),
        });
    };
    if matches.next().is_some() {
        return Err(Error::AmbiguousOrInaccessibleConstructor {
            key: key.to_string(),
            reason: "more than one constructor registered for this signature".to_string(),
        });
    }
    Ok(first)
}

/// List the canonical keys of all registered constructors
pub fn list_constructors() -> Vec<String> {
    CONSTRUCTORS.iter().map(|e| (e.key)()).collect()
}
