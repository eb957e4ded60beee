//! Module registrar
//!
//! Walks the static dependency graph of registration modules rooted at a
//! given module and applies each reachable module to the container exactly
//! once, dependencies first.
//!
//! ## Architecture
//!
//! ```text
//! register(container, root)
//!         │
//!         ▼
//! ┌───────────────────────────────┐
//! │ ResolutionState               │  applied set + in-progress path,
//! │ (scoped to this call)         │  discarded when the call returns
//! └───────────────────────────────┘
//!         │
//!         ▼ per module, depth-first
//! lookup in MODULES inventory → construct via FactoryCache
//!         → recurse into declared dependencies → apply(container)
//! ```
//!
//! Among dependencies declared by one module, application follows declaration
//! order; across unrelated branches only the declared partial order holds.
//! The walk is synchronous and meant to run once during bootstrap; callers
//! needing concurrent bootstrap must serialize `register`.

use std::any::TypeId;
use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::container::Container;
use crate::error::{Error, Result};
use crate::factory::FactoryCache;
use crate::module::{lookup_module, ModuleId};

/// Applies registration module graphs to a container
///
/// Holds no graph state of its own; every `register` call resolves against a
/// fresh [`ResolutionState`]. The factory cache is an explicit collaborator,
/// passed in at construction rather than reached through a global.
pub struct ModuleRegistrar {
    factories: Arc<FactoryCache>,
}

/// Transient bookkeeping for one root-resolution call
#[derive(Default)]
struct ResolutionState {
    /// Modules fully applied (dependencies + self)
    applied: HashSet<TypeId>,
    /// Path of modules currently being applied, for cycle detection
    in_progress: Vec<ModuleId>,
    /// Names of applied modules, in application order
    order: Vec<&'static str>,
}

impl ResolutionState {
    fn cycle_through(&self, offender: ModuleId) -> String {
        let mut names: Vec<&str> = self.in_progress.iter().map(ModuleId::name).collect();
        names.push(offender.name());
        names.join(" -> ")
    }
}

impl ModuleRegistrar {
    /// Create a registrar that instantiates modules through the given cache
    pub fn new(factories: Arc<FactoryCache>) -> Self {
        Self { factories }
    }

    /// Apply the module graph rooted at `root` to the container
    ///
    /// Returns the names of the applied modules in application order. Every
    /// module reachable from the root is applied exactly once; for every
    /// declared edge the dependency's registrations land strictly before the
    /// dependent's.
    pub fn register(
        &self,
        container: &mut dyn Container,
        root: ModuleId,
    ) -> Result<Vec<&'static str>> {
        let mut state = ResolutionState::default();
        self.apply(&mut state, container, root)?;
        info!(
            root = root.name(),
            applied = state.order.len(),
            "module graph applied"
        );
        Ok(state.order)
    }

    /// Apply several roots under one shared resolution state
    ///
    /// A root already applied by an earlier root in the slice (or listed
    /// twice) is a no-op the second time.
    pub fn register_all(
        &self,
        container: &mut dyn Container,
        roots: &[ModuleId],
    ) -> Result<Vec<&'static str>> {
        let mut state = ResolutionState::default();
        for root in roots {
            self.apply(&mut state, container, *root)?;
        }
        Ok(state.order)
    }

    fn apply(
        &self,
        state: &mut ResolutionState,
        container: &mut dyn Container,
        id: ModuleId,
    ) -> Result<()> {
        if state.applied.contains(&id.type_id()) {
            return Ok(());
        }
        if state.in_progress.contains(&id) {
            return Err(Error::CyclicDependency {
                cycle: state.cycle_through(id),
            });
        }

        let entry = lookup_module(id.type_id()).ok_or_else(|| {
            Error::InvalidDependencyDeclaration {
                module: id.name().to_string(),
            }
        })?;
        let module = (entry.construct)(&self.factories)?;

        // Every declared dependency must name a registered module before any
        // of them is applied; an invalid declaration aborts the subtree.
        let deps = module.dependencies();
        for dep in deps {
            if lookup_module(dep.type_id()).is_none() {
                return Err(Error::InvalidDependencyDeclaration {
                    module: dep.name().to_string(),
                });
            }
        }

        state.in_progress.push(id);
        for dep in deps {
            self.apply(state, container, *dep)?;
        }

        // Registration-body failures propagate; bootstrap is fail-fast.
        let registered = module.apply(container)?;
        state.in_progress.pop();
        state.applied.insert(id.type_id());
        state.order.push(id.name());
        debug!(
            module = id.name(),
            registered = registered.len(),
            "applied registration module"
        );
        Ok(())
    }
}

impl std::fmt::Debug for ModuleRegistrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistrar").finish_non_exhaustive()
    }
}
