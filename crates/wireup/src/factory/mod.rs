//! Constructor factory system
//!
//! Replaces repeated constructor lookup with reusable trampolines, keyed by
//! the canonical names of the target type and its argument types:
//!
//! - [`construct`] - the `Construct<A>`/`ArgTuple` declaration surface
//! - [`key`] - canonical key building
//! - [`registry`] - the linkme constructor inventory
//! - [`cache`] - the shared, double-checked trampoline cache

pub mod cache;
pub mod construct;
pub mod key;
pub mod registry;

pub use cache::{Factory, FactoryCache};
pub use construct::{ArgTuple, Construct};
pub use key::canonical_key;
pub use registry::{list_constructors, ConstructorEntry, CONSTRUCTORS};
