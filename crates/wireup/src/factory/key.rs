//! Canonical factory keys
//!
//! A key identifies "construct `T` through the constructor shaped `(A1..An)`".
//! It concatenates the canonical (crate- and module-qualified) name of the
//! target type and of every argument type, `+`-separated. `type_name` renders
//! nested generic arguments, so different instantiations of the same open
//! generic type never share a key. Rust's type system admits no
//! self-referential instantiations, so the expansion is finite by
//! construction.

use super::construct::ArgTuple;

/// Build the canonical key for the `(T, A)` constructor request
pub fn canonical_key<T: ?Sized + 'static, A: ArgTuple>() -> String {
    let mut out = String::with_capacity(64);
    out.push_str(std::any::type_name::<T>());
    out.push('+');
    A::write_names(&mut out);
    out
}
