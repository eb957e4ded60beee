//! Constructor shape traits
//!
//! `Construct<A>` declares that a type has a constructor whose parameters are
//! exactly the tuple `A`. Implementations are written per type and signature,
//! making the constructor surface explicit at the type's definition site
//! instead of being discovered through runtime reflection.

/// A constructor taking exactly the argument tuple `A`
///
/// One impl per supported signature. A type with a parameter-less constructor
/// and a one-argument constructor implements both `Construct<()>` and
/// `Construct<(Arg,)>`, and the two resolve to distinct cached factories.
pub trait Construct<A>: Sized {
    /// Build an instance from the positional argument tuple
    fn construct(args: A) -> Self;
}

/// Argument tuple of a constructor signature
///
/// Implemented for tuples of arity zero through five. Supplies the canonical
/// names of the element types for key building.
pub trait ArgTuple: 'static {
    /// Number of positional arguments
    const ARITY: usize;

    /// Append the canonical name of each element type, `+`-terminated
    fn write_names(out: &mut String);
}

impl ArgTuple for () {
    const ARITY: usize = 0;

    fn write_names(_out: &mut String) {}
}

macro_rules! impl_arg_tuple {
    ($arity:expr, $($arg:ident),+) => {
        impl<$($arg: 'static),+> ArgTuple for ($($arg,)+) {
            const ARITY: usize = $arity;

            fn write_names(out: &mut String) {
                $(
                    out.push_str(std::any::type_name::<$arg>());
                    out.push('+');
                )+
            }
        }
    };
}

impl_arg_tuple!(1, A1);
impl_arg_tuple!(2, A1, A2);
impl_arg_tuple!(3, A1, A2, A3);
impl_arg_tuple!(4, A1, A2, A3, A4);
impl_arg_tuple!(5, A1, A2, A3, A4, A5);
