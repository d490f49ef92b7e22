//! Placeholder values returned by a mock while it records a stub.
//!
//! The trigger call's return value is discarded by `set_return_value` and
//! `set_body`, but the mocked method still has to return something of its
//! declared type. Placeholders are zero for numbers, `false`, empty
//! collections, `None`, and `Ok` around the inner placeholder.
//!
//! Placeholders are resolved per concrete return type through this trait;
//! a generic return type needs a `Placeholder` bound. User types opt in with
//! [`placeholder_via_default!`](crate::placeholder_via_default) or a manual impl.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

/// Type that can stand in for a method result during recording.
pub trait Placeholder {
    /// The placeholder value
    fn placeholder() -> Self;
}

/// Implement [`Placeholder`] through `Default` for the listed types.
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct Profile { name: String }
///
/// mockar::placeholder_via_default!(Profile);
/// ```
#[macro_export]
macro_rules! placeholder_via_default {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Placeholder for $ty {
                fn placeholder() -> Self {
                    <$ty as ::core::default::Default>::default()
                }
            }
        )+
    };
}

placeholder_via_default!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    String,
    std::time::Duration,
    std::path::PathBuf,
);

impl<T> Placeholder for Option<T> {
    fn placeholder() -> Self {
        None
    }
}

impl<T: Placeholder, E> Placeholder for Result<T, E> {
    fn placeholder() -> Self {
        Ok(T::placeholder())
    }
}

impl<T> Placeholder for Vec<T> {
    fn placeholder() -> Self {
        Self::new()
    }
}

impl<T> Placeholder for VecDeque<T> {
    fn placeholder() -> Self {
        Self::new()
    }
}

impl<K, V, S: BuildHasher + Default> Placeholder for HashMap<K, V, S> {
    fn placeholder() -> Self {
        Self::default()
    }
}

impl<T, S: BuildHasher + Default> Placeholder for HashSet<T, S> {
    fn placeholder() -> Self {
        Self::default()
    }
}

impl<K, V> Placeholder for BTreeMap<K, V> {
    fn placeholder() -> Self {
        Self::new()
    }
}

impl<T> Placeholder for BTreeSet<T> {
    fn placeholder() -> Self {
        Self::new()
    }
}

impl<T: Placeholder> Placeholder for Box<T> {
    fn placeholder() -> Self {
        Self::new(T::placeholder())
    }
}

impl<T: Placeholder> Placeholder for Rc<T> {
    fn placeholder() -> Self {
        Self::new(T::placeholder())
    }
}

impl<T: Placeholder> Placeholder for Arc<T> {
    fn placeholder() -> Self {
        Self::new(T::placeholder())
    }
}

macro_rules! placeholder_tuple {
    ($($name:ident),+) => {
        impl<$($name: Placeholder),+> Placeholder for ($($name,)+) {
            fn placeholder() -> Self {
                ($($name::placeholder(),)+)
            }
        }
    };
}

placeholder_tuple!(A);
placeholder_tuple!(A, B);
placeholder_tuple!(A, B, C);
placeholder_tuple!(A, B, C, D);
