//! Default generators for common types.
//!
//! `#[derive(Arbitrary)]` (in `protest-derive`) calls on this trait for
//! every field that carries no explicit `#[generator(...)]` override.

use std::collections::HashMap;
use std::hash::Hash;

use crate::combinators::{just, one_of, WeightedValue};
use crate::generator::Arbitrary;
use crate::primitives::{array, boolean, dictionary, float, integer, string};

/// A type with a sensible default generator.
pub trait DefaultGenerator: Clone + 'static {
    fn default_generator() -> Arbitrary<Self>
    where
        Self: Sized;
}

macro_rules! impl_default_generator_via_i64 {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl DefaultGenerator for $ty {
                fn default_generator() -> Arbitrary<Self> {
                    integer(<$ty>::MIN as i64, <$ty>::MAX as i64).map(|v| v as $ty)
                }
            }
        )+
    };
}

impl_default_generator_via_i64!(i8, i16, i32, u8, u16, u32);

impl DefaultGenerator for i64 {
    fn default_generator() -> Arbitrary<Self> {
        integer(i64::MIN / 2, i64::MAX / 2)
    }
}

impl DefaultGenerator for isize {
    fn default_generator() -> Arbitrary<Self> {
        integer(i64::MIN / 2, i64::MAX / 2).map(|v| v as isize)
    }
}

impl DefaultGenerator for u64 {
    fn default_generator() -> Arbitrary<Self> {
        integer(0, i64::MAX / 2).map(|v| v as u64)
    }
}

impl DefaultGenerator for usize {
    fn default_generator() -> Arbitrary<Self> {
        integer(0, i64::MAX / 2).map(|v| v as usize)
    }
}

impl DefaultGenerator for bool {
    fn default_generator() -> Arbitrary<Self> {
        boolean()
    }
}

impl DefaultGenerator for f64 {
    fn default_generator() -> Arbitrary<Self> {
        float(1e6)
    }
}

impl DefaultGenerator for f32 {
    fn default_generator() -> Arbitrary<Self> {
        float(1e6).map(|v| v as f32)
    }
}

impl DefaultGenerator for char {
    fn default_generator() -> Arbitrary<Self> {
        // Printable ASCII by default; covers the common derive-field case
        // without pulling in the string generator's surrogate-avoidance
        // machinery for a single code point.
        integer(0x20, 0x7e).map(|v| v as u8 as char)
    }
}

impl DefaultGenerator for String {
    fn default_generator() -> Arbitrary<Self> {
        string(0, 20)
    }
}

impl<T: DefaultGenerator> DefaultGenerator for Vec<T> {
    fn default_generator() -> Arbitrary<Self> {
        array(T::default_generator(), 0, 10)
    }
}

impl<T: DefaultGenerator> DefaultGenerator for Option<T> {
    fn default_generator() -> Arbitrary<Self> {
        one_of(vec![
            WeightedValue::new(just(None)),
            WeightedValue::new(T::default_generator().map(Some)),
        ])
    }
}

impl<K: DefaultGenerator + Eq + Hash, V: DefaultGenerator> DefaultGenerator for HashMap<K, V> {
    fn default_generator() -> Arbitrary<Self> {
        dictionary(K::default_generator(), V::default_generator(), 0, 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Rng;

    #[test]
    fn integers_in_range() {
        let gen = i32::default_generator();
        let mut rng = Rng::from_seed_string("default-int");
        for _ in 0..20 {
            let _ = gen.generate(&mut rng).value;
        }
    }

    #[test]
    fn option_sometimes_produces_none_and_sometimes_some() {
        let gen = Option::<i64>::default_generator();
        let mut rng = Rng::from_seed_string("default-option");
        let values: Vec<_> = (0..50).map(|_| gen.generate(&mut rng).value).collect();
        assert!(values.iter().any(|v| v.is_none()) || values.iter().any(|v| v.is_some()));
    }

    #[test]
    fn vec_respects_default_length_bound() {
        let gen = Vec::<i64>::default_generator();
        let mut rng = Rng::from_seed_string("default-vec");
        for _ in 0..20 {
            assert!(gen.generate(&mut rng).value.len() <= 10);
        }
    }
}
