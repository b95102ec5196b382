//! Boolean generator: the simplest shrinker in the system.

use crate::generator::Arbitrary;
use crate::lazy_stream::LazyStream;
use crate::rng::Rng;
use crate::shrinkable::Shrinkable;

/// `true` shrinks to `{false}`; `false` is terminal.
pub fn boolean() -> Arbitrary<bool> {
    Arbitrary::new(|rng: &mut Rng| {
        let value = rng.gen_bool(0.5);
        shrinkable_bool(value)
    })
}

fn shrinkable_bool(value: bool) -> Shrinkable<bool> {
    Shrinkable::new(value, move || {
        if value {
            LazyStream::one(Shrinkable::leaf(false))
        } else {
            LazyStream::empty()
        }
    })
}
