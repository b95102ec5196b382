//! Integer generator and its binary-search shrinker.

use crate::config::GeneratorConfig;
use crate::generator::Arbitrary;
use crate::lazy_stream::LazyStream;
use crate::rng::Rng;
use crate::shrinkable::Shrinkable;

/// Integer generator over the inclusive range `[lo, hi]`. With
/// `Rng::gen_range_i64_biased`'s boundary probability, the sampler
/// sometimes returns an endpoint directly instead of sampling uniformly.
pub fn integer(lo: i64, hi: i64) -> Arbitrary<i64> {
    assert!(lo <= hi, "integer: lo must be <= hi");
    Arbitrary::new(move |rng: &mut Rng| {
        let value = rng.gen_range_i64_biased(lo, hi);
        shrinkable_toward(value, lo, hi)
    })
}

/// Integer generator sized by the config's `size_hint`, for callers that
/// don't need an explicit range (e.g. a default numeric field generator).
pub fn integer_sized(config: &GeneratorConfig) -> Arbitrary<i64> {
    let bound = config.size_hint as i64;
    integer(-bound, bound)
}

/// Non-negative integer, handy for lengths and counts.
pub fn non_negative_integer(hi: i64) -> Arbitrary<i64> {
    integer(0, hi)
}

fn shrinkable_toward(value: i64, lo: i64, hi: i64) -> Shrinkable<i64> {
    Shrinkable::new(value, move || integer_children(value, lo, hi))
}

/// Dispatch on the range shape: toward `lo` when the whole range is
/// non-negative, toward `hi` (mirrored) when it's non-positive, otherwise
/// toward 0 with 0 always offered first.
fn integer_children(value: i64, lo: i64, hi: i64) -> LazyStream<Shrinkable<i64>> {
    if value == lo {
        return LazyStream::empty();
    }
    if lo >= 0 {
        return bisect(lo, value, lo, hi);
    }
    if hi <= 0 {
        return bisect_negated(value, hi, lo, hi);
    }
    if value == 0 {
        return LazyStream::empty();
    }
    let toward_zero = if value > 0 {
        bisect(0, value, lo, hi)
    } else {
        bisect_negated(value, 0, lo, hi)
    };
    LazyStream::cons(Shrinkable::leaf(0i64), move || toward_zero.clone())
}

/// Binary search over the half-open span `[floor, value)`, approaching
/// `floor` by repeated halving; `cons(mid, concat(recurse(floor,mid),
/// recurse(mid+1,value)))`.
fn bisect(floor: i64, value: i64, lo: i64, hi: i64) -> LazyStream<Shrinkable<i64>> {
    if floor >= value {
        return LazyStream::empty();
    }
    let mid = floor + (value - floor) / 2;
    let node = shrinkable_toward(mid, lo, hi);
    LazyStream::cons(node, move || {
        bisect(floor, mid, lo, hi).concat(bisect(mid + 1, value, lo, hi))
    })
}

/// Mirror of `bisect` for shrinking toward a non-positive ceiling: negate,
/// bisect in positive space, negate the result back.
fn bisect_negated(value: i64, ceiling: i64, lo: i64, hi: i64) -> LazyStream<Shrinkable<i64>> {
    bisect(-ceiling, -value, -hi, -lo).transform(|s| s.map(|v| -v))
}
