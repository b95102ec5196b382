//! Float generator: exponent/fraction decomposition plus integer-ification,
//! per the canonical-minimum-of-0.0 shrink policy.

use crate::generator::Arbitrary;
use crate::lazy_stream::LazyStream;
use crate::rng::Rng;
use crate::shrinkable::Shrinkable;

/// Uniform-ish float in `[-bound, bound]`.
pub fn float(bound: f64) -> Arbitrary<f64> {
    Arbitrary::new(move |rng: &mut Rng| {
        let unit = rng.gen_f64() * 2.0 - 1.0;
        shrinkable_float(unit * bound)
    })
}

fn shrinkable_float(value: f64) -> Shrinkable<f64> {
    if value.is_nan() {
        return Shrinkable::new(value, || LazyStream::one(Shrinkable::leaf(0.0f64)));
    }
    let canonical = if value.is_infinite() {
        if value.is_sign_positive() { f64::MAX } else { f64::MIN }
    } else {
        value
    };
    Shrinkable::new(canonical, move || float_children(canonical))
}

fn float_children(value: f64) -> LazyStream<Shrinkable<f64>> {
    if value == 0.0 {
        return LazyStream::empty();
    }
    let zero = LazyStream::one(Shrinkable::leaf(0.0f64));
    let (fraction, exponent) = frexp(value);
    let exponent_shrinks = bisect_exponent(0, exponent, fraction);
    let flipped_fraction = 0.5f64.copysign(fraction);
    let fraction_flip = if flipped_fraction != fraction {
        LazyStream::one(shrinkable_float(ldexp(flipped_fraction, exponent)))
    } else {
        LazyStream::empty()
    };
    let int_shrinks = integerification_stream(value);
    zero.concat(exponent_shrinks)
        .concat(fraction_flip)
        .concat(int_shrinks)
}

/// Binary search on the exponent toward 0, fraction held fixed.
fn bisect_exponent(floor: i32, exponent: i32, fraction: f64) -> LazyStream<Shrinkable<f64>> {
    if floor >= exponent {
        return LazyStream::empty();
    }
    let mid = floor + (exponent - floor) / 2;
    let node = shrinkable_float(ldexp(fraction, mid));
    LazyStream::cons(node, move || {
        bisect_exponent(floor, mid, fraction).concat(bisect_exponent(mid + 1, exponent, fraction))
    })
}

fn integerification_stream(value: f64) -> LazyStream<Shrinkable<f64>> {
    let floor_v = value.floor();
    let ceil_v = value.ceil();
    let mut candidates = Vec::new();
    if floor_v != 0.0 && floor_v.abs() < value.abs() {
        candidates.push(floor_v);
    }
    if ceil_v != floor_v && ceil_v != 0.0 && ceil_v.abs() < value.abs() {
        candidates.push(ceil_v);
    }
    candidates
        .into_iter()
        .fold(LazyStream::empty(), |acc, v| acc.concat(LazyStream::one(shrinkable_float(v))))
}

/// Decompose into `fraction * 2^exponent` with `fraction` in `[0.5, 1.0)`
/// (or the mirror range for negative values). Denormals are not handled
/// specially; this is the generator's internal shrink machinery, not a
/// general-purpose numeric routine.
fn frexp(value: f64) -> (f64, i32) {
    if value == 0.0 {
        return (0.0, 0);
    }
    let bits = value.to_bits();
    let sign = bits >> 63;
    let exponent_bits = ((bits >> 52) & 0x7ff) as i32;
    let mantissa_bits = bits & 0xf_ffff_ffff_ffff;
    let exponent = exponent_bits - 1022;
    let fraction_bits = (sign << 63) | (1022u64 << 52) | mantissa_bits;
    (f64::from_bits(fraction_bits), exponent)
}

fn ldexp(fraction: f64, exponent: i32) -> f64 {
    fraction * 2f64.powi(exponent)
}
