//! Heterogeneous, fixed-arity tuple generators. Each slot shrinks
//! independently of the others; the child stream interleaves per-slot
//! shrinks with slot 0 exhausted before slot 1 is touched, and so on.

use crate::generator::Arbitrary;
use crate::rng::Rng;
use crate::shrinkable::Shrinkable;

fn shrink_pair<A: Clone + 'static, B: Clone + 'static>(
    a: Shrinkable<A>,
    b: Shrinkable<B>,
) -> Shrinkable<(A, B)> {
    let value = (a.value.clone(), b.value.clone());
    Shrinkable::new(value, move || {
        let a2 = a.clone();
        let b2 = b.clone();
        let slot0 = a.children().transform(move |ca| shrink_pair(ca, b2.clone()));
        let slot1 = b.children().transform(move |cb| shrink_pair(a2.clone(), cb));
        slot0.concat(slot1)
    })
}

pub fn tuple2<A: Clone + 'static, B: Clone + 'static>(
    a: Arbitrary<A>,
    b: Arbitrary<B>,
) -> Arbitrary<(A, B)> {
    Arbitrary::new(move |rng: &mut Rng| {
        let sa = a.generate(rng);
        let sb = b.generate(rng);
        shrink_pair(sa, sb)
    })
}

pub fn tuple3<A: Clone + 'static, B: Clone + 'static, C: Clone + 'static>(
    a: Arbitrary<A>,
    b: Arbitrary<B>,
    c: Arbitrary<C>,
) -> Arbitrary<(A, B, C)> {
    let inner = tuple2(tuple2(a, b), c);
    Arbitrary::new(move |rng: &mut Rng| {
        inner
            .generate(rng)
            .map(|((a, b), c)| (a, b, c))
    })
}

pub fn tuple4<A: Clone + 'static, B: Clone + 'static, C: Clone + 'static, D: Clone + 'static>(
    a: Arbitrary<A>,
    b: Arbitrary<B>,
    c: Arbitrary<C>,
    d: Arbitrary<D>,
) -> Arbitrary<(A, B, C, D)> {
    let inner = tuple2(tuple3(a, b, c), d);
    Arbitrary::new(move |rng: &mut Rng| {
        inner
            .generate(rng)
            .map(|((a, b, c), d)| (a, b, c, d))
    })
}

pub fn tuple5<
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    D: Clone + 'static,
    E: Clone + 'static,
>(
    a: Arbitrary<A>,
    b: Arbitrary<B>,
    c: Arbitrary<C>,
    d: Arbitrary<D>,
    e: Arbitrary<E>,
) -> Arbitrary<(A, B, C, D, E)> {
    let inner = tuple2(tuple4(a, b, c, d), e);
    Arbitrary::new(move |rng: &mut Rng| {
        inner
            .generate(rng)
            .map(|((a, b, c, d), e)| (a, b, c, d, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::integer::integer;

    #[test]
    fn generates_both_slots() {
        let gen = tuple2(integer(0, 10), integer(100, 110));
        let mut rng = Rng::from_seed_string("tuple-seed");
        let (a, b) = gen.generate(&mut rng).value;
        assert!((0..=10).contains(&a));
        assert!((100..=110).contains(&b));
    }

    #[test]
    fn slot_zero_shrinks_exhaust_before_slot_one() {
        let gen = tuple2(integer(5, 5), integer(5, 5));
        let mut rng = Rng::from_seed_string("tuple-shrink-seed");
        let shrinkable = gen.generate(&mut rng);
        // Fixed-width generators (lo==hi) have no shrinks in either slot.
        assert!(shrinkable.children().is_empty());
    }

    #[test]
    fn three_slots_shrink_independently() {
        let gen = tuple3(integer(0, 20), integer(0, 20), integer(0, 20));
        let mut rng = Rng::from_seed_string("tuple3-seed");
        let shrinkable = gen.generate(&mut rng);
        for child in shrinkable.children().to_vec().into_iter().take(5) {
            let (a, b, c) = child.value;
            assert!((0..=20).contains(&a) && (0..=20).contains(&b) && (0..=20).contains(&c));
        }
    }
}
