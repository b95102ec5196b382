//! Array generator built from an element generator: length shrinks before
//! element shrinks, the same ordering the string/accumulate shrinkers use.
//!
//! This implements the length-then-element strategy only; it omits the
//! "front-then-mid" bulk removal strategies the advanced shrinker
//! documents, per the open question that a minimal implementation may
//! skip those as long as the length-shrink-first and shrink-tree-validity
//! invariants still hold.

use crate::generator::Arbitrary;
use crate::rng::Rng;
use crate::vector_shrink::shrink_vector;

pub fn array<T: Clone + 'static>(
    element: Arbitrary<T>,
    min_len: usize,
    max_len: usize,
) -> Arbitrary<Vec<T>> {
    Arbitrary::new(move |rng: &mut Rng| {
        let target_len = rng.gen_range_usize(min_len, max_len);
        let elems = (0..target_len).map(|_| element.generate(rng)).collect();
        shrink_vector(elems, min_len)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::integer::integer;

    #[test]
    fn generated_arrays_respect_length_bounds() {
        let gen = array(integer(0, 5), 1, 4);
        let mut rng = Rng::from_seed_string("array-seed");
        for _ in 0..20 {
            let value = gen.generate(&mut rng).value;
            assert!(value.len() >= 1 && value.len() <= 4);
        }
    }

    #[test]
    fn first_shrink_has_smaller_length_when_above_min() {
        let gen = array(integer(0, 5), 0, 4);
        let mut rng = Rng::from_seed_string("array-shrink-seed");
        let shrinkable = gen.generate(&mut rng);
        if !shrinkable.value.is_empty() {
            let first = shrinkable.children().head();
            assert!(first.value.len() < shrinkable.value.len());
        }
    }
}
