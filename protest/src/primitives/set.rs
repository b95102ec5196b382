//! Set generator: unique elements generated via rejection, shrunk by
//! reusing the array shrinker and rebuilding uniqueness on each child.

use std::collections::HashSet;
use std::hash::Hash;

use crate::generator::Arbitrary;
use crate::rng::Rng;
use crate::vector_shrink::shrink_vector;

pub fn set<T: Clone + Eq + Hash + 'static>(
    element: Arbitrary<T>,
    min_len: usize,
    max_len: usize,
) -> Arbitrary<Vec<T>> {
    Arbitrary::new(move |rng: &mut Rng| {
        let target_len = rng.gen_range_usize(min_len, max_len);
        let mut seen = HashSet::new();
        let mut elems = Vec::with_capacity(target_len);
        let mut attempts = 0;
        while elems.len() < target_len {
            let candidate = element.generate(rng);
            if seen.insert(candidate.value.clone()) {
                elems.push(candidate);
            }
            attempts += 1;
            if attempts > target_len.max(1) * 200 {
                break;
            }
        }
        shrink_vector(elems, min_len).map(dedupe)
    })
}

fn dedupe<T: Clone + Eq + Hash>(values: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    values.into_iter().filter(|v| seen.insert(v.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::integer::integer;

    #[test]
    fn generated_sets_have_unique_elements() {
        let gen = set(integer(0, 30), 3, 5);
        let mut rng = Rng::from_seed_string("set-seed");
        for _ in 0..20 {
            let value = gen.generate(&mut rng).value;
            let unique: std::collections::HashSet<_> = value.iter().collect();
            assert_eq!(unique.len(), value.len());
        }
    }

    #[test]
    fn shrinks_stay_unique() {
        let gen = set(integer(0, 30), 0, 5);
        let mut rng = Rng::from_seed_string("set-shrink-seed");
        let shrinkable = gen.generate(&mut rng);
        for child in shrinkable.children().to_vec() {
            let unique: std::collections::HashSet<_> = child.value.iter().collect();
            assert_eq!(unique.len(), child.value.len());
        }
    }
}
