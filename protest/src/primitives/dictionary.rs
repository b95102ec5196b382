//! Dictionary generator: an array of unique `(key, shrinkable value)`
//! pairs, shrunk by size first and then element-wise over the values.

use std::collections::HashMap;
use std::hash::Hash;

use crate::generator::Arbitrary;
use crate::rng::Rng;
use crate::vector_shrink::shrink_vector;

pub fn dictionary<K: Clone + Eq + Hash + 'static, V: Clone + 'static>(
    key: Arbitrary<K>,
    value: Arbitrary<V>,
    min_len: usize,
    max_len: usize,
) -> Arbitrary<HashMap<K, V>> {
    Arbitrary::new(move |rng: &mut Rng| {
        let target_len = rng.gen_range_usize(min_len, max_len);
        let mut seen_keys = std::collections::HashSet::new();
        let mut pairs = Vec::with_capacity(target_len);
        let mut attempts = 0;
        while pairs.len() < target_len {
            let k = key.generate(rng);
            if seen_keys.insert(k.value.clone()) {
                let v = value.generate(rng);
                pairs.push(pair_shrinkable(k.value.clone(), v));
            }
            attempts += 1;
            if attempts > target_len.max(1) * 200 {
                break;
            }
        }
        shrink_vector(pairs, min_len).map(|pairs: Vec<(K, V)>| pairs.into_iter().collect())
    })
}

fn pair_shrinkable<K: Clone + 'static, V: Clone + 'static>(
    key: K,
    value: crate::shrinkable::Shrinkable<V>,
) -> crate::shrinkable::Shrinkable<(K, V)> {
    let pair_value = (key.clone(), value.value.clone());
    let children = value.children();
    crate::shrinkable::Shrinkable::new(pair_value, move || {
        let key2 = key.clone();
        children.transform(move |v| pair_shrinkable(key2.clone(), v))
    })
}
