//! Permutations of `[0, n)`. The initial value is a Fisher-Yates shuffle
//! of the identity permutation; each shrink places the first out-of-place
//! element into its correct slot, one step per child, converging on the
//! identity permutation in at most `n - 1` steps with inversions never
//! increasing along the way.

use crate::generator::Arbitrary;
use crate::lazy_stream::LazyStream;
use crate::rng::Rng;
use crate::shrinkable::Shrinkable;

pub fn permutation(n: usize) -> Arbitrary<Vec<usize>> {
    Arbitrary::new(move |rng: &mut Rng| {
        let mut values: Vec<usize> = (0..n).collect();
        for i in (1..n).rev() {
            let j = rng.gen_range_usize(0, i);
            values.swap(i, j);
        }
        permutation_shrinkable(values)
    })
}

fn permutation_shrinkable(value: Vec<usize>) -> Shrinkable<Vec<usize>> {
    Shrinkable::new(value.clone(), move || permutation_children(value.clone()))
}

fn permutation_children(value: Vec<usize>) -> LazyStream<Shrinkable<Vec<usize>>> {
    match first_out_of_place(&value) {
        None => LazyStream::empty(),
        Some(i) => {
            let mut next = value.clone();
            let j = next.iter().position(|&v| v == i).expect("permutation is a bijection");
            next.swap(i, j);
            LazyStream::one(permutation_shrinkable(next))
        }
    }
}

fn first_out_of_place(value: &[usize]) -> Option<usize> {
    value.iter().enumerate().find(|(i, &v)| *i != v).map(|(i, _)| i)
}
