//! The generator algebra: `Generator<T>` and its concrete implementation
//! `Arbitrary<T>`, built from a function `rng -> Shrinkable<T>`, plus the
//! map/filter/flat_map/chain/accumulate/aggregate combinators.

use std::rc::Rc;

use crate::rng::Rng;
use crate::shrinkable::Shrinkable;
use crate::vector_shrink::shrink_vector;

/// Anything that can produce a `Shrinkable<T>` from an `Rng`.
pub trait Generator<T: Clone + 'static> {
    fn generate(&self, rng: &mut Rng) -> Shrinkable<T>;
}

/// The concrete generator type: a boxed closure `rng -> Shrinkable<T>`
/// plus the map/filter/flat_map/chain/accumulate/aggregate combinators.
#[derive(Clone)]
pub struct Arbitrary<T> {
    gen_fn: Rc<dyn Fn(&mut Rng) -> Shrinkable<T>>,
}

impl<T: Clone + 'static> Arbitrary<T> {
    pub fn new(f: impl Fn(&mut Rng) -> Shrinkable<T> + 'static) -> Self {
        Arbitrary {
            gen_fn: Rc::new(f),
        }
    }

    pub fn generate(&self, rng: &mut Rng) -> Shrinkable<T> {
        (self.gen_fn)(rng)
    }

    /// Lift the produced `Shrinkable` via `Shrinkable::map`.
    pub fn map<U: Clone + 'static>(&self, f: impl Fn(T) -> U + Clone + 'static) -> Arbitrary<U> {
        let self_gen = self.clone();
        Arbitrary::new(move |rng| self_gen.generate(rng).map(f.clone()))
    }

    /// Rejection sampling: regenerate until `pred` holds, then apply
    /// `Shrinkable::filter` so the whole shrink tree keeps satisfying it.
    pub fn filter(&self, pred: impl Fn(&T) -> bool + Clone + 'static) -> Arbitrary<T> {
        let self_gen = self.clone();
        Arbitrary::new(move |rng| {
            let mut attempts = 0;
            loop {
                let candidate = self_gen.generate(rng);
                if pred(&candidate.value) {
                    return candidate.filter(pred.clone());
                }
                attempts += 1;
                if attempts > 10_000 {
                    panic!(
                        "Arbitrary::filter: no value satisfying the predicate found after 10000 attempts"
                    );
                }
            }
        })
    }

    /// (i) generate initial `s`; (ii) `ng = f(s.value)`; (iii) generate
    /// `ns = ng.generate(rng)`. Value is `ns.value`. Children: each child
    /// of `s` regenerates its own dependent value (the branch point's
    /// RNG state is cloned so repeated traversal is idempotent), followed
    /// by `ns`'s own shrinks.
    pub fn flat_map<U: Clone + 'static>(
        &self,
        f: impl Fn(T) -> Arbitrary<U> + Clone + 'static,
    ) -> Arbitrary<U> {
        let self_gen = self.clone();
        Arbitrary::new(move |rng: &mut Rng| {
            let s = self_gen.generate(rng);
            let branch_rng = rng.clone();
            let ns = f(s.value.clone()).generate(rng);
            let value = ns.value.clone();
            let s_children = s.children();
            let ns_children = ns.children();
            let f2 = f.clone();
            Shrinkable::new(value, move || {
                let branch_rng2 = branch_rng.clone();
                let f3 = f2.clone();
                let from_s_children = s_children.transform(move |c| {
                    let mut local_rng = branch_rng2.clone();
                    f3(c.value).generate(&mut local_rng)
                });
                from_s_children.concat(ns_children.clone())
            })
        })
    }

    /// Like `flat_map` but the value is the pair `(s.value, ns.value)`.
    /// Children: first, for each child `c` of `s`, the pair
    /// `(c.value, ns'.value)` with `ns'`'s own shrink tree attached
    /// (the first component held fixed); then, for each child `nc` of
    /// `ns`, the pair `(s.value, nc.value)`.
    pub fn chain<U: Clone + 'static>(
        &self,
        f: impl Fn(T) -> Arbitrary<U> + Clone + 'static,
    ) -> Arbitrary<(T, U)> {
        let self_gen = self.clone();
        Arbitrary::new(move |rng: &mut Rng| {
            let s = self_gen.generate(rng);
            let branch_rng = rng.clone();
            let ns = f(s.value.clone()).generate(rng);
            let value = (s.value.clone(), ns.value.clone());
            let s_children = s.children();
            let ns_children = ns.children();
            let f2 = f.clone();
            Shrinkable::new(value, move || {
                let branch_rng2 = branch_rng.clone();
                let f3 = f2.clone();
                let from_s_children = s_children.transform(move |c| {
                    let mut local_rng = branch_rng2.clone();
                    let c_value = c.value.clone();
                    let dependent = f3(c_value.clone()).generate(&mut local_rng);
                    pair_holding_first_fixed(c_value, dependent)
                });
                let s_value = s.value.clone();
                let from_ns_children = ns_children.transform(move |nc| {
                    Shrinkable::leaf((s_value.clone(), nc.value))
                });
                from_s_children.concat(from_ns_children)
            })
        })
    }

    /// Generate a sequence of `T` by repeatedly applying `next_fn` to the
    /// last element, to a length chosen in `[min_len, max_len]`.
    /// Shrinking: length-shrinks (binary search toward `min_len`) before
    /// element-shrinks, matching `vector_shrink::shrink_vector`.
    pub fn accumulate(
        &self,
        next_fn: impl Fn(&T) -> Arbitrary<T> + 'static,
        min_len: usize,
        max_len: usize,
    ) -> Arbitrary<Vec<T>> {
        let self_gen = self.clone();
        let next_fn = Rc::new(next_fn);
        Arbitrary::new(move |rng: &mut Rng| {
            let target_len = if min_len >= max_len {
                min_len
            } else {
                rng.gen_range_usize(min_len, max_len)
            };
            let mut elems = Vec::with_capacity(target_len.max(1));
            if target_len > 0 {
                elems.push(self_gen.generate(rng));
                while elems.len() < target_len {
                    let last_value = elems.last().unwrap().value.clone();
                    elems.push(next_fn(&last_value).generate(rng));
                }
            }
            shrink_vector(elems, min_len)
        })
    }

    /// Like `accumulate`, but each step produces a whole replacement
    /// array via `next_fn`, so only the initial element is independently
    /// shrinkable — later positions are shrink-opaque since they depend
    /// on the whole prior array, not a single value.
    pub fn aggregate(
        &self,
        next_fn: impl Fn(&[T]) -> Arbitrary<Vec<T>> + 'static,
        min_len: usize,
        max_len: usize,
    ) -> Arbitrary<Vec<T>> {
        let self_gen = self.clone();
        let next_fn = Rc::new(next_fn);
        Arbitrary::new(move |rng: &mut Rng| {
            let target_len = if min_len >= max_len {
                min_len
            } else {
                rng.gen_range_usize(min_len, max_len)
            };
            if target_len == 0 {
                return Shrinkable::leaf(Vec::new());
            }
            let first = self_gen.generate(rng);
            let mut values = vec![first.value.clone()];
            while values.len() < target_len {
                let step = next_fn(&values).generate(rng);
                values = step.value;
            }
            let first_children = first.children();
            let rest: Vec<T> = values[1..].to_vec();
            Shrinkable::new(values, move || {
                let rest2 = rest.clone();
                first_children.transform(move |c| {
                    let mut v = Vec::with_capacity(rest2.len() + 1);
                    v.push(c.value);
                    v.extend(rest2.iter().cloned());
                    Shrinkable::leaf(v)
                })
            })
        })
    }
}

fn pair_holding_first_fixed<T: Clone + 'static, U: Clone + 'static>(
    first: T,
    dependent: Shrinkable<U>,
) -> Shrinkable<(T, U)> {
    let value = (first.clone(), dependent.value.clone());
    let children = dependent.children();
    Shrinkable::new(value, move || {
        let first2 = first.clone();
        children.transform(move |nc| pair_holding_first_fixed(first2.clone(), nc))
    })
}

impl<T: Clone + 'static> Generator<T> for Arbitrary<T> {
    fn generate(&self, rng: &mut Rng) -> Shrinkable<T> {
        Arbitrary::generate(self, rng)
    }
}
