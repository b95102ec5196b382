//! Small building-block generators: constants, lazy thunks, element choice,
//! weighted union, and the tuple-pairing sugar.

use std::rc::Rc;

use crate::generator::Arbitrary;
use crate::shrinkable::Shrinkable;

/// Always produce `value`, with no shrinks.
pub fn just<T: Clone + 'static>(value: T) -> Arbitrary<T> {
    Arbitrary::new(move |_rng| Shrinkable::leaf(value.clone()))
}

/// Defer construction of the underlying generator until first use, so a
/// recursive definition (a generator that refers to itself) doesn't
/// infinitely expand while being built.
pub fn lazy<T: Clone + 'static>(build: impl Fn() -> Arbitrary<T> + 'static) -> Arbitrary<T> {
    let build = Rc::new(build);
    Arbitrary::new(move |rng| build().generate(rng))
}

/// Uniform choice among a fixed set of values. Shrinks toward `values[0]`
/// by retrying earlier positions in the list before the chosen one.
pub fn element_of<T: Clone + 'static>(values: Vec<T>) -> Arbitrary<T> {
    assert!(!values.is_empty(), "element_of: values must not be empty");
    let values = Rc::new(values);
    Arbitrary::new(move |rng| {
        let index = rng.gen_range_usize(0, values.len() - 1);
        element_shrinkable(values.clone(), index)
    })
}

fn element_shrinkable<T: Clone + 'static>(values: Rc<Vec<T>>, index: usize) -> Shrinkable<T> {
    let value = values[index].clone();
    Shrinkable::new(value, move || {
        if index == 0 {
            crate::lazy_stream::LazyStream::empty()
        } else {
            let earlier: Vec<usize> = (0..index).collect();
            build_earlier_stream(values.clone(), earlier)
        }
    })
}

fn build_earlier_stream<T: Clone + 'static>(
    values: Rc<Vec<T>>,
    mut earlier: Vec<usize>,
) -> crate::lazy_stream::LazyStream<Shrinkable<T>> {
    if earlier.is_empty() {
        return crate::lazy_stream::LazyStream::empty();
    }
    let index = earlier.remove(0);
    let node = Shrinkable::leaf(values[index].clone());
    crate::lazy_stream::LazyStream::cons(node, move || {
        build_earlier_stream(values.clone(), earlier.clone())
    })
}

/// One weighted alternative in [`one_of`].
#[derive(Clone)]
pub struct WeightedValue<T> {
    pub weight: Option<f64>,
    pub generator: Arbitrary<T>,
}

impl<T: Clone + 'static> WeightedValue<T> {
    pub fn new(generator: Arbitrary<T>) -> Self {
        WeightedValue {
            weight: None,
            generator,
        }
    }

    pub fn weighted(weight: f64, generator: Arbitrary<T>) -> Self {
        WeightedValue {
            weight: Some(weight),
            generator,
        }
    }
}

/// Choose among several generators, each with an optional weight. Weights
/// that are given are summed; the remainder of the probability mass (1.0
/// minus that sum, floored at 0) is split uniformly across the unweighted
/// entries. A choice shrinks toward its own tree and never across
/// alternatives.
pub fn one_of<T: Clone + 'static>(alternatives: Vec<WeightedValue<T>>) -> Arbitrary<T> {
    assert!(!alternatives.is_empty(), "one_of: alternatives must not be empty");
    let weights = resolve_weights(&alternatives);
    let alternatives = Rc::new(alternatives);
    let weights = Rc::new(weights);
    Arbitrary::new(move |rng| {
        let roll = rng.gen_f64();
        let chosen = pick_by_weight(&weights, roll);
        alternatives[chosen].generator.generate(rng)
    })
}

fn resolve_weights<T>(alternatives: &[WeightedValue<T>]) -> Vec<f64> {
    let explicit_sum: f64 = alternatives.iter().filter_map(|a| a.weight).sum();
    let unweighted_count = alternatives.iter().filter(|a| a.weight.is_none()).count();
    let remainder = (1.0 - explicit_sum).max(0.0);
    let share = if unweighted_count > 0 {
        remainder / unweighted_count as f64
    } else {
        0.0
    };
    alternatives
        .iter()
        .map(|a| a.weight.unwrap_or(share))
        .collect()
}

fn pick_by_weight(weights: &[f64], roll: f64) -> usize {
    let total: f64 = weights.iter().sum();
    let target = roll * total.max(f64::EPSILON);
    let mut cumulative = 0.0;
    for (index, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if target <= cumulative || index == weights.len() - 1 {
            return index;
        }
    }
    weights.len() - 1
}

/// Build a value from `n` independent generators via a constructor
/// function, the way `#[derive(Arbitrary)]` assembles a struct field by
/// field. Shrinking interleaves per-slot shrinks (see `tuple` primitive).
pub fn construct2<A: Clone + 'static, B: Clone + 'static, T: Clone + 'static>(
    a: Arbitrary<A>,
    b: Arbitrary<B>,
    f: impl Fn(A, B) -> T + Clone + 'static,
) -> Arbitrary<T> {
    crate::primitives::tuple::tuple2(a, b).map(move |(a, b)| f(a, b))
}

pub fn construct3<A: Clone + 'static, B: Clone + 'static, C: Clone + 'static, T: Clone + 'static>(
    a: Arbitrary<A>,
    b: Arbitrary<B>,
    c: Arbitrary<C>,
    f: impl Fn(A, B, C) -> T + Clone + 'static,
) -> Arbitrary<T> {
    crate::primitives::tuple::tuple3(a, b, c).map(move |(a, b, c)| f(a, b, c))
}

/// Pair two generators, the second depending on the first's value — sugar
/// over `Arbitrary::chain`.
pub fn chain_tuple<A: Clone + 'static, B: Clone + 'static>(
    a: Arbitrary<A>,
    f: impl Fn(A) -> Arbitrary<B> + Clone + 'static,
) -> Arbitrary<(A, B)> {
    a.chain(f)
}
