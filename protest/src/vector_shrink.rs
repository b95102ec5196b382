//! Shared length-then-element shrink strategy for vector-shaped values:
//! arrays, strings-as-codepoints, and the `accumulate`/`aggregate`
//! generator combinators all bottom out here.

use crate::lazy_stream::LazyStream;
use crate::shrinkable::Shrinkable;

/// Build a `Shrinkable<Vec<T>>` from a vector of already-generated
/// per-position `Shrinkable<T>`s. Children first shrink length toward
/// `min_len` (binary search, truncating from the end — the first child
/// always has a strictly smaller length), then shrink individual
/// positions using each position's own children, holding the rest fixed.
pub fn shrink_vector<T: Clone + 'static>(
    elems: Vec<Shrinkable<T>>,
    min_len: usize,
) -> Shrinkable<Vec<T>> {
    let value = elems.iter().map(|s| s.value.clone()).collect();
    Shrinkable::new(value, move || {
        let length_shrinks = length_shrink_stream(elems.clone(), min_len);
        let element_shrinks = element_shrink_stream(elems.clone(), min_len);
        length_shrinks.concat(element_shrinks)
    })
}

fn length_shrink_stream<T: Clone + 'static>(
    elems: Vec<Shrinkable<T>>,
    min_len: usize,
) -> LazyStream<Shrinkable<Vec<T>>> {
    binary_search_lengths(min_len, elems.len(), elems)
}

fn binary_search_lengths<T: Clone + 'static>(
    min_len: usize,
    max_len: usize,
    elems: Vec<Shrinkable<T>>,
) -> LazyStream<Shrinkable<Vec<T>>> {
    if min_len >= max_len {
        return LazyStream::Empty;
    }
    let mid = min_len + (max_len - min_len) / 2;
    let truncated: Vec<Shrinkable<T>> = elems[..mid].to_vec();
    let node = shrink_vector(truncated, min_len);
    LazyStream::cons(node, move || {
        let elems2 = elems.clone();
        binary_search_lengths(min_len, mid, elems2.clone())
            .concat(binary_search_lengths(mid, max_len, elems2))
    })
}

fn element_shrink_stream<T: Clone + 'static>(
    elems: Vec<Shrinkable<T>>,
    min_len: usize,
) -> LazyStream<Shrinkable<Vec<T>>> {
    element_shrink_from_position(elems, min_len, 0)
}

fn element_shrink_from_position<T: Clone + 'static>(
    elems: Vec<Shrinkable<T>>,
    min_len: usize,
    position: usize,
) -> LazyStream<Shrinkable<Vec<T>>> {
    if position >= elems.len() {
        return LazyStream::Empty;
    }
    let children = elems[position].children();
    let at_position = child_variants_at(elems.clone(), min_len, position, children);
    let elems2 = elems.clone();
    at_position.concat_thunk(std::rc::Rc::new(move || {
        element_shrink_from_position(elems2.clone(), min_len, position + 1)
    }))
}

fn child_variants_at<T: Clone + 'static>(
    elems: Vec<Shrinkable<T>>,
    min_len: usize,
    position: usize,
    children: LazyStream<Shrinkable<T>>,
) -> LazyStream<Shrinkable<Vec<T>>> {
    match children {
        LazyStream::Empty => LazyStream::Empty,
        LazyStream::Cons(head, tail) => {
            let mut replaced = elems.clone();
            replaced[position] = head;
            let node = shrink_vector(replaced, min_len);
            LazyStream::cons(node, move || {
                child_variants_at(elems.clone(), min_len, position, tail())
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_vec(values: &[i64]) -> Vec<Shrinkable<i64>> {
        values.iter().map(|&v| Shrinkable::leaf(v)).collect()
    }

    #[test]
    fn length_shrinks_come_before_element_shrinks() {
        let elems = vec![
            Shrinkable::new(5i64, || LazyStream::one(Shrinkable::leaf(0))),
            Shrinkable::new(6i64, || LazyStream::one(Shrinkable::leaf(0))),
            Shrinkable::new(7i64, || LazyStream::one(Shrinkable::leaf(0))),
        ];
        let tree = shrink_vector(elems, 0);
        let first_child = tree.children().head();
        assert!(first_child.value.len() < 3);
    }

    #[test]
    fn first_child_has_strictly_smaller_length_when_above_min() {
        let elems = leaf_vec(&[1, 2, 3, 4]);
        let tree = shrink_vector(elems, 1);
        let first = tree.children().head();
        assert!(first.value.len() < 4);
    }

    #[test]
    fn no_length_shrinks_when_already_at_min() {
        let elems = leaf_vec(&[1]);
        let tree = shrink_vector(elems, 1);
        for child in tree.children().to_vec() {
            assert_eq!(child.value.len(), 1);
        }
    }

    #[test]
    fn element_shrinks_preserve_length() {
        let elems = vec![Shrinkable::new(9i64, || LazyStream::one(Shrinkable::leaf(0)))];
        let tree = shrink_vector(elems, 1);
        let children = tree.children().to_vec();
        assert!(children.iter().any(|c| c.value == vec![0]));
    }
}
