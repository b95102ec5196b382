//! The shrink tree: a value paired with a lazily-expanded rose tree of
//! smaller candidates.
//!
//! Every combinator here produces a strictly derivative tree — none ever
//! feeds a node back as its own descendant — and every one keeps its more
//! aggressive shrinks first, so a greedy depth-first walk finds a small
//! counter-example quickly.

use std::rc::Rc;

use crate::lazy_stream::LazyStream;

/// A value together with a thunk producing its immediate shrink candidates.
#[derive(Clone)]
pub struct Shrinkable<T> {
    pub value: T,
    shrinks: Rc<dyn Fn() -> LazyStream<Shrinkable<T>>>,
}

impl<T: Clone + 'static> Shrinkable<T> {
    pub fn new(value: T, shrinks: impl Fn() -> LazyStream<Shrinkable<T>> + 'static) -> Self {
        Shrinkable {
            value,
            shrinks: Rc::new(shrinks),
        }
    }

    /// A leaf: no children. The canonical minimum of any primitive.
    pub fn leaf(value: T) -> Self {
        Shrinkable::new(value, LazyStream::empty)
    }

    pub fn children(&self) -> LazyStream<Shrinkable<T>> {
        (self.shrinks)()
    }

    /// Replace the children thunk; value unchanged.
    pub fn with_shrinks(&self, shrinks: impl Fn() -> LazyStream<Shrinkable<T>> + 'static) -> Self {
        Shrinkable::new(self.value.clone(), shrinks)
    }

    /// Lift the value through `f`; the resulting tree mirrors the source
    /// tree exactly, value-wise, post-`f`.
    pub fn map<U: Clone + 'static>(&self, f: impl Fn(T) -> U + Clone + 'static) -> Shrinkable<U> {
        let mapped_value = f(self.value.clone());
        let children = self.children();
        let f2 = f.clone();
        Shrinkable::new(mapped_value, move || {
            children.transform({
                let f3 = f2.clone();
                move |child| child.map(f3.clone())
            })
        })
    }

    /// Prune children whose value fails `pred`, recursively. Callers must
    /// ensure `pred(self.value)` holds — the root is never filtered out by
    /// this method, only its descendants.
    pub fn filter(&self, pred: impl Fn(&T) -> bool + Clone + 'static) -> Shrinkable<T> {
        assert!(
            pred(&self.value),
            "Shrinkable::filter: predicate must hold for the root value"
        );
        self.filter_descendants(pred)
    }

    fn filter_descendants(&self, pred: impl Fn(&T) -> bool + Clone + 'static) -> Shrinkable<T> {
        let value = self.value.clone();
        let children = self.children();
        let pred2 = pred.clone();
        Shrinkable::new(value, move || {
            Self::filtered_frontier(children.clone(), pred2.clone())
        })
    }

    /// Descendants whose own value fails `pred` are replaced by their own
    /// filtered children stream, so the surviving frontier is preserved
    /// rather than simply truncated.
    fn filtered_frontier(
        stream: LazyStream<Shrinkable<T>>,
        pred: impl Fn(&T) -> bool + Clone + 'static,
    ) -> LazyStream<Shrinkable<T>> {
        match stream {
            LazyStream::Empty => LazyStream::Empty,
            LazyStream::Cons(head, tail) => {
                if pred(&head.value) {
                    let filtered_head = head.filter_descendants(pred.clone());
                    let pred2 = pred.clone();
                    LazyStream::cons(filtered_head, move || {
                        Self::filtered_frontier(tail(), pred2.clone())
                    })
                } else {
                    let replacement = Self::filtered_frontier(head.children(), pred.clone());
                    let pred2 = pred.clone();
                    replacement.concat_thunk(Rc::new(move || {
                        Self::filtered_frontier(tail(), pred2.clone())
                    }))
                }
            }
        }
    }

    /// value := f(self.value).value; children := concat of
    /// (a) self.children mapped through f (not recursively flat-mapped —
    /// f is applied directly to each child's value), and
    /// (b) f(self.value)'s own children.
    pub fn flat_map<U: Clone + 'static>(
        &self,
        f: impl Fn(T) -> Shrinkable<U> + Clone + 'static,
    ) -> Shrinkable<U> {
        let root_value = self.value.clone();
        let mapped_root = f(root_value.clone());
        let value = mapped_root.value.clone();
        let self_children = self.children();
        let f_for_children = f.clone();
        let f_for_root = f.clone();
        Shrinkable::new(value, move || {
            let from_self_children = self_children.transform({
                let ff = f_for_children.clone();
                move |c| ff(c.value)
            });
            let root_value2 = root_value.clone();
            let f_root2 = f_for_root.clone();
            from_self_children.concat_thunk(Rc::new(move || f_root2(root_value2.clone()).children()))
        })
    }

    /// Append a static tail stream to children, recursively at every node.
    pub fn concat_static(&self, tail: impl Fn() -> LazyStream<Shrinkable<T>> + 'static) -> Shrinkable<T> {
        let tail = Rc::new(tail);
        self.concat_static_rc(tail)
    }

    fn concat_static_rc(&self, tail: Rc<dyn Fn() -> LazyStream<Shrinkable<T>>>) -> Shrinkable<T> {
        let value = self.value.clone();
        let children = self.children();
        let tail2 = tail.clone();
        Shrinkable::new(value, move || {
            let propagated = children.transform({
                let t = tail2.clone();
                move |c| c.concat_static_rc(t.clone())
            });
            propagated.concat_thunk(tail2.clone())
        })
    }

    /// Like `concat_static` but the extra tail is computed from each
    /// parent node's own value.
    pub fn concat(&self, f: impl Fn(&T) -> LazyStream<Shrinkable<T>> + Clone + 'static) -> Shrinkable<T> {
        let value = self.value.clone();
        let extra = f(&value);
        let children = self.children();
        let f2 = f.clone();
        Shrinkable::new(value, move || {
            let propagated = children.transform({
                let ff = f2.clone();
                move |c| c.concat(ff.clone())
            });
            propagated.concat(extra.clone())
        })
    }

    /// Like `concat_static`, but only extends the frontier at leaves —
    /// nodes that already had no children. Used to grow the leaf frontier
    /// without inflating every interior node's width.
    pub fn and_then_static(
        &self,
        tail: impl Fn() -> LazyStream<Shrinkable<T>> + 'static,
    ) -> Shrinkable<T> {
        let tail = Rc::new(tail);
        self.and_then_static_rc(tail)
    }

    fn and_then_static_rc(&self, tail: Rc<dyn Fn() -> LazyStream<Shrinkable<T>>>) -> Shrinkable<T> {
        let value = self.value.clone();
        let children = self.children();
        let is_leaf = children.is_empty();
        let tail2 = tail.clone();
        Shrinkable::new(value, move || {
            if is_leaf {
                tail2()
            } else {
                children.transform({
                    let t = tail2.clone();
                    move |c| c.and_then_static_rc(t.clone())
                })
            }
        })
    }

    /// Dynamic variant of `and_then_static`: the extra tail at each leaf is
    /// computed from that leaf's own value.
    pub fn and_then(&self, f: impl Fn(&T) -> LazyStream<Shrinkable<T>> + Clone + 'static) -> Shrinkable<T> {
        let value = self.value.clone();
        let children = self.children();
        let is_leaf = children.is_empty();
        let f2 = f.clone();
        let value_for_leaf = self.value.clone();
        Shrinkable::new(value, move || {
            if is_leaf {
                f2(&value_for_leaf)
            } else {
                children.transform({
                    let ff = f2.clone();
                    move |c| c.and_then(ff.clone())
                })
            }
        })
    }

    /// Descend by a path of child indices. Errors on out-of-range.
    pub fn retrieve(&self, path: &[usize]) -> Result<Shrinkable<T>, String> {
        let mut current = self.clone();
        for &index in path {
            current = current.get_nth_child(index).ok_or_else(|| {
                format!("Shrinkable::retrieve: index {index} out of range")
            })?;
        }
        Ok(current)
    }

    /// The nth immediate child, or `None` if out of range.
    pub fn get_nth_child(&self, n: usize) -> Option<Shrinkable<T>> {
        let stream = self.children().skip(n);
        if stream.is_empty() {
            None
        } else {
            Some(stream.head())
        }
    }

    /// Cap the width of the children stream at every level.
    pub fn take(&self, n: usize) -> Shrinkable<T> {
        let value = self.value.clone();
        let children = self.children();
        Shrinkable::new(value, move || {
            children.take(n).transform(move |c| c.take(n))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_search_toward_zero(min: i64, max: i64) -> LazyStream<Shrinkable<i64>> {
        if min >= max {
            return LazyStream::Empty;
        }
        let mid = min + (max - min) / 2;
        LazyStream::cons(int_shrinkable(mid, min, max), move || {
            binary_search_toward_zero(min, mid).concat(binary_search_toward_zero(mid + 1, max))
        })
    }

    fn int_shrinkable(value: i64, min: i64, max: i64) -> Shrinkable<i64> {
        Shrinkable::new(value, move || binary_search_toward_zero(min, max))
    }

    fn canonical_tree() -> Shrinkable<i64> {
        // 4{0, 2{1}, 3}
        let leaf0 = Shrinkable::leaf(0i64);
        let leaf1 = Shrinkable::leaf(1i64);
        let node2 = Shrinkable::new(2i64, move || LazyStream::one(leaf1.clone()));
        let leaf3 = Shrinkable::leaf(3i64);
        Shrinkable::new(4i64, move || {
            LazyStream::three(leaf0.clone(), node2.clone(), leaf3.clone())
        })
    }

    fn values_at_depth1(s: &Shrinkable<i64>) -> Vec<i64> {
        s.children().to_vec().into_iter().map(|c| c.value).collect()
    }

    #[test]
    fn map_mirrors_shape_value_wise() {
        let tree = canonical_tree();
        let doubled = tree.map(|x| x * 2);
        assert_eq!(doubled.value, 8);
        assert_eq!(values_at_depth1(&doubled), vec![0, 4, 6]);
        let node2_doubled = doubled.children().to_vec()[1].clone();
        assert_eq!(values_at_depth1(&node2_doubled), vec![2]);
    }

    #[test]
    fn filter_preserves_frontier() {
        let tree = canonical_tree();
        let filtered = tree.filter(|&x| x >= 2);
        assert_eq!(filtered.value, 4);
        assert_eq!(values_at_depth1(&filtered), vec![2, 3]);
    }

    #[test]
    #[should_panic]
    fn filter_panics_when_root_fails_predicate() {
        let tree = canonical_tree();
        tree.filter(|&x| x > 100);
    }

    #[test]
    fn take_bounds_children_width_recursively() {
        let tree = int_shrinkable(8, 0, 8);
        let capped = tree.take(2);
        assert_eq!(capped.children().to_vec().len(), 2);
    }

    #[test]
    fn get_nth_child_and_retrieve() {
        let tree = canonical_tree();
        assert_eq!(tree.get_nth_child(0).unwrap().value, 0);
        assert_eq!(tree.get_nth_child(1).unwrap().value, 2);
        assert!(tree.get_nth_child(5).is_none());
        assert_eq!(tree.retrieve(&[1, 0]).unwrap().value, 1);
        assert!(tree.retrieve(&[9]).is_err());
    }

    #[test]
    fn concat_static_appends_recursively() {
        let tree = Shrinkable::leaf(1i64);
        let extended = tree.concat_static(|| LazyStream::one(Shrinkable::leaf(0i64)));
        assert_eq!(values_at_depth1(&extended), vec![0]);
    }

    #[test]
    fn and_then_static_only_extends_leaves() {
        let tree = canonical_tree();
        let extended = tree.and_then_static(|| LazyStream::one(Shrinkable::leaf(-1i64)));
        // root is not a leaf, so its own direct children are unaffected in count
        assert_eq!(values_at_depth1(&extended), vec![0, 2, 3]);
        // but its leaf child (0) now grows a new child
        let first_child = extended.children().to_vec()[0].clone();
        assert_eq!(values_at_depth1(&first_child), vec![-1]);
    }
}
