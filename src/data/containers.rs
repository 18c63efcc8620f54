//! Small set and queue helpers shared by the evaluator and the driver.

use std::collections::{BTreeSet, VecDeque};

/// Append `items` to the back of `queue`, preserving their order.
pub fn add_to_queue<T: Clone>(items: &[T], queue: &mut VecDeque<T>) {
    queue.extend(items.iter().cloned());
}

/// Union of two ordered sets.
pub fn unite_sets<T: Ord + Clone>(left: &BTreeSet<T>, right: &BTreeSet<T>) -> BTreeSet<T> {
    left.union(right).cloned().collect()
}

/// Intersection of every set yielded by `sets`; `None` when there are none.
pub fn intersect_all<'a, T, I>(sets: I) -> Option<BTreeSet<T>>
where
    T: Ord + Clone + 'a,
    I: IntoIterator<Item = &'a BTreeSet<T>>,
{
    let mut iter = sets.into_iter();
    let first = iter.next()?.clone();
    Some(iter.fold(first, |acc, set| acc.intersection(set).cloned().collect()))
}
