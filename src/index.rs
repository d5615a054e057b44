use core::cmp::Ord;
use core::fmt::Debug;
use crate::{Entry, Interval, IntervalTree, OverlapIter, Result};

/// Orders two bounds so that the first is not greater than the second
fn ordered<'a, T: Ord>(a: &'a T, b: &'a T) -> (&'a T, &'a T) {
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}

/// A one-dimensional interval index.
///
/// Thin layer over [`IntervalTree`] that accepts bounds in either order and
/// counts stored pairs. Inserting the same pair twice stores it twice.
///
/// # Examples
/// ```
/// use nd_interval_tree::IntervalIndex;
///
/// let mut index = IntervalIndex::new();
/// index.insert(1, 5);
/// index.insert(8, 4);
///
/// assert_eq!(index.len(), 2);
/// assert_eq!(index.get_overlap(&6, &7), Some((4, 8)));
/// assert!(!index.do_overlap(&10, &9));
///
/// index.delete(&4, &8).unwrap();
/// assert_eq!(index.get_overlaps(&0, &100), vec![(1, 5)]);
/// ```
#[derive(Clone)]
pub struct IntervalIndex<T, V = ()> {
    tree: IntervalTree<T, V>,
}

impl<T, V> Default for IntervalIndex<T, V> {
    fn default() -> Self {
        IntervalIndex {
            tree: IntervalTree::default(),
        }
    }
}

impl<T: Ord + Clone> IntervalIndex<T> {
    /// Creates an empty index without per-interval values
    #[must_use]
    pub fn new() -> IntervalIndex<T> {
        IntervalIndex::default()
    }

    /// Stores the interval between `start` and `end`
    pub fn insert(&mut self, start: T, end: T) {
        self.insert_with(start, end, ());
    }
}

impl<T: Ord + Clone, V> IntervalIndex<T, V> {
    /// Number of stored intervals, duplicates included
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// The underlying tree, bounds already normalized
    #[must_use]
    pub fn tree(&self) -> &IntervalTree<T, V> {
        &self.tree
    }

    /// Stores the interval between `start` and `end` together with `value`
    pub fn insert_with(&mut self, start: T, end: T, value: V) {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        self.tree.insert(start, end, value);
    }

    /// Removes one stored copy of the interval and returns its value
    pub fn delete(&mut self, start: &T, end: &T) -> Result<V> {
        let (start, end) = ordered(start, end);
        self.tree.delete(start, end)
    }

    /// Returns some stored interval overlapping the query, as `(start, end)`
    #[must_use]
    pub fn get_overlap(&self, start: &T, end: &T) -> Option<(T, T)> {
        let found = self.tree.find_overlap(&Self::search(start, end))?;
        let end = found.matched_end()?.clone();
        Some((found.start().clone(), end))
    }

    /// Returns every stored interval overlapping the query, as `(start, end)` pairs
    #[must_use]
    pub fn get_overlaps(&self, start: &T, end: &T) -> Vec<(T, T)> {
        self.query(start, end)
            .map(|entry| (entry.start().clone(), entry.end().clone()))
            .collect()
    }

    /// Returns true if any stored interval overlaps the query
    #[must_use]
    pub fn do_overlap(&self, start: &T, end: &T) -> bool {
        self.tree.overlaps(&Self::search(start, end))
    }

    /// Iterates over the stored intervals overlapping the query, with their values
    #[must_use]
    pub fn query(&self, start: &T, end: &T) -> OverlapIter<'_, T, V> {
        self.tree.query(Self::search(start, end))
    }

    #[must_use]
    pub fn get(&self, start: &T, end: &T) -> Option<&V> {
        let (start, end) = ordered(start, end);
        self.tree.get(start, end)
    }

    pub fn get_mut(&mut self, start: &T, end: &T) -> Option<&mut V> {
        let (start, end) = ordered(start, end);
        self.tree.get_mut(start, end)
    }

    #[must_use]
    pub fn contains(&self, start: &T, end: &T) -> bool {
        self.get(start, end).is_some()
    }

    /// Value stored with the interval, created by `default` when the interval is new
    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, start: &T, end: &T, default: F) -> &mut V {
        let (start, end) = ordered(start, end);
        self.tree
            .get_or_insert_with(start.clone(), end.clone(), default)
    }

    /// Iterates over all stored intervals sorted by start
    pub fn iter(&self) -> impl Iterator<Item = Entry<'_, T, V>> {
        self.tree.iter()
    }

    /// All stored intervals sorted by start, as `(start, end)` pairs
    #[must_use]
    pub fn intervals(&self) -> Vec<(T, T)> {
        self.iter()
            .map(|entry| (entry.start().clone(), entry.end().clone()))
            .collect()
    }

    fn search(start: &T, end: &T) -> Interval<T> {
        Interval::normalized(start.clone(), end.clone())
    }
}

impl<T: Debug, V> Debug for IntervalIndex<T, V> {
    fn fmt(&self, fmt: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        fmt.debug_struct("IntervalIndex")
            .field("tree", &self.tree)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    #[test]
    fn index_example_overlaps() {
        let mut index = IntervalIndex::new();
        index.insert(1, 5);
        index.insert(4, 8);

        assert!(index.do_overlap(&6, &7));
        assert_eq!(index.get_overlap(&6, &7), Some((4, 8)));
        assert!(!index.do_overlap(&9, &10));
        assert_eq!(index.get_overlap(&9, &10), None);
    }

    #[test]
    fn index_normalizes_reversed_bounds() {
        let mut index = IntervalIndex::new();
        index.insert(10, 2);
        assert_eq!(index.intervals(), vec![(2, 10)]);
        assert!(index.contains(&10, &2));
        assert!(index.do_overlap(&12, &9));

        index.delete(&10, &2).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn index_counts_duplicate_pairs() {
        let mut index = IntervalIndex::new();
        index.insert(3, 7);
        index.insert(3, 7);
        index.insert(3, 9);
        assert_eq!(index.len(), 3);
        assert_eq!(index.tree().node_count(), 1);

        let mut overlaps = index.get_overlaps(&8, &8);
        overlaps.sort_unstable();
        assert_eq!(overlaps, vec![(3, 9)]);
        assert_eq!(index.get_overlaps(&0, &3).len(), 3);

        index.delete(&3, &7).unwrap();
        assert_eq!(index.len(), 2);
        assert!(index.contains(&3, &7));
    }

    #[test]
    fn index_delete_errors() {
        let mut index: IntervalIndex<i32> = IntervalIndex::new();
        assert_eq!(index.delete(&1, &2), Err(Error::EmptyTree));

        index.insert(1, 2);
        assert_eq!(index.delete(&1, &3), Err(Error::NotFound));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn index_values_follow_intervals() {
        let mut index = IntervalIndex::default();
        index.insert_with(0, 10, "wide");
        index.insert_with(4, 5, "narrow");

        *index.get_mut(&5, &4).unwrap() = "tiny";
        let mut hits: Vec<&str> = index.query(&5, &6).map(|entry| *entry.value()).collect();
        hits.sort_unstable();
        assert_eq!(hits, vec!["tiny", "wide"]);

        assert_eq!(*index.get_or_insert_with(&10, &0, || "unused"), "wide");
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn index_random_insert_then_delete_all() {
        let mut rng = StdRng::seed_from_u64(1000);
        let mut index = IntervalIndex::new();
        let mut pairs = Vec::with_capacity(1000);

        for _ in 0..1000 {
            let a: i64 = rng.gen_range(-10_000..10_000);
            let b: i64 = rng.gen_range(-10_000..10_000);
            index.insert(a, b);
            pairs.push((a, b));
            index.tree().check_invariants().unwrap();
        }
        assert_eq!(index.len(), 1000);

        for _ in 0..200 {
            let a: i64 = rng.gen_range(-11_000..11_000);
            let b = a + rng.gen_range(0..500);
            let expected = pairs
                .iter()
                .map(|&(x, y)| (x.min(y), x.max(y)))
                .filter(|&(s, e)| s <= b && e >= a)
                .count();
            assert_eq!(index.do_overlap(&a, &b), expected > 0);
            assert_eq!(index.get_overlaps(&a, &b).len(), expected);
        }

        pairs.shuffle(&mut rng);
        for (i, (a, b)) in pairs.iter().enumerate() {
            index.delete(b, a).unwrap();
            assert_eq!(index.len(), 1000 - i - 1);
            index.tree().check_invariants().unwrap();
        }
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.tree().node_count(), 0);
    }
}
