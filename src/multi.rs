use core::cmp::Ord;
use core::fmt::Debug;
use num::Bounded;
use serde::{Deserialize, Serialize};
use crate::{Entry, Error, Interval, IntervalIndex, Result};

/// A hyper-rectangle: one closed interval `[start[d], end[d]]` per dimension
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize)]
#[archive(check_bytes)]
pub struct Rect<T> {
    pub start: Vec<T>,
    pub end: Vec<T>,
}

impl<T: Ord + Clone> Rect<T> {
    /// Creates a rectangle, ordering the bounds of every dimension
    #[must_use]
    pub fn new(start: &[T], end: &[T]) -> Rect<T> {
        let (start, end) = start
            .iter()
            .zip(end)
            .map(|(a, b)| if b < a { (b.clone(), a.clone()) } else { (a.clone(), b.clone()) })
            .unzip();
        Rect { start, end }
    }

    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.start.len()
    }

    /// Returns true if the rectangles overlap in every dimension
    ///
    /// # Examples
    /// ```
    /// use nd_interval_tree::Rect;
    ///
    /// let a = Rect::new(&[1, 1], &[5, 5]);
    /// assert!(a.overlaps(&Rect::new(&[4, 4], &[6, 6])));
    /// assert!(!a.overlaps(&Rect::new(&[4, 6], &[6, 9])));
    /// ```
    #[must_use]
    pub fn overlaps(&self, other: &Rect<T>) -> bool {
        self.dimensions() == other.dimensions()
            && (0..self.dimensions())
                .all(|d| self.start[d] <= other.end[d] && other.start[d] <= self.end[d])
    }
}

/// Settings for building a [`MultiIntervalIndex`]
///
/// # Examples
/// ```
/// use nd_interval_tree::{IndexConfig, MultiIntervalIndex};
///
/// let config: IndexConfig<i64> = IndexConfig::new(3).with_sentinel(-1);
/// let index = MultiIntervalIndex::from_config(config).unwrap();
/// assert_eq!(index.dimensions(), 3);
/// assert_eq!(index.sentinel(), &-1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct IndexConfig<T> {
    /// Number of dimensions, at least one
    pub dimensions: usize,
    /// Reserved coordinate value; `T::min_value()` when absent
    pub sentinel: Option<T>,
}

impl<T> IndexConfig<T> {
    #[must_use]
    pub fn new(dimensions: usize) -> IndexConfig<T> {
        IndexConfig {
            dimensions,
            sentinel: None,
        }
    }

    #[must_use]
    pub fn with_sentinel(mut self, sentinel: T) -> IndexConfig<T> {
        self.sentinel = Some(sentinel);
        self
    }
}

/// What a stored interval owns: the index of the next dimension, or at the
/// last dimension the number of stored copies of the rectangle.
#[derive(Clone, Debug)]
enum Branch<T> {
    Nested(Box<IntervalIndex<T, Branch<T>>>),
    Leaf(usize),
}

/// An N-dimensional rectangle overlap index.
///
/// Dimension 0 is an [`IntervalIndex`]; every interval stored in it owns an
/// index over dimension 1 holding the rectangles with that exact first
/// interval, and so on down to the last dimension, whose intervals count how
/// many copies of each rectangle are stored. A query walks one dimension at a
/// time: the nested indexes of the intervals overlapping the query in
/// dimension `d` are the frontier searched in dimension `d + 1`.
///
/// # Examples
/// ```
/// use nd_interval_tree::{Error, MultiIntervalIndex};
///
/// let mut index = MultiIntervalIndex::<i32>::new(2).unwrap();
/// index.insert(&[1, 1], &[5, 5]).unwrap();
/// index.insert(&[10, 10], &[12, 12]).unwrap();
///
/// assert!(index.do_overlap(&[4, 4], &[6, 6]).unwrap());
/// assert!(!index.do_overlap(&[6, 6], &[9, 9]).unwrap());
///
/// assert_eq!(index.delete(&[2, 2], &[3, 3]), Err(Error::NotFound));
/// index.delete(&[1, 1], &[5, 5]).unwrap();
/// assert_eq!(index.len(), 1);
/// ```
#[derive(Clone)]
pub struct MultiIntervalIndex<T> {
    dimensions: usize,
    sentinel: T,
    root: IntervalIndex<T, Branch<T>>,
    count: usize,
}

impl<T: Ord + Clone + Bounded> MultiIntervalIndex<T> {
    /// Creates an index over `dimensions` dimensions reserving `T::min_value()`
    pub fn new(dimensions: usize) -> Result<MultiIntervalIndex<T>> {
        MultiIntervalIndex::with_sentinel(dimensions, T::min_value())
    }

    pub fn from_config(config: IndexConfig<T>) -> Result<MultiIntervalIndex<T>> {
        let sentinel = config.sentinel.unwrap_or_else(T::min_value);
        MultiIntervalIndex::with_sentinel(config.dimensions, sentinel)
    }
}

impl<T: Ord + Clone> MultiIntervalIndex<T> {
    /// Creates an index over `dimensions` dimensions; `sentinel` is rejected as a coordinate
    pub fn with_sentinel(dimensions: usize, sentinel: T) -> Result<MultiIntervalIndex<T>> {
        if dimensions == 0 {
            return Err(Error::NoDimensions);
        }
        Ok(MultiIntervalIndex {
            dimensions,
            sentinel,
            root: IntervalIndex::default(),
            count: 0,
        })
    }

    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    #[must_use]
    pub fn sentinel(&self) -> &T {
        &self.sentinel
    }

    /// Number of stored rectangles
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        self.root.clear();
        self.count = 0;
    }

    fn validate(&self, start: &[T], end: &[T]) -> Result<()> {
        if start.len() != self.dimensions || end.len() != self.dimensions {
            tracing::debug!(
                expected = self.dimensions,
                start = start.len(),
                end = end.len(),
                "rejected rectangle with wrong dimension count"
            );
            return Err(Error::DimensionMismatch {
                expected: self.dimensions,
                start: start.len(),
                end: end.len(),
            });
        }
        let sentinel = start
            .iter()
            .zip(end)
            .position(|(a, b)| *a == self.sentinel || *b == self.sentinel);
        if let Some(dimension) = sentinel {
            tracing::debug!(dimension, "rejected rectangle holding the sentinel");
            return Err(Error::SentinelCoordinate { dimension });
        }
        Ok(())
    }

    /// Stores a rectangle. Bounds may be given in either order per dimension.
    pub fn insert(&mut self, start: &[T], end: &[T]) -> Result<()> {
        self.validate(start, end)?;

        Self::insert_path(&mut self.root, 0, self.dimensions - 1, start, end);
        self.count += 1;
        tracing::trace!(count = self.count, "inserted rectangle");
        Ok(())
    }

    fn insert_path(
        level: &mut IntervalIndex<T, Branch<T>>,
        dim: usize,
        last: usize,
        start: &[T],
        end: &[T],
    ) {
        let branch = level.get_or_insert_with(&start[dim], &end[dim], || {
            if dim == last {
                Branch::Leaf(0)
            } else {
                Branch::Nested(Box::default())
            }
        });
        match branch {
            Branch::Nested(next) => Self::insert_path(next, dim + 1, last, start, end),
            Branch::Leaf(copies) => *copies += 1,
        }
    }

    /// Removes one stored copy of a rectangle.
    ///
    /// The whole path is looked up before anything changes, so a missing
    /// rectangle leaves the index untouched. Removal then runs from the last
    /// dimension upwards, dropping an interval only once its nested index is empty.
    pub fn delete(&mut self, start: &[T], end: &[T]) -> Result<()> {
        self.validate(start, end)?;
        if self.count == 0 {
            return Err(Error::EmptyTree);
        }
        if !self.contains(start, end)? {
            tracing::debug!("rectangle to delete does not exist");
            return Err(Error::NotFound);
        }

        Self::remove_path(&mut self.root, 0, start, end)?;
        self.count -= 1;
        tracing::trace!(count = self.count, "deleted rectangle");
        Ok(())
    }

    fn remove_path(
        level: &mut IntervalIndex<T, Branch<T>>,
        dim: usize,
        start: &[T],
        end: &[T],
    ) -> Result<()> {
        let emptied = match level.get_mut(&start[dim], &end[dim]) {
            Some(Branch::Nested(next)) => {
                Self::remove_path(next, dim + 1, start, end)?;
                next.is_empty()
            }
            Some(Branch::Leaf(copies)) => {
                *copies -= 1;
                *copies == 0
            }
            None => return Err(Error::NotFound),
        };
        if emptied {
            level.delete(&start[dim], &end[dim])?;
        }
        Ok(())
    }

    /// Returns true if this exact rectangle is stored
    pub fn contains(&self, start: &[T], end: &[T]) -> Result<bool> {
        self.validate(start, end)?;

        let mut level = &self.root;
        for (low, high) in start.iter().zip(end) {
            match level.get(low, high) {
                Some(Branch::Nested(next)) => level = next,
                Some(Branch::Leaf(copies)) => return Ok(*copies > 0),
                None => return Ok(false),
            }
        }
        Ok(false)
    }

    /// Returns true if any stored rectangle overlaps the query in every dimension
    pub fn do_overlap(&self, start: &[T], end: &[T]) -> Result<bool> {
        self.validate(start, end)?;
        let query = Self::search(start, end);
        Ok(Self::any_overlap(&self.root, 0, &query))
    }

    fn any_overlap(level: &IntervalIndex<T, Branch<T>>, dim: usize, query: &[Interval<T>]) -> bool {
        let search = &query[dim];
        level
            .query(search.start(), search.max_end())
            .any(|entry| match entry.value() {
                Branch::Nested(next) => Self::any_overlap(next, dim + 1, query),
                Branch::Leaf(copies) => *copies > 0,
            })
    }

    /// Returns every stored rectangle overlapping the query, one per stored copy
    pub fn get_overlaps(&self, start: &[T], end: &[T]) -> Result<Vec<Rect<T>>> {
        self.validate(start, end)?;
        let query = Self::search(start, end);

        let mut found = Vec::new();
        let mut prefix = Vec::with_capacity(self.dimensions);
        Self::collect(&self.root, 0, Some(query.as_slice()), &mut prefix, &mut found);
        Ok(found)
    }

    /// All stored rectangles, one per stored copy
    #[must_use]
    pub fn rectangles(&self) -> Vec<Rect<T>> {
        let mut found = Vec::with_capacity(self.count);
        let mut prefix = Vec::with_capacity(self.dimensions);
        Self::collect(&self.root, 0, None, &mut prefix, &mut found);
        found
    }

    /// Walks the frontier of dimension `dim`; with no query every interval matches
    fn collect(
        level: &IntervalIndex<T, Branch<T>>,
        dim: usize,
        query: Option<&[Interval<T>]>,
        prefix: &mut Vec<(T, T)>,
        found: &mut Vec<Rect<T>>,
    ) {
        let entries: Box<dyn Iterator<Item = Entry<'_, T, Branch<T>>> + '_> = match query {
            Some(query) => Box::new(level.query(query[dim].start(), query[dim].max_end())),
            None => Box::new(level.iter()),
        };

        for entry in entries {
            prefix.push((entry.start().clone(), entry.end().clone()));
            match entry.value() {
                Branch::Nested(next) => Self::collect(next, dim + 1, query, prefix, found),
                Branch::Leaf(copies) => {
                    let (start, end): (Vec<T>, Vec<T>) = prefix.iter().cloned().unzip();
                    for _ in 0..*copies {
                        found.push(Rect {
                            start: start.clone(),
                            end: end.clone(),
                        });
                    }
                }
            }
            prefix.pop();
        }
    }

    fn search(start: &[T], end: &[T]) -> Vec<Interval<T>> {
        start
            .iter()
            .zip(end)
            .map(|(a, b)| Interval::normalized(a.clone(), b.clone()))
            .collect()
    }
}

impl<T: Debug> Debug for MultiIntervalIndex<T> {
    fn fmt(&self, fmt: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        fmt.debug_struct("MultiIntervalIndex")
            .field("dimensions", &self.dimensions)
            .field("sentinel", &self.sentinel)
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn check_levels<T: Ord + Clone>(level: &IntervalIndex<T, Branch<T>>, depth: usize) -> usize {
        level.tree().check_invariants().unwrap();
        let mut leaves = 0;
        for entry in level.iter() {
            match entry.value() {
                Branch::Nested(next) => {
                    assert!(!next.is_empty(), "empty nested index left at depth {depth}");
                    leaves += check_levels(next, depth + 1);
                }
                Branch::Leaf(copies) => {
                    assert!(*copies > 0, "zero-copy leaf left at depth {depth}");
                    leaves += copies;
                }
            }
        }
        leaves
    }

    fn check_index<T: Ord + Clone>(index: &MultiIntervalIndex<T>) {
        assert_eq!(check_levels(&index.root, 0), index.len());
    }

    fn sorted(mut rects: Vec<Rect<i32>>) -> Vec<Rect<i32>> {
        rects.sort_by(|a, b| (&a.start, &a.end).cmp(&(&b.start, &b.end)));
        rects
    }

    #[test]
    fn multi_requires_a_dimension() {
        assert_eq!(
            MultiIntervalIndex::<i32>::new(0).unwrap_err(),
            Error::NoDimensions
        );
    }

    #[test]
    fn multi_one_dimension_example() {
        let mut index = MultiIntervalIndex::<i32>::new(1).unwrap();
        index.insert(&[1], &[5]).unwrap();
        index.insert(&[4], &[8]).unwrap();

        assert!(index.do_overlap(&[6], &[7]).unwrap());
        assert!(!index.do_overlap(&[9], &[10]).unwrap());
        assert_eq!(
            index.get_overlaps(&[6], &[7]).unwrap(),
            vec![Rect::new(&[4], &[8])]
        );
        check_index(&index);
    }

    #[test]
    fn multi_two_dimension_example() {
        let mut index = MultiIntervalIndex::<i32>::new(2).unwrap();
        index.insert(&[1, 1], &[5, 5]).unwrap();
        index.insert(&[10, 10], &[12, 12]).unwrap();

        let hits = index.get_overlaps(&[4, 4], &[6, 6]).unwrap();
        assert_eq!(hits, vec![Rect::new(&[1, 1], &[5, 5])]);
        check_index(&index);
    }

    #[test]
    fn multi_shared_first_interval_is_not_mixed() {
        let mut index = MultiIntervalIndex::<i32>::new(2).unwrap();
        index.insert(&[0, 0], &[10, 2]).unwrap();
        index.insert(&[0, 8], &[3, 9]).unwrap();

        // overlaps the first rectangle's x range only together with the second's y range
        assert!(!index.do_overlap(&[5, 8], &[6, 9]).unwrap());
        assert!(index.get_overlaps(&[5, 8], &[6, 9]).unwrap().is_empty());

        assert_eq!(
            index.get_overlaps(&[2, 8], &[2, 8]).unwrap(),
            vec![Rect::new(&[0, 8], &[3, 9])]
        );
    }

    #[test]
    fn multi_validation_leaves_state_untouched() {
        let mut index = MultiIntervalIndex::<i32>::new(2).unwrap();
        index.insert(&[1, 1], &[2, 2]).unwrap();

        let err = index.insert(&[1], &[2, 2]).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                start: 1,
                end: 2
            }
        );
        assert!(err.is_validation());
        assert_eq!(
            index.insert(&[], &[]).unwrap_err(),
            Error::DimensionMismatch {
                expected: 2,
                start: 0,
                end: 0
            }
        );
        assert_eq!(
            index.insert(&[0, i32::MIN], &[1, 1]).unwrap_err(),
            Error::SentinelCoordinate { dimension: 1 }
        );
        assert_eq!(
            index.do_overlap(&[i32::MIN, 0], &[0, 0]).unwrap_err(),
            Error::SentinelCoordinate { dimension: 0 }
        );
        assert_eq!(index.len(), 1);
        assert_eq!(index.rectangles(), vec![Rect::new(&[1, 1], &[2, 2])]);
    }

    #[test]
    fn multi_custom_sentinel() {
        let mut index = MultiIntervalIndex::with_sentinel(2, 0_u32).unwrap();
        assert_eq!(
            index.insert(&[0, 1], &[1, 1]),
            Err(Error::SentinelCoordinate { dimension: 0 })
        );
        index.insert(&[1, u32::MIN + 1], &[u32::MAX, 3]).unwrap();
        assert!(index.do_overlap(&[7, 2], &[7, 2]).unwrap());
    }

    #[test]
    fn multi_delete_missing_is_logical_error() {
        let mut index = MultiIntervalIndex::<i32>::new(3).unwrap();
        assert_eq!(
            index.delete(&[1, 1, 1], &[2, 2, 2]),
            Err(Error::EmptyTree)
        );

        index.insert(&[1, 1, 1], &[2, 2, 2]).unwrap();
        index.insert(&[1, 1, 5], &[2, 2, 6]).unwrap();

        // matches the first two dimensions, misses in the last
        let err = index.delete(&[1, 1, 3], &[2, 2, 4]).unwrap_err();
        assert_eq!(err, Error::NotFound);
        assert!(err.is_logical());

        assert_eq!(index.len(), 2);
        assert_eq!(
            sorted(index.rectangles()),
            vec![
                Rect::new(&[1, 1, 1], &[2, 2, 2]),
                Rect::new(&[1, 1, 5], &[2, 2, 6])
            ]
        );
        check_index(&index);
    }

    #[test]
    fn multi_delete_tears_down_bottom_up() {
        let mut index = MultiIntervalIndex::<i32>::new(3).unwrap();
        index.insert(&[0, 0, 0], &[4, 4, 4]).unwrap();
        index.insert(&[0, 0, 6], &[4, 4, 9]).unwrap();
        index.insert(&[0, 0, 6], &[4, 4, 9]).unwrap();

        index.delete(&[0, 0, 6], &[4, 4, 9]).unwrap();
        check_index(&index);
        assert_eq!(index.get_overlaps(&[1, 1, 7], &[1, 1, 7]).unwrap().len(), 1);

        index.delete(&[4, 4, 9], &[0, 0, 6]).unwrap();
        check_index(&index);
        assert!(!index.do_overlap(&[1, 1, 7], &[1, 1, 7]).unwrap());

        index.delete(&[0, 0, 0], &[4, 4, 4]).unwrap();
        check_index(&index);
        assert!(index.is_empty());
        assert!(index.root.is_empty());
    }

    #[test]
    fn multi_insert_then_delete_restores_state() {
        let mut index = MultiIntervalIndex::<i32>::new(2).unwrap();
        index.insert(&[0, 0], &[3, 3]).unwrap();
        index.insert(&[2, 5], &[6, 8]).unwrap();
        let before = sorted(index.rectangles());

        index.insert(&[2, 0], &[6, 1]).unwrap();
        assert_eq!(index.len(), 3);
        index.delete(&[6, 1], &[2, 0]).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(sorted(index.rectangles()), before);
        check_index(&index);
    }

    #[test]
    fn multi_random_against_brute_force() {
        let mut rng = StdRng::seed_from_u64(0xD1);
        for dims in 1..=3 {
            let mut index = MultiIntervalIndex::<i32>::new(dims).unwrap();
            let mut stored: Vec<Rect<i32>> = Vec::new();

            for _ in 0..300 {
                let start: Vec<i32> = (0..dims).map(|_| rng.gen_range(-50..50)).collect();
                let end: Vec<i32> = start.iter().map(|s| s + rng.gen_range(0..15)).collect();
                index.insert(&start, &end).unwrap();
                stored.push(Rect::new(&start, &end));
            }
            check_index(&index);

            for _ in 0..200 {
                let start: Vec<i32> = (0..dims).map(|_| rng.gen_range(-60..60)).collect();
                let end: Vec<i32> = start.iter().map(|s| s + rng.gen_range(0..10)).collect();
                let query = Rect::new(&start, &end);

                let expected: Vec<Rect<i32>> = stored
                    .iter()
                    .filter(|rect| rect.overlaps(&query))
                    .cloned()
                    .collect();
                assert_eq!(index.do_overlap(&start, &end).unwrap(), !expected.is_empty());
                assert_eq!(
                    sorted(index.get_overlaps(&start, &end).unwrap()),
                    sorted(expected)
                );
            }

            stored.shuffle(&mut rng);
            while let Some(rect) = stored.pop() {
                index.delete(&rect.start, &rect.end).unwrap();
                assert_eq!(index.len(), stored.len());
                if stored.len() % 50 == 0 {
                    check_index(&index);
                }
            }
            assert!(index.is_empty());
            check_index(&index);
        }
    }

    #[test]
    fn multi_config_from_json() {
        let config: IndexConfig<i64> = serde_json::from_str(r#"{"dimensions": 2}"#).unwrap();
        assert_eq!(config, IndexConfig::new(2));
        let index = MultiIntervalIndex::from_config(config).unwrap();
        assert_eq!(index.sentinel(), &i64::MIN);

        let config: IndexConfig<i64> =
            serde_json::from_str(r#"{"dimensions": 4, "sentinel": -1}"#).unwrap();
        let mut index = MultiIntervalIndex::from_config(config).unwrap();
        assert_eq!(index.dimensions(), 4);
        assert_eq!(
            index.insert(&[0, 0, -1, 0], &[1, 1, 1, 1]),
            Err(Error::SentinelCoordinate { dimension: 2 })
        );

        let config: IndexConfig<i64> = serde_json::from_str(r#"{"dimensions": 0}"#).unwrap();
        assert_eq!(
            MultiIntervalIndex::from_config(config).unwrap_err(),
            Error::NoDimensions
        );
    }

    #[test]
    fn multi_rect_serialization() {
        let rect = Rect::new(&[3_i64, 9], &[1, 12]);
        assert_eq!(rect.start, vec![1, 9]);

        let json = serde_json::to_string(&rect).unwrap();
        assert_eq!(json, r#"{"start":[1,9],"end":[3,12]}"#);

        let bytes = rkyv::to_bytes::<_, 256>(&rect).unwrap();
        let archived = rkyv::check_archived_root::<Rect<i64>>(&bytes[..]).unwrap();
        assert_eq!(archived.start.as_slice(), &[1, 9]);
        assert_eq!(archived.end.as_slice(), &[3, 12]);
    }
}
