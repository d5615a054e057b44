use core::cmp::Ord;
use core::fmt;
use serde::{Deserialize, Serialize};

/// A closed one-dimensional interval `[start, end]`.
///
/// Several intervals sharing the same `start` are folded into one value: `ends`
/// keeps every end in insertion order. Inside a tree `max_end` holds the largest
/// end of the whole subtree; intervals handed back by queries carry their own
/// largest end and remember which end matched the query.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize)]
#[archive(check_bytes)]
pub struct Interval<T> {
    start: T,
    ends: Vec<T>,
    max_end: T,
    last_matched: Option<usize>,
}

impl<T: Ord + Clone> Interval<T> {
    /// Creates the interval `[start, end]` as given, without reordering the bounds
    ///
    /// # Examples
    /// ```
    /// use nd_interval_tree::Interval;
    ///
    /// let interval = Interval::new(1, 5);
    /// assert_eq!(interval.start(), &1);
    /// assert_eq!(interval.ends(), &[5]);
    /// ```
    #[must_use]
    pub fn new(start: T, end: T) -> Interval<T> {
        Interval {
            start,
            max_end: end.clone(),
            ends: vec![end],
            last_matched: None,
        }
    }

    /// Creates an interval from two bounds given in either order
    ///
    /// # Examples
    /// ```
    /// use nd_interval_tree::Interval;
    ///
    /// assert_eq!(Interval::normalized(8, 3), Interval::new(3, 8));
    /// ```
    #[must_use]
    pub fn normalized(a: T, b: T) -> Interval<T> {
        if b < a {
            Interval::new(b, a)
        } else {
            Interval::new(a, b)
        }
    }

    /// Creates the degenerate interval `[value, value]`
    #[must_use]
    pub fn point(value: T) -> Interval<T> {
        Interval::new(value.clone(), value)
    }

    #[must_use]
    pub fn start(&self) -> &T {
        &self.start
    }

    /// All ends sharing this start, in insertion order
    #[must_use]
    pub fn ends(&self) -> &[T] {
        &self.ends
    }

    /// Largest end reachable from this interval (its subtree while stored in a tree)
    #[must_use]
    pub fn max_end(&self) -> &T {
        &self.max_end
    }

    /// Index into [`Interval::ends`] of the end that matched the last overlap test
    #[must_use]
    pub fn last_matched(&self) -> Option<usize> {
        self.last_matched
    }

    /// The end that matched the last overlap test
    #[must_use]
    pub fn matched_end(&self) -> Option<&T> {
        self.last_matched.and_then(|i| self.ends.get(i))
    }

    /// Largest of this interval's own ends, ignoring any subtree
    pub(crate) fn own_max(&self) -> &T {
        self.ends.iter().max().unwrap_or(&self.max_end)
    }

    pub(crate) fn position(&self, end: &T) -> Option<usize> {
        self.ends.iter().position(|e| e == end)
    }

    pub(crate) fn push_end(&mut self, end: T) -> usize {
        self.ends.push(end);
        self.ends.len() - 1
    }

    pub(crate) fn remove_end(&mut self, index: usize) -> T {
        self.ends.remove(index)
    }

    pub(crate) fn set_max_end(&mut self, max_end: T) {
        self.max_end = max_end;
    }

    /// Returns the first pair `(i, j)` such that `self.ends[i]` and `other.ends[j]`
    /// make the two intervals overlap
    #[must_use]
    pub fn matching_ends(&self, other: &Interval<T>) -> Option<(usize, usize)> {
        for (i, a_end) in self.ends.iter().enumerate() {
            if *a_end < other.start {
                continue;
            }
            for (j, b_end) in other.ends.iter().enumerate() {
                if self.start <= *b_end {
                    return Some((i, j));
                }
            }
        }
        None
    }

    /// Returns true if any end of `self` overlaps any end of `other`
    ///
    /// # Examples
    /// ```
    /// use nd_interval_tree::Interval;
    ///
    /// assert!(Interval::new(1, 5).overlaps(&Interval::new(5, 9)));
    /// assert!(!Interval::new(1, 5).overlaps(&Interval::new(6, 9)));
    /// ```
    #[must_use]
    pub fn overlaps(&self, other: &Interval<T>) -> bool {
        self.matching_ends(other).is_some()
    }

    /// Overlap test that records the matching end index on both sides.
    ///
    /// Both `last_matched` markers are cleared first, so a failed test never
    /// leaves a stale index behind.
    ///
    /// # Examples
    /// ```
    /// use nd_interval_tree::Interval;
    ///
    /// let mut a = Interval::new(1, 5);
    /// let mut b = Interval::new(4, 8);
    /// assert!(a.overlap_with(&mut b));
    /// assert_eq!(a.matched_end(), Some(&5));
    /// assert_eq!(b.matched_end(), Some(&8));
    /// ```
    pub fn overlap_with(&mut self, other: &mut Interval<T>) -> bool {
        self.last_matched = None;
        other.last_matched = None;
        match self.matching_ends(other) {
            Some((i, j)) => {
                self.last_matched = Some(i);
                other.last_matched = Some(j);
                true
            }
            None => false,
        }
    }

    /// Detached copy of a stored interval: own max end, `matched` as last match
    pub(crate) fn duplicate(&self, matched: Option<usize>) -> Interval<T> {
        Interval {
            start: self.start.clone(),
            ends: self.ends.clone(),
            max_end: self.own_max().clone(),
            last_matched: matched,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ends.as_slice() {
            [end] => write!(f, "[{},{}]", self.start, end),
            ends => {
                write!(f, "[{},{{", self.start)?;
                for (i, end) in ends.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{end}")?;
                }
                write!(f, "}}]")
            }
        }
    }
}
