#![warn(clippy::cargo)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(clippy::all)]
#![warn(
    missing_debug_implementations,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_must_use
)]
#![warn(clippy::pedantic)]
#![allow(clippy::comparison_chain)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]

//! Interval overlap indexes built on an augmented red-black tree.
//!
//! [`IntervalTree`] stores closed intervals keyed by their start. Every node
//! also records the largest end found in its subtree, which lets overlap
//! queries skip whole subtrees. Intervals sharing a start share a node.
//!
//! [`IntervalIndex`] is the one-dimensional façade that accepts bounds in either
//! order, and [`MultiIntervalIndex`] composes one index per dimension into a
//! hyper-rectangle overlap index.
//!
//! # Examples
//! ```
//! use nd_interval_tree::{IntervalIndex, MultiIntervalIndex};
//!
//! let mut index = IntervalIndex::new();
//! index.insert(1, 5);
//! index.insert(8, 4);
//! assert!(index.do_overlap(&6, &7));
//! assert!(!index.do_overlap(&9, &10));
//!
//! let mut rects = MultiIntervalIndex::<i32>::new(2).unwrap();
//! rects.insert(&[1, 1], &[5, 5]).unwrap();
//! rects.insert(&[10, 10], &[12, 12]).unwrap();
//! let hits = rects.get_overlaps(&[4, 4], &[6, 6]).unwrap();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].start, vec![1, 1]);
//! ```

use core::cmp::{Ord, Ordering};
use core::fmt::Debug;
use std::vec::Vec;

pub mod error;
mod index;
mod interval;
mod iterators;
mod multi;
mod node;

pub use error::{Error, Result};
pub use index::IntervalIndex;
pub use interval::Interval;
pub use iterators::{Entry, InOrderIter, OverlapIter};
pub use multi::{IndexConfig, MultiIntervalIndex, Rect};

use node::{Color, Node, NodeId, Side};

/// A red-black interval tree with max-end augmentation.
///
/// Each stored `(start, end)` pair carries a value of type `V`. Pairs with the
/// same start live in one node; the node keeps their ends in insertion order.
/// Nodes are kept in an arena and link to each other by index.
///
/// # Examples
/// ```
/// use nd_interval_tree::{Interval, IntervalTree};
///
/// let mut tree = IntervalTree::new();
/// tree.insert(0, 3, "a");
/// tree.insert(6, 10, "b");
/// tree.insert(8, 9, "c");
/// tree.insert(15, 23, "d");
///
/// // [6,10] is the only interval reaching into [10,14]
/// let found = tree.find_overlap(&Interval::new(10, 14)).unwrap();
/// assert_eq!(found.start(), &6);
///
/// assert!(tree.find_overlap(&Interval::new(11, 14)).is_none());
/// assert_eq!(tree.find_overlaps(&Interval::new(8, 15)).len(), 3);
///
/// assert_eq!(tree.delete(&8, &9), Ok("c"));
/// assert_eq!(tree.len(), 3);
/// ```
#[derive(Clone)]
pub struct IntervalTree<T, V> {
    nodes: Vec<Option<Node<T, V>>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    len: usize,
}

impl<T, V> Default for IntervalTree<T, V> {
    fn default() -> Self {
        IntervalTree {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
        }
    }
}

/// Outcome of one double-black fixup step
enum FixupStep {
    Resolved,
    Continue {
        node: Option<NodeId>,
        parent: Option<NodeId>,
    },
}

/// The six shapes a double-black deficiency can take
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DeleteCase {
    Root,
    RedSibling,
    BlackParentBlackNephews,
    RedParentBlackNephews,
    RedNearNephew,
    RedFarNephew,
}

/// Nodes around a double-black position; `side` is where the deficient node sits
#[derive(Clone, Copy, Debug)]
struct Deficiency {
    node: Option<NodeId>,
    parent: NodeId,
    sibling: NodeId,
    side: Side,
}

impl<T, V> IntervalTree<T, V> {
    pub(crate) fn node(&self, id: NodeId) -> &Node<T, V> {
        match &self.nodes[id] {
            Some(node) => node,
            None => unreachable!("node {id} was released"),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T, V> {
        match &mut self.nodes[id] {
            Some(node) => node,
            None => unreachable!("node {id} was released"),
        }
    }

    fn collect_in_order<'a>(&'a self, id: Option<NodeId>, out: &mut Vec<&'a Interval<T>>) {
        if let Some(id) = id {
            let node = self.node(id);
            self.collect_in_order(node.left, out);
            out.push(&node.interval);
            self.collect_in_order(node.right, out);
        }
    }
}

impl<T: Ord + Clone, V> IntervalTree<T, V> {
    /// Initialize an empty interval tree
    ///
    /// # Examples
    /// ```
    /// use nd_interval_tree::IntervalTree;
    ///
    /// let tree = IntervalTree::<usize, ()>::new();
    /// assert!(tree.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> IntervalTree<T, V> {
        IntervalTree::default()
    }

    /// Returns true if there are no intervals in the tree, false otherwise
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of stored `(start, end)` pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of nodes, i.e. distinct starts
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Returns the height of the tree, 0 when empty
    #[must_use]
    pub fn height(&self) -> usize {
        self.subtree_height(self.root)
    }

    fn subtree_height(&self, id: Option<NodeId>) -> usize {
        match id {
            Some(id) => {
                let node = self.node(id);
                1 + self
                    .subtree_height(node.left)
                    .max(self.subtree_height(node.right))
            }
            None => 0,
        }
    }

    /// Removes all intervals from the tree but keeps the allocated capacity
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    /// Inserts the pair `(start, end)` with its value.
    ///
    /// The bounds are taken as given; callers wanting `start <= end` enforced go
    /// through [`IntervalIndex`]. A pair whose start is already stored is
    /// appended to that node instead of creating a new one.
    ///
    /// # Examples
    /// ```
    /// use nd_interval_tree::IntervalTree;
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(1, 5, ());
    /// tree.insert(1, 8, ());
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(tree.node_count(), 1);
    /// ```
    pub fn insert(&mut self, start: T, end: T, value: V) {
        self.insert_entry(start, end, value);
    }

    fn insert_entry(&mut self, start: T, end: T, value: V) -> (NodeId, usize) {
        self.len += 1;

        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.root;
        while let Some(id) = current {
            let (order, left, right) = {
                let node = self.node(id);
                (start.cmp(node.start()), node.left, node.right)
            };
            match order {
                Ordering::Equal => {
                    let index = self.node_mut(id).push(end, value);
                    self.update_max_upwards(Some(id));
                    return (id, index);
                }
                Ordering::Less => {
                    side = Side::Left;
                    current = left;
                }
                Ordering::Greater => {
                    side = Side::Right;
                    current = right;
                }
            }
            parent = Some(id);
        }

        let id = self.alloc(Node::init(start, end, value, parent));
        match parent {
            Some(parent) => {
                self.node_mut(parent).set_child(side, Some(id));
                self.update_max_upwards(Some(parent));
            }
            None => self.root = Some(id),
        }
        tracing::trace!(node = id, "created interval tree node");
        self.insert_fixup(id);
        (id, 0)
    }

    /// Returns the value stored with the exact pair `(start, end)`, inserting
    /// `default()` first if the pair is absent
    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, start: T, end: T, default: F) -> &mut V {
        let (id, index) = match self.locate(&start, &end) {
            Some(found) => found,
            None => self.insert_entry(start, end, default()),
        };
        &mut self.node_mut(id).values[index]
    }

    /// Returns the value stored with the exact pair `(start, end)`
    #[must_use]
    pub fn get(&self, start: &T, end: &T) -> Option<&V> {
        self.locate(start, end)
            .map(|(id, index)| &self.node(id).values[index])
    }

    pub fn get_mut(&mut self, start: &T, end: &T) -> Option<&mut V> {
        let (id, index) = self.locate(start, end)?;
        Some(&mut self.node_mut(id).values[index])
    }

    /// Returns true if the exact pair `(start, end)` is stored
    #[must_use]
    pub fn contains(&self, start: &T, end: &T) -> bool {
        self.locate(start, end).is_some()
    }

    fn find_node(&self, start: &T) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.node(id);
            current = match start.cmp(node.start()) {
                Ordering::Equal => return Some(id),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    fn locate(&self, start: &T, end: &T) -> Option<(NodeId, usize)> {
        let id = self.find_node(start)?;
        let index = self.node(id).interval.position(end)?;
        Some((id, index))
    }

    /// Deletes one stored copy of the pair `(start, end)` and returns its value
    ///
    /// # Examples
    /// ```
    /// use nd_interval_tree::{Error, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// assert_eq!(tree.delete(&0, &3), Err(Error::EmptyTree));
    ///
    /// tree.insert(0, 3, 'x');
    /// assert_eq!(tree.delete(&0, &4), Err(Error::NotFound));
    /// assert_eq!(tree.delete(&0, &3), Ok('x'));
    /// assert!(tree.is_empty());
    /// ```
    pub fn delete(&mut self, start: &T, end: &T) -> Result<V> {
        if self.root.is_none() {
            return Err(Error::EmptyTree);
        }
        let (id, index) = self.locate(start, end).ok_or(Error::NotFound)?;
        self.len -= 1;

        if self.node(id).entries() > 1 {
            let value = self.node_mut(id).remove(index);
            self.update_max_upwards(Some(id));
            return Ok(value);
        }

        let victim = match (self.node(id).left, self.node(id).right) {
            (Some(left), Some(_)) => {
                let predecessor = self.subtree_max(left);
                self.swap_payload(id, predecessor);
                predecessor
            }
            _ => id,
        };
        let mut removed = self.splice(victim);
        Ok(removed.remove(0))
    }

    /// Rightmost node of a subtree, i.e. its in-order maximum
    fn subtree_max(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.node(id).right {
            id = right;
        }
        id
    }

    fn swap_payload(&mut self, a: NodeId, b: NodeId) {
        let Some(mut other) = self.nodes[b].take() else {
            unreachable!("node {b} was released")
        };
        let node = self.node_mut(a);
        core::mem::swap(&mut node.interval, &mut other.interval);
        core::mem::swap(&mut node.values, &mut other.values);
        self.nodes[b] = Some(other);
    }

    /// Unlinks a node with at most one child and restores the red-black rules
    fn splice(&mut self, id: NodeId) -> Node<T, V> {
        let (child, parent, color) = {
            let node = self.node(id);
            (node.left.or(node.right), node.parent, node.color)
        };

        if let Some(child) = child {
            self.node_mut(child).parent = parent;
        }
        match parent {
            Some(parent) => {
                let side = self.side_of(id, parent);
                self.node_mut(parent).set_child(side, child);
            }
            None => self.root = child,
        }
        self.update_max_upwards(parent);

        let removed = self.release(id);
        tracing::trace!(node = id, "released interval tree node");

        if color == Color::Black {
            match child {
                Some(child) if self.node(child).is_red() => {
                    self.node_mut(child).color = Color::Black;
                }
                _ => self.delete_fixup(child, parent),
            }
        }
        removed
    }

    /// Returns true if there exists an interval in the tree that overlaps with `interval`
    #[must_use]
    pub fn overlaps(&self, interval: &Interval<T>) -> bool {
        self.find_overlap(interval).is_some()
    }

    /// Returns first interval that overlaps with `interval`.
    ///
    /// Which one is first depends only on the shape of the tree. The returned
    /// copy reports the matching end through [`Interval::matched_end`].
    #[must_use]
    pub fn find_overlap(&self, interval: &Interval<T>) -> Option<Interval<T>> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.node(id);
            if let Some((matched, _)) = node.interval.matching_ends(interval) {
                return Some(node.interval.duplicate(Some(matched)));
            }

            current = match node.left {
                Some(left) if self.node(left).interval.max_end() >= interval.start() => Some(left),
                _ => node.right,
            };
        }
        None
    }

    /// Returns all nodes' intervals that overlap with `interval`, one copy per node
    #[must_use]
    pub fn find_overlaps(&self, interval: &Interval<T>) -> Vec<Interval<T>> {
        let mut overlaps = Vec::new();
        let mut nodes: Vec<NodeId> = self.root.into_iter().collect();

        while let Some(id) = nodes.pop() {
            let node = self.node(id);
            if let Some((matched, _)) = node.interval.matching_ends(interval) {
                overlaps.push(node.interval.duplicate(Some(matched)));
            }

            if let Some(left) = node.left {
                if self.node(left).interval.max_end() >= interval.start() {
                    nodes.push(left);
                }
            }
            if let Some(right) = node.right {
                if node.start() <= interval.max_end() {
                    nodes.push(right);
                }
            }
        }
        overlaps
    }

    /// Lazily iterates over every stored pair overlapping `interval`
    ///
    /// # Examples
    /// ```
    /// use nd_interval_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(1, 2, 'a');
    /// tree.insert(1, 9, 'b');
    /// tree.insert(4, 5, 'c');
    ///
    /// let mut hits: Vec<char> = tree.query(Interval::new(6, 7)).map(|e| *e.value()).collect();
    /// hits.sort_unstable();
    /// assert_eq!(hits, vec!['b']);
    /// ```
    #[must_use]
    pub fn query(&self, interval: Interval<T>) -> OverlapIter<'_, T, V> {
        OverlapIter {
            tree: self,
            nodes: self.root.into_iter().collect(),
            interval,
            pending: None,
        }
    }

    /// Iterates over all stored pairs sorted by start
    #[must_use]
    pub fn iter(&self) -> InOrderIter<'_, T, V> {
        InOrderIter {
            tree: self,
            nodes: self.root.map(|id| (id, false)).into_iter().collect(),
            pending: None,
        }
    }

    /// Returns one interval per node following an in-order traversal.
    /// Therefore intervals are sorted from smallest to largest start
    #[must_use]
    pub fn intervals(&self) -> Vec<Interval<T>> {
        let mut intervals = Vec::with_capacity(self.node_count());
        self.collect_in_order(self.root, &mut intervals);
        intervals
            .into_iter()
            .map(|interval| interval.duplicate(None))
            .collect()
    }

    fn alloc(&mut self, node: Node<T, V>) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id] = Some(node);
            id
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    fn release(&mut self, id: NodeId) -> Node<T, V> {
        let Some(node) = self.nodes[id].take() else {
            unreachable!("node {id} released twice")
        };
        self.free.push(id);
        node
    }

    fn is_red(&self, id: Option<NodeId>) -> bool {
        id.is_some_and(|id| self.node(id).is_red())
    }

    fn set_color(&mut self, id: NodeId, color: Color) {
        self.node_mut(id).color = color;
    }

    fn side_of(&self, child: NodeId, parent: NodeId) -> Side {
        if self.node(parent).left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Recomputes one node's max end from its own ends and its children
    fn update_max(&mut self, id: NodeId) {
        let node = self.node(id);
        let mut max = node.interval.own_max();
        for child in [node.left, node.right].into_iter().flatten() {
            let child_max = self.node(child).interval.max_end();
            if child_max > max {
                max = child_max;
            }
        }
        let max = max.clone();
        self.node_mut(id).interval.set_max_end(max);
    }

    fn update_max_upwards(&mut self, mut current: Option<NodeId>) {
        while let Some(id) = current {
            self.update_max(id);
            current = self.node(id).parent;
        }
    }

    /// Rotates `id` down towards `direction`; its child on the other side takes its place
    fn rotate(&mut self, id: NodeId, direction: Side) {
        let Some(pivot) = self.node(id).child(direction.opposite()) else {
            return;
        };
        let inner = self.node(pivot).child(direction);

        self.node_mut(id).set_child(direction.opposite(), inner);
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(id);
        }

        let parent = self.node(id).parent;
        self.node_mut(pivot).parent = parent;
        match parent {
            Some(parent) => {
                let side = self.side_of(id, parent);
                self.node_mut(parent).set_child(side, Some(pivot));
            }
            None => self.root = Some(pivot),
        }

        self.node_mut(pivot).set_child(direction, Some(id));
        self.node_mut(id).parent = Some(pivot);

        // subtree membership changed for both; `id` is now below `pivot`
        self.update_max(id);
        self.update_max(pivot);
    }

    fn insert_fixup(&mut self, mut id: NodeId) {
        while let Some(mut parent) = self.node(id).parent {
            if !self.node(parent).is_red() {
                break;
            }
            // a red parent is never the root
            let Some(grandparent) = self.node(parent).parent else {
                break;
            };
            let side = self.side_of(parent, grandparent);
            let uncle = self.node(grandparent).child(side.opposite());

            if let Some(uncle) = uncle.filter(|&uncle| self.node(uncle).is_red()) {
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                id = grandparent;
                continue;
            }

            if self.side_of(id, parent) != side {
                // inner grandchild: turn left-right / right-left into left-left / right-right
                self.rotate(parent, side);
                core::mem::swap(&mut id, &mut parent);
            }
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
            break;
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    fn classify(&self, node: Option<NodeId>, parent: Option<NodeId>) -> (DeleteCase, Option<Deficiency>) {
        let Some(parent) = parent else {
            return (DeleteCase::Root, None);
        };
        let side = if self.node(parent).left == node {
            Side::Left
        } else {
            Side::Right
        };
        let Some(sibling) = self.node(parent).child(side.opposite()) else {
            unreachable!("double-black node {node:?} has no sibling")
        };
        let near = self.node(sibling).child(side);
        let far = self.node(sibling).child(side.opposite());

        let case = if self.node(sibling).is_red() {
            DeleteCase::RedSibling
        } else if self.is_red(far) {
            DeleteCase::RedFarNephew
        } else if self.is_red(near) {
            DeleteCase::RedNearNephew
        } else if self.node(parent).is_red() {
            DeleteCase::RedParentBlackNephews
        } else {
            DeleteCase::BlackParentBlackNephews
        };

        let deficiency = Deficiency {
            node,
            parent,
            sibling,
            side,
        };
        (case, Some(deficiency))
    }

    fn delete_fixup(&mut self, mut node: Option<NodeId>, mut parent: Option<NodeId>) {
        loop {
            match self.fixup_step(node, parent) {
                FixupStep::Resolved => break,
                FixupStep::Continue {
                    node: next,
                    parent: next_parent,
                } => {
                    node = next;
                    parent = next_parent;
                }
            }
        }
    }

    fn fixup_step(&mut self, node: Option<NodeId>, parent: Option<NodeId>) -> FixupStep {
        let (case, deficiency) = self.classify(node, parent);
        let Some(Deficiency {
            node,
            parent,
            sibling,
            side,
        }) = deficiency
        else {
            if let Some(node) = node {
                self.set_color(node, Color::Black);
            }
            return FixupStep::Resolved;
        };

        match case {
            DeleteCase::Root => FixupStep::Resolved,
            DeleteCase::RedSibling => {
                self.set_color(sibling, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate(parent, side);
                FixupStep::Continue {
                    node,
                    parent: Some(parent),
                }
            }
            DeleteCase::BlackParentBlackNephews => {
                self.set_color(sibling, Color::Red);
                FixupStep::Continue {
                    node: Some(parent),
                    parent: self.node(parent).parent,
                }
            }
            DeleteCase::RedParentBlackNephews => {
                self.set_color(sibling, Color::Red);
                self.set_color(parent, Color::Black);
                FixupStep::Resolved
            }
            DeleteCase::RedNearNephew => {
                if let Some(near) = self.node(sibling).child(side) {
                    self.set_color(near, Color::Black);
                }
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, side.opposite());
                FixupStep::Continue {
                    node,
                    parent: Some(parent),
                }
            }
            DeleteCase::RedFarNephew => {
                let parent_color = self.node(parent).color;
                self.set_color(sibling, parent_color);
                self.set_color(parent, Color::Black);
                if let Some(far) = self.node(sibling).child(side.opposite()) {
                    self.set_color(far, Color::Black);
                }
                self.rotate(parent, side);
                FixupStep::Resolved
            }
        }
    }

    /// Verifies ordering, red-black rules, parent links, max-end augmentation and counts
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> core::result::Result<(), String> {
        let Some(root) = self.root else {
            return if self.len == 0 && self.node_count() == 0 {
                Ok(())
            } else {
                Err(format!("empty tree reports {} pairs", self.len))
            };
        };
        if self.node(root).is_red() {
            return Err("root is red".to_string());
        }
        if self.node(root).parent.is_some() {
            return Err("root has a parent".to_string());
        }
        let (pairs, nodes, _) = self.check_subtree(root, None, None)?;
        if pairs != self.len {
            return Err(format!("counted {pairs} pairs, len is {}", self.len));
        }
        if nodes != self.node_count() {
            return Err(format!("reached {nodes} nodes, arena holds {}", self.node_count()));
        }
        Ok(())
    }

    /// Returns (pairs, nodes, black height) of a subtree
    #[cfg(test)]
    fn check_subtree(
        &self,
        id: NodeId,
        lower: Option<&T>,
        upper: Option<&T>,
    ) -> core::result::Result<(usize, usize, usize), String> {
        let node = self.node(id);
        if lower.is_some_and(|lower| node.start() <= lower)
            || upper.is_some_and(|upper| node.start() >= upper)
        {
            return Err(format!("node {id} breaks start ordering"));
        }
        if node.entries() == 0 || node.entries() != node.interval.ends().len() {
            return Err(format!("node {id} has mismatched ends and values"));
        }

        let mut max = node.interval.own_max();
        let mut pairs = node.entries();
        let mut nodes = 1;
        let mut heights = [0, 0];
        for (slot, child) in [node.left, node.right].into_iter().enumerate() {
            let Some(child) = child else { continue };
            let child_node = self.node(child);
            if child_node.parent != Some(id) {
                return Err(format!("node {child} does not point back to {id}"));
            }
            if node.is_red() && child_node.is_red() {
                return Err(format!("red node {id} has red child {child}"));
            }
            if child_node.interval.max_end() > max {
                max = child_node.interval.max_end();
            }
            let (bounds_low, bounds_high) = if slot == 0 {
                (lower, Some(node.start()))
            } else {
                (Some(node.start()), upper)
            };
            let (p, n, h) = self.check_subtree(child, bounds_low, bounds_high)?;
            pairs += p;
            nodes += n;
            heights[slot] = h;
        }
        if heights[0] != heights[1] {
            return Err(format!("node {id} has black heights {heights:?}"));
        }
        if node.interval.max_end() != max {
            return Err(format!("node {id} has a stale max end"));
        }
        let own = usize::from(!node.is_red());
        Ok((pairs, nodes, heights[0] + own))
    }
}

impl<T: Debug, V> Debug for IntervalTree<T, V> {
    fn fmt(&self, fmt: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut intervals = Vec::new();
        self.collect_in_order(self.root, &mut intervals);
        fmt.write_str("IntervalTree ")?;
        fmt.debug_set().entries(intervals).finish()
    }
}
