use core::{cmp::Ord, fmt::Debug};
use std::vec::Vec;
use crate::{interval::Interval, node::NodeId, IntervalTree};

/// A query on the tree does not hand out nodes; every stored `(start, end)` pair
/// it reports is wrapped in an `Entry` together with its value.
#[derive(PartialEq, Eq, Debug)]
pub struct Entry<'a, T, V> {
    start: &'a T,
    end: &'a T,
    value: &'a V,
}

impl<'a, T, V> Entry<'a, T, V> {
    #[must_use]
    pub fn start(&self) -> &'a T {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> &'a T {
        self.end
    }

    /// Get a reference to the value stored with this pair
    #[must_use]
    pub fn value(&self) -> &'a V {
        self.value
    }
}

/// An `OverlapIter` is returned by `IntervalTree::query` and iterates over the
/// stored pairs overlapping the query, skipping subtrees whose max end falls
/// short of the query start.
#[derive(Debug)]
pub struct OverlapIter<'a, T, V> {
    pub(crate) tree: &'a IntervalTree<T, V>,
    pub(crate) nodes: Vec<NodeId>,
    pub(crate) interval: Interval<T>,
    // node whose ends are being scanned, and the next end to look at
    pub(crate) pending: Option<(NodeId, usize)>,
}

impl<'a, T: Ord + Clone, V> Iterator for OverlapIter<'a, T, V> {
    type Item = Entry<'a, T, V>;

    fn next(&mut self) -> Option<Entry<'a, T, V>> {
        let tree = self.tree;
        loop {
            if let Some((id, mut index)) = self.pending.take() {
                let node = tree.node(id);
                let ends = node.interval.ends();
                while index < ends.len() {
                    let end = &ends[index];
                    index += 1;
                    if end >= self.interval.start() {
                        self.pending = Some((id, index));
                        return Some(Entry {
                            start: node.start(),
                            end,
                            value: &node.values[index - 1],
                        });
                    }
                }
            }

            let id = self.nodes.pop()?;
            let node = tree.node(id);
            // starts grow to the right, so past the query end nothing further right can match
            let reaches = node.start() <= self.interval.max_end();

            if reaches {
                if let Some(right) = node.right {
                    self.nodes.push(right);
                }
            }
            if let Some(left) = node.left {
                if tree.node(left).interval.max_end() >= self.interval.start() {
                    self.nodes.push(left);
                }
            }
            if reaches {
                self.pending = Some((id, 0));
            }
        }
    }
}

/// An `InOrderIter` iterates over all stored pairs in start order; pairs sharing
/// a start come out in insertion order.
#[derive(Debug)]
pub struct InOrderIter<'a, T, V> {
    pub(crate) tree: &'a IntervalTree<T, V>,
    pub(crate) nodes: Vec<(NodeId, bool)>, // (node, visited)
    pub(crate) pending: Option<(NodeId, usize)>,
}

impl<'a, T: Ord + Clone, V> Iterator for InOrderIter<'a, T, V> {
    type Item = Entry<'a, T, V>;

    fn next(&mut self) -> Option<Entry<'a, T, V>> {
        let tree = self.tree;
        loop {
            if let Some((id, index)) = self.pending.take() {
                let node = tree.node(id);
                if let (Some(end), Some(value)) =
                    (node.interval.ends().get(index), node.values.get(index))
                {
                    self.pending = Some((id, index + 1));
                    return Some(Entry {
                        start: node.start(),
                        end,
                        value,
                    });
                }
            }

            let (id, visited) = self.nodes.pop()?;
            let node = tree.node(id);
            if visited {
                if let Some(right) = node.right {
                    self.nodes.push((right, false));
                }
                self.pending = Some((id, 0));
            } else {
                self.nodes.push((id, true));
                if let Some(left) = node.left {
                    self.nodes.push((left, false));
                }
            }
        }
    }
}
