use core::cmp::Ord;
use crate::interval::Interval;

/// Index of a node inside the tree's arena
pub(crate) type NodeId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child slot of a parent a node occupies
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A tree node. `values[i]` is the payload stored with `interval.ends()[i]`.
#[derive(Clone, Debug)]
pub(crate) struct Node<T, V> {
    pub interval: Interval<T>,
    pub values: Vec<V>,
    pub color: Color,
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl<T: Ord + Clone, V> Node<T, V> {
    /// New nodes always start out as red leaves
    pub fn init(start: T, end: T, value: V, parent: Option<NodeId>) -> Node<T, V> {
        Node {
            interval: Interval::new(start, end),
            values: vec![value],
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    pub fn start(&self) -> &T {
        self.interval.start()
    }

    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn set_child(&mut self, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    pub fn entries(&self) -> usize {
        self.values.len()
    }

    /// Appends a duplicate-start entry and returns its position
    pub fn push(&mut self, end: T, value: V) -> usize {
        self.values.push(value);
        self.interval.push_end(end)
    }

    pub fn remove(&mut self, index: usize) -> V {
        self.interval.remove_end(index);
        self.values.remove(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_keeps_values_parallel_to_ends() {
        let mut node = Node::init(3, 9, 'a', None);
        assert!(node.is_red());
        assert_eq!(node.push(4, 'b'), 1);
        assert_eq!(node.push(12, 'c'), 2);
        assert_eq!(node.entries(), 3);

        assert_eq!(node.remove(1), 'b');
        assert_eq!(node.interval.ends(), &[9, 12]);
        assert_eq!(node.values, vec!['a', 'c']);
    }

    #[test]
    fn node_child_slots() {
        let mut node = Node::init(0, 1, (), Some(7));
        node.set_child(Side::Left, Some(2));
        node.set_child(Side::Left.opposite(), Some(5));
        assert_eq!(node.child(Side::Left), Some(2));
        assert_eq!(node.child(Side::Right), Some(5));
        assert_eq!(node.parent, Some(7));
    }
}
