//! Lazy traversals over a [`Tree`].
//!
//! In-order traversal walks the threads and keeps no stack. Pre- and post-order traversal get
//! nothing out of the threads so they keep an explicit stack of pending nodes instead of
//! recursing.

use std::iter::FusedIterator;

use crate::arena::NodeId;
use crate::threaded::Tree;

/// The order in which [`Tree::traverse`] visits keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Order {
    /// Node, then left subtree, then right subtree.
    PreOrder,
    /// Left subtree, then node, then right subtree. Yields keys in sorted order.
    InOrder,
    /// Left subtree, then right subtree, then node.
    PostOrder,
}

/// A traversal in any [`Order`]. Created by [`Tree::traverse`].
pub enum Traverse<'a, K> {
    /// See [`PreOrder`].
    PreOrder(PreOrder<'a, K>),
    /// See [`Iter`].
    InOrder(Iter<'a, K>),
    /// See [`PostOrder`].
    PostOrder(PostOrder<'a, K>),
}

impl<'a, K> Traverse<'a, K> {
    pub(crate) fn new(tree: &'a Tree<K>, order: Order) -> Self {
        match order {
            Order::PreOrder => Self::PreOrder(PreOrder::new(tree)),
            Order::InOrder => Self::InOrder(Iter::new(tree)),
            Order::PostOrder => Self::PostOrder(PostOrder::new(tree)),
        }
    }
}

impl<'a, K> Iterator for Traverse<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::PreOrder(iter) => iter.next(),
            Self::InOrder(iter) => iter.next(),
            Self::PostOrder(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::PreOrder(iter) => iter.size_hint(),
            Self::InOrder(iter) => iter.size_hint(),
            Self::PostOrder(iter) => iter.size_hint(),
        }
    }
}

impl<K> FusedIterator for Traverse<'_, K> {}

/// Sorted iteration that follows successor threads forwards and predecessor threads backwards.
///
/// # Examples
///
/// ```
/// use tbst::threaded::Tree;
///
/// let tree: Tree<_> = [5, 1, 4, 2, 3].into_iter().collect();
///
/// assert!(tree.iter().eq(&[1, 2, 3, 4, 5]));
/// assert!(tree.iter().rev().eq(&[5, 4, 3, 2, 1]));
/// ```
pub struct Iter<'a, K> {
    tree: &'a Tree<K>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    /// Keys not yet yielded from either end. Stops `front` and `back` from walking past each
    /// other.
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(tree: &'a Tree<K>) -> Self {
        Self {
            tree,
            front: tree.root.map(|root| tree.leftmost(root)),
            back: tree.root.map(|root| tree.rightmost(root)),
            remaining: tree.len(),
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.remaining -= 1;
        let tree = self.tree;
        self.front = tree.next_in_order(id);
        Some(&tree.nodes[id].key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> DoubleEndedIterator for Iter<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.remaining -= 1;
        let tree = self.tree;
        self.back = tree.prev_in_order(id);
        Some(&tree.nodes[id].key)
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}
impl<K> FusedIterator for Iter<'_, K> {}

/// Pre-order iteration with an explicit stack.
pub struct PreOrder<'a, K> {
    tree: &'a Tree<K>,
    stack: Vec<NodeId>,
    remaining: usize,
}

impl<'a, K> PreOrder<'a, K> {
    fn new(tree: &'a Tree<K>) -> Self {
        Self {
            tree,
            stack: tree.root.into_iter().collect(),
            remaining: tree.len(),
        }
    }
}

impl<'a, K> Iterator for PreOrder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let id = self.stack.pop()?;
        let node = &tree.nodes[id];
        // Right goes on first so the left subtree comes off first.
        self.stack.extend(node.right);
        self.stack.extend(node.left);
        self.remaining -= 1;
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for PreOrder<'_, K> {}
impl<K> FusedIterator for PreOrder<'_, K> {}

/// Post-order iteration with an explicit stack.
pub struct PostOrder<'a, K> {
    tree: &'a Tree<K>,
    /// Pending nodes, flagged `true` once their children have been pushed.
    stack: Vec<(NodeId, bool)>,
    remaining: usize,
}

impl<'a, K> PostOrder<'a, K> {
    fn new(tree: &'a Tree<K>) -> Self {
        Self {
            tree,
            stack: tree.root.map(|root| (root, false)).into_iter().collect(),
            remaining: tree.len(),
        }
    }
}

impl<'a, K> Iterator for PostOrder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        loop {
            let (id, expanded) = self.stack.pop()?;
            let node = &tree.nodes[id];
            if expanded {
                self.remaining -= 1;
                return Some(&node.key);
            }
            self.stack.push((id, true));
            self.stack.extend(node.right.map(|right| (right, false)));
            self.stack.extend(node.left.map(|left| (left, false)));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for PostOrder<'_, K> {}
impl<K> FusedIterator for PostOrder<'_, K> {}
