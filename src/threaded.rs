//! An unbalanced, threaded BST. Nodes without a left child point at their in-order predecessor
//! and nodes without a right child point at their in-order successor.
//!
//! # Examples
//!
//! ```
//! use tbst::threaded::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(!tree.search(&1));
//!
//! tree.insert(1);
//! assert!(tree.search(&1));
//!
//! // Inserting the same key again keeps both copies.
//! tree.insert(1);
//! assert_eq!(tree.len(), 2);
//!
//! // Deleting removes one copy and returns it.
//! assert_eq!(tree.delete(&1), Some(1));
//! assert_eq!(tree.delete(&1), Some(1));
//! assert_eq!(tree.delete(&1), None);
//! ```

use std::fmt;
use std::mem;

use tracing::trace;

use crate::arena::{Arena, NodeId};
use crate::traverse::{Iter, Order, Traverse};
use crate::util::{DeleteCase, Direction};

/// A threaded Binary Search Tree. Keys equal to a node's key are stored in its right subtree.
#[derive(Clone)]
pub struct Tree<K> {
    pub(crate) root: Option<NodeId>,
    pub(crate) nodes: Arena<Node<K>>,
}

#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) direction: Direction,
    /// In-order predecessor. Only set while `left` is empty.
    pub(crate) pred_thread: Option<NodeId>,
    /// In-order successor. Only set while `right` is empty.
    pub(crate) succ_thread: Option<NodeId>,
}

impl<K> Node<K> {
    fn new(key: K, parent: Option<NodeId>, direction: Direction) -> Self {
        Self {
            key,
            left: None,
            right: None,
            parent,
            direction,
            pred_thread: None,
            succ_thread: None,
        }
    }
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Drop for Tree<K> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K> fmt::Debug for Tree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K> Tree<K> {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            root: None,
            nodes: Arena::new(),
        }
    }

    /// The number of keys in the tree, counting duplicates.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The smallest key in the tree.
    pub fn min(&self) -> Option<&K> {
        self.root.map(|root| &self.nodes[self.leftmost(root)].key)
    }

    /// The largest key in the tree. With duplicates this is the last copy inserted.
    pub fn max(&self) -> Option<&K> {
        self.root.map(|root| &self.nodes[self.rightmost(root)].key)
    }

    /// Visits every key in the given order. The traversal borrows the tree so it can't be
    /// modified mid-walk, but any number of traversals may run side by side.
    ///
    /// # Examples
    ///
    /// ```
    /// use tbst::threaded::Tree;
    /// use tbst::traverse::Order;
    ///
    /// let tree: Tree<_> = [4, 2, 6].into_iter().collect();
    ///
    /// assert!(tree.traverse(Order::PreOrder).eq(&[4, 2, 6]));
    /// assert!(tree.traverse(Order::InOrder).eq(&[2, 4, 6]));
    /// assert!(tree.traverse(Order::PostOrder).eq(&[2, 6, 4]));
    /// ```
    pub fn traverse(&self, order: Order) -> Traverse<'_, K> {
        Traverse::new(self, order)
    }

    /// Visits every key in sorted order by following threads.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self)
    }

    /// Removes every key. Children are released before their parents and each parent gives up
    /// its child slot before that child is released.
    pub fn clear(&mut self) {
        let Some(root) = self.root.take() else {
            return;
        };
        let mut released = 0usize;
        // `true` once the node's children have been scheduled.
        let mut stack = vec![(root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                self.nodes.release(id);
                released += 1;
                continue;
            }
            let node = &mut self.nodes[id];
            let (left, right) = (node.left.take(), node.right.take());
            stack.push((id, true));
            stack.extend(right.map(|right| (right, false)));
            stack.extend(left.map(|left| (left, false)));
        }
        trace!(released, "cleared tree");
    }

    /// The leftmost node of the subtree rooted at `id`.
    pub(crate) fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.nodes[id].left {
            id = left;
        }
        id
    }

    /// The rightmost node of the subtree rooted at `id`.
    pub(crate) fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.nodes[id].right {
            id = right;
        }
        id
    }

    /// The node after `id` in sorted order: the leftmost node of its right subtree, or its
    /// successor thread when it has no right subtree.
    pub(crate) fn next_in_order(&self, id: NodeId) -> Option<NodeId> {
        let node = &self.nodes[id];
        match node.right {
            Some(right) => Some(self.leftmost(right)),
            None => node.succ_thread,
        }
    }

    /// Mirror image of [`Tree::next_in_order`].
    pub(crate) fn prev_in_order(&self, id: NodeId) -> Option<NodeId> {
        let node = &self.nodes[id];
        match node.left {
            Some(left) => Some(self.rightmost(left)),
            None => node.pred_thread,
        }
    }

    /// Points the slot that owns a node (`direction` of `parent`, or the root) at `child`.
    fn replace_child(&mut self, parent: Option<NodeId>, direction: Direction, child: Option<NodeId>) {
        match (parent, direction) {
            (None, Direction::Root) => self.root = child,
            (Some(parent), Direction::Left) => self.nodes[parent].left = child,
            (Some(parent), Direction::Right) => self.nodes[parent].right = child,
            (parent, direction) => panic!(
                "direction tag {direction:?} disagrees with parent link (has parent: {})",
                parent.is_some()
            ),
        }
    }

    /// Makes two nodes that just became neighbours in sorted order thread to each other, as long
    /// as the relevant child slot is empty.
    fn rethread(&mut self, pred: Option<NodeId>, succ: Option<NodeId>) {
        if let Some(pred) = pred {
            let node = &mut self.nodes[pred];
            if node.right.is_none() {
                node.succ_thread = succ;
            }
        }
        if let Some(succ) = succ {
            let node = &mut self.nodes[succ];
            if node.left.is_none() {
                node.pred_thread = pred;
            }
        }
    }

    /// Detaches a node with at most one child, repairs the threads that ran through it and
    /// releases it.
    ///
    /// ## Panics
    ///
    /// When the node has two children.
    fn unlink(&mut self, id: NodeId) -> K {
        let pred = self.prev_in_order(id);
        let succ = self.next_in_order(id);

        let node = &self.nodes[id];
        let (parent, direction) = (node.parent, node.direction);
        let child = match (node.left, node.right) {
            (Some(_), Some(_)) => unreachable!("only nodes with at most one child are unlinked"),
            (left, right) => left.or(right),
        };

        if let Some(child) = child {
            let child_node = &mut self.nodes[child];
            child_node.parent = parent;
            child_node.direction = direction;
        }
        self.replace_child(parent, direction, child);
        self.rethread(pred, succ);

        // Nothing refers to `id` any more: its owner slot now holds `child` and its neighbours
        // thread to each other.
        let key = self.nodes.release(id).key;

        if cfg!(debug_assertions) {
            for id in [pred, succ, child].into_iter().flatten() {
                self.assert_links(id);
            }
        }
        key
    }

    /// Checks the links of a single node. Used after mutations in debug builds.
    fn assert_links(&self, id: NodeId) {
        let node = &self.nodes[id];
        match (node.parent, node.direction) {
            (None, Direction::Root) => assert_eq!(self.root, Some(id)),
            (Some(parent), Direction::Left) => assert_eq!(self.nodes[parent].left, Some(id)),
            (Some(parent), Direction::Right) => assert_eq!(self.nodes[parent].right, Some(id)),
            (parent, direction) => panic!("direction {direction:?} with parent {parent:?}"),
        }
        let links = [node.left, node.right, node.pred_thread, node.succ_thread];
        for link in links.into_iter().flatten() {
            assert!(self.nodes.is_live(link), "link to a released node");
        }
        assert!(node.left.is_none() || node.pred_thread.is_none());
        assert!(node.right.is_none() || node.succ_thread.is_none());
    }
}

impl<K> Tree<K>
where
    K: Ord,
{
    /// Inserts `key`. Keys equal to an existing key are placed in its right subtree, so nothing
    /// is ever rejected or overwritten.
    ///
    /// # Examples
    ///
    /// ```
    /// use tbst::threaded::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for key in [2, 4, 6, 8, 10] {
    ///     tree.insert(key);
    /// }
    ///
    /// assert!(tree.iter().eq(&[2, 4, 6, 8, 10]));
    /// ```
    pub fn insert(&mut self, key: K) {
        let Some(mut parent) = self.root else {
            self.root = Some(self.nodes.alloc(Node::new(key, None, Direction::Root)));
            trace!("inserted root");
            return;
        };

        let direction = loop {
            let node = &self.nodes[parent];
            let (direction, child) = if key < node.key {
                (Direction::Left, node.left)
            } else {
                (Direction::Right, node.right)
            };
            match child {
                Some(child) => parent = child,
                None => break direction,
            }
        };

        let id = self.nodes.alloc(Node::new(key, Some(parent), direction));

        // The new leaf sits between `parent` and the neighbour `parent` used to thread to on
        // that side. It takes over that thread and threads back to `parent` on the other side.
        let parent_node = &mut self.nodes[parent];
        let (pred_thread, succ_thread) = match direction {
            Direction::Left => {
                parent_node.left = Some(id);
                (parent_node.pred_thread.take(), Some(parent))
            }
            Direction::Right => {
                parent_node.right = Some(id);
                (Some(parent), parent_node.succ_thread.take())
            }
            Direction::Root => unreachable!("descent always ends in a child slot"),
        };
        let node = &mut self.nodes[id];
        node.pred_thread = pred_thread;
        node.succ_thread = succ_thread;
        trace!(?direction, len = self.len(), "inserted key");

        if cfg!(debug_assertions) {
            self.assert_links(id);
            self.assert_links(parent);
            let (node, parent) = (&self.nodes[id], &self.nodes[parent]);
            match direction {
                Direction::Left => assert!(node.key < parent.key),
                _ => assert!(node.key >= parent.key),
            }
        }
    }

    /// Whether a key equal to `key` is in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use tbst::threaded::Tree;
    ///
    /// let tree: Tree<_> = [2, 4, 6, 8, 10].into_iter().collect();
    ///
    /// assert!(tree.search(&6));
    /// assert!(!tree.search(&1));
    /// ```
    pub fn search(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns the stored key equal to `key`, if any. With duplicates this is the copy closest to
    /// the root, i.e. the one inserted first among those still present.
    pub fn get(&self, key: &K) -> Option<&K> {
        self.find(key).map(|id| &self.nodes[id].key)
    }

    /// The key that comes before `key` in sorted order, read off the matching node's thread.
    /// Returns `None` when `key` isn't in the tree or is the minimum.
    ///
    /// # Examples
    ///
    /// ```
    /// use tbst::threaded::Tree;
    ///
    /// let tree: Tree<_> = [6, 2, 8, 1, 4].into_iter().collect();
    ///
    /// assert_eq!(tree.predecessor(&6), Some(&4));
    /// assert_eq!(tree.predecessor(&1), None);
    /// assert_eq!(tree.predecessor(&5), None);
    /// ```
    pub fn predecessor(&self, key: &K) -> Option<&K> {
        let id = self.find(key)?;
        self.prev_in_order(id).map(|pred| &self.nodes[pred].key)
    }

    /// The key that comes after `key` in sorted order. See [`Tree::predecessor`].
    pub fn successor(&self, key: &K) -> Option<&K> {
        let id = self.find(key)?;
        self.next_in_order(id).map(|succ| &self.nodes[succ].key)
    }

    /// Deletes one copy of `key` from the tree and returns it. If the tree does not contain the
    /// key, nothing happens.
    ///
    /// # Examples
    ///
    /// ```
    /// use tbst::threaded::Tree;
    ///
    /// let mut tree: Tree<_> = [6, 2, 8, 1, 4, 7, 10].into_iter().collect();
    ///
    /// assert_eq!(tree.delete(&6), Some(6));
    /// assert_eq!(tree.delete(&6), None);
    /// assert!(tree.iter().eq(&[1, 2, 4, 7, 8, 10]));
    /// ```
    pub fn delete(&mut self, key: &K) -> Option<K> {
        let id = self.find(key)?;
        let node = &self.nodes[id];
        // The successor is found structurally, not through threads: it's the leftmost node of
        // the right subtree. It has no left child so unlinking it is one of the simple cases.
        let (case, successor) = match (node.left, node.right) {
            (None, None) => (DeleteCase::Leaf, None),
            (Some(_), Some(right)) => (DeleteCase::TwoChildren, Some(self.leftmost(right))),
            _ => (DeleteCase::OneChild, None),
        };
        trace!(?case, len = self.len(), "deleting key");

        match successor {
            Some(successor) => {
                let successor_key = self.unlink(successor);
                Some(mem::replace(&mut self.nodes[id].key, successor_key))
            }
            None => Some(self.unlink(id)),
        }
    }

    /// Descends from the root to the first node whose key equals `key`.
    pub(crate) fn find(&self, key: &K) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.nodes[id];
            current = match key.cmp(&node.key) {
                std::cmp::Ordering::Less => node.left,
                std::cmp::Ordering::Equal => return Some(id),
                std::cmp::Ordering::Greater => node.right,
            };
        }
        None
    }
}

impl<'a, K> IntoIterator for &'a Tree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K> FromIterator<K> for Tree<K>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K> Extend<K> for Tree<K>
where
    K: Ord,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}
