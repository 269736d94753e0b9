//! Whole-tree invariant checking.
//!
//! [`Tree::validate`] walks the tree through its owning child links only and compares every
//! stored parent link, direction tag and thread against what the structure implies. Nodes are
//! reported by their position in sorted order so the error doesn't need to know how to print a
//! key.

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::arena::NodeId;
use crate::threaded::Tree;
use crate::util::Direction;

/// Which of a node's two threads an [`InvariantError`] is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Thread {
    /// The thread to the in-order predecessor, used when there is no left child.
    Predecessor,
    /// The thread to the in-order successor, used when there is no right child.
    Successor,
}

impl fmt::Display for Thread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predecessor => f.write_str("predecessor"),
            Self::Successor => f.write_str("successor"),
        }
    }
}

/// A broken tree invariant found by [`Tree::validate`]. `position` is the node's index in sorted
/// order.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvariantError {
    /// A key sits on the wrong side of an ancestor.
    #[error("key at position {position} is out of order")]
    Order {
        /// Position of the misplaced node.
        position: usize,
    },
    /// A left child holds a key equal to its parent's. Equal keys belong on the right.
    #[error("key at position {position} equals its successor but sits in its left subtree")]
    TieOnLeft {
        /// Position of the offending node.
        position: usize,
    },
    /// A node's parent link or direction tag doesn't match the slot that owns it.
    #[error("node at position {position} has a parent link or direction tag that disagrees with its owner")]
    Parent {
        /// Position of the offending node.
        position: usize,
    },
    /// A thread points somewhere other than the in-order neighbour, or is set next to a child.
    #[error("{thread} thread of node at position {position} is wrong")]
    Thread {
        /// Position of the offending node.
        position: usize,
        /// The broken thread.
        thread: Thread,
    },
    /// A link refers to a node that has been released.
    #[error("node at position {position} links to a released node")]
    Dangling {
        /// Position of the offending node.
        position: usize,
    },
    /// The number of reachable nodes disagrees with the tree's length.
    #[error("tree reports {expected} keys but {found} are reachable")]
    Length {
        /// What [`Tree::len`] reports.
        expected: usize,
        /// How many nodes the walk reached.
        found: usize,
    },
}

impl<K> Tree<K>
where
    K: Ord,
{
    /// Checks every structural invariant of the tree:
    ///
    /// 1. left subtrees hold strictly smaller keys and right subtrees hold keys that are greater
    ///    or equal.
    /// 2. each node's parent link and direction tag agree with the slot that owns it.
    /// 3. a node without a left child threads to its in-order predecessor (none for the minimum)
    ///    and a node without a right child threads to its in-order successor (none for the
    ///    maximum). Nodes with a child on that side carry no thread.
    /// 4. no link refers to a released node.
    ///
    /// # Examples
    ///
    /// ```
    /// use tbst::threaded::Tree;
    ///
    /// let mut tree: Tree<_> = [6, 2, 8, 1, 4, 7, 10].into_iter().collect();
    /// tree.delete(&6);
    ///
    /// assert_eq!(tree.validate(), Ok(()));
    /// ```
    pub fn validate(&self) -> Result<(), InvariantError> {
        let result = self.check();
        if let Err(error) = &result {
            debug!(%error, "tree failed validation");
        }
        result
    }

    fn check(&self) -> Result<(), InvariantError> {
        let order = self.structural_order()?;
        if order.len() != self.len() {
            return Err(InvariantError::Length {
                expected: self.len(),
                found: order.len(),
            });
        }

        for (position, &id) in order.iter().enumerate() {
            let node = &self.nodes[id];
            let prev = position.checked_sub(1).map(|at| order[at]);
            let next = order.get(position + 1).copied();

            if let Some(prev) = prev {
                if self.nodes[prev].key > node.key {
                    return Err(InvariantError::Order { position });
                }
            }
            // The largest key of the left subtree sits right before this node.
            if node.left.is_some() && prev.is_some_and(|prev| self.nodes[prev].key == node.key) {
                return Err(InvariantError::TieOnLeft {
                    position: position - 1,
                });
            }

            let expected_pred = if node.left.is_none() { prev } else { None };
            if node.pred_thread != expected_pred {
                return Err(InvariantError::Thread {
                    position,
                    thread: Thread::Predecessor,
                });
            }
            let expected_succ = if node.right.is_none() { next } else { None };
            if node.succ_thread != expected_succ {
                return Err(InvariantError::Thread {
                    position,
                    thread: Thread::Successor,
                });
            }
        }
        Ok(())
    }

    /// Walks the owning links in order with an explicit stack, checking liveness, parent links
    /// and direction tags along the way. Threads aren't used since they are what's being checked.
    fn structural_order(&self) -> Result<Vec<NodeId>, InvariantError> {
        let mut order = Vec::with_capacity(self.len());
        let mut stack = Vec::new();
        let mut current = self.root;

        loop {
            while let Some(id) = current {
                let node = self.nodes.get(id).ok_or(InvariantError::Dangling {
                    position: order.len(),
                })?;
                // A cycle in the child links would otherwise walk forever.
                if order.len() + stack.len() == self.len() {
                    return Err(InvariantError::Length {
                        expected: self.len(),
                        found: self.len() + 1,
                    });
                }
                stack.push(id);
                current = node.left;
            }
            let Some(id) = stack.pop() else {
                break;
            };
            let position = order.len();
            order.push(id);

            let node = &self.nodes[id];
            let is_root = self.root == Some(id);
            if is_root && (node.parent.is_some() || node.direction != Direction::Root) {
                return Err(InvariantError::Parent { position });
            }
            let links = [node.parent, node.pred_thread, node.succ_thread];
            if links.into_iter().flatten().any(|link| !self.nodes.is_live(link)) {
                return Err(InvariantError::Dangling { position });
            }
            for (child, direction) in [(node.left, Direction::Left), (node.right, Direction::Right)] {
                let Some(child) = child else {
                    continue;
                };
                let child_node = self
                    .nodes
                    .get(child)
                    .ok_or(InvariantError::Dangling { position })?;
                if child_node.parent != Some(id) || child_node.direction != direction {
                    return Err(InvariantError::Parent { position });
                }
            }
            current = node.right;
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tree<i32> {
        [6, 2, 8, 1, 4, 7, 10].into_iter().collect()
    }

    #[test]
    fn empty_tree_is_valid() {
        assert_eq!(Tree::<i32>::new().validate(), Ok(()));
    }

    #[test]
    fn detects_wrong_thread() {
        let mut tree = sample();
        let four = tree.find(&4).unwrap();
        let one = tree.find(&1).unwrap();
        tree.nodes[four].succ_thread = Some(one);

        assert_eq!(
            tree.validate(),
            Err(InvariantError::Thread {
                position: 2,
                thread: Thread::Successor
            })
        );
    }

    #[test]
    fn detects_thread_next_to_child() {
        let mut tree = sample();
        let two = tree.find(&2).unwrap();
        let one = tree.find(&1).unwrap();
        tree.nodes[two].pred_thread = Some(one);

        assert_eq!(
            tree.validate(),
            Err(InvariantError::Thread {
                position: 1,
                thread: Thread::Predecessor
            })
        );
    }

    #[test]
    fn detects_dangling_thread() {
        let mut tree = sample();
        let four = tree.find(&4).unwrap();
        let released = tree.nodes.alloc(tree.nodes[four].clone());
        tree.nodes.release(released);
        tree.nodes[four].succ_thread = Some(released);

        assert_eq!(
            tree.validate(),
            Err(InvariantError::Dangling { position: 2 })
        );
    }

    #[test]
    fn detects_wrong_direction() {
        let mut tree = sample();
        let seven = tree.find(&7).unwrap();
        tree.nodes[seven].direction = Direction::Right;

        assert_eq!(tree.validate(), Err(InvariantError::Parent { position: 5 }));
    }

    #[test]
    fn detects_out_of_order_key() {
        let mut tree = sample();
        let seven = tree.find(&7).unwrap();
        tree.nodes[seven].key = 9;

        assert_eq!(tree.validate(), Err(InvariantError::Order { position: 5 }));
    }

    #[test]
    fn detects_tie_on_the_left() {
        let mut tree = sample();
        let four = tree.find(&4).unwrap();
        tree.nodes[four].key = 6;

        assert_eq!(
            tree.validate(),
            Err(InvariantError::TieOnLeft { position: 2 })
        );
    }

    #[test]
    fn error_messages() {
        let error = InvariantError::Thread {
            position: 3,
            thread: Thread::Predecessor,
        };
        assert_eq!(
            error.to_string(),
            "predecessor thread of node at position 3 is wrong"
        );
    }
}
