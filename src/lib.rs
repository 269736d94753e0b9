//! This crate exposes a threaded Binary Search Tree (BST).
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree stores keys in `Node`s such that, for every `Node`:
//!
//! 1. all the `Node`s in its left subtree have a key strictly less than its own key.
//! 2. all the `Node`s in its right subtree have a key greater than or equal to its own key.
//!
//! > Equal keys are routed to the right so inserting the same key twice keeps both copies.
//!
//! ## Threads
//!
//! Most `Node`s in a BST have at least one missing child. A threaded tree reuses those empty
//! slots: a `Node` with no left child remembers its in-order predecessor and a `Node` with no
//! right child remembers its in-order successor. These links are called threads. With them a
//! sorted walk needs neither recursion nor a stack, and finding the neighbour of a located
//! `Node` is `O(1)`.
//!
//! Threads (and parent links) never own the `Node` they point at. Nodes live in an arena and
//! are addressed by generation-tagged ids, so only a parent's child slot (or the tree's root
//! slot) can release a `Node` and a thread to a released `Node` is detectable.
//!
//! # Examples
//!
//! ```
//! use tbst::threaded::Tree;
//! use tbst::traverse::Order;
//!
//! let mut tree = Tree::new();
//! for key in [6, 2, 8, 1, 4, 7, 10] {
//!     tree.insert(key);
//! }
//!
//! assert!(tree.search(&4));
//! assert_eq!(tree.delete(&6), Some(6));
//! assert!(!tree.search(&6));
//!
//! let sorted: Vec<_> = tree.traverse(Order::InOrder).copied().collect();
//! assert_eq!(sorted, [1, 2, 4, 7, 8, 10]);
//! assert_eq!(tree.successor(&4), Some(&7));
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod arena;
pub mod threaded;
pub mod traverse;
mod util;
pub mod validate;


pub use threaded::Tree;
pub use traverse::Order;
pub use validate::InvariantError;
