//! Height-balanced order-statistic tree for Rust.
//!
//! This crate provides [`OSAvlTree`], an AVL-balanced binary search tree over
//! unique keys, augmented with subtree-size counters so that rank queries run
//! in O(log n):
//!
//! - [`find_kth`](OSAvlTree::find_kth) - Get the k-th smallest key (1-indexed)
//! - [`rank_of`](OSAvlTree::rank_of) - Get the sorted position of a key
//! - Indexing by [`Rank`] - e.g., `tree[Rank(1)]` for the smallest key
//!
//! # Example
//!
//! ```
//! use sabi_tree::{OSAvlTree, Rank};
//!
//! let mut scores = OSAvlTree::new();
//! scores.insert(100);
//! scores.insert(85);
//! scores.insert(92);
//!
//! // Standard set operations work as expected
//! assert!(scores.contains(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // Order-statistic operations (O(log n))
//! // Get the median (rank 2 = second smallest)
//! let median = scores.find_kth(2).unwrap();
//! assert_eq!(*median.key(), 92);
//!
//! // Find the rank of a key
//! assert_eq!(scores.rank_of(&100), Some(Rank(3)));
//!
//! // Index by rank
//! assert_eq!(scores[Rank(1)], 85);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Self-healing balance** - Heights are rebalanced after every mutation, so
//!   every lookup, insertion and removal is O(log n)
//! - **O(log n) rank operations** - Efficient order-statistic queries via subtree
//!   size augmentation
//! - **Traversal production** - Pre-, in- and post-order key sequences via
//!   [`as_list`](OSAvlTree::as_list)
//!
//! # Implementation
//!
//! The tree is implemented over an arena of nodes addressed by stable handles.
//! Each node stores handles for its children and a non-owning handle for its
//! parent, so rotations and node swaps are plain handle reassignments with no
//! ownership ambiguity. Each node additionally caches its subtree height
//! (maintained within the AVL bound of +/-1) and subtree size (enabling rank
//! queries without full traversal).

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod order_statistic;
mod raw;
mod traversal;

pub mod os_avl_tree;

pub use error::{ParseTraversalOrderError, RankError};
pub use order_statistic::Rank;
pub use os_avl_tree::OSAvlTree;
pub use traversal::TraversalOrder;
