//! An ordered set of unique keys backed by a height-balanced (AVL) binary
//! search tree with subtree-size augmentation.

use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;

use crate::TraversalOrder;
use crate::raw::{Handle, RawIter, RawOSAvlTree};

mod order_statistic;

use alloc::vec::Vec;

/// An ordered set of unique keys based on a height-balanced binary search tree.
///
/// Every node caches the height and the size of its subtree. The height cache
/// keeps lookups, insertions and removals O(log n) by rebalancing after every
/// mutation; the size cache answers order-statistic queries
/// ([`find_kth`](OSAvlTree::find_kth), [`rank_of`](OSAvlTree::rank_of)) in
/// O(log n) without full traversal.
///
/// Duplicate keys are not supported: inserting a key that is already present
/// is a no-op, as is removing a key that is absent. Neither is an error.
///
/// It is a logic error for a key to be modified in such a way that its
/// ordering relative to any other key, as determined by the [`Ord`] trait,
/// changes while it is in the tree. This is normally only possible through
/// [`Cell`], [`RefCell`], global state, I/O, or unsafe code. The behavior
/// resulting from such a logic error is not specified, but will be
/// encapsulated to the `OSAvlTree` that observed the logic error and not
/// result in undefined behavior.
///
/// The tree is not internally synchronized; sharing it across threads for
/// mutation requires external mutual exclusion, which the usual `&mut`
/// borrow rules already enforce in safe code.
///
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
///
/// # Examples
///
/// ```
/// use sabi_tree::{OSAvlTree, TraversalOrder};
///
/// let mut primes = OSAvlTree::new();
///
/// primes.insert(5);
/// primes.insert(2);
/// primes.insert(7);
/// primes.insert(3);
///
/// assert!(primes.contains(&3));
/// assert!(!primes.contains(&4));
///
/// // In-order traversal yields the keys sorted.
/// assert_eq!(primes.as_list(TraversalOrder::In), [&2, &3, &5, &7]);
/// ```
///
/// An `OSAvlTree` with a known list of keys can be initialized from an array:
///
/// ```
/// use sabi_tree::OSAvlTree;
///
/// let tree = OSAvlTree::from([1, 2, 3]);
/// assert_eq!(tree.len(), 3);
/// ```
#[derive(Clone)]
pub struct OSAvlTree<K> {
    raw: RawOSAvlTree<K>,
}

impl<K> OSAvlTree<K> {
    /// Creates a new, empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use sabi_tree::OSAvlTree;
    ///
    /// let tree: OSAvlTree<i32> = OSAvlTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self {
            raw: RawOSAvlTree::new(),
        }
    }

    /// Returns the number of keys in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use sabi_tree::OSAvlTree;
    ///
    /// let tree = OSAvlTree::from(["a", "b"]);
    /// assert_eq!(tree.len(), 2);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true if the tree contains no keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of live keys in the tree.
    ///
    /// This is a diagnostic accessor; it always equals [`len`](OSAvlTree::len).
    #[must_use]
    pub const fn elements_count(&self) -> usize {
        self.raw.len()
    }

    /// Returns the number of rebalances performed over the tree's lifetime.
    ///
    /// A double rotation counts once. The counter is monotone and is never
    /// reset, not even by [`clear`](OSAvlTree::clear). It exists for
    /// diagnostics and testing and plays no part in any algorithm.
    ///
    /// # Examples
    ///
    /// ```
    /// use sabi_tree::OSAvlTree;
    ///
    /// // An ascending insertion order is the worst case for an unbalanced
    /// // BST; the tree must rotate to stay balanced.
    /// let tree: OSAvlTree<u32> = (1..=100).collect();
    /// assert!(tree.rebalance_count() > 0);
    /// ```
    #[must_use]
    pub const fn rebalance_count(&self) -> u64 {
        self.raw.rebalance_count()
    }

    /// Returns the height of the tree, or -1 if the tree is empty.
    ///
    /// A single-node tree has height 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use sabi_tree::OSAvlTree;
    ///
    /// let mut tree = OSAvlTree::new();
    /// assert_eq!(tree.height(), -1);
    ///
    /// tree.insert(1);
    /// assert_eq!(tree.height(), 0);
    /// ```
    #[must_use]
    pub fn height(&self) -> i32 {
        self.raw.height()
    }

    /// Removes all keys from the tree.
    ///
    /// The diagnostic [`rebalance_count`](OSAvlTree::rebalance_count) is not
    /// reset.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns a [`NodeRef`] to the root node, if the tree is non-empty.
    ///
    /// Together with [`NodeRef::left`] and [`NodeRef::right`] this is the
    /// entry point for external consumers that walk the tree structure, such
    /// as debug renderers.
    #[must_use]
    pub fn root(&self) -> Option<NodeRef<'_, K>> {
        Some(NodeRef {
            tree: &self.raw,
            handle: self.raw.root()?,
        })
    }

    /// Returns an iterator over the keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sabi_tree::OSAvlTree;
    ///
    /// let tree = OSAvlTree::from([3, 1, 2]);
    /// let mut iter = tree.iter();
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), Some(&3));
    /// assert_eq!(iter.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: self.raw.iter(),
        }
    }
}

impl<K: Ord> OSAvlTree<K> {
    /// Inserts a key into the tree.
    ///
    /// Returns true if the key was newly inserted. Inserting a key that is
    /// already present is a no-op that returns false and leaves the tree,
    /// including its diagnostic counters, unchanged.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use sabi_tree::OSAvlTree;
    ///
    /// let mut tree = OSAvlTree::new();
    /// assert!(tree.insert(2));
    /// assert!(!tree.insert(2));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> bool {
        self.raw.insert(key)
    }

    /// Removes a key from the tree.
    ///
    /// Returns true if the key was present. Removing an absent key is a no-op
    /// that returns false and leaves the tree unchanged.
    ///
    /// The key may be any borrowed form of the tree's key type, but the
    /// ordering on the borrowed form *must* match the ordering on the key
    /// type.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use sabi_tree::OSAvlTree;
    ///
    /// let mut tree = OSAvlTree::from([1, 2, 3]);
    /// assert!(tree.remove(&2));
    /// assert!(!tree.remove(&2));
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key)
    }

    /// Searches for a key and returns a [`NodeRef`] to its node if present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use sabi_tree::OSAvlTree;
    ///
    /// let tree = OSAvlTree::from([1, 2, 3]);
    /// assert_eq!(tree.find(&2).map(|node| *node.key()), Some(2));
    /// assert!(tree.find(&4).is_none());
    /// ```
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Option<NodeRef<'_, K>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        Some(NodeRef {
            tree: &self.raw,
            handle: self.raw.search(key)?,
        })
    }

    /// Returns true if the tree contains the given key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.contains(key)
    }

    /// Returns the smallest key, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use sabi_tree::OSAvlTree;
    ///
    /// let tree = OSAvlTree::from([2, 1, 3]);
    /// assert_eq!(tree.first(), Some(&1));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&K> {
        Some(self.raw.node(self.raw.first()?).key())
    }

    /// Returns the largest key, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use sabi_tree::OSAvlTree;
    ///
    /// let tree = OSAvlTree::from([2, 1, 3]);
    /// assert_eq!(tree.last(), Some(&3));
    /// ```
    #[must_use]
    pub fn last(&self) -> Option<&K> {
        Some(self.raw.node(self.raw.last()?).key())
    }

    /// Materializes the keys in the given traversal order.
    ///
    /// In-order traversal yields the keys in ascending sorted order.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use sabi_tree::{OSAvlTree, TraversalOrder};
    ///
    /// let tree = OSAvlTree::from([2, 1, 3]);
    /// assert_eq!(tree.as_list(TraversalOrder::In), [&1, &2, &3]);
    /// assert_eq!(tree.as_list(TraversalOrder::Pre), [&2, &1, &3]);
    /// assert_eq!(tree.as_list(TraversalOrder::Post), [&1, &3, &2]);
    /// ```
    #[must_use]
    pub fn as_list(&self, order: TraversalOrder) -> Vec<&K> {
        self.raw.keys(order)
    }
}

impl<K> Default for OSAvlTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for OSAvlTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ord> FromIterator<K> for OSAvlTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord> Extend<K> for OSAvlTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord, const N: usize> From<[K; N]> for OSAvlTree<K> {
    /// Bulk-loads a tree by repeated single-key insertion.
    ///
    /// ```
    /// use sabi_tree::OSAvlTree;
    ///
    /// let tree = OSAvlTree::from([3, 1, 2, 1]);
    /// assert_eq!(tree.len(), 3); // duplicates are dropped
    /// ```
    fn from(keys: [K; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl<'a, K> IntoIterator for &'a OSAvlTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

/// A borrowed view of one tree node: its key and its place in the structure.
///
/// `NodeRef`s are returned by [`find`](OSAvlTree::find),
/// [`find_kth`](OSAvlTree::find_kth) and [`root`](OSAvlTree::root), and expose
/// the accessors an external renderer needs to walk and draw the tree. They
/// borrow the tree, so the tree cannot be mutated while any of them live.
///
/// # Examples
///
/// ```
/// use sabi_tree::OSAvlTree;
///
/// let tree = OSAvlTree::from([2, 1, 3]);
/// let root = tree.root().unwrap();
///
/// assert_eq!(*root.key(), 2);
/// assert_eq!(root.left().map(|node| *node.key()), Some(1));
/// assert_eq!(root.right().map(|node| *node.key()), Some(3));
/// assert_eq!(root.size(), 3);
/// ```
pub struct NodeRef<'a, K> {
    tree: &'a RawOSAvlTree<K>,
    handle: Handle,
}

impl<'a, K> NodeRef<'a, K> {
    /// Returns the node's key.
    #[must_use]
    pub fn key(&self) -> &'a K {
        self.tree.node(self.handle).key()
    }

    /// Returns the left child, if any.
    #[must_use]
    pub fn left(&self) -> Option<NodeRef<'a, K>> {
        Some(NodeRef {
            tree: self.tree,
            handle: self.tree.node(self.handle).left()?,
        })
    }

    /// Returns the right child, if any.
    #[must_use]
    pub fn right(&self) -> Option<NodeRef<'a, K>> {
        Some(NodeRef {
            tree: self.tree,
            handle: self.tree.node(self.handle).right()?,
        })
    }

    /// Returns the parent node, if this node is not the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeRef<'a, K>> {
        Some(NodeRef {
            tree: self.tree,
            handle: self.tree.node(self.handle).parent()?,
        })
    }

    /// Returns the height of the subtree rooted at this node; a leaf has
    /// height 0.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.tree.node(self.handle).height()
    }

    /// Returns the number of nodes in the subtree rooted at this node.
    #[must_use]
    pub fn size(&self) -> usize {
        self.tree.node(self.handle).size()
    }

    /// Returns the balance factor: left subtree height minus right subtree
    /// height, with an absent child counting as height -1. Always in
    /// `{-1, 0, 1}` between public operations.
    #[must_use]
    pub fn balance(&self) -> i32 {
        self.tree.balance(self.handle)
    }

    /// Returns true if this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.tree.node(self.handle).is_leaf()
    }
}

impl<K> Clone for NodeRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodeRef<'_, K> {}

impl<K: fmt::Debug> fmt::Debug for NodeRef<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("height", &self.height())
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

/// An iterator over the keys of an [`OSAvlTree`] in ascending order.
///
/// This `struct` is created by the [`iter`](OSAvlTree::iter) method.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K> {
    inner: RawIter<'a, K>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}
impl<K> FusedIterator for Iter<'_, K> {}
