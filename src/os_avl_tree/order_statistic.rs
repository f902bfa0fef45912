use core::borrow::Borrow;
use core::ops::Index;

use super::{NodeRef, OSAvlTree};
use crate::error::RankError;
use crate::order_statistic::Rank;

impl<K: Ord> OSAvlTree<K> {
    /// Returns a [`NodeRef`] to the k-th smallest key, 1-indexed: `k = 1` is
    /// the smallest key and `k = len` the largest.
    ///
    /// The selection is driven entirely by the cached subtree sizes; no key
    /// comparisons are performed.
    ///
    /// # Errors
    ///
    /// Returns a [`RankError`] if `k` lies outside `1..=len`, including every
    /// `k` on an empty tree. The failing call performs no tree mutation.
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
    /// let tree = OSAvlTree::from([50, 10, 30]);
    ///
    /// assert_eq!(tree.find_kth(1).map(|node| *node.key()), Ok(10));
    /// assert_eq!(tree.find_kth(3).map(|node| *node.key()), Ok(50));
    /// assert!(tree.find_kth(0).is_err());
    /// assert!(tree.find_kth(4).is_err());
    /// ```
    pub fn find_kth(&self, k: usize) -> Result<NodeRef<'_, K>, RankError> {
        Ok(NodeRef {
            tree: &self.raw,
            handle: self.raw.kth(k)?,
        })
    }

    /// Returns the 1-based [`Rank`] of `key` in sorted order, or `None` if
    /// the key is not present.
    ///
    /// This is the inverse of [`find_kth`](OSAvlTree::find_kth).
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use sabi_tree::{OSAvlTree, Rank};
    ///
    /// let tree = OSAvlTree::from([50, 10, 30]);
    ///
    /// assert_eq!(tree.rank_of(&30), Some(Rank(2)));
    /// assert_eq!(tree.rank_of(&40), None);
    /// ```
    #[must_use]
    pub fn rank_of<Q>(&self, key: &Q) -> Option<Rank>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.rank_of(key).map(Rank)
    }
}

/// Indexes into the tree by rank.
///
/// # Panics
///
/// Panics if the rank is out of range.
///
/// # Examples
///
/// ```
/// use sabi_tree::{OSAvlTree, Rank};
///
/// let tree = OSAvlTree::from(["b", "a", "c"]);
///
/// assert_eq!(tree[Rank(2)], "b");
/// ```
impl<K: Ord> Index<Rank> for OSAvlTree<K> {
    type Output = K;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.find_kth(rank.0).map(|node| node.key()).expect("rank out of bounds")
    }
}
