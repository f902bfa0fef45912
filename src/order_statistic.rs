/// A one-based rank into the sorted order of the tree's keys: `Rank(1)` is
/// the smallest key and `Rank(len)` the largest.
///
/// This is an order-statistic extension and is not part of the standard
/// `BTreeSet` API.
///
/// # Examples
///
/// ```
/// use sabi_tree::{OSAvlTree, Rank};
///
/// let tree = OSAvlTree::from([30, 10, 20]);
///
/// assert_eq!(tree[Rank(1)], 10);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
