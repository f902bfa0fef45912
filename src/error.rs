use core::fmt;

/// Error returned by [`find_kth`](crate::OSAvlTree::find_kth) when the
/// requested rank lies outside `1..=len` (every rank is out of range on an
/// empty tree).
///
/// The failing operation performs no structural change: the rank is checked
/// before the descent begins.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RankError {
    rank: usize,
    len: usize,
}

impl RankError {
    pub(crate) const fn new(rank: usize, len: usize) -> Self {
        Self { rank, len }
    }

    /// The rejected rank.
    #[must_use]
    pub const fn rank(&self) -> usize {
        self.rank
    }

    /// The number of keys in the tree at the time of the call.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }
}

impl fmt::Display for RankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rank {} is out of range for a tree of {} elements", self.rank, self.len)
    }
}

impl core::error::Error for RankError {}

/// Error returned when parsing a [`TraversalOrder`](crate::TraversalOrder)
/// from an unsupported selector string.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseTraversalOrderError;

impl fmt::Display for ParseTraversalOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unsupported traversal order, expected one of: pre, in, post")
    }
}

impl core::error::Error for ParseTraversalOrderError {}
