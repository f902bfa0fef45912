use super::arena::Handle;

/// One key of the tree, stored in an arena slot.
///
/// The node is a pure data holder: `left` and `right` are owning links in the
/// positional sense (the subtree below a node is reachable only through it),
/// while `parent` is a non-owning back-link used for upward walks during
/// rebalancing. The cached `height` and `size` are maintained by the tree
/// engine; a leaf has height 0 and size 1.
#[derive(Clone)]
pub(crate) struct AvlNode<K> {
    key: K,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
    height: i32,
    size: usize,
}

impl<K> AvlNode<K> {
    /// Creates a new detached leaf node.
    pub(crate) fn new(key: K) -> Self {
        Self {
            key,
            parent: None,
            left: None,
            right: None,
            height: 0,
            size: 1,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    pub(crate) fn set_left(&mut self, left: Option<Handle>) {
        self.left = left;
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    pub(crate) fn set_right(&mut self, right: Option<Handle>) {
        self.right = right;
    }

    /// Returns the cached height of the subtree rooted here.
    #[inline]
    pub(crate) fn height(&self) -> i32 {
        self.height
    }

    pub(crate) fn set_height(&mut self, height: i32) {
        self.height = height;
    }

    /// Returns the cached number of nodes in the subtree rooted here.
    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn set_size(&mut self, size: usize) {
        self.size = size;
    }

    /// Returns true if this node has no children.
    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.height == 0
    }

    /// Returns true if this node has exactly one child.
    pub(crate) fn has_one_child(&self) -> bool {
        self.left.is_some() != self.right.is_some()
    }

    /// Rewrites whichever child link currently points at `old` to `new`.
    pub(crate) fn replace_child(&mut self, old: Handle, new: Option<Handle>) {
        if self.left == Some(old) {
            self.left = new;
        } else {
            debug_assert_eq!(self.right, Some(old), "`AvlNode::replace_child()` - `old` is not a child!");
            self.right = new;
        }
    }
}
