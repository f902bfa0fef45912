use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;

use smallvec::SmallVec;

use super::arena::{Arena, Handle};
use super::node::AvlNode;
use crate::error::RankError;
use crate::traversal::TraversalOrder;

/// Explicit stack for the iterative traversals; sized for the depth of a
/// balanced tree with tens of thousands of keys before spilling to the heap.
type TraversalStack = SmallVec<[Handle; 16]>;

/// The core AVL engine backing `OSAvlTree`.
///
/// All mutating walks are iterative; the parent back-links make the upward
/// retracing after insertions and removals a plain handle chase.
#[derive(Clone)]
pub(crate) struct RawOSAvlTree<K> {
    /// Arena storing all tree nodes.
    nodes: Arena<AvlNode<K>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Number of live keys in the tree.
    len: usize,
    /// Number of rebalance calls performed over the tree's lifetime.
    /// A double rotation counts once. Monotone; never reset, not even by `clear`.
    rebalances: u64,
}

impl<K> RawOSAvlTree<K> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
            rebalances: 0,
        }
    }

    /// Returns the number of keys in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no keys.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of rebalances performed so far.
    pub(crate) const fn rebalance_count(&self) -> u64 {
        self.rebalances
    }

    /// Returns the height of the tree: the root's cached height, or -1 when empty.
    pub(crate) fn height(&self) -> i32 {
        self.root.map_or(-1, |root| self.nodes.get(root).height())
    }

    /// Returns a handle to the root node, if any.
    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Returns a reference to a node by handle.
    pub(crate) fn node(&self, handle: Handle) -> &AvlNode<K> {
        self.nodes.get(handle)
    }

    /// Removes all keys. The rebalance counter is diagnostic and survives.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Returns a handle to the smallest key, if any.
    pub(crate) fn first(&self) -> Option<Handle> {
        Some(self.find_smallest(self.root?))
    }

    /// Returns a handle to the largest key, if any.
    pub(crate) fn last(&self) -> Option<Handle> {
        Some(self.find_biggest(self.root?))
    }

    /// Walks left links down to the smallest key of the subtree at `start`.
    fn find_smallest(&self, start: Handle) -> Handle {
        let mut current = start;
        while let Some(left) = self.nodes.get(current).left() {
            current = left;
        }
        current
    }

    /// Walks right links down to the largest key of the subtree at `start`.
    fn find_biggest(&self, start: Handle) -> Handle {
        let mut current = start;
        while let Some(right) = self.nodes.get(current).right() {
            current = right;
        }
        current
    }

    /// Returns the in-order successor of the node at `handle`, if any.
    pub(crate) fn next_in_order(&self, handle: Handle) -> Option<Handle> {
        if let Some(right) = self.nodes.get(handle).right() {
            return Some(self.find_smallest(right));
        }

        // No right subtree: the successor is the nearest ancestor whose left
        // subtree we came out of.
        let mut current = handle;
        let mut parent = self.nodes.get(current).parent();
        while let Some(p) = parent {
            if self.nodes.get(p).left() == Some(current) {
                return Some(p);
            }
            current = p;
            parent = self.nodes.get(p).parent();
        }
        None
    }

    /// Returns an in-order iterator over the keys.
    pub(crate) fn iter(&self) -> RawIter<'_, K> {
        RawIter {
            tree: self,
            next: self.first(),
            remaining: self.len,
        }
    }

    // ─── Cached-field helpers ───────────────────────────────────────────────

    /// Height of an optional child link; an absent child contributes -1.
    fn height_of(&self, link: Option<Handle>) -> i32 {
        link.map_or(-1, |h| self.nodes.get(h).height())
    }

    /// Size of an optional child link; an absent child contributes 0.
    fn size_of(&self, link: Option<Handle>) -> usize {
        link.map_or(0, |h| self.nodes.get(h).size())
    }

    /// Balance factor of the node at `handle`: left height minus right height.
    pub(crate) fn balance(&self, handle: Handle) -> i32 {
        let node = self.nodes.get(handle);
        self.height_of(node.left()) - self.height_of(node.right())
    }

    /// Largest cached height among present children, or -1 if childless.
    fn max_children_height(&self, handle: Handle) -> i32 {
        let node = self.nodes.get(handle);
        self.height_of(node.left()).max(self.height_of(node.right()))
    }

    /// Recomputes the cached size of the node at `handle` from its children.
    fn update_size(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let size = 1 + self.size_of(node.left()) + self.size_of(node.right());
        self.nodes.get_mut(handle).set_size(size);
    }

    /// Recomputes cached heights from `start` up toward the root, stopping as
    /// soon as an ancestor's height comes out unchanged.
    fn recompute_heights(&mut self, start: Option<Handle>) {
        let mut current = start;
        while let Some(handle) = current {
            let old_height = self.nodes.get(handle).height();
            let new_height = self.max_children_height(handle) + 1;
            self.nodes.get_mut(handle).set_height(new_height);
            if new_height == old_height {
                break;
            }
            current = self.nodes.get(handle).parent();
        }
    }
}

impl<K: Ord> RawOSAvlTree<K> {
    /// Searches for a key and returns its handle if present.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root?;

        loop {
            let node = self.nodes.get(current);
            match key.cmp(node.key().borrow()) {
                Ordering::Less => current = node.left()?,
                Ordering::Greater => current = node.right()?,
                Ordering::Equal => return Some(current),
            }
        }
    }

    /// Returns true if the tree contains the given key.
    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).is_some()
    }

    /// Inserts a key into the tree. Returns false (leaving the tree untouched)
    /// if the key is already present.
    pub(crate) fn insert(&mut self, key: K) -> bool {
        if self.contains(&key) {
            return false;
        }

        let Some(root) = self.root else {
            let handle = self.nodes.alloc(AvlNode::new(key));
            self.root = Some(handle);
            self.len = 1;
            return true;
        };

        // Descend to the open slot, bumping every ancestor's size on the way:
        // the duplicate check above guarantees the new key lands below all of them.
        let mut current = root;
        let (parent, went_left) = loop {
            let node = self.nodes.get_mut(current);
            node.set_size(node.size() + 1);
            if key < *node.key() {
                match node.left() {
                    Some(left) => current = left,
                    None => break (current, true),
                }
            } else {
                match node.right() {
                    Some(right) => current = right,
                    None => break (current, false),
                }
            }
        };

        // Whether the attachment can change any heights at all.
        let parent_was_leaf = self.nodes.get(parent).is_leaf();

        let mut child = AvlNode::new(key);
        child.set_parent(Some(parent));
        let child_handle = self.nodes.alloc(child);

        let parent_node = self.nodes.get_mut(parent);
        if went_left {
            parent_node.set_left(Some(child_handle));
        } else {
            parent_node.set_right(Some(child_handle));
        }
        self.len += 1;

        // Attaching under a non-leaf fills a gap next to an existing child and
        // cannot change the parent's height, so the retracing walk is skipped.
        if parent_was_leaf {
            let mut current = Some(parent);
            while let Some(handle) = current {
                let new_height = self.max_children_height(handle) + 1;
                self.nodes.get_mut(handle).set_height(new_height);
                if !(-1..=1).contains(&self.balance(handle)) {
                    // A single rotation restores balance for the whole tree
                    // after one insertion; no ancestor above needs inspection.
                    self.rebalance(handle);
                    break;
                }
                current = self.nodes.get(handle).parent();
            }
        }

        true
    }

    /// Removes a key from the tree. Returns false (leaving the tree untouched)
    /// if the key is absent.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(handle) = self.search(key) else {
            return false;
        };
        self.len -= 1;

        let (is_leaf, has_one_child) = {
            let node = self.nodes.get(handle);
            (node.is_leaf(), node.has_one_child())
        };

        if is_leaf {
            self.remove_leaf(handle);
        } else if has_one_child {
            self.remove_branch(handle);
        } else {
            self.swap_with_successor_and_remove(handle);
        }
        true
    }

    /// Detaches a childless node and retraces from its former parent.
    fn remove_leaf(&mut self, handle: Handle) {
        let parent = self.nodes.get(handle).parent();
        if let Some(p) = parent {
            self.nodes.get_mut(p).replace_child(handle, None);
        } else {
            self.root = None;
        }
        self.nodes.free(handle);
        self.retrace_after_removal(parent);
    }

    /// Splices the sole child of a one-child node into its position and
    /// retraces from its former parent.
    fn remove_branch(&mut self, handle: Handle) {
        let (parent, child) = {
            let node = self.nodes.get(handle);
            let child = node
                .left()
                .or(node.right())
                .expect("`RawOSAvlTree::remove_branch()` - node has no children!");
            (node.parent(), child)
        };

        if let Some(p) = parent {
            self.nodes.get_mut(p).replace_child(handle, Some(child));
        } else {
            self.root = Some(child);
        }
        self.nodes.get_mut(child).set_parent(parent);
        self.nodes.free(handle);
        self.retrace_after_removal(parent);
    }

    /// Removes a node with two children: swap it with its in-order successor,
    /// then remove it from the successor's former slot, which by construction
    /// has at most one child.
    fn swap_with_successor_and_remove(&mut self, handle: Handle) {
        let right = self
            .nodes
            .get(handle)
            .right()
            .expect("`RawOSAvlTree::swap_with_successor_and_remove()` - node has no right child!");
        let successor = self.find_smallest(right);
        self.swap_nodes(handle, successor);

        // The cached height exchanged in the swap is the successor's old one,
        // so the leaf test still dispatches correctly.
        if self.nodes.get(handle).is_leaf() {
            self.remove_leaf(handle);
        } else {
            self.remove_branch(handle);
        }
    }

    /// Exchanges the positions of a two-child node and its in-order successor.
    ///
    /// The successor inherits the node's left subtree and parent slot; the
    /// node inherits the successor's children (no left child, by definition of
    /// in-order successor) and old position. Cached heights and sizes travel
    /// with the positions; the retrace after the subsequent removal corrects
    /// them. The successor being the node's direct right child collapses the
    /// right-subtree relinking into a direct parent/child flip.
    fn swap_nodes(&mut self, node1: Handle, node2: Handle) {
        let (parent1, left1, right1) = {
            let n = self.nodes.get(node1);
            (
                n.parent(),
                n.left().expect("`RawOSAvlTree::swap_nodes()` - `node1` has no left child!"),
                n.right().expect("`RawOSAvlTree::swap_nodes()` - `node1` has no right child!"),
            )
        };
        let (parent2, left2, right2) = {
            let n = self.nodes.get(node2);
            (n.parent(), n.left(), n.right())
        };
        debug_assert!(left2.is_none(), "`RawOSAvlTree::swap_nodes()` - successor has a left child!");

        // Exchange the cached fields along with the positions.
        let (height1, size1) = {
            let n = self.nodes.get(node1);
            (n.height(), n.size())
        };
        let (height2, size2) = {
            let n = self.nodes.get(node2);
            (n.height(), n.size())
        };
        {
            let n = self.nodes.get_mut(node1);
            n.set_height(height2);
            n.set_size(size2);
        }
        {
            let n = self.nodes.get_mut(node2);
            n.set_height(height1);
            n.set_size(size1);
        }

        // The successor takes over the node's parent slot (or the root).
        if let Some(p1) = parent1 {
            self.nodes.get_mut(p1).replace_child(node1, Some(node2));
            self.nodes.get_mut(node2).set_parent(Some(p1));
        } else {
            self.root = Some(node2);
            self.nodes.get_mut(node2).set_parent(None);
        }

        // The successor inherits the node's left subtree.
        self.nodes.get_mut(node2).set_left(Some(left1));
        self.nodes.get_mut(left1).set_parent(Some(node2));

        // The node inherits the successor's children.
        {
            let n = self.nodes.get_mut(node1);
            n.set_left(left2);
            n.set_right(right2);
        }
        if let Some(r2) = right2 {
            self.nodes.get_mut(r2).set_parent(Some(node1));
        }

        if parent2 == Some(node1) {
            // The successor was the node's direct right child: they swap a
            // direct parent/child relationship.
            self.nodes.get_mut(node2).set_right(Some(node1));
            self.nodes.get_mut(node1).set_parent(Some(node2));
        } else {
            // General case: the successor sits deeper in the right subtree
            // and is a left child there.
            self.nodes.get_mut(node2).set_right(Some(right1));
            self.nodes.get_mut(right1).set_parent(Some(node2));

            let p2 = parent2.expect("`RawOSAvlTree::swap_nodes()` - successor has no parent!");
            self.nodes.get_mut(p2).set_left(Some(node1));
            self.nodes.get_mut(node1).set_parent(Some(p2));
        }
    }

    /// The unified post-removal walk: recompute heights from the detach point,
    /// then climb to the root recomputing sizes and rebalancing every ancestor
    /// whose balance factor left {-1, 0, 1}. Unlike insertion, a removal can
    /// require a rotation at every level.
    fn retrace_after_removal(&mut self, start: Option<Handle>) {
        self.recompute_heights(start);

        let mut current = start;
        while let Some(handle) = current {
            self.update_size(handle);
            if !(-1..=1).contains(&self.balance(handle)) {
                self.rebalance(handle);
            }
            // After a rotation the node was demoted below the rotated subtree
            // root, so this keeps climbing through the new local root.
            current = self.nodes.get(handle).parent();
        }
    }

    // ─── Rotation engine ────────────────────────────────────────────────────

    /// Reconnects a rotated subtree to the former parent of `old`, or installs
    /// it as the new root.
    fn reconnect(&mut self, former_parent: Option<Handle>, old: Handle, new_root: Handle) {
        if let Some(f) = former_parent {
            self.nodes.get_mut(f).replace_child(old, Some(new_root));
            self.nodes.get_mut(new_root).set_parent(Some(f));
        } else {
            self.root = Some(new_root);
            self.nodes.get_mut(new_root).set_parent(None);
        }
    }

    /// Restores the balance invariant at `a`, whose balance factor is +/-2.
    ///
    /// Exactly one of the four AVL cases applies, keyed off the sign of `a`'s
    /// balance and the heavy child's own balance. Each call performs one
    /// single or one double rotation and counts once.
    fn rebalance(&mut self, a: Handle) {
        self.rebalances += 1;
        let f = self.nodes.get(a).parent();

        if self.balance(a) == -2 {
            let b = self
                .nodes
                .get(a)
                .right()
                .expect("`RawOSAvlTree::rebalance()` - right-heavy node has no right child!");
            if self.balance(b) <= 0 {
                // Right-right: single left rotation at `a`.
                let b_left = self.nodes.get(b).left();
                self.nodes.get_mut(a).set_right(b_left);
                if let Some(x) = b_left {
                    self.nodes.get_mut(x).set_parent(Some(a));
                }
                self.nodes.get_mut(b).set_left(Some(a));
                self.nodes.get_mut(a).set_parent(Some(b));
                self.reconnect(f, a, b);

                self.recompute_heights(Some(a));
                self.update_size(a);
                self.update_size(b);
            } else {
                // Right-left: right rotation at `a.right`, then left rotation at `a`.
                let c = self
                    .nodes
                    .get(b)
                    .left()
                    .expect("`RawOSAvlTree::rebalance()` - left-heavy right child has no left child!");
                let c_right = self.nodes.get(c).right();
                self.nodes.get_mut(b).set_left(c_right);
                if let Some(x) = c_right {
                    self.nodes.get_mut(x).set_parent(Some(b));
                }
                let c_left = self.nodes.get(c).left();
                self.nodes.get_mut(a).set_right(c_left);
                if let Some(x) = c_left {
                    self.nodes.get_mut(x).set_parent(Some(a));
                }
                self.nodes.get_mut(c).set_right(Some(b));
                self.nodes.get_mut(b).set_parent(Some(c));
                self.nodes.get_mut(c).set_left(Some(a));
                self.nodes.get_mut(a).set_parent(Some(c));
                self.reconnect(f, a, c);

                self.recompute_heights(Some(a));
                self.recompute_heights(Some(b));
                self.update_size(a);
                self.update_size(b);
                self.update_size(c);
            }
        } else {
            let b = self
                .nodes
                .get(a)
                .left()
                .expect("`RawOSAvlTree::rebalance()` - left-heavy node has no left child!");
            if self.balance(b) >= 0 {
                // Left-left: single right rotation at `a`.
                let b_right = self.nodes.get(b).right();
                self.nodes.get_mut(a).set_left(b_right);
                if let Some(x) = b_right {
                    self.nodes.get_mut(x).set_parent(Some(a));
                }
                self.nodes.get_mut(b).set_right(Some(a));
                self.nodes.get_mut(a).set_parent(Some(b));
                self.reconnect(f, a, b);

                self.recompute_heights(Some(a));
                self.update_size(a);
                self.update_size(b);
            } else {
                // Left-right: left rotation at `a.left`, then right rotation at `a`.
                let c = self
                    .nodes
                    .get(b)
                    .right()
                    .expect("`RawOSAvlTree::rebalance()` - right-heavy left child has no right child!");
                let c_right = self.nodes.get(c).right();
                self.nodes.get_mut(a).set_left(c_right);
                if let Some(x) = c_right {
                    self.nodes.get_mut(x).set_parent(Some(a));
                }
                let c_left = self.nodes.get(c).left();
                self.nodes.get_mut(b).set_right(c_left);
                if let Some(x) = c_left {
                    self.nodes.get_mut(x).set_parent(Some(b));
                }
                self.nodes.get_mut(c).set_left(Some(b));
                self.nodes.get_mut(b).set_parent(Some(c));
                self.nodes.get_mut(c).set_right(Some(a));
                self.nodes.get_mut(a).set_parent(Some(c));
                self.reconnect(f, a, c);

                self.recompute_heights(Some(a));
                self.recompute_heights(Some(b));
                self.update_size(a);
                self.update_size(b);
                self.update_size(c);
            }
        }
    }

    // ─── Order statistics ───────────────────────────────────────────────────

    /// Returns a handle to the k-th smallest key, 1-indexed.
    ///
    /// The descent is driven purely by the cached subtree sizes; no key
    /// comparisons happen.
    pub(crate) fn kth(&self, k: usize) -> Result<Handle, RankError> {
        if k == 0 || k > self.len {
            return Err(RankError::new(k, self.len));
        }

        // `k >= 1` and `k <= len` guarantee the descent below stays on
        // present children, so the root exists and the expects cannot fire.
        let mut current = self.root.expect("`RawOSAvlTree::kth()` - size invariant violated!");
        let mut remaining = k;

        loop {
            let node = self.nodes.get(current);
            let leftsize = self.size_of(node.left());
            match leftsize.cmp(&(remaining - 1)) {
                Ordering::Greater => {
                    current = node.left().expect("`RawOSAvlTree::kth()` - size invariant violated!");
                }
                Ordering::Equal => return Ok(current),
                Ordering::Less => {
                    remaining -= leftsize + 1;
                    current = node.right().expect("`RawOSAvlTree::kth()` - size invariant violated!");
                }
            }
        }
    }

    /// Returns the 1-based rank of `key` in sorted order, or `None` if the
    /// key is not present.
    pub(crate) fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root?;
        let mut smaller = 0usize;

        loop {
            let node = self.nodes.get(current);
            match key.cmp(node.key().borrow()) {
                Ordering::Less => current = node.left()?,
                Ordering::Greater => {
                    smaller += self.size_of(node.left()) + 1;
                    current = node.right()?;
                }
                Ordering::Equal => return Some(smaller + self.size_of(node.left()) + 1),
            }
        }
    }

    // ─── Traversals ─────────────────────────────────────────────────────────

    /// Materializes the keys in the given traversal order.
    pub(crate) fn keys(&self, order: TraversalOrder) -> Vec<&K> {
        match order {
            TraversalOrder::Pre => self.preorder_keys(),
            TraversalOrder::In => self.inorder_keys(),
            TraversalOrder::Post => self.postorder_keys(),
        }
    }

    fn preorder_keys(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len);
        let mut stack = TraversalStack::new();
        if let Some(root) = self.root {
            stack.push(root);
        }

        while let Some(handle) = stack.pop() {
            let node = self.nodes.get(handle);
            keys.push(node.key());
            // Right first so the left child is popped (visited) first.
            if let Some(right) = node.right() {
                stack.push(right);
            }
            if let Some(left) = node.left() {
                stack.push(left);
            }
        }
        keys
    }

    fn inorder_keys(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len);
        let mut stack = TraversalStack::new();
        let mut current = self.root;

        loop {
            while let Some(handle) = current {
                stack.push(handle);
                current = self.nodes.get(handle).left();
            }
            let Some(handle) = stack.pop() else {
                break;
            };
            let node = self.nodes.get(handle);
            keys.push(node.key());
            current = node.right();
        }
        keys
    }

    fn postorder_keys(&self) -> Vec<&K> {
        // Collect in (node, right, left) order, then reverse into
        // (left, right, node).
        let mut keys = Vec::with_capacity(self.len);
        let mut stack = TraversalStack::new();
        if let Some(root) = self.root {
            stack.push(root);
        }

        while let Some(handle) = stack.pop() {
            let node = self.nodes.get(handle);
            keys.push(node.key());
            if let Some(left) = node.left() {
                stack.push(left);
            }
            if let Some(right) = node.right() {
                stack.push(right);
            }
        }
        keys.reverse();
        keys
    }
}

/// In-order iterator over the raw tree, advancing through successor walks.
pub(crate) struct RawIter<'a, K> {
    tree: &'a RawOSAvlTree<K>,
    next: Option<Handle>,
    remaining: usize,
}

impl<'a, K> Iterator for RawIter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let handle = self.next?;
        self.next = self.tree.next_in_order(handle);
        self.remaining -= 1;
        Some(self.tree.node(handle).key())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for RawIter<'_, K> {}
impl<K> core::iter::FusedIterator for RawIter<'_, K> {}
