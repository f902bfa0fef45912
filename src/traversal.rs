use core::str::FromStr;

use crate::error::ParseTraversalOrderError;

/// Selects the order in which [`as_list`](crate::OSAvlTree::as_list) visits
/// the tree.
///
/// In-order traversal yields the keys in ascending sorted order.
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
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TraversalOrder {
    /// Visit a node before its children.
    Pre,
    /// Visit a node between its left and right subtrees.
    In,
    /// Visit a node after its children.
    Post,
}

/// Parses `"pre"`/`"preorder"`, `"in"`/`"inorder"` and `"post"`/`"postorder"`.
/// Any other selector is rejected.
///
/// # Examples
///
/// ```
/// use sabi_tree::TraversalOrder;
///
/// assert_eq!("inorder".parse(), Ok(TraversalOrder::In));
/// assert!("sideways".parse::<TraversalOrder>().is_err());
/// ```
impl FromStr for TraversalOrder {
    type Err = ParseTraversalOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre" | "preorder" => Ok(TraversalOrder::Pre),
            "in" | "inorder" => Ok(TraversalOrder::In),
            "post" | "postorder" => Ok(TraversalOrder::Post),
            _ => Err(ParseTraversalOrderError),
        }
    }
}
