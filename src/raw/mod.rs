mod arena;
mod node;
mod raw_os_avl_tree;

pub(crate) use arena::Handle;
pub(crate) use raw_os_avl_tree::{RawIter, RawOSAvlTree};
