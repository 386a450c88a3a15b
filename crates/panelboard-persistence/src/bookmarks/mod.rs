pub mod tree;

pub use tree::{BookmarkTree, TreeNode};
