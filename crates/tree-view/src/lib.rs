//! Tree View Library
//!
//! Headless state for hierarchical widgets: a generic searchable tree and a
//! file tree with a content pane (the code viewer).
//!
//! # Core Concepts
//!
//! - **Tree**: Generic trait for forests of named nodes
//! - **TreeSnapshot**: The arena-backed snapshot a host hands to a widget
//! - **Search**: Filtering a tree by name and computing which nodes to open
//! - **TreeView / CodeViewer**: Widget state driven by clicks and queries
//!
//! # Example
//!
//! ```
//! use tree_view::prelude::*;
//!
//! let tree: TreeSnapshot<()> = TreeSnapshot::from_nested(vec![NestedNode::branch(
//!     "root",
//!     vec![
//!         NestedNode::leaf("a"),
//!         NestedNode::branch("folder1", vec![NestedNode::leaf("b"), NestedNode::leaf("c")]),
//!     ],
//! )]);
//!
//! let mut view = TreeView::new(tree);
//! view.set_query("b");
//! for row in view.visible_rows() {
//!     let name = view.snapshot().name(row.id).unwrap();
//!     println!("{:indent$}{}", "", name, indent = row.depth * 2);
//! }
//! ```

pub mod code_viewer;
pub mod search;
pub mod tree;
pub mod view;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::code_viewer::CodeViewer;
    pub use crate::search::{compute_expanded, compute_expanded_paths, filter_tree, FilteredTree};
    pub use crate::tree::prelude::*;
    pub use crate::view::{ClickOutcome, TreeOptions, TreeView, VisibleRow};
}
