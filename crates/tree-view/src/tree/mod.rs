//! Core tree abstraction for hierarchical data structures
//!
//! This module provides the node model, a generic forest trait, and the
//! arena-backed snapshot widgets are handed by their host.

pub mod filesystem;
mod node;
mod snapshot;
mod traits;

pub use filesystem::{load_directory, FileData, LoadOptions};
pub use node::{Node, NodeId, NodeKind};
pub use snapshot::{NestedNode, TreeSnapshot};
pub use traits::{TraversalOrder, Tree, TreeTraversal, TreeWalker};

/// Re-export common types for convenience
pub mod prelude {
    pub use super::{
        FileData, NestedNode, Node, NodeId, NodeKind, TraversalOrder, Tree, TreeSnapshot,
        TreeTraversal,
    };
}
