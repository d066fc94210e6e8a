//! Node types shared by every tree widget

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle to a node inside one snapshot
///
/// Identity never depends on the node's name, so same-named siblings stay
/// distinct. Handles from one snapshot mean nothing in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub(crate) const fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Position in the snapshot's arena, in insertion order
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Folder or file
///
/// Generic trees only care whether a node may hold children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum NodeKind {
    #[display(fmt = "folder")]
    #[serde(rename = "folder", alias = "container")]
    Container,
    #[display(fmt = "file")]
    #[serde(rename = "file", alias = "leaf")]
    Leaf,
}

impl NodeKind {
    pub const fn is_container(self) -> bool {
        matches!(self, NodeKind::Container)
    }

    pub const fn is_leaf(self) -> bool {
        matches!(self, NodeKind::Leaf)
    }
}

/// One labelled entry of a tree, carrying a widget payload `D`
/// (file data for the code viewer, `()` for a plain tree)
#[derive(Debug, Clone, PartialEq)]
pub struct Node<D> {
    /// Label shown on screen and matched by search
    pub name: String,
    pub kind: NodeKind,
    pub data: D,
}

impl<D> Node<D> {
    pub fn new(name: impl Into<String>, kind: NodeKind, data: D) -> Self {
        Self {
            name: name.into(),
            kind,
            data,
        }
    }

    /// A folder-like node
    pub fn container(name: impl Into<String>, data: D) -> Self {
        Self::new(name, NodeKind::Container, data)
    }

    /// A file-like node
    pub fn leaf(name: impl Into<String>, data: D) -> Self {
        Self::new(name, NodeKind::Leaf, data)
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    pub fn is_leaf(&self) -> bool {
        self.kind.is_leaf()
    }

    /// Swap the payload, keeping the label and kind
    pub fn map_data<E>(self, f: impl FnOnce(D) -> E) -> Node<E> {
        Node {
            name: self.name,
            kind: self.kind,
            data: f(self.data),
        }
    }
}

impl<D> fmt::Display for Node<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NodeKind::Container => write!(f, "{}/", self.name),
            NodeKind::Leaf => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ids_render_with_hash() {
        let id = NodeId::new(3);
        assert_eq!(id.index(), 3);
        assert_eq!(id.to_string(), "#3");
        assert!(NodeId::new(1) < NodeId::new(2));
    }

    #[test]
    fn test_kind_uses_file_tree_names() {
        assert_eq!(NodeKind::Container.to_string(), "folder");
        assert_eq!(NodeKind::Leaf.to_string(), "file");

        let kind: NodeKind = serde_json::from_str("\"folder\"").unwrap();
        assert_eq!(kind, NodeKind::Container);
        let kind: NodeKind = serde_json::from_str("\"leaf\"").unwrap();
        assert_eq!(kind, NodeKind::Leaf);
        assert_eq!(serde_json::to_string(&NodeKind::Leaf).unwrap(), "\"file\"");
    }

    #[test]
    fn test_folders_render_with_slash() {
        let folder = Node::container("src", ());
        assert!(folder.is_container());
        assert_eq!(folder.to_string(), "src/");

        let file = Node::leaf("main.rs", 12u64);
        assert!(file.is_leaf());
        assert_eq!(file.to_string(), "main.rs");
    }

    #[test]
    fn test_map_data_keeps_label() {
        let file = Node::leaf("notes.md", "# hi").map_data(str::len);
        assert_eq!(file, Node::leaf("notes.md", 4));
    }
}
