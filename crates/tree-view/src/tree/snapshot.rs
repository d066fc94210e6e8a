//! Immutable-by-convention tree snapshots handed to the tree widgets

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::tree::{Node, NodeId, NodeKind, Tree};

/// Internal arena entry
#[derive(Debug, Clone)]
struct Entry<D> {
    node: Node<D>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An arena-backed forest of nodes
///
/// Node ids are arena indices and stay valid for the lifetime of the
/// snapshot. Widgets never mutate a snapshot; hosts build a new one when
/// their data changes.
#[derive(Debug, Clone)]
pub struct TreeSnapshot<D> {
    entries: Vec<Entry<D>>,
    roots: Vec<NodeId>,
}

impl<D> Default for TreeSnapshot<D> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            roots: Vec::new(),
        }
    }
}

impl<D> TreeSnapshot<D> {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a top-level node
    pub fn add_root(&mut self, node: Node<D>) -> NodeId {
        let id = self.push(node, None);
        self.roots.push(id);
        id
    }

    /// Append a child under `parent`
    ///
    /// # Errors
    ///
    /// Fails if `parent` doesn't exist or is a leaf.
    pub fn add_child(&mut self, parent: NodeId, node: Node<D>) -> Result<NodeId> {
        let parent_entry = self
            .entries
            .get(parent.index())
            .ok_or_else(|| anyhow!("No node with id {}", parent))?;
        if parent_entry.node.is_leaf() {
            return Err(anyhow!(
                "Cannot add '{}' under leaf node '{}'",
                node.name,
                parent_entry.node.name
            ));
        }

        let id = self.push(node, Some(parent));
        self.entries[parent.index()].children.push(id);
        Ok(id)
    }

    /// Build a snapshot from nested node descriptions
    pub fn from_nested(nodes: Vec<NestedNode<D>>) -> Self {
        let mut tree = Self::new();
        for nested in nodes {
            tree.insert_nested(None, nested);
        }
        tree
    }

    fn insert_nested(&mut self, parent: Option<NodeId>, nested: NestedNode<D>) {
        let kind = nested.kind.unwrap_or(if nested.children.is_some() {
            NodeKind::Container
        } else {
            NodeKind::Leaf
        });
        let node = Node::new(nested.name, kind, nested.data);

        let id = self.push(node, parent);
        match parent {
            Some(parent) => self.entries[parent.index()].children.push(id),
            None => self.roots.push(id),
        }

        // Children of a node declared as a file are dropped
        if kind.is_container() {
            for child in nested.children.unwrap_or_default() {
                self.insert_nested(Some(id), child);
            }
        }
    }

    fn push(&mut self, node: Node<D>, parent: Option<NodeId>) -> NodeId {
        let id = NodeId::new(self.entries.len());
        self.entries.push(Entry {
            node,
            parent,
            children: Vec::new(),
        });
        id
    }

    /// Returns true if the snapshot holds no nodes
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<D> Tree for TreeSnapshot<D> {
    type NodeData = D;

    fn roots(&self) -> Box<dyn Iterator<Item = NodeId> + '_> {
        Box::new(self.roots.iter().copied())
    }

    fn get(&self, id: NodeId) -> Option<&Node<D>> {
        self.entries.get(id.index()).map(|e| &e.node)
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entries.get(id.index())?.parent
    }

    fn children(&self, id: NodeId) -> Box<dyn Iterator<Item = NodeId> + '_> {
        Box::new(
            self.entries
                .get(id.index())
                .map(|e| e.children.iter().copied())
                .into_iter()
                .flatten(),
        )
    }

    fn node_count(&self) -> usize {
        self.entries.len()
    }
}

/// Nested description of a node, the shape hosts usually have at hand
///
/// `type` is optional: without it a node with a `children` list (even an
/// empty one) is a folder and a node without one is a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "D: Serialize",
    deserialize = "D: Deserialize<'de> + Default"
))]
pub struct NestedNode<D> {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NestedNode<D>>>,
    #[serde(default)]
    pub data: D,
}

impl<D: Default> NestedNode<D> {
    /// A node without children
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            children: None,
            data: D::default(),
        }
    }

    /// A node with children
    pub fn branch(name: impl Into<String>, children: Vec<NestedNode<D>>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            children: Some(children),
            data: D::default(),
        }
    }
}

impl<D> NestedNode<D> {
    /// Attach widget data
    pub fn with_data(mut self, data: D) -> Self {
        self.data = data;
        self
    }

    /// Force the node kind instead of inferring it
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = Some(kind);
        self
    }
}
