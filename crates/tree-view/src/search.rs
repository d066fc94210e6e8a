//! Search-and-expand over trees
//!
//! A node matches a query when its name contains the query as a
//! case-insensitive substring. A blank (empty or whitespace-only) query
//! matches nothing and filters nothing.
//!
//! Survival rule used by [`filter_tree`]:
//! - a node whose own name matches is kept together with its whole original
//!   subtree, so a matched folder shows all of its contents;
//! - any other node is kept only if at least one child survives, and then
//!   lists only its surviving children.
//!
//! Expansion rule used by [`compute_expanded`]: every ancestor of a match is
//! expanded, and a matching node that has children is expanded as well.
//! Nodes below a match are not force-expanded unless they match themselves.

use log::trace;
use std::collections::{HashMap, HashSet};

use crate::tree::{Node, NodeId, TraversalOrder, Tree, TreeTraversal};

/// Returns true for queries that should not filter anything
pub fn is_blank_query(query: &str) -> bool {
    query.trim().is_empty()
}

/// Case-insensitive substring match of `query` against `name`
pub fn matches_query(name: &str, query: &str) -> bool {
    name.to_lowercase().contains(&query.to_lowercase())
}

/// A read-only view of a tree restricted to the nodes that survive a search
///
/// Node ids are those of the underlying tree.
pub struct FilteredTree<'a, T: Tree + ?Sized> {
    tree: &'a T,
    /// `None` when the query was blank and everything is visible
    visible: Option<Visible>,
}

struct Visible {
    roots: Vec<NodeId>,
    children: HashMap<NodeId, Vec<NodeId>>,
}

impl<'a, T: Tree + ?Sized> FilteredTree<'a, T> {
    /// A view that shows the whole tree
    pub fn unfiltered(tree: &'a T) -> Self {
        Self {
            tree,
            visible: None,
        }
    }

    /// The underlying tree
    pub fn source(&self) -> &'a T {
        self.tree
    }

    /// Returns true if the view passes every node through
    pub fn is_unfiltered(&self) -> bool {
        self.visible.is_none()
    }

    /// Returns true if nothing survived the search
    pub fn is_empty(&self) -> bool {
        self.roots().next().is_none()
    }

    /// Returns true if the node is part of the view
    pub fn contains(&self, id: NodeId) -> bool {
        match &self.visible {
            Some(visible) => visible.children.contains_key(&id),
            None => self.tree.get(id).is_some(),
        }
    }
}

impl<'a, T: Tree + ?Sized> Tree for FilteredTree<'a, T> {
    type NodeData = T::NodeData;

    fn roots(&self) -> Box<dyn Iterator<Item = NodeId> + '_> {
        match &self.visible {
            Some(visible) => Box::new(visible.roots.iter().copied()),
            None => self.tree.roots(),
        }
    }

    fn get(&self, id: NodeId) -> Option<&Node<T::NodeData>> {
        if self.contains(id) {
            self.tree.get(id)
        } else {
            None
        }
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        if self.contains(id) {
            self.tree.parent(id)
        } else {
            None
        }
    }

    fn children(&self, id: NodeId) -> Box<dyn Iterator<Item = NodeId> + '_> {
        match &self.visible {
            Some(visible) => Box::new(
                visible
                    .children
                    .get(&id)
                    .map(|c| c.iter().copied())
                    .into_iter()
                    .flatten(),
            ),
            None => self.tree.children(id),
        }
    }

    fn node_count(&self) -> usize {
        match &self.visible {
            Some(visible) => visible.children.len(),
            None => self.tree.node_count(),
        }
    }
}

/// Restrict a tree to the nodes matching `query` and their ancestors
///
/// A blank query returns an unfiltered view of the whole tree.
pub fn filter_tree<'a, T: Tree + ?Sized>(tree: &'a T, query: &str) -> FilteredTree<'a, T> {
    if is_blank_query(query) {
        return FilteredTree::unfiltered(tree);
    }

    let query = query.to_lowercase();
    let mut children = HashMap::new();
    let roots: Vec<NodeId> = tree
        .roots()
        .collect::<Vec<_>>()
        .into_iter()
        .filter(|&id| filter_node(tree, id, &query, &mut children))
        .collect();

    trace!("Query '{}' kept {} nodes", query, children.len());
    FilteredTree {
        tree,
        visible: Some(Visible { roots, children }),
    }
}

/// Decide whether `id` survives, recording surviving children lists
fn filter_node<T: Tree + ?Sized>(
    tree: &T,
    id: NodeId,
    query: &str,
    out: &mut HashMap<NodeId, Vec<NodeId>>,
) -> bool {
    let Some(node) = tree.get(id) else {
        return false;
    };

    if node.name.to_lowercase().contains(query) {
        reveal_subtree(tree, id, out);
        return true;
    }

    let kept: Vec<NodeId> = tree
        .children(id)
        .collect::<Vec<_>>()
        .into_iter()
        .filter(|&child| filter_node(tree, child, query, out))
        .collect();

    if kept.is_empty() {
        false
    } else {
        out.insert(id, kept);
        true
    }
}

fn reveal_subtree<T: Tree + ?Sized>(tree: &T, id: NodeId, out: &mut HashMap<NodeId, Vec<NodeId>>) {
    let children: Vec<NodeId> = tree.children(id).collect();
    for &child in &children {
        reveal_subtree(tree, child, out);
    }
    out.insert(id, children);
}

/// Nodes that must be open so every match of `query` is visible
///
/// Returns an empty set for a blank query.
pub fn compute_expanded<T: Tree>(tree: &T, query: &str) -> HashSet<NodeId> {
    let mut expanded = HashSet::new();
    if is_blank_query(query) {
        return expanded;
    }

    let query = query.to_lowercase();
    for id in tree.walk(TraversalOrder::PreOrder) {
        let Some(node) = tree.get(id) else { continue };
        if !node.name.to_lowercase().contains(&query) {
            continue;
        }
        expanded.extend(tree.ancestors(id));
        if tree.has_children(id) {
            expanded.insert(id);
        }
    }
    expanded
}

/// [`compute_expanded`] expressed as `/`-joined paths
///
/// Paths start at the top-level node's name, so a match at `root/folder1/b`
/// contributes `root` and `root/folder1`. Same-named siblings share a path.
pub fn compute_expanded_paths<T: Tree>(tree: &T, query: &str) -> HashSet<String> {
    compute_expanded(tree, query)
        .into_iter()
        .map(|id| tree.path(id))
        .collect()
}
