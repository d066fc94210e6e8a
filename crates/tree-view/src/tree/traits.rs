//! Navigation over labelled hierarchies

use crate::tree::{Node, NodeId};
use std::collections::VecDeque;
use std::iter;

/// A forest of labelled nodes
///
/// Widgets receive a list of top-level nodes, so there may be several roots.
/// Implementors supply the five navigation primitives and get the rest.
pub trait Tree {
    type NodeData;

    /// Top-level nodes in display order
    fn roots(&self) -> Box<dyn Iterator<Item = NodeId> + '_>;

    fn get(&self, id: NodeId) -> Option<&Node<Self::NodeData>>;

    /// `None` for top-level nodes and unknown ids
    fn parent(&self, id: NodeId) -> Option<NodeId>;

    /// Children in display order; empty for leaves and unknown ids
    fn children(&self, id: NodeId) -> Box<dyn Iterator<Item = NodeId> + '_>;

    fn node_count(&self) -> usize;

    fn is_leaf(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_leaf)
    }

    fn is_container(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_container)
    }

    /// A container with no children counts as childless here
    fn has_children(&self, id: NodeId) -> bool {
        self.children(id).next().is_some()
    }

    fn name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|node| node.name.as_str())
    }

    /// Names from the top-level node down to `id`, joined by `/`
    ///
    /// Unknown ids give an empty string.
    fn path(&self, id: NodeId) -> String {
        let mut names: Vec<&str> = iter::successors(Some(id), |&current| self.parent(current))
            .filter_map(|current| self.name(current))
            .collect();
        names.reverse();
        names.join("/")
    }

    /// Number of ancestors; top-level nodes sit at 0
    fn depth(&self, id: NodeId) -> usize {
        iter::successors(self.parent(id), |&current| self.parent(current)).count()
    }

    fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// Parent first, top-level node last
    fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        iter::successors(self.parent(id), |&current| self.parent(current)).collect()
    }

    fn is_ancestor_of(&self, ancestor: NodeId, descendant: NodeId) -> bool {
        iter::successors(self.parent(descendant), |&current| self.parent(current))
            .any(|current| current == ancestor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// Parents before their children
    PreOrder,
    /// Children before their parents
    PostOrder,
    /// One depth level at a time
    BreadthFirst,
}

/// Walking and lookup helpers, available on every [`Tree`]
pub trait TreeTraversal: Tree {
    /// Walk all top-level trees in turn
    fn walk(&self, order: TraversalOrder) -> TreeWalker<'_, Self>
    where
        Self: Sized,
    {
        TreeWalker::new(self, self.roots().collect(), order)
    }

    /// Walk only the subtree under `start`, `start` included
    fn walk_from(&self, start: NodeId, order: TraversalOrder) -> TreeWalker<'_, Self>
    where
        Self: Sized,
    {
        TreeWalker::new(self, vec![start], order)
    }

    fn leaves(&self) -> Vec<NodeId>
    where
        Self: Sized,
    {
        self.find(Node::is_leaf)
    }

    fn containers(&self) -> Vec<NodeId>
    where
        Self: Sized,
    {
        self.find(Node::is_container)
    }

    /// Every node accepted by `predicate`, in pre-order
    fn find<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Node<Self::NodeData>) -> bool,
        Self: Sized,
    {
        self.walk(TraversalOrder::PreOrder)
            .filter(|&id| self.get(id).is_some_and(&predicate))
            .collect()
    }

    /// Resolve a `/`-joined path
    ///
    /// Same-named siblings resolve to the first one in display order.
    fn find_by_path(&self, path: &str) -> Option<NodeId> {
        let mut segments = path.split('/').filter(|segment| !segment.is_empty());
        let top = segments.next()?;
        let start = self.roots().find(|&id| self.name(id) == Some(top))?;

        segments.try_fold(start, |current, segment| {
            self.children(current).find(|&id| self.name(id) == Some(segment))
        })
    }

    /// First node in pre-order with this name
    fn find_by_name(&self, name: &str) -> Option<NodeId>
    where
        Self: Sized,
    {
        self.walk(TraversalOrder::PreOrder)
            .find(|&id| self.name(id) == Some(name))
    }
}

impl<T: Tree> TreeTraversal for T {}

/// Lazy iterator behind [`TreeTraversal::walk`]
pub struct TreeWalker<'a, T: Tree + ?Sized> {
    tree: &'a T,
    order: TraversalOrder,
    /// Depth-first orders use it as a stack, breadth-first as a queue.
    /// The flag marks nodes whose children were already pushed.
    pending: VecDeque<(NodeId, bool)>,
}

impl<'a, T: Tree + ?Sized> TreeWalker<'a, T> {
    pub fn new(tree: &'a T, starts: Vec<NodeId>, order: TraversalOrder) -> Self {
        let pending = match order {
            TraversalOrder::BreadthFirst => starts.into_iter().map(|id| (id, false)).collect(),
            _ => starts.into_iter().rev().map(|id| (id, false)).collect(),
        };
        Self { tree, order, pending }
    }

    fn push_children_reversed(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.tree.children(id).collect();
        self.pending
            .extend(children.into_iter().rev().map(|child| (child, false)));
    }
}

impl<'a, T: Tree + ?Sized> Iterator for TreeWalker<'a, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        match self.order {
            TraversalOrder::PreOrder => {
                let (id, _) = self.pending.pop_back()?;
                self.push_children_reversed(id);
                Some(id)
            }
            TraversalOrder::PostOrder => loop {
                let (id, expanded) = self.pending.pop_back()?;
                if expanded {
                    return Some(id);
                }
                self.pending.push_back((id, true));
                self.push_children_reversed(id);
            },
            TraversalOrder::BreadthFirst => {
                let (id, _) = self.pending.pop_front()?;
                self.pending
                    .extend(self.tree.children(id).map(|child| (child, false)));
                Some(id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeSnapshot;
    use pretty_assertions::assert_eq;

    /// `src/{views/tree.rs, lib.rs}` plus a second top-level `Cargo.toml`
    fn workspace() -> (TreeSnapshot<u64>, [NodeId; 5]) {
        let mut tree = TreeSnapshot::new();
        let src = tree.add_root(Node::container("src", 0));
        let views = tree.add_child(src, Node::container("views", 0)).unwrap();
        let lib = tree.add_child(src, Node::leaf("lib.rs", 120)).unwrap();
        let view = tree.add_child(views, Node::leaf("tree.rs", 900)).unwrap();
        let manifest = tree.add_root(Node::leaf("Cargo.toml", 300));
        (tree, [src, views, lib, view, manifest])
    }

    #[test]
    fn test_navigation() {
        let (tree, [src, views, lib, _, manifest]) = workspace();

        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.roots().collect::<Vec<_>>(), vec![src, manifest]);
        assert_eq!(tree.child_count(src), 2);
        assert!(tree.is_leaf(lib));
        assert!(tree.is_container(views));
        assert!(tree.has_children(views));
        assert!(!tree.has_children(lib));
        assert!(!tree.is_leaf(NodeId::new(40)));
    }

    #[test]
    fn test_paths_start_at_top_level_name() {
        let (tree, [src, _, _, view, manifest]) = workspace();

        assert_eq!(tree.path(view), "src/views/tree.rs");
        assert_eq!(tree.path(src), "src");
        assert_eq!(tree.path(manifest), "Cargo.toml");
        assert_eq!(tree.path(NodeId(99)), "");
    }

    #[test]
    fn test_depth_and_ancestors() {
        let (tree, [src, views, _, view, manifest]) = workspace();

        assert_eq!(tree.depth(manifest), 0);
        assert_eq!(tree.depth(view), 2);
        assert_eq!(tree.ancestors(view), vec![views, src]);
        assert!(tree.ancestors(src).is_empty());
        assert!(tree.is_ancestor_of(src, view));
        assert!(!tree.is_ancestor_of(view, src));
        assert!(!tree.is_ancestor_of(manifest, view));
    }

    #[test]
    fn test_walk_orders() {
        let (tree, [src, views, lib, view, manifest]) = workspace();

        let pre: Vec<_> = tree.walk(TraversalOrder::PreOrder).collect();
        assert_eq!(pre, vec![src, views, view, lib, manifest]);

        let post: Vec<_> = tree.walk(TraversalOrder::PostOrder).collect();
        assert_eq!(post, vec![view, views, lib, src, manifest]);

        let bfs: Vec<_> = tree.walk(TraversalOrder::BreadthFirst).collect();
        assert_eq!(bfs, vec![src, manifest, views, lib, view]);

        let below: Vec<_> = tree.walk_from(views, TraversalOrder::PostOrder).collect();
        assert_eq!(below, vec![view, views]);
    }

    #[test]
    fn test_lookups() {
        let (tree, [src, views, lib, view, manifest]) = workspace();

        assert_eq!(tree.leaves(), vec![view, lib, manifest]);
        assert_eq!(tree.containers(), vec![src, views]);
        assert_eq!(tree.find(|n| n.data >= 300), vec![view, manifest]);
        assert_eq!(tree.find_by_path("src/views/tree.rs"), Some(view));
        assert_eq!(tree.find_by_path("/src/lib.rs"), Some(lib));
        assert_eq!(tree.find_by_path("src/missing"), None);
        assert_eq!(tree.find_by_path(""), None);
        assert_eq!(tree.find_by_name("Cargo.toml"), Some(manifest));
    }
}
