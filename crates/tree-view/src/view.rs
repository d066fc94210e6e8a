//! Headless state for the searchable tree widget

use anyhow::{anyhow, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::search::{compute_expanded, filter_tree, is_blank_query, FilteredTree};
use crate::tree::{Node, NodeId, Tree, TreeSnapshot};

/// Configuration options for a tree widget
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    /// Whether the search box is shown
    pub show_search: bool,
    /// Text shown when nothing matches the query
    pub empty_text: String,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            show_search: true,
            empty_text: "No items found".to_string(),
        }
    }
}

impl TreeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show or hide the search box
    pub fn show_search(mut self, show_search: bool) -> Self {
        self.show_search = show_search;
        self
    }

    /// Set the "no results" text
    pub fn empty_text(mut self, text: impl Into<String>) -> Self {
        self.empty_text = text.into();
        self
    }
}

/// One rendered line of the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow {
    pub id: NodeId,
    pub depth: usize,
    pub has_children: bool,
    pub is_open: bool,
    pub is_selected: bool,
}

/// What a click on a row did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A node with children was opened or closed
    Toggled { open: bool },
    /// A node without children was selected
    Selected,
}

type SelectCallback<D> = Box<dyn FnMut(&Node<D>, &str)>;

/// State of a searchable, collapsible tree
///
/// The expansion set is driven by the search query: changing the query
/// replaces it with the nodes needed to reveal every match, and clearing the
/// query collapses everything. Clicks toggle nodes in between.
pub struct TreeView<D> {
    snapshot: TreeSnapshot<D>,
    options: TreeOptions,
    query: String,
    expanded: HashSet<NodeId>,
    selected: Option<NodeId>,
    on_select: Option<SelectCallback<D>>,
}

impl<D> TreeView<D> {
    pub fn new(snapshot: TreeSnapshot<D>) -> Self {
        Self {
            snapshot,
            options: TreeOptions::default(),
            query: String::new(),
            expanded: HashSet::new(),
            selected: None,
            on_select: None,
        }
    }

    pub fn with_options(mut self, options: TreeOptions) -> Self {
        self.options = options;
        self
    }

    /// Register the callback invoked with the selected node and its path
    pub fn on_select(mut self, callback: impl FnMut(&Node<D>, &str) + 'static) -> Self {
        self.on_select = Some(Box::new(callback));
        self
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    pub fn snapshot(&self) -> &TreeSnapshot<D> {
        &self.snapshot
    }

    /// Replace the tree, keeping the query and re-deriving expansion
    pub fn set_snapshot(&mut self, snapshot: TreeSnapshot<D>) {
        self.snapshot = snapshot;
        self.selected = None;
        self.expanded = compute_expanded(&self.snapshot, &self.query);
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Update the search query and re-derive the expansion set
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.expanded = compute_expanded(&self.snapshot, &self.query);
        debug!("Tree query '{}' expands {} nodes", self.query, self.expanded.len());
    }

    /// Clear the search box
    pub fn clear_query(&mut self) {
        self.set_query(String::new());
    }

    /// Returns true while a non-blank query is active
    pub fn is_searching(&self) -> bool {
        !is_blank_query(&self.query)
    }

    /// The tree as currently filtered by the query
    pub fn filtered(&self) -> FilteredTree<'_, TreeSnapshot<D>> {
        filter_tree(&self.snapshot, &self.query)
    }

    /// Returns true when the filtered tree has nothing to show
    pub fn is_empty(&self) -> bool {
        self.filtered().is_empty()
    }

    pub fn is_open(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn expanded(&self) -> &HashSet<NodeId> {
        &self.expanded
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Path of the selected node
    pub fn selected_path(&self) -> Option<String> {
        self.selected.map(|id| self.snapshot.path(id))
    }

    /// Open or close a node that has visible children
    ///
    /// Returns the new open state; nodes without children stay closed.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        if !self.filtered().has_children(id) {
            return false;
        }
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
        self.is_open(id)
    }

    /// Whether `id` is one of the rows on screen: part of the filtered tree
    /// with every ancestor open
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.filtered().contains(id)
            && self
                .snapshot
                .ancestors(id)
                .into_iter()
                .all(|ancestor| self.is_open(ancestor))
    }

    /// Handle a click on a visible row
    ///
    /// Nodes with children toggle; other nodes become the selection and the
    /// select callback receives the node with its `/`-joined path.
    ///
    /// # Errors
    ///
    /// Fails if the node is filtered out or sits under a closed parent.
    pub fn click(&mut self, id: NodeId) -> Result<ClickOutcome> {
        if !self.is_visible(id) {
            return Err(anyhow!("{} is not visible", id));
        }
        if self.filtered().has_children(id) {
            let open = self.toggle(id);
            return Ok(ClickOutcome::Toggled { open });
        }

        self.select(id)?;
        Ok(ClickOutcome::Selected)
    }

    /// Select a node and notify the callback
    pub fn select(&mut self, id: NodeId) -> Result<()> {
        let node = self
            .snapshot
            .get(id)
            .ok_or_else(|| anyhow!("No node with id {}", id))?;
        let path = self.snapshot.path(id);
        self.selected = Some(id);
        if let Some(callback) = self.on_select.as_mut() {
            callback(node, &path);
        }
        Ok(())
    }

    /// Flatten the filtered tree into the rows currently on screen
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        let filtered = self.filtered();
        let mut rows = Vec::new();
        let mut stack: Vec<(NodeId, usize)> = filtered.roots().map(|id| (id, 0)).collect();
        stack.reverse();

        while let Some((id, depth)) = stack.pop() {
            let has_children = filtered.has_children(id);
            let is_open = has_children && self.is_open(id);
            rows.push(VisibleRow {
                id,
                depth,
                has_children,
                is_open,
                is_selected: self.selected == Some(id),
            });

            if is_open {
                let children: Vec<_> = filtered.children(id).collect();
                stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
            }
        }

        rows
    }
}

impl<D> fmt::Display for TreeView<D> {
    /// Indented outline of the visible rows
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.visible_rows();
        if rows.is_empty() {
            return writeln!(f, "{}", self.options.empty_text);
        }
        for row in rows {
            let marker = match (row.has_children, row.is_open) {
                (true, true) => "v ",
                (true, false) => "> ",
                (false, _) => "  ",
            };
            let name = self.snapshot.name(row.id).unwrap_or_default();
            writeln!(f, "{}{}{}", "  ".repeat(row.depth), marker, name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{NestedNode, TreeTraversal};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn snapshot() -> TreeSnapshot<()> {
        TreeSnapshot::from_nested(vec![
            NestedNode::branch(
                "src",
                vec![
                    NestedNode::branch("views", vec![NestedNode::leaf("tree.rs")]),
                    NestedNode::leaf("lib.rs"),
                ],
            ),
            NestedNode::leaf("Cargo.toml"),
        ])
    }

    fn names(view: &TreeView<()>) -> Vec<String> {
        view.visible_rows()
            .iter()
            .map(|row| format!("{}{}", "-".repeat(row.depth), view.snapshot().name(row.id).unwrap()))
            .collect()
    }

    #[test]
    fn test_starts_collapsed() {
        let view = TreeView::new(snapshot());
        assert_eq!(names(&view), vec!["src", "Cargo.toml"]);
        assert!(!view.is_searching());
    }

    #[test]
    fn test_query_expands_to_matches() {
        let mut view = TreeView::new(snapshot());
        view.set_query("TREE");

        assert_eq!(names(&view), vec!["src", "-views", "--tree.rs"]);
        assert!(view.is_searching());

        view.clear_query();
        assert!(view.expanded().is_empty());
        assert_eq!(names(&view), vec!["src", "Cargo.toml"]);
    }

    #[test]
    fn test_no_results_state() {
        let mut view = TreeView::new(snapshot()).with_options(TreeOptions::new().empty_text("Nothing here"));
        view.set_query("missing");
        assert!(view.is_empty());
        assert!(view.visible_rows().is_empty());
        assert_eq!(view.to_string(), "Nothing here\n");
    }

    #[test]
    fn test_click_toggles_and_selects() {
        let selections = Rc::new(RefCell::new(Vec::new()));
        let sink = selections.clone();
        let mut view = TreeView::new(snapshot()).on_select(move |node, path| {
            sink.borrow_mut().push((node.name.clone(), path.to_string()));
        });

        let src = view.snapshot().find_by_path("src").unwrap();
        let lib = view.snapshot().find_by_path("src/lib.rs").unwrap();

        assert_eq!(view.click(src).unwrap(), ClickOutcome::Toggled { open: true });
        assert_eq!(view.click(lib).unwrap(), ClickOutcome::Selected);
        assert_eq!(view.selected_path().as_deref(), Some("src/lib.rs"));
        assert_eq!(view.click(src).unwrap(), ClickOutcome::Toggled { open: false });

        assert_eq!(
            selections.borrow().clone(),
            vec![("lib.rs".to_string(), "src/lib.rs".to_string())]
        );
    }

    #[test]
    fn test_click_under_closed_parent_is_rejected() {
        let mut view = TreeView::new(snapshot());
        let src = view.snapshot().find_by_path("src").unwrap();
        let lib = view.snapshot().find_by_path("src/lib.rs").unwrap();
        let tree_rs = view.snapshot().find_by_path("src/views/tree.rs").unwrap();

        assert!(!view.is_visible(lib));
        assert!(view.click(lib).is_err());
        assert_eq!(view.selected(), None);

        view.toggle(src);
        assert!(view.is_visible(lib));
        assert!(!view.is_visible(tree_rs));
        assert!(view.click(tree_rs).is_err());
        assert_eq!(view.click(lib).unwrap(), ClickOutcome::Selected);
    }

    #[test]
    fn test_click_rejects_filtered_out_node() {
        let mut view = TreeView::new(snapshot());
        let cargo = view.snapshot().find_by_path("Cargo.toml").unwrap();
        view.set_query("tree");
        assert!(view.click(cargo).is_err());
    }

    #[test]
    fn test_toggle_leaf_stays_closed() {
        let mut view = TreeView::new(snapshot());
        let cargo = view.snapshot().find_by_path("Cargo.toml").unwrap();
        assert!(!view.toggle(cargo));
        assert!(!view.is_open(cargo));
    }

    #[test]
    fn test_display_outline() {
        let mut view = TreeView::new(snapshot());
        view.set_query("lib");
        assert_eq!(view.to_string(), "v src\n    lib.rs\n");
    }
}
