//! File tree with a content pane: the code viewer widget

use anyhow::{anyhow, Result};
use log::warn;
use platform::{ClipboardWriter, CopyFeedback};
use std::time::Instant;

use crate::tree::{FileData, Node, NodeId, Tree, TreeSnapshot};
use crate::view::{ClickOutcome, TreeView};

/// A searchable file tree plus the file currently shown
pub struct CodeViewer {
    view: TreeView<FileData>,
    selected_file: Option<NodeId>,
    sidebar_open: bool,
    copied: CopyFeedback,
}

impl CodeViewer {
    pub fn new(files: TreeSnapshot<FileData>) -> Self {
        Self {
            view: TreeView::new(files),
            selected_file: None,
            sidebar_open: true,
            copied: CopyFeedback::default(),
        }
    }

    /// The underlying tree state (query, expansion, rows)
    pub fn tree(&self) -> &TreeView<FileData> {
        &self.view
    }

    pub fn tree_mut(&mut self) -> &mut TreeView<FileData> {
        &mut self.view
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.view.set_query(query);
    }

    /// Handle a click in the sidebar
    ///
    /// Folders toggle. Files become the displayed file; folders without
    /// children are never displayed.
    pub fn click(&mut self, id: NodeId) -> Result<ClickOutcome> {
        let is_file = self
            .view
            .snapshot()
            .get(id)
            .map(Node::is_leaf)
            .ok_or_else(|| anyhow!("No node with id {}", id))?;

        let outcome = self.view.click(id)?;
        if outcome == ClickOutcome::Selected && is_file {
            self.selected_file = Some(id);
        }
        Ok(outcome)
    }

    /// The displayed file
    pub fn selected_file(&self) -> Option<&Node<FileData>> {
        self.selected_file.and_then(|id| self.view.snapshot().get(id))
    }

    /// Path of the displayed file, used as the pane title
    pub fn selected_path(&self) -> Option<String> {
        self.selected_file.map(|id| self.view.snapshot().path(id))
    }

    /// Lines of the displayed file with 1-based line numbers
    pub fn numbered_lines(&self) -> Vec<(usize, &str)> {
        self.selected_file()
            .and_then(|node| node.data.content.as_deref())
            .map(|content| content.lines().enumerate().map(|(i, l)| (i + 1, l)).collect())
            .unwrap_or_default()
    }

    pub fn is_sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_open
    }

    /// Copy the displayed file's content to the clipboard
    ///
    /// Returns `Ok(false)` when there is nothing to copy. A failed write is
    /// returned to the caller and leaves the indicator untouched.
    pub fn copy_selected(&mut self, clipboard: &dyn ClipboardWriter, now: Instant) -> Result<bool> {
        let Some(content) = self
            .selected_file()
            .and_then(|node| node.data.content.as_deref())
            .filter(|content| !content.is_empty())
        else {
            return Ok(false);
        };

        if let Err(e) = clipboard.write_text(content) {
            warn!("Copying file content failed: {e:#}");
            return Err(e);
        }
        self.copied.mark(now);
        Ok(true)
    }

    /// Whether the "copied" check-mark is showing at `now`
    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied.is_active(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{NestedNode, NodeKind, TreeTraversal};
    use platform::MemoryClipboard;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn files() -> TreeSnapshot<FileData> {
        TreeSnapshot::from_nested(vec![
            NestedNode::branch(
                "src",
                vec![NestedNode::leaf("main.rs")
                    .with_kind(NodeKind::Leaf)
                    .with_data(FileData::with_content("fn main() {\n    run();\n}\n").language("rust"))],
            )
            .with_kind(NodeKind::Container),
            NestedNode::branch("empty", vec![]),
            NestedNode::leaf("blank.txt"),
        ])
    }

    /// Open `src` and return `src/main.rs`
    fn reveal_main(viewer: &mut CodeViewer) -> NodeId {
        let src = viewer.tree().snapshot().find_by_path("src").unwrap();
        viewer.click(src).unwrap();
        viewer.tree().snapshot().find_by_path("src/main.rs").unwrap()
    }

    #[test]
    fn test_selecting_a_file_shows_content() {
        let mut viewer = CodeViewer::new(files());
        let main = reveal_main(&mut viewer);

        viewer.click(main).unwrap();
        assert_eq!(viewer.selected_path().as_deref(), Some("src/main.rs"));
        assert_eq!(
            viewer.numbered_lines(),
            vec![(1, "fn main() {"), (2, "    run();"), (3, "}")]
        );
        assert_eq!(viewer.selected_file().unwrap().data.language.as_deref(), Some("rust"));
    }

    #[test]
    fn test_empty_folder_is_not_displayed() {
        let mut viewer = CodeViewer::new(files());
        let empty = viewer.tree().snapshot().find_by_path("empty").unwrap();

        assert_eq!(viewer.click(empty).unwrap(), ClickOutcome::Selected);
        assert!(viewer.selected_file().is_none());
    }

    #[test]
    fn test_copy_selected_content() {
        let mut viewer = CodeViewer::new(files());
        let clipboard = MemoryClipboard::new();
        let now = Instant::now();

        assert!(!viewer.copy_selected(&clipboard, now).unwrap());

        let main = reveal_main(&mut viewer);
        viewer.click(main).unwrap();
        assert!(viewer.copy_selected(&clipboard, now).unwrap());
        assert_eq!(clipboard.contents().as_deref(), Some("fn main() {\n    run();\n}\n"));
        assert!(viewer.is_copied(now + Duration::from_secs(1)));
        assert!(!viewer.is_copied(now + Duration::from_secs(3)));
    }

    #[test]
    fn test_copy_failure_is_reported() {
        let mut viewer = CodeViewer::new(files());
        let clipboard = MemoryClipboard::new();
        clipboard.set_failing(true);
        let now = Instant::now();

        let main = reveal_main(&mut viewer);
        viewer.click(main).unwrap();
        assert!(viewer.copy_selected(&clipboard, now).is_err());
        assert!(!viewer.is_copied(now));
    }

    #[test]
    fn test_file_without_content_copies_nothing() {
        let mut viewer = CodeViewer::new(files());
        let clipboard = MemoryClipboard::new();
        let blank = viewer.tree().snapshot().find_by_path("blank.txt").unwrap();

        viewer.click(blank).unwrap();
        assert!(viewer.selected_file().is_some());
        assert!(!viewer.copy_selected(&clipboard, Instant::now()).unwrap());
        assert_eq!(clipboard.contents(), None);
    }

    #[test]
    fn test_sidebar_toggle() {
        let mut viewer = CodeViewer::new(files());
        assert!(viewer.is_sidebar_open());
        assert!(!viewer.toggle_sidebar());
        assert!(viewer.toggle_sidebar());
    }
}
