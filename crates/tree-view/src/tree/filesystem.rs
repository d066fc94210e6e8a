//! Building file-tree snapshots from a directory on disk

use anyhow::{anyhow, Context, Result};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use crate::tree::{Node, NodeId, NodeKind, Tree, TreeSnapshot};

/// Payload carried by file-tree nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileData {
    /// File size in bytes (0 for directories)
    #[serde(default)]
    pub size: u64,
    /// Text content shown by the code viewer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Language label for the content (e.g. "rust")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl FileData {
    /// File data holding text content
    pub fn with_content(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            size: content.len() as u64,
            content: Some(content),
            language: None,
        }
    }

    /// Set the language label
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

impl std::fmt::Display for FileData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} bytes", self.size)
    }
}

/// Options for [`load_directory`]
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Read file contents into [`FileData::content`]
    pub read_contents: bool,
    /// Skip reading files larger than this many bytes
    pub max_content_size: u64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            read_contents: false,
            max_content_size: 256 * 1024,
        }
    }
}

/// Guess a language label from a file name's extension
pub fn language_for(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    let language = match ext.as_str() {
        "rs" => "rust",
        "ts" | "tsx" => "typescript",
        "js" | "jsx" | "mjs" => "javascript",
        "json" => "json",
        "toml" => "toml",
        "yaml" | "yml" => "yaml",
        "md" => "markdown",
        "py" => "python",
        "go" => "go",
        "css" => "css",
        "html" => "html",
        "sql" => "sql",
        "sh" => "bash",
        "txt" => "text",
        _ => return None,
    };
    Some(language)
}

/// Load a directory and everything below it into a snapshot
///
/// The directory itself becomes the single top-level node. Children are
/// ordered folders first, then files, alphabetically within each group.
///
/// # Errors
///
/// Returns an error if the path isn't a readable directory.
pub fn load_directory(path: impl AsRef<Path>, options: LoadOptions) -> Result<TreeSnapshot<FileData>> {
    let path = path.as_ref();
    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to read metadata for {}", path.display()))?;
    if !metadata.is_dir() {
        return Err(anyhow!("{} is not a directory", path.display()));
    }

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("root")
        .to_string();

    let mut tree = TreeSnapshot::new();
    let root = tree.add_root(Node::container(name, FileData::default()));
    load_children(&mut tree, root, path, &options)?;

    debug!("Loaded {} nodes from {}", tree.node_count(), path.display());
    Ok(tree)
}

fn load_children(
    tree: &mut TreeSnapshot<FileData>,
    parent: NodeId,
    path: &Path,
    options: &LoadOptions,
) -> Result<()> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(path).with_context(|| format!("Failed to list {}", path.display()))? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        let kind = if metadata.is_dir() {
            NodeKind::Container
        } else {
            NodeKind::Leaf
        };
        entries.push((entry.file_name().to_string_lossy().to_string(), kind, entry.path(), metadata.len()));
    }

    // Folders first, then files, alphabetically within each group
    entries.sort_by(|a, b| match (a.1, b.1) {
        (NodeKind::Container, NodeKind::Leaf) => Ordering::Less,
        (NodeKind::Leaf, NodeKind::Container) => Ordering::Greater,
        _ => a.0.cmp(&b.0),
    });

    for (name, kind, entry_path, size) in entries {
        match kind {
            NodeKind::Container => {
                let id = tree.add_child(parent, Node::container(name, FileData::default()))?;
                load_children(tree, id, &entry_path, options)?;
            }
            NodeKind::Leaf => {
                let content = if options.read_contents && size <= options.max_content_size {
                    // Binary or unreadable files simply have no content
                    fs::read_to_string(&entry_path).ok()
                } else {
                    None
                };
                trace!("{} ({} bytes, content: {})", entry_path.display(), size, content.is_some());
                let data = FileData {
                    size,
                    content,
                    language: language_for(&name).map(str::to_string),
                };
                tree.add_child(parent, Node::leaf(name, data))?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeTraversal;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/views")).unwrap();
        fs::write(dir.path().join("src/main.rs"), "fn main() {}\n").unwrap();
        fs::write(dir.path().join("src/views/mod.rs"), "").unwrap();
        fs::write(dir.path().join("README.md"), "# readme\n").unwrap();
        fs::write(dir.path().join("Cargo.toml"), "[package]\n").unwrap();
        dir
    }

    #[test]
    fn test_load_directory_orders_folders_first() {
        let dir = fixture();
        let tree = load_directory(dir.path(), LoadOptions::default()).unwrap();

        let root = tree.roots().next().unwrap();
        let children: Vec<_> = tree
            .children(root)
            .filter_map(|id| tree.name(id))
            .collect();
        assert_eq!(children, vec!["src", "Cargo.toml", "README.md"]);

        let main = tree.find_by_name("main.rs").unwrap();
        let data = &tree.get(main).unwrap().data;
        assert_eq!(data.size, 13);
        assert_eq!(data.content, None);
        assert_eq!(data.language.as_deref(), Some("rust"));
    }

    #[test]
    fn test_load_directory_reads_contents() {
        let dir = fixture();
        let options = LoadOptions {
            read_contents: true,
            ..LoadOptions::default()
        };
        let tree = load_directory(dir.path(), options).unwrap();

        let readme = tree.find_by_name("README.md").unwrap();
        assert_eq!(tree.get(readme).unwrap().data.content.as_deref(), Some("# readme\n"));
        assert_eq!(tree.leaves().len(), 4);
        assert_eq!(tree.containers().len(), 3);
    }

    #[test]
    fn test_load_directory_rejects_files() {
        let dir = fixture();
        assert!(load_directory(dir.path().join("README.md"), LoadOptions::default()).is_err());
        assert!(load_directory(dir.path().join("missing"), LoadOptions::default()).is_err());
    }

    #[test]
    fn test_language_for() {
        assert_eq!(language_for("lib.rs"), Some("rust"));
        assert_eq!(language_for("App.TSX"), Some("typescript"));
        assert_eq!(language_for("Makefile"), None);
    }
}
