use std::path::{Path, PathBuf};

use html::{Id, Node, find_node_by_id, find_node_by_id_mut, parse_document, serialize};

/// Monotonic edit counter of one [`Document`]. An index built at an older
/// version may hold values that no longer match the tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocVersion(u64);

/// The single parsed tree being edited, plus the file it came from.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    root: Node,
    version: DocVersion,
}

impl Document {
    pub fn from_markup(path: impl Into<PathBuf>, markup: &str) -> Self {
        Self {
            path: path.into(),
            root: parse_document(markup),
            version: DocVersion::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn version(&self) -> DocVersion {
        self.version
    }

    pub fn node(&self, id: Id) -> Option<&Node> {
        find_node_by_id(&self.root, id)
    }

    /// Mutable access to one node. Callers that change the node must follow up
    /// with [`Document::mark_changed`].
    pub(crate) fn node_mut(&mut self, id: Id) -> Option<&mut Node> {
        find_node_by_id_mut(&mut self.root, id)
    }

    pub(crate) fn mark_changed(&mut self) {
        self.version.0 = self.version.0.wrapping_add(1);
    }

    /// Current tree as markup. Does not touch the tree.
    pub fn to_html(&self) -> String {
        serialize(&self.root)
    }
}
