use std::path::{Path, PathBuf};

use crate::config::EditorConfig;
use crate::document::Document;
use crate::error::{EditorError, EditorResult};
use crate::index::{DocumentIndex, LinkView};
use crate::mutate::{replace_image_source, replace_link_target, replace_text_content};
use crate::persist;
use crate::search::search;
use crate::selection::{SelectionState, ViewKind};

/// One editing session: at most one open document, its views, the current picks
/// and the search state.
///
/// Every successful open or replace rebuilds the index from scratch, clears the
/// picks and reruns the current search query.
#[derive(Debug, Default)]
pub struct EditorSession {
    config: EditorConfig,
    document: Option<Document>,
    index: DocumentIndex,
    selection: SelectionState,
    query: String,
    results: Vec<String>,
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Loads `path`, replacing the current document. On failure nothing changes.
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> EditorResult<()> {
        let path = path.as_ref();
        let doc = persist::load(path)?;
        self.selection.set_file_path(path);
        self.document = Some(doc);
        self.refresh();
        Ok(())
    }

    pub fn select_image(&mut self, value: impl Into<String>) {
        self.selection.select(ViewKind::Image, value);
    }

    pub fn select_link(&mut self, view: LinkView, value: impl Into<String>) {
        self.selection.select(view.into(), value);
    }

    pub fn select_text(&mut self, value: impl Into<String>) {
        self.selection.select(ViewKind::Text, value);
    }

    /// Rewrites the selected image source. Returns the number of nodes changed;
    /// `0` with nothing selected.
    pub fn replace_image(&mut self, new_value: &str) -> usize {
        let policy = self.config.replace.images;
        self.replace_selected(ViewKind::Image, |doc, index, old| {
            replace_image_source(doc, index, old, new_value, policy)
        })
    }

    pub fn replace_link(&mut self, view: LinkView, new_value: &str) -> usize {
        let policy = self.config.replace.links;
        self.replace_selected(view.into(), |doc, index, old| {
            replace_link_target(doc, index, old, new_value, policy)
        })
    }

    pub fn replace_text(&mut self, new_value: &str) -> usize {
        let policy = self.config.replace.text;
        self.replace_selected(ViewKind::Text, |doc, index, old| {
            replace_text_content(doc, index, old, new_value, policy)
        })
    }

    fn replace_selected(
        &mut self,
        kind: ViewKind,
        apply: impl FnOnce(&mut Document, &DocumentIndex, &str) -> usize,
    ) -> usize {
        let Some(old) = self.selection.selected(kind).map(str::to_owned) else {
            log::debug!(target: "editor.session", "replace {kind:?} with nothing selected");
            return 0;
        };
        let Some(doc) = self.document.as_mut() else {
            log::debug!(target: "editor.session", "replace {kind:?} with no document");
            return 0;
        };
        let replaced = apply(doc, &self.index, &old);
        self.refresh();
        replaced
    }

    /// Updates the query and recomputes the results.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.results = search(self.index.text_nodes(), &self.query);
    }

    /// Writes the current tree back to the file it was loaded from.
    pub fn overwrite_file(&mut self) -> EditorResult<PathBuf> {
        let doc = self.document.as_ref().ok_or(EditorError::NoDocument)?;
        let path = doc.path().to_path_buf();
        persist::save(doc, &path, &self.config.save)?;
        Ok(path)
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn index(&self) -> &DocumentIndex {
        &self.index
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.selection.file_path()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn image_sources(&self) -> Vec<&str> {
        self.index.image_sources()
    }

    pub fn link_targets(&self, view: LinkView) -> Vec<&str> {
        self.index.link_targets(view)
    }

    pub fn text_contents(&self) -> Vec<&str> {
        self.index.text_contents()
    }

    pub fn search_query(&self) -> &str {
        &self.query
    }

    pub fn search_results(&self) -> &[String] {
        &self.results
    }

    fn refresh(&mut self) {
        self.index = match &self.document {
            Some(doc) => DocumentIndex::rebuild(doc),
            None => DocumentIndex::default(),
        };
        self.selection.clear_selections();
        self.results = search(self.index.text_nodes(), &self.query);
    }
}
