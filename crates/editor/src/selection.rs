use std::path::{Path, PathBuf};

use crate::index::LinkView;

/// A list a value can be picked from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Image,
    LinkHref,
    LinkUrl,
    Text,
}

impl From<LinkView> for ViewKind {
    fn from(view: LinkView) -> Self {
        match view {
            LinkView::Href => ViewKind::LinkHref,
            LinkView::Url => ViewKind::LinkUrl,
        }
    }
}

/// The loaded file path plus at most one picked value per view.
///
/// Values are stored exactly as displayed; they are what the next replace looks for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    file_path: Option<PathBuf>,
    image: Option<String>,
    link_href: Option<String>,
    link_url: Option<String>,
    text: Option<String>,
    last: Option<ViewKind>,
}

impl SelectionState {
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn set_file_path(&mut self, path: impl Into<PathBuf>) {
        self.file_path = Some(path.into());
    }

    pub fn select(&mut self, kind: ViewKind, value: impl Into<String>) {
        *self.slot_mut(kind) = Some(value.into());
        self.last = Some(kind);
    }

    pub fn selected(&self, kind: ViewKind) -> Option<&str> {
        match kind {
            ViewKind::Image => self.image.as_deref(),
            ViewKind::LinkHref => self.link_href.as_deref(),
            ViewKind::LinkUrl => self.link_url.as_deref(),
            ViewKind::Text => self.text.as_deref(),
        }
    }

    /// The most recent pick across all views.
    pub fn last_selected(&self) -> Option<(ViewKind, &str)> {
        let kind = self.last?;
        self.selected(kind).map(|value| (kind, value))
    }

    /// Drops every picked value. The file path is kept.
    pub fn clear_selections(&mut self) {
        self.image = None;
        self.link_href = None;
        self.link_url = None;
        self.text = None;
        self.last = None;
    }

    fn slot_mut(&mut self, kind: ViewKind) -> &mut Option<String> {
        match kind {
            ViewKind::Image => &mut self.image,
            ViewKind::LinkHref => &mut self.link_href,
            ViewKind::LinkUrl => &mut self.link_url,
            ViewKind::Text => &mut self.text,
        }
    }
}
