//! Flat views over the current tree: image sources, link targets and text nodes.
use html::{AttrProbe, Id, collect_attr_values, collect_text_nodes};

use crate::document::{DocVersion, Document};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRef {
    pub node: Id,
    pub src: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkRef {
    pub node: Id,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextNodeRef {
    pub node: Id,
    /// Trimmed content; never empty.
    pub text: String,
}

/// The two places a link target is shown. Both read and write the same `href`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkView {
    Href,
    Url,
}

/// Snapshot of the three views, tagged with the document version it was built from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentIndex {
    version: Option<DocVersion>,
    images: Vec<ImageRef>,
    links: Vec<LinkRef>,
    texts: Vec<TextNodeRef>,
}

impl DocumentIndex {
    /// Full scan in document order. Nothing from a previous index is reused.
    pub fn rebuild(doc: &Document) -> Self {
        let root = doc.root();

        let mut found = Vec::new();
        collect_attr_values(root, AttrProbe::IMG_SRC, &mut found);
        let images: Vec<ImageRef> = found
            .drain(..)
            .map(|(node, src)| ImageRef { node, src })
            .collect();

        collect_attr_values(root, AttrProbe::ANCHOR_HREF, &mut found);
        let links: Vec<LinkRef> = found
            .drain(..)
            .map(|(node, href)| LinkRef { node, href })
            .collect();

        collect_text_nodes(root, &mut found);
        let texts: Vec<TextNodeRef> = found
            .into_iter()
            .map(|(node, text)| TextNodeRef { node, text })
            .collect();

        log::debug!(
            target: "editor.index",
            "rebuilt index for {}: {} images, {} links, {} text nodes",
            doc.path().display(),
            images.len(),
            links.len(),
            texts.len()
        );

        Self {
            version: Some(doc.version()),
            images,
            links,
            texts,
        }
    }

    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    pub fn links(&self) -> &[LinkRef] {
        &self.links
    }

    pub fn text_nodes(&self) -> &[TextNodeRef] {
        &self.texts
    }

    pub fn image_sources(&self) -> Vec<&str> {
        self.images.iter().map(|image| image.src.as_str()).collect()
    }

    /// Link targets as shown in `view`. Both views list the same elements.
    pub fn link_targets(&self, _view: LinkView) -> Vec<&str> {
        self.links.iter().map(|link| link.href.as_str()).collect()
    }

    pub fn text_contents(&self) -> Vec<&str> {
        self.texts.iter().map(|text| text.text.as_str()).collect()
    }

    /// Whether this snapshot was built from `doc` as it is now.
    pub fn is_current(&self, doc: &Document) -> bool {
        self.version == Some(doc.version())
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.links.is_empty() && self.texts.is_empty()
    }
}
