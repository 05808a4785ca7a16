use crate::traverse::walk_preorder;
use crate::{Id, Node};

/// Capability probe: "an element named `tag` that carries attribute `attr`".
///
/// Image and link lookups are the same probe with different names, so both go through
/// one code path instead of per-element-type branches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttrProbe {
    pub tag: &'static str,
    pub attr: &'static str,
}

impl AttrProbe {
    pub const IMG_SRC: AttrProbe = AttrProbe {
        tag: "img",
        attr: "src",
    };
    pub const ANCHOR_HREF: AttrProbe = AttrProbe {
        tag: "a",
        attr: "href",
    };

    /// The probed attribute value, if `node` matches and the value is non-empty.
    pub fn value_of<'a>(&self, node: &'a Node) -> Option<&'a str> {
        if !node.is_element_named(self.tag) {
            return None;
        }
        node.attr(self.attr).filter(|value| !value.is_empty())
    }
}

/// Collect `(id, value)` for every element matching `probe`, in document order.
pub fn collect_attr_values(root: &Node, probe: AttrProbe, out: &mut Vec<(Id, String)>) {
    walk_preorder(root, |node, _| {
        if let Some(value) = probe.value_of(node) {
            out.push((node.id(), value.to_string()));
        }
    });
}

/// Collect `(id, trimmed text)` for every text node whose trimmed content is non-empty.
/// Text inside `<script>` and `<style>` is included; comments are not text nodes.
pub fn collect_text_nodes(root: &Node, out: &mut Vec<(Id, String)>) {
    walk_preorder(root, |node, _| {
        if let Some(text) = node.text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                out.push((node.id(), trimmed.to_string()));
            }
        }
    });
}
