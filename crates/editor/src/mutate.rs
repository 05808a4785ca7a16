//! Selection-driven rewrites of the tree.
//!
//! Candidates come from the index snapshot taken before the edit, not from a fresh
//! scan. Each candidate is re-checked against the live node before it is written,
//! so a stale snapshot can miss an edit but never clobber an unrelated value.
use html::{AttrProbe, Id, Node};

use crate::config::ReplacePolicy;
use crate::document::Document;
use crate::index::DocumentIndex;

#[derive(Clone, Copy, Debug)]
enum Edit {
    Attr(AttrProbe),
    Text,
}

impl Edit {
    /// Writes `new` into `node` if it still holds `old`.
    fn apply(self, node: &mut Node, old: &str, new: &str) -> bool {
        match self {
            Edit::Attr(probe) => {
                if probe.value_of(node) != Some(old) {
                    return false;
                }
                node.set_attr(probe.attr, new)
            }
            Edit::Text => {
                if node.text().map(str::trim) != Some(old) {
                    return false;
                }
                node.set_text(new)
            }
        }
    }
}

/// Sets `src` on every image (or the first, per `policy`) whose source equals `old`.
/// `new` is trimmed and otherwise written verbatim. Returns the number of nodes changed.
pub fn replace_image_source(
    doc: &mut Document,
    index: &DocumentIndex,
    old: &str,
    new: &str,
    policy: ReplacePolicy,
) -> usize {
    let candidates = index.images().iter().map(|image| (image.node, image.src.as_str()));
    replace_matching(doc, candidates, Edit::Attr(AttrProbe::IMG_SRC), old, new, policy)
}

/// Sets `href` on matching links. Both link views route here.
pub fn replace_link_target(
    doc: &mut Document,
    index: &DocumentIndex,
    old: &str,
    new: &str,
    policy: ReplacePolicy,
) -> usize {
    let candidates = index.links().iter().map(|link| (link.node, link.href.as_str()));
    replace_matching(doc, candidates, Edit::Attr(AttrProbe::ANCHOR_HREF), old, new, policy)
}

/// Replaces the whole content of text nodes whose trimmed content equals `old`.
/// Surrounding whitespace of the original node is not kept.
pub fn replace_text_content(
    doc: &mut Document,
    index: &DocumentIndex,
    old: &str,
    new: &str,
    policy: ReplacePolicy,
) -> usize {
    let candidates = index.text_nodes().iter().map(|text| (text.node, text.text.as_str()));
    replace_matching(doc, candidates, Edit::Text, old, new, policy)
}

fn replace_matching<'a>(
    doc: &mut Document,
    candidates: impl Iterator<Item = (Id, &'a str)>,
    edit: Edit,
    old: &str,
    new: &str,
    policy: ReplacePolicy,
) -> usize {
    let new = new.trim();
    let mut replaced = 0;

    for (id, value) in candidates {
        if value != old {
            continue;
        }
        let Some(node) = doc.node_mut(id) else {
            log::warn!(target: "editor.mutate", "indexed node {id:?} is gone from the tree");
            continue;
        };
        if !edit.apply(node, old, new) {
            log::debug!(target: "editor.mutate", "node {id:?} changed since indexing; skipped");
            continue;
        }
        replaced += 1;
        if policy == ReplacePolicy::FirstMatch {
            break;
        }
    }

    if replaced > 0 {
        doc.mark_changed();
    }
    log::debug!(
        target: "editor.mutate",
        "{edit:?}: {old:?} -> {new:?} rewrote {replaced} node(s)"
    );
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(markup: &str) -> (Document, DocumentIndex) {
        let doc = Document::from_markup("t.html", markup);
        let index = DocumentIndex::rebuild(&doc);
        (doc, index)
    }

    #[test]
    fn duplicate_image_sources_are_all_rewritten() {
        let (mut doc, index) = setup(r#"<img src="a.png"><p><img src="a.png"></p><img src="c.png">"#);
        let n = replace_image_source(&mut doc, &index, "a.png", "b.png", ReplacePolicy::AllMatches);
        assert_eq!(n, 2);
        let index = DocumentIndex::rebuild(&doc);
        assert_eq!(index.image_sources(), vec!["b.png", "b.png", "c.png"]);
    }

    #[test]
    fn first_match_policy_stops_after_one() {
        let (mut doc, index) = setup("<p>same</p><p>same</p>");
        let n = replace_text_content(&mut doc, &index, "same", "changed", ReplacePolicy::FirstMatch);
        assert_eq!(n, 1);
        assert_eq!(doc.to_html(), "<p>changed</p><p>same</p>");
    }

    #[test]
    fn new_value_is_trimmed_and_written_verbatim() {
        let (mut doc, index) = setup(r#"<a href="/old">x</a>"#);
        replace_link_target(&mut doc, &index, "/old", "  not a url & more \n", ReplacePolicy::AllMatches);
        assert_eq!(doc.to_html(), r#"<a href="not a url &amp; more">x</a>"#);
    }

    #[test]
    fn text_replacement_drops_surrounding_whitespace() {
        let (mut doc, index) = setup("<p>\n   Hello   \n</p>");
        let n = replace_text_content(&mut doc, &index, "Hello", "Bye", ReplacePolicy::FirstMatch);
        assert_eq!(n, 1);
        assert_eq!(doc.to_html(), "<p>Bye</p>");
    }

    #[test]
    fn text_with_markup_characters_is_escaped_on_output() {
        let (mut doc, index) = setup("<p>plain</p>");
        replace_text_content(&mut doc, &index, "plain", "<b>not bold</b>", ReplacePolicy::FirstMatch);
        assert_eq!(doc.to_html(), "<p>&lt;b&gt;not bold&lt;/b&gt;</p>");
    }

    #[test]
    fn no_match_leaves_version_untouched() {
        let (mut doc, index) = setup(r#"<img src="a.png">"#);
        let before = doc.version();
        assert_eq!(replace_image_source(&mut doc, &index, "zzz", "b.png", ReplacePolicy::AllMatches), 0);
        assert_eq!(doc.version(), before);
        assert!(index.is_current(&doc));
    }

    #[test]
    fn stale_snapshot_does_not_overwrite_changed_nodes() {
        let (mut doc, stale) = setup(r#"<img src="a.png"><img src="a.png">"#);
        replace_image_source(&mut doc, &stale, "a.png", "b.png", ReplacePolicy::FirstMatch);
        assert!(!stale.is_current(&doc));

        // The first image now holds b.png; only the second still matches.
        let n = replace_image_source(&mut doc, &stale, "a.png", "c.png", ReplacePolicy::AllMatches);
        assert_eq!(n, 1);
        assert_eq!(DocumentIndex::rebuild(&doc).image_sources(), vec!["b.png", "c.png"]);
    }

    #[test]
    fn link_edit_only_touches_anchor_href() {
        let (mut doc, index) = setup(r#"<link href="/x"><a href="/x">x</a>"#);
        replace_link_target(&mut doc, &index, "/x", "/y", ReplacePolicy::AllMatches);
        assert_eq!(doc.to_html(), r#"<link href="/x"><a href="/y">x</a>"#);
    }
}
