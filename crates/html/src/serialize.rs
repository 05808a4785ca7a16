//! Tree → markup.
//!
//! Output is what the tokenizer reads back into the same tree: names are the lowercased
//! parsed names, attribute values are double-quoted, and text is escaped except inside
//! `<script>`/`<style>`. `<title>`/`<textarea>` text is escaped too, since their bodies
//! decode references. Comments and raw markup are written verbatim.
use crate::entities::{escape_attr, escape_text};
use crate::tokenizer::{is_rawtext_element, is_void_element};
use crate::Node;

pub fn serialize(root: &Node) -> String {
    let mut out = String::new();
    write_node(root, &mut out);
    out
}

enum Step<'a> {
    Open(&'a Node, bool),
    Close(&'a str),
}

/// Appends the markup for `root` to `out`. Iterative so deep trees cannot exhaust the stack.
pub fn write_node(root: &Node, out: &mut String) {
    let mut stack = vec![Step::Open(root, false)];

    while let Some(step) = stack.pop() {
        let (node, in_rawtext) = match step {
            Step::Close(name) => {
                out.push_str("</");
                out.push_str(name);
                out.push('>');
                continue;
            }
            Step::Open(node, in_rawtext) => (node, in_rawtext),
        };

        match node {
            Node::Document {
                doctype, children, ..
            } => {
                if let Some(doctype) = doctype {
                    out.push_str("<!");
                    out.push_str(doctype);
                    out.push('>');
                }
                stack.extend(children.iter().rev().map(|c| Step::Open(c, false)));
            }
            Node::Element {
                name,
                attributes,
                children,
                ..
            } => {
                out.push('<');
                out.push_str(name);
                for (key, value) in attributes {
                    out.push(' ');
                    out.push_str(key);
                    if let Some(value) = value {
                        out.push_str("=\"");
                        escape_attr(value, out);
                        out.push('"');
                    }
                }
                out.push('>');
                if is_void_element(name) {
                    continue;
                }
                stack.push(Step::Close(name));
                let rawtext = is_rawtext_element(name);
                stack.extend(children.iter().rev().map(|c| Step::Open(c, rawtext)));
            }
            Node::Text { text, .. } => {
                if in_rawtext {
                    out.push_str(text);
                } else {
                    escape_text(text, out);
                }
            }
            Node::Comment { text, .. } => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            Node::Raw { text, .. } => out.push_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_document;

    fn round_trip(input: &str) -> String {
        serialize(&parse_document(input))
    }

    #[test]
    fn canonical_markup_is_reproduced_exactly() {
        let input = "<!DOCTYPE html>\n<html><head><title>T</title></head>\n<body class=\"main\">\n  <img src=\"a.png\" alt=\"\">\n  <a href=\"http://x\">L</a>Hello\n</body></html>\n";
        assert_eq!(round_trip(input), input);
    }

    #[test]
    fn entities_survive_as_escapes() {
        assert_eq!(
            round_trip("<p title=\"a &amp; b\">1 &lt; 2 &amp;&nbsp;3</p>"),
            "<p title=\"a &amp; b\">1 &lt; 2 &amp;&nbsp;3</p>"
        );
    }

    #[test]
    fn rawtext_is_written_verbatim() {
        let input = "<script>if (a < b && c) { x = \"&amp;\"; }</script><style>a > b {}</style>";
        assert_eq!(round_trip(input), input);
    }

    #[test]
    fn comments_raw_markup_and_bare_attributes_survive() {
        let input = "<?xml version=\"1.0\"?><!-- c --><input disabled><![CDATA[x]]>";
        assert_eq!(round_trip(input), input);
    }

    #[test]
    fn parser_normalization_is_a_fixed_point() {
        let messy = "<DIV Class=box data-x='1'><IMG SRC=a.png/><P>a<3</DIV></p><br/>";
        let once = round_trip(messy);
        assert_eq!(round_trip(&once), once);
        assert_eq!(once, "<div class=\"box\" data-x=\"1\"><img src=\"a.png/\"><p>a&lt;3</p></div><br>");
    }

    #[test]
    fn references_outside_the_basic_set_are_not_double_escaped() {
        assert_eq!(
            round_trip("<p title=\"caf&eacute;\">It&rsquo;s caf&eacute; &amp co</p>"),
            "<p title=\"café\">It\u{2019}s café &amp; co</p>"
        );
        let query = "<a href=\"?a=1&copy=2\">q</a>";
        assert_eq!(round_trip(query), "<a href=\"?a=1&amp;copy=2\">q</a>");
        assert_eq!(round_trip(&round_trip(query)), round_trip(query));
    }

    #[test]
    fn unquoted_value_with_trailing_slash_keeps_link_content() {
        assert_eq!(
            round_trip("<p><a href=/docs/>Docs</a> more</p>"),
            "<p><a href=\"/docs/\">Docs</a> more</p>"
        );
    }

    #[test]
    fn title_and_textarea_keep_markup_looking_text() {
        let once = round_trip("<title>a <b> c</title><textarea><p>x</textarea>");
        assert_eq!(once, "<title>a &lt;b&gt; c</title><textarea>&lt;p&gt;x</textarea>");
        assert_eq!(round_trip(&once), once);
    }

    #[test]
    fn void_elements_never_get_end_tags() {
        assert_eq!(round_trip("<br><hr/><meta charset=utf-8>"), "<br><hr><meta charset=\"utf-8\">");
    }
}
