use crate::tokenizer::{is_rawtext_element, is_rcdata_element, is_void_element};
use crate::types::{Attributes, Id, Node, Token, TokenStream};

/// Whether a start tag leaves nothing open. `/>` only counts on void elements, on
/// raw-text elements the tokenizer gave no body, and inside `<svg>`/`<math>`;
/// `<div/>` opens a `div` like a browser would.
fn closes_immediately(name: &str, self_closing: bool, in_foreign: bool) -> bool {
    is_void_element(name)
        || (self_closing && (in_foreign || is_rawtext_element(name) || is_rcdata_element(name)))
}

fn is_foreign_root(name: &str) -> bool {
    name == "svg" || name == "math"
}

/// Builds a tree from a token stream. Never fails: stray end tags are dropped and
/// elements still open at end of input are closed implicitly.
pub fn build_dom(stream: &TokenStream) -> Node {
    let atoms = stream.atoms();
    let mut arena = NodeArena::new();
    let root_index = arena.push(ArenaNode::Document {
        doctype: None,
        children: Vec::new(),
    });

    // (arena index, inside foreign content)
    let mut open_elements: Vec<(usize, bool)> = Vec::new();

    for token in stream.tokens() {
        let (parent_index, parent_foreign) = open_elements
            .last()
            .copied()
            .unwrap_or((root_index, false));
        match token {
            Token::Doctype(s) => {
                arena.set_doctype(root_index, s.clone());
            }
            Token::Comment(c) => {
                arena.add_child(parent_index, ArenaNode::Comment(c.clone()));
            }
            Token::Raw(r) => {
                arena.add_child(parent_index, ArenaNode::Raw(r.clone()));
            }
            Token::Text(txt) => {
                if !txt.is_empty() {
                    arena.add_child(parent_index, ArenaNode::Text(txt.clone()));
                }
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let attributes = attributes
                    .iter()
                    .map(|(k, v)| (atoms.resolve(*k).to_string(), v.clone()))
                    .collect();
                let name = atoms.resolve(*name);
                let in_foreign = parent_foreign || is_foreign_root(name);
                let new_index = arena.add_child(
                    parent_index,
                    ArenaNode::Element {
                        name: name.to_string(),
                        attributes,
                        children: Vec::new(),
                    },
                );
                if !closes_immediately(name, *self_closing, in_foreign) {
                    open_elements.push((new_index, in_foreign));
                }
            }
            Token::EndTag(name) => {
                let target = atoms.resolve(*name);
                // Only unwind when the element is actually open; a stray `</p>` must not
                // close everything above it.
                if let Some(pos) = open_elements
                    .iter()
                    .rposition(|&(index, _)| arena.is_element_named(index, target))
                {
                    open_elements.truncate(pos);
                } else {
                    log::trace!(target: "html.dom_builder", "ignoring stray </{target}>");
                }
            }
        }
    }

    if !open_elements.is_empty() {
        log::trace!(
            target: "html.dom_builder",
            "{} element(s) left open at end of input",
            open_elements.len()
        );
    }

    arena.into_dom(root_index)
}

#[derive(Debug)]
enum ArenaNode {
    Document {
        doctype: Option<String>,
        children: Vec<usize>,
    },
    Element {
        name: String,
        attributes: Attributes,
        children: Vec<usize>,
    },
    Text(String),
    Comment(String),
    Raw(String),
}

impl ArenaNode {
    fn children(&self) -> &[usize] {
        match self {
            ArenaNode::Document { children, .. } | ArenaNode::Element { children, .. } => {
                children
            }
            ArenaNode::Text(_) | ArenaNode::Comment(_) | ArenaNode::Raw(_) => &[],
        }
    }
}

#[derive(Debug)]
struct NodeArena {
    nodes: Vec<ArenaNode>,
}

impl NodeArena {
    fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn push(&mut self, node: ArenaNode) -> usize {
        let index = self.nodes.len();
        self.nodes.push(node);
        index
    }

    fn add_child(&mut self, parent_index: usize, child: ArenaNode) -> usize {
        let child_index = self.push(child);
        if let ArenaNode::Document { children, .. } | ArenaNode::Element { children, .. } =
            &mut self.nodes[parent_index]
        {
            children.push(child_index);
        }
        child_index
    }

    fn set_doctype(&mut self, root_index: usize, value: String) {
        if let ArenaNode::Document { doctype, .. } = &mut self.nodes[root_index] {
            // First doctype wins, later ones are dropped like a browser would.
            doctype.get_or_insert(value);
        }
    }

    fn is_element_named(&self, node_index: usize, target: &str) -> bool {
        match &self.nodes[node_index] {
            ArenaNode::Element { name, .. } => name.eq_ignore_ascii_case(target),
            _ => false,
        }
    }

    fn into_dom(self, root_index: usize) -> Node {
        let mut nodes = self.nodes;
        let mut built_nodes: Vec<Node> = Vec::with_capacity(nodes.len());

        fn take_children(n: usize, built: &mut Vec<Node>) -> Vec<Node> {
            let start = built.len().saturating_sub(n);
            built.split_off(start)
        }

        // Iterative postorder traversal over the arena so deeply nested input cannot
        // overflow the stack:
        // - First visit schedules the node again (visited=true) and pushes its children.
        // - On the second visit all descendants are built, and the direct children are the
        //   last `child_count` entries of `built_nodes`, in original order.
        let mut stack: Vec<(usize, bool)> = vec![(root_index, false)];

        while let Some((node_index, visited)) = stack.pop() {
            if !visited {
                stack.push((node_index, true));
                for &child_index in nodes[node_index].children().iter().rev() {
                    stack.push((child_index, false));
                }
                continue;
            }

            let node = match &mut nodes[node_index] {
                ArenaNode::Document { doctype, children } => Node::Document {
                    id: Id::UNSET,
                    doctype: doctype.take(),
                    children: take_children(children.len(), &mut built_nodes),
                },
                ArenaNode::Element {
                    name,
                    attributes,
                    children,
                } => Node::Element {
                    id: Id::UNSET,
                    name: std::mem::take(name),
                    attributes: std::mem::take(attributes),
                    children: take_children(children.len(), &mut built_nodes),
                },
                ArenaNode::Text(text) => Node::Text {
                    id: Id::UNSET,
                    text: std::mem::take(text),
                },
                ArenaNode::Comment(text) => Node::Comment {
                    id: Id::UNSET,
                    text: std::mem::take(text),
                },
                ArenaNode::Raw(text) => Node::Raw {
                    id: Id::UNSET,
                    text: std::mem::take(text),
                },
            };

            built_nodes.push(node);
        }

        debug_assert_eq!(built_nodes.len(), 1, "dom builder should build one root");
        built_nodes.pop().unwrap_or(Node::Document {
            id: Id::UNSET,
            doctype: None,
            children: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize;
    use crate::types::AtomTable;

    fn element_names(node: &Node, out: &mut Vec<String>) {
        if let Some(name) = node.element_name() {
            out.push(name.to_string());
        }
        for c in node.children() {
            element_names(c, out);
        }
    }

    #[test]
    fn build_dom_nests_and_closes() {
        let dom = build_dom(&tokenize("<html><body><p>a<b>b</b></p>c</body></html>"));
        let html = &dom.children()[0];
        let body = &html.children()[0];
        assert!(body.is_element_named("body"));
        assert_eq!(body.children().len(), 2);
        assert_eq!(body.children()[1].text(), Some("c"));
    }

    #[test]
    fn stray_end_tag_does_not_unwind_open_elements() {
        let dom = build_dom(&tokenize("<div><span>x</p>y</span>z</div>"));
        let div = &dom.children()[0];
        let span = &div.children()[0];
        assert_eq!(span.children().len(), 2, "got: {dom:?}");
        assert_eq!(div.children()[1].text(), Some("z"));
    }

    #[test]
    fn void_elements_never_take_children() {
        let dom = build_dom(&tokenize("<p><img src=a.png>after</p>"));
        let p = &dom.children()[0];
        assert_eq!(p.children().len(), 2);
        assert!(p.children()[0].children().is_empty());
    }

    #[test]
    fn self_closing_slash_is_ignored_on_html_elements() {
        let dom = build_dom(&tokenize("<div/><span>in div</span></div><p>after</p>"));
        let mut names = Vec::new();
        element_names(&dom, &mut names);
        assert_eq!(names, vec!["div", "span", "p"]);
        assert_eq!(dom.children().len(), 2, "got: {dom:?}");
    }

    #[test]
    fn self_closing_slash_closes_foreign_and_raw_text_elements() {
        let dom = build_dom(&tokenize(
            r#"<svg><path d="M0"/><circle/></svg><script src="x.js"/><p>x</p>"#,
        ));
        let svg = &dom.children()[0];
        assert_eq!(svg.children().len(), 2, "got: {dom:?}");
        assert!(svg.children().iter().all(|c| c.children().is_empty()));
        assert_eq!(dom.children().len(), 3);
        assert!(dom.children()[2].is_element_named("p"));
    }

    #[test]
    fn unclosed_elements_are_closed_at_end() {
        let dom = build_dom(&tokenize("<ul><li>one<li>two"));
        let mut names = Vec::new();
        element_names(&dom, &mut names);
        assert_eq!(names, vec!["ul", "li", "li"]);
    }

    #[test]
    fn first_doctype_wins() {
        let dom = build_dom(&tokenize("<!DOCTYPE html><!doctype other><p>x</p>"));
        assert!(matches!(
            &dom,
            Node::Document { doctype: Some(d), .. } if d == "DOCTYPE html"
        ));
    }

    #[test]
    fn build_dom_stress_deep_nesting() {
        let depth: usize = 10_000;
        let mut tokens = Vec::with_capacity(depth * 2);
        let mut atoms = AtomTable::new();
        let div = atoms.intern_ascii_lowercase("div");

        for _ in 0..depth {
            tokens.push(Token::StartTag {
                name: div,
                attributes: Vec::new(),
                self_closing: false,
            });
        }
        for _ in 0..depth {
            tokens.push(Token::EndTag(div));
        }

        let dom = build_dom(&TokenStream::new(tokens, atoms));

        let mut current = &dom;
        let mut seen = 0usize;
        loop {
            match current {
                Node::Document { children, .. } => {
                    assert_eq!(children.len(), 1);
                    current = &children[0];
                }
                Node::Element { name, children, .. } => {
                    assert_eq!(name, "div");
                    seen += 1;
                    if seen == depth {
                        assert!(children.is_empty());
                        break;
                    }
                    assert_eq!(children.len(), 1);
                    current = &children[0];
                }
                _ => panic!("unexpected leaf node before reaching depth"),
            }
        }
    }
}
