//! Markup parsing and serialization for the editor.
//!
//! `parse_document` turns any text into a tree (it never fails), `serialize` turns the
//! tree back into markup, and `collect`/`traverse` give identity-based access to the
//! nodes in between.
pub mod collect;
pub mod serialize;
pub mod traverse;

mod dom_builder;
mod entities;
mod tokenizer;
mod types;

pub use crate::collect::{AttrProbe, collect_attr_values, collect_text_nodes};
pub use crate::dom_builder::build_dom;
pub use crate::serialize::serialize;
pub use crate::tokenizer::tokenize;
pub use crate::traverse::{assign_node_ids, find_node_by_id, find_node_by_id_mut};
pub use crate::types::{AtomId, AtomTable, Attributes, Id, Node, NodeId, Token, TokenStream};

/// Tokenize, build and number a document. Malformed input yields a best-effort tree.
pub fn parse_document(input: &str) -> Node {
    let stream = tokenize(input);
    let mut root = build_dom(&stream);
    assign_node_ids(&mut root);
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_document_numbers_root_first() {
        let dom = parse_document("<p>x</p>");
        assert_eq!(dom.id(), Id(1));
        assert_eq!(dom.children()[0].id(), Id(2));
    }
}
