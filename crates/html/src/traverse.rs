use crate::{Id, Node};

/// Numbers every node in document order, starting at 1 for the root.
/// Existing ids are overwritten so a freshly parsed tree always gets dense ids.
pub fn assign_node_ids(root: &mut Node) {
    let mut next: u32 = 1;
    let mut stack: Vec<&mut Node> = vec![root];
    while let Some(node) = stack.pop() {
        node.set_id(Id(next));
        next = next.wrapping_add(1);
        if let Some(children) = node.children_mut() {
            // Reverse so children are numbered in document order.
            stack.extend(children.iter_mut().rev());
        }
    }
}

/// Visits every node in document order (pre-order). The callback also receives the
/// nearest enclosing element name, which raw-text consumers need.
pub fn walk_preorder<'a>(root: &'a Node, mut visit: impl FnMut(&'a Node, Option<&'a str>)) {
    let mut stack: Vec<(&'a Node, Option<&'a str>)> = vec![(root, None)];
    while let Some((node, parent_name)) = stack.pop() {
        visit(node, parent_name);
        let scope = node.element_name().or(parent_name);
        for child in node.children().iter().rev() {
            stack.push((child, scope));
        }
    }
}

pub fn find_node_by_id(node: &Node, id: Id) -> Option<&Node> {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if current.id() == id {
            return Some(current);
        }
        stack.extend(current.children().iter().rev());
    }
    None
}

pub fn find_node_by_id_mut(node: &mut Node, id: Id) -> Option<&mut Node> {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if current.id() == id {
            return Some(current);
        }
        if let Some(children) = current.children_mut() {
            stack.extend(children.iter_mut().rev());
        }
    }
    None
}
