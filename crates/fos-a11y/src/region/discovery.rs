//! Region discovery
//!
//! Walks the composed tree from `<body>` collecting marked regions in
//! document order. A valid region is collected as a whole; nothing inside
//! it is searched. Children of a marked element are never regions.

use fos_dom::{Document, NodeId, ShadowTraversal};

enum Verdict {
    Accept,
    Reject,
    Skip,
}

fn verdict(doc: &Document, node: NodeId, marker: &str) -> Verdict {
    if doc
        .tree
        .parent(node)
        .is_some_and(|parent| doc.tree.has_attribute(parent, marker))
    {
        return Verdict::Reject;
    }
    if is_region(doc, node, marker) {
        Verdict::Accept
    } else {
        Verdict::Skip
    }
}

/// Marked regions under `<body>`, in document order
pub fn populate_regions(doc: &Document, marker: &str) -> Vec<NodeId> {
    let mut regions = Vec::new();
    walk(doc, doc.body(), marker, &mut regions);
    tracing::trace!("found {} regions marked {:?}", regions.len(), marker);
    regions
}

fn walk(doc: &Document, scope: NodeId, marker: &str, out: &mut Vec<NodeId>) {
    for child in doc.tree.children(scope) {
        if !doc.tree.is_element(child) {
            continue;
        }
        match verdict(doc, child, marker) {
            Verdict::Accept => out.push(child),
            Verdict::Reject => {}
            Verdict::Skip => {
                if let Some(root) = doc.nested_root(child) {
                    walk(doc, root, marker, out);
                }
                walk(doc, child, marker, out);
            }
        }
    }
}

/// Marked, visible and rendering something
pub fn is_region(doc: &Document, node: NodeId, marker: &str) -> bool {
    doc.tree.has_attribute(node, marker) && doc.is_visible(node) && !is_empty(doc, node)
}

/// Whether `node` renders no content
///
/// Whitespace-only text is ignored. Slots are judged by what is assigned
/// to them, and an element without light children by its own shadow
/// root's children.
pub fn is_empty(doc: &Document, node: NodeId) -> bool {
    if let Some(text) = doc.tree.text(node) {
        return text.trim().is_empty();
    }
    if let Some(assigned) = doc.assigned_content(node) {
        return assigned.iter().all(|&n| is_empty(doc, n));
    }
    let mut children = doc.child_nodes(node);
    if children.is_empty() {
        if let Some(root) = doc.nested_root(node) {
            children = doc.child_nodes(root);
        }
    }
    children.iter().all(|&child| is_ignorable(doc, child))
}

fn is_ignorable(doc: &Document, child: NodeId) -> bool {
    match doc.tree.text(child) {
        Some(text) => text.trim().is_empty(),
        None => doc.tree.is_slot(child) && is_empty(doc, child),
    }
}
