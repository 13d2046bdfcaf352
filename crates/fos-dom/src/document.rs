//! Document - High-level document API

use crate::{DomTree, EventKind, ListenerId, ListenerRegistry, NodeId, ShadowTraversal};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    /// Node holding focus
    pub(crate) focused: Option<NodeId>,
    /// Engine supports assigning element lists to ARIA relationship properties
    element_reflection: bool,
    listeners: ListenerRegistry,
}

impl Document {
    /// Create a document with `<html><head/><body/></html>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");
        tree.link(tree.root(), html, NodeId::NONE);
        tree.link(html, head, NodeId::NONE);
        tree.link(html, body, NodeId::NONE);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
            focused: None,
            element_reflection: false,
            listeners: ListenerRegistry::new(),
        }
    }

    /// Toggle native ARIA element reflection support
    pub fn with_element_reflection(mut self, supported: bool) -> Self {
        self.element_reflection = supported;
        self
    }

    pub fn supports_element_reflection(&self) -> bool {
        self.element_reflection
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get element by ID in the document tree scope
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.get_element_by_id_in(self.tree.root(), id)
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    // --- Listeners ---

    pub fn add_event_listener(&mut self, kind: EventKind) -> ListenerId {
        self.listeners.add(kind)
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.count(kind)
    }

    /// Walk up the composed ancestor chain checking display/visibility;
    /// reaching `<body>` means visible
    pub fn is_visible(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == self.body_element {
                return true;
            }
            if self.tree.style(n).is_hidden() {
                return false;
            }
            current = self.parent_or_host(n);
        }
        true
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ShadowRootInit, Visibility};

    #[test]
    fn test_document_structure() {
        let doc = Document::new("https://example.test/");
        assert_eq!(doc.url(), "https://example.test/");
        assert_eq!(doc.tree.parent(doc.body()), Some(doc.document_element()));
        assert_eq!(doc.tree.parent(doc.head()), Some(doc.document_element()));
        assert!(doc.tree.is_connected(doc.body()));
        assert!(!doc.supports_element_reflection());
    }

    #[test]
    fn test_visibility_crosses_shadow_boundary() {
        let mut doc = Document::default();
        let host = doc.tree.create_element("x-host");
        doc.tree.append_child(doc.body(), host).unwrap();
        let shadow = doc.tree.attach_shadow(host, ShadowRootInit::open()).unwrap();
        let inner = doc.tree.create_element("div");
        doc.tree.append_child(shadow, inner).unwrap();

        assert!(doc.is_visible(inner));
        doc.tree.set_visibility(host, Visibility::Hidden).unwrap();
        assert!(!doc.is_visible(inner));
    }

    #[test]
    fn test_body_stops_the_walk() {
        let mut doc = Document::default();
        doc.tree
            .set_display(doc.document_element(), crate::Display::None)
            .unwrap();
        assert!(doc.is_visible(doc.body()));
    }
}
