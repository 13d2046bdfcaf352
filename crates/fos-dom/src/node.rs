//! DOM Node
//!
//! Nodes are stored in the `DomTree` arena and linked by `NodeId`
//! (4 bytes) rather than pointers. A missing link is `NodeId::NONE`.

use crate::{AttributeMap, ElementStyle, NodeId, ShadowRootData};

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE for roots: the document, shadow roots, detached nodes)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self::with_data(NodeData::Text(TextData {
            content: content.to_string(),
        }))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Create a shadow root node
    pub fn shadow_root(data: ShadowRootData) -> Self {
        Self::with_data(NodeData::ShadowRoot(data))
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    #[inline]
    pub fn is_shadow_root(&self) -> bool {
        matches!(self.data, NodeData::ShadowRoot(_))
    }

    /// Whether this node may have children
    #[inline]
    pub fn is_container(&self) -> bool {
        !self.is_text()
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }

    #[inline]
    pub fn as_shadow_root(&self) -> Option<&ShadowRootData> {
        match &self.data {
            NodeData::ShadowRoot(s) => Some(s),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(TextData),
    /// Root of an encapsulated tree attached to a host element
    ShadowRoot(ShadowRootData),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Lowercased tag name
    pub tag: String,
    pub attrs: AttributeMap,
    /// Inline computed style
    pub style: ElementStyle,
    /// Attached shadow root, if any
    pub shadow_root: Option<NodeId>,
    /// Reflected ARIA element references keyed by attribute name
    reflected: Vec<(String, Vec<NodeId>)>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: AttributeMap::new(),
            style: ElementStyle::default(),
            shadow_root: None,
            reflected: Vec::new(),
        }
    }

    /// Reflected element list for an ARIA relationship attribute
    pub fn reflected(&self, attribute: &str) -> Option<&[NodeId]> {
        self.reflected
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, nodes)| nodes.as_slice())
    }

    pub(crate) fn set_reflected(&mut self, attribute: &str, nodes: Vec<NodeId>) {
        match self.reflected.iter_mut().find(|(name, _)| name == attribute) {
            Some((_, existing)) => *existing = nodes,
            None => self.reflected.push((attribute.to_string(), nodes)),
        }
    }
}

/// Text node data
#[derive(Debug)]
pub struct TextData {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kinds() {
        let el = Node::element("DIV");
        assert!(el.is_element());
        assert_eq!(el.as_element().map(|e| e.tag.as_str()), Some("div"));
        assert!(!el.parent.is_valid());

        let text = Node::text("hi");
        assert!(text.is_text());
        assert!(!text.is_container());
        assert_eq!(text.as_text(), Some("hi"));
    }

    #[test]
    fn test_reflected_overwrite() {
        let mut el = ElementData::new("input");
        assert!(el.reflected("aria-labelledby").is_none());

        el.set_reflected("aria-labelledby", vec![NodeId(3), NodeId(4)]);
        el.set_reflected("aria-labelledby", vec![NodeId(5)]);
        assert_eq!(el.reflected("aria-labelledby"), Some(&[NodeId(5)][..]));
    }
}
