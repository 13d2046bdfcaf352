//! Shadow DOM
//!
//! Shadow roots and named slot assignment.
//!
//! A shadow root is an arena node with no parent; its `host` link is the
//! only way back out. Parent walks therefore stop at tree-scope
//! boundaries, and crossing them is explicit (`parent_or_host`).

use crate::{DomError, DomTree, Node, NodeData, NodeId, Result};

/// Shadow root mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowRootMode {
    #[default]
    Open,
    Closed,
}

/// Shadow root initialization options
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadowRootInit {
    pub mode: ShadowRootMode,
    pub delegates_focus: bool,
    /// Polyfilled encapsulation rather than engine-native shadow DOM
    pub synthetic: bool,
}

impl ShadowRootInit {
    pub fn open() -> Self {
        Self::default()
    }

    pub fn synthetic() -> Self {
        Self {
            synthetic: true,
            ..Self::default()
        }
    }
}

/// Shadow root node data
#[derive(Debug, Clone)]
pub struct ShadowRootData {
    /// Host element
    pub host: NodeId,
    pub mode: ShadowRootMode,
    pub delegates_focus: bool,
    pub synthetic: bool,
}

impl ShadowRootData {
    pub fn new(host: NodeId, init: ShadowRootInit) -> Self {
        Self {
            host,
            mode: init.mode,
            delegates_focus: init.delegates_focus,
            synthetic: init.synthetic,
        }
    }
}

impl DomTree {
    /// Attach a shadow root to `host`
    pub fn attach_shadow(&mut self, host: NodeId, init: ShadowRootInit) -> Result<NodeId> {
        if self.element(host)?.shadow_root.is_some() {
            return Err(DomError::ShadowAlreadyAttached(host));
        }
        let root = self.push(Node::shadow_root(ShadowRootData::new(host, init)));
        self.element_mut(host)?.shadow_root = Some(root);
        tracing::trace!("attached shadow root {} to {}", root, host);
        Ok(root)
    }

    /// Shadow root attached to `host`
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.get(host)?.as_element()?.shadow_root
    }

    /// Shadow root data for a shadow root node
    pub fn shadow_data(&self, root: NodeId) -> Option<&ShadowRootData> {
        self.get(root)?.as_shadow_root()
    }

    /// Host of a shadow root node
    pub fn shadow_host(&self, root: NodeId) -> Option<NodeId> {
        self.shadow_data(root).map(|data| data.host)
    }

    /// Check if node is a `<slot>` element
    pub fn is_slot(&self, node: NodeId) -> bool {
        self.tag_name(node) == Some("slot")
    }

    /// Slot name a light child asks for (`None` if it can't be slotted)
    fn requested_slot(&self, node: NodeId) -> Option<&str> {
        match &self.get(node)?.data {
            NodeData::Element(e) => Some(e.attrs.get("slot").unwrap_or("")),
            NodeData::Text(_) => Some(""),
            _ => None,
        }
    }

    /// Nodes assigned to a slot element
    ///
    /// Named assignment: light children of the host whose `slot` attribute
    /// equals the slot's `name`. Only the first slot with a given name in
    /// the shadow tree receives nodes.
    pub fn assigned_nodes(&self, slot: NodeId) -> Vec<NodeId> {
        if !self.is_slot(slot) {
            return Vec::new();
        }
        let scope = self.root_node(slot);
        let Some(host) = self.shadow_host(scope) else {
            return Vec::new();
        };
        let name = self.attribute(slot, "name").unwrap_or("");
        let first = self
            .descendants(scope)
            .find(|&n| self.is_slot(n) && self.attribute(n, "name").unwrap_or("") == name);
        if first != Some(slot) {
            return Vec::new();
        }
        self.children(host)
            .filter(|&child| self.requested_slot(child) == Some(name))
            .collect()
    }
}
