//! Focus Management
//!
//! Focusability, tab order and the document's focused node.

use crate::{Document, DomTree, NodeId, ShadowTraversal};

/// Parsed tab index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    /// Negative: focusable by script, skipped by sequential navigation
    Programmatic,
    /// Zero or positive
    Sequential(i32),
}

impl TabIndex {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().parse::<i32>() {
            Ok(n) if n < 0 => Some(Self::Programmatic),
            Ok(n) => Some(Self::Sequential(n)),
            Err(_) => None,
        }
    }

    pub fn is_tabbable(self) -> bool {
        matches!(self, Self::Sequential(_))
    }
}

fn is_form_control(tag: &str) -> bool {
    matches!(tag, "button" | "input" | "select" | "textarea")
}

impl DomTree {
    /// Effective tab index; `None` when the node cannot take focus
    pub fn tab_index(&self, node: NodeId) -> Option<TabIndex> {
        let element = self.get(node)?.as_element()?;
        let tag = element.tag.as_str();
        if is_form_control(tag) && element.attrs.has("disabled") {
            return None;
        }
        if let Some(index) = element.attrs.get("tabindex").and_then(TabIndex::parse) {
            return Some(index);
        }
        let native = match tag {
            "input" => element.attrs.get("type") != Some("hidden"),
            "a" | "area" => element.attrs.has("href"),
            other => is_form_control(other),
        };
        native.then_some(TabIndex::Sequential(0))
    }

    pub fn is_focusable(&self, node: NodeId) -> bool {
        self.tab_index(node).is_some()
    }

    pub fn is_tabbable(&self, node: NodeId) -> bool {
        self.tab_index(node).is_some_and(TabIndex::is_tabbable)
    }
}

impl Document {
    /// Move focus to `node`; false if it is detached, hidden or not focusable
    pub fn focus(&mut self, node: NodeId) -> bool {
        if !self.tree.is_connected(node) || !self.tree.is_focusable(node) || !self.is_visible(node) {
            return false;
        }
        tracing::trace!("focus -> {}", node);
        self.focused = Some(node);
        true
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Focused node, if it is still connected
    pub fn focused(&self) -> Option<NodeId> {
        self.focused.filter(|&n| self.tree.is_connected(n))
    }

    /// Focused node retargeted to `scope` (the document node or a shadow
    /// root): the node itself when it lives in `scope`, else the host in
    /// `scope` through which it is reached
    pub fn active_element(&self, scope: NodeId) -> Option<NodeId> {
        let mut node = self.focused()?;
        loop {
            let root = self.tree.root_node(node);
            if root == scope {
                return Some(node);
            }
            node = self.tree.shadow_host(root)?;
        }
    }

    /// First rendered, visible, tabbable descendant of `root`
    pub fn first_tabbable(&self, root: NodeId) -> Option<NodeId> {
        self.composed_descendants(root)
            .into_iter()
            .find(|&n| self.tree.is_tabbable(n) && self.is_visible(n))
    }
}
