//! Composed-tree traversal
//!
//! One traversal primitive for everything that has to look through
//! shadow boundaries: rendered descendants, containment and the focus
//! chain. Implementors only describe how to step into a nested root,
//! list children, read slot assignment and step out to a host.

use crate::{Document, NodeId};

/// Capability interface for shadow-aware traversal
pub trait ShadowTraversal {
    /// Encapsulated root hosted by `node`
    fn nested_root(&self, node: NodeId) -> Option<NodeId>;

    /// Plain child nodes
    fn child_nodes(&self, node: NodeId) -> Vec<NodeId>;

    /// Assigned content when `node` is a slot, `None` otherwise
    fn assigned_content(&self, node: NodeId) -> Option<Vec<NodeId>>;

    /// Parent, or host when leaving a nested root
    fn parent_or_host(&self, node: NodeId) -> Option<NodeId>;

    /// Focused node as seen from `scope` (retargeted to a host in `scope`)
    fn scoped_active_element(&self, scope: NodeId) -> Option<NodeId>;

    /// Rendered children: the nested root's children for hosts, assigned
    /// nodes for slots (their own children as fallback), plain children
    /// otherwise
    fn composed_children(&self, node: NodeId) -> Vec<NodeId> {
        if let Some(root) = self.nested_root(node) {
            return self.child_nodes(root);
        }
        match self.assigned_content(node) {
            Some(assigned) if !assigned.is_empty() => assigned,
            _ => self.child_nodes(node),
        }
    }

    /// Rendered descendants of `root` in pre-order
    fn composed_descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.composed_children(root).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.composed_children(node).into_iter().rev());
        }
        out
    }

    /// Ancestors across shadow boundaries, nearest first
    fn composed_ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent_or_host(node);
        while let Some(ancestor) = current {
            out.push(ancestor);
            current = self.parent_or_host(ancestor);
        }
        out
    }

    /// Inclusive containment across shadow boundaries
    fn contains_composed(&self, ancestor: NodeId, node: NodeId) -> bool {
        if ancestor == node {
            return true;
        }
        let mut current = self.parent_or_host(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent_or_host(n);
        }
        false
    }

    /// Unwrap the active element through nested roots until reaching the
    /// node that actually holds focus
    fn deep_active_element(&self, scope: NodeId) -> Option<NodeId> {
        let mut active = self.scoped_active_element(scope)?;
        while let Some(inner) = self
            .nested_root(active)
            .and_then(|root| self.scoped_active_element(root))
        {
            active = inner;
        }
        Some(active)
    }
}

impl ShadowTraversal for Document {
    fn nested_root(&self, node: NodeId) -> Option<NodeId> {
        self.tree.shadow_root(node)
    }

    fn child_nodes(&self, node: NodeId) -> Vec<NodeId> {
        self.tree.children(node).collect()
    }

    fn assigned_content(&self, node: NodeId) -> Option<Vec<NodeId>> {
        self.tree
            .is_slot(node)
            .then(|| self.tree.assigned_nodes(node))
    }

    fn parent_or_host(&self, node: NodeId) -> Option<NodeId> {
        self.tree.parent_or_host(node)
    }

    fn scoped_active_element(&self, scope: NodeId) -> Option<NodeId> {
        self.active_element(scope)
    }
}
