//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed; removal only detaches. Every structural,
//! character-data and attribute change is reported to the mutation
//! observer registry. Writing an unchanged value reports nothing.

use crate::observer::ObserverRegistry;
use crate::{
    Display, DomError, ElementData, ElementStyle, MutationObserverId, MutationObserverInit,
    MutationRecord, Node, NodeData, NodeId, Result, Selector, Visibility,
};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    observers: ObserverRegistry,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            observers: ObserverRegistry::default(),
        }
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get(id.index())
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or(DomError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        if !id.is_valid() {
            return Err(DomError::NodeNotFound(id));
        }
        self.nodes
            .get_mut(id.index())
            .ok_or(DomError::NodeNotFound(id))
    }

    pub(crate) fn element(&self, id: NodeId) -> Result<&ElementData> {
        self.node(id)?.as_element().ok_or(DomError::NotAnElement(id))
    }

    pub(crate) fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData> {
        self.node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    // --- Construction ---

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.insert_before(parent, child, NodeId::NONE)
    }

    /// Insert `child` before `reference` (or append when `reference` is NONE)
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> Result<()> {
        self.check_insertable(parent, child)?;
        if reference.is_valid() && self.node(reference)?.parent != parent {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if reference == child {
            return Ok(());
        }
        if self.node(child)?.parent.is_valid() {
            self.remove(child)?;
        }
        self.link(parent, child, reference);
        self.queue_record(MutationRecord::child_list(parent, vec![child], Vec::new()));
        Ok(())
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let hierarchy = DomError::HierarchyRequest { parent, child };
        if !self.node(parent)?.is_container() {
            return Err(hierarchy);
        }
        let child_node = self.node(child)?;
        if !(child_node.is_element() || child_node.is_text()) {
            return Err(hierarchy);
        }
        // No cycles, including through shadow hosts
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == child {
                return Err(hierarchy);
            }
            current = self.parent_or_host(id);
        }
        Ok(())
    }

    /// Link without validation or mutation records (document scaffolding)
    pub(crate) fn link(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        let prev = if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling
        } else {
            self.nodes[parent.index()].last_child
        };
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling = child;
        } else {
            self.nodes[parent.index()].last_child = child;
        }
    }

    /// Detach a node from its parent (no-op when already detached)
    pub fn remove(&mut self, child: NodeId) -> Result<()> {
        let node = self.node(child)?;
        let parent = node.parent;
        if !parent.is_valid() {
            return Ok(());
        }
        let (prev, next) = (node.prev_sibling, node.next_sibling);

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }
        let node = &mut self.nodes[child.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;

        self.queue_record(MutationRecord::child_list(parent, Vec::new(), vec![child]));
        Ok(())
    }

    // --- Navigation ---

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Parent, or the host when `id` is a shadow root
    pub fn parent_or_host(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).or_else(|| self.shadow_host(id))
    }

    /// Child nodes in order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Ancestors within the same tree scope, nearest first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id).unwrap_or(NodeId::NONE),
        }
    }

    /// Descendants in tree order, not entering shadow roots
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root,
            next: self.get(root).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Top of the tree scope containing `id`: the document, a shadow root,
    /// or the root of a detached subtree
    pub fn root_node(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Whether the node is reachable from the document, through shadow hosts
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            let root = self.root_node(current);
            if root == self.root() {
                return true;
            }
            match self.shadow_host(root) {
                Some(host) => current = host,
                None => return false,
            }
        }
    }

    // --- Node data ---

    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_element)
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| e.tag.as_str())
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_text()
    }

    /// Replace text content
    pub fn set_text(&mut self, id: NodeId, content: &str) -> Result<()> {
        let old = match &mut self.node_mut(id)?.data {
            NodeData::Text(text) if text.content == content => return Ok(()),
            NodeData::Text(text) => std::mem::replace(&mut text.content, content.to_string()),
            _ => return Err(DomError::NotText(id)),
        };
        self.queue_record(MutationRecord::character_data(id, old));
        Ok(())
    }

    // --- Attributes ---

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.as_element()?.attrs.get(name)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        let element = self.element_mut(id)?;
        if element.attrs.get(name) == Some(value) {
            return Ok(());
        }
        let old = element.attrs.set(name, value);
        self.queue_record(MutationRecord::attribute(id, name, old));
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<()> {
        if let Some(old) = self.element_mut(id)?.attrs.remove(name) {
            self.queue_record(MutationRecord::attribute(id, name, Some(old)));
        }
        Ok(())
    }

    /// The element's `id` attribute, if non-empty
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.attribute(id, "id").filter(|v| !v.is_empty())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.get(id)
            .and_then(Node::as_element)
            .is_some_and(|e| e.attrs.tokens("class").any(|c| c == class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<()> {
        if self.has_class(id, class) {
            return Ok(());
        }
        let value = match self.attribute(id, "class").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attribute(id, "class", &value)
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<()> {
        if !self.has_class(id, class) {
            return Ok(());
        }
        let remaining: Vec<&str> = self
            .element(id)?
            .attrs
            .tokens("class")
            .filter(|c| *c != class)
            .collect();
        if remaining.is_empty() {
            self.remove_attribute(id, "class")
        } else {
            let value = remaining.join(" ");
            self.set_attribute(id, "class", &value)
        }
    }

    // --- Style ---

    /// Computed style; the `hidden` attribute forces `display: none`
    pub fn style(&self, id: NodeId) -> ElementStyle {
        let Some(element) = self.get(id).and_then(Node::as_element) else {
            return ElementStyle::default();
        };
        let mut style = element.style;
        if element.attrs.has("hidden") {
            style.display = Display::None;
        }
        style
    }

    pub fn set_display(&mut self, id: NodeId, display: Display) -> Result<()> {
        self.element_mut(id)?.style.display = display;
        Ok(())
    }

    pub fn set_visibility(&mut self, id: NodeId, visibility: Visibility) -> Result<()> {
        self.element_mut(id)?.style.visibility = visibility;
        Ok(())
    }

    // --- ARIA element reflection ---

    pub fn set_reflected_elements(&mut self, id: NodeId, attribute: &str, elements: Vec<NodeId>) -> Result<()> {
        self.element_mut(id)?.set_reflected(attribute, elements);
        Ok(())
    }

    pub fn reflected_elements(&self, id: NodeId, attribute: &str) -> Option<&[NodeId]> {
        self.get(id)?.as_element()?.reflected(attribute)
    }

    // --- Queries (one tree scope, never entering shadow roots) ---

    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self.select_all(scope, &selector))
    }

    pub fn query_selector(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self.descendants(scope).find(|&n| selector.matches(self, n)))
    }

    pub fn select_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .filter(|&n| selector.matches(self, n))
            .collect()
    }

    /// First element under `scope` whose id is exactly `id`
    pub fn get_element_by_id_in(&self, scope: NodeId, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.descendants(scope).find(|&n| self.element_id(n) == Some(id))
    }

    // --- Mutation observers ---

    /// Start observing `target`
    pub fn observe(&mut self, target: NodeId, init: MutationObserverInit) -> Result<MutationObserverId> {
        self.node(target)?;
        Ok(self.observers.register(target, init))
    }

    /// Stop an observer and drop its queued records (idempotent)
    pub fn disconnect_observer(&mut self, observer: MutationObserverId) {
        self.observers.unregister(observer);
    }

    pub fn take_records(&mut self, observer: MutationObserverId) -> Vec<MutationRecord> {
        self.observers.take_records(observer)
    }

    /// Observers with queued records
    pub fn pending_observers(&self) -> Vec<MutationObserverId> {
        self.observers.pending()
    }

    pub fn is_observing(&self, observer: MutationObserverId) -> bool {
        self.observers.contains(observer)
    }

    fn queue_record(&mut self, record: MutationRecord) {
        if self.observers.is_empty() {
            return;
        }
        let chain: Vec<NodeId> = std::iter::once(record.target)
            .chain(self.ancestors(record.target))
            .collect();
        self.observers.queue(&chain, &record);
    }
}

/// Child iterator
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.tree.get(self.next).map(|_| self.next)?;
        self.next = self.tree.nodes[current.index()].next_sibling;
        Some(current)
    }
}

/// Ancestor iterator (same tree scope)
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.tree.get(self.next).map(|_| self.next)?;
        self.next = self.tree.nodes[current.index()].parent;
        Some(current)
    }
}

/// Pre-order descendant iterator (same tree scope)
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.tree.get(self.next).map(|_| self.next)?;
        let node = &self.tree.nodes[current.index()];
        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            let mut n = current;
            loop {
                if n == self.root {
                    break NodeId::NONE;
                }
                let walked = &self.tree.nodes[n.index()];
                if walked.next_sibling.is_valid() {
                    break walked.next_sibling;
                }
                n = walked.parent;
                if !n.is_valid() {
                    break NodeId::NONE;
                }
            }
        };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(tree: &mut DomTree, items: usize) -> (NodeId, Vec<NodeId>) {
        let ul = tree.create_element("ul");
        tree.append_child(tree.root(), ul).unwrap();
        let children = (0..items)
            .map(|_| {
                let li = tree.create_element("li");
                tree.append_child(ul, li).unwrap();
                li
            })
            .collect();
        (ul, children)
    }

    #[test]
    fn test_sibling_links() {
        let mut tree = DomTree::new();
        let (ul, items) = list(&mut tree, 3);

        assert_eq!(tree.children(ul).collect::<Vec<_>>(), items);
        let middle = tree.get(items[1]).unwrap();
        assert_eq!(middle.prev_sibling, items[0]);
        assert_eq!(middle.next_sibling, items[2]);
    }

    #[test]
    fn test_remove_relinks() {
        let mut tree = DomTree::new();
        let (ul, items) = list(&mut tree, 3);

        tree.remove(items[1]).unwrap();
        assert_eq!(tree.children(ul).collect::<Vec<_>>(), vec![items[0], items[2]]);
        assert!(tree.parent(items[1]).is_none());
        // Already detached
        tree.remove(items[1]).unwrap();
    }

    #[test]
    fn test_insert_before_moves_node() {
        let mut tree = DomTree::new();
        let (ul, items) = list(&mut tree, 3);

        tree.insert_before(ul, items[2], items[0]).unwrap();
        assert_eq!(
            tree.children(ul).collect::<Vec<_>>(),
            vec![items[2], items[0], items[1]]
        );
    }

    #[test]
    fn test_cycle_rejected() {
        let mut tree = DomTree::new();
        let (ul, items) = list(&mut tree, 1);
        assert!(matches!(
            tree.append_child(items[0], ul),
            Err(DomError::HierarchyRequest { .. })
        ));
        let text = tree.create_text("x");
        let span = tree.create_element("span");
        assert!(tree.append_child(text, span).is_err());
    }

    #[test]
    fn test_descendants_preorder() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        let c = tree.create_element("i");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(a, b).unwrap();
        tree.append_child(div, c).unwrap();

        assert_eq!(tree.descendants(div).collect::<Vec<_>>(), vec![a, b, c]);
        assert_eq!(tree.descendants(a).collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn test_class_tokens() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.add_class(div, "one").unwrap();
        tree.add_class(div, "two").unwrap();
        tree.add_class(div, "one").unwrap();
        assert_eq!(tree.attribute(div, "class"), Some("one two"));

        tree.remove_class(div, "one").unwrap();
        assert_eq!(tree.attribute(div, "class"), Some("two"));
        tree.remove_class(div, "two").unwrap();
        assert!(!tree.has_attribute(div, "class"));
    }

    #[test]
    fn test_hidden_attribute_forces_display_none() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        assert!(!tree.style(div).is_hidden());
        tree.set_attribute(div, "hidden", "").unwrap();
        assert_eq!(tree.style(div).display, Display::None);
    }

    #[test]
    fn test_get_element_by_id_stays_in_scope() {
        let mut tree = DomTree::new();
        let host = tree.create_element("x-host");
        tree.append_child(tree.root(), host).unwrap();
        let root = tree.attach_shadow(host, Default::default()).unwrap();
        let inner = tree.create_element("span");
        tree.set_attribute(inner, "id", "inner").unwrap();
        tree.append_child(root, inner).unwrap();

        assert_eq!(tree.get_element_by_id_in(tree.root(), "inner"), None);
        assert_eq!(tree.get_element_by_id_in(root, "inner"), Some(inner));
        assert!(tree.is_connected(inner));
        assert_eq!(tree.root_node(inner), root);
    }
}
