//! Mutation Observers
//!
//! Registrations live in the tree; records queue per observer and are
//! drained by the owner at its next checkpoint (`take_records`), which
//! stands in for the platform's microtask delivery.

use crate::NodeId;

/// Mutation observer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MutationObserverId(u32);

/// Mutation observer options
#[derive(Debug, Clone, Default)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub attributes: bool,
    pub character_data: bool,
    pub subtree: bool,
    pub attribute_filter: Option<Vec<String>>,
}

impl MutationObserverInit {
    /// Structural and text changes anywhere below the target
    pub fn subtree_content() -> Self {
        Self {
            child_list: true,
            character_data: true,
            subtree: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    CharacterData,
    ChildList,
}

/// Mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub attribute_name: Option<String>,
    pub old_value: Option<String>,
}

impl MutationRecord {
    pub fn child_list(target: NodeId, added_nodes: Vec<NodeId>, removed_nodes: Vec<NodeId>) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes,
            removed_nodes,
            attribute_name: None,
            old_value: None,
        }
    }

    pub fn attribute(target: NodeId, name: &str, old_value: Option<String>) -> Self {
        Self {
            mutation_type: MutationType::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            attribute_name: Some(name.to_ascii_lowercase()),
            old_value,
        }
    }

    pub fn character_data(target: NodeId, old_value: String) -> Self {
        Self {
            mutation_type: MutationType::CharacterData,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            attribute_name: None,
            old_value: Some(old_value),
        }
    }
}

#[derive(Debug)]
struct Registration {
    id: MutationObserverId,
    target: NodeId,
    options: MutationObserverInit,
    records: Vec<MutationRecord>,
}

impl Registration {
    fn interested(&self, chain: &[NodeId], record: &MutationRecord) -> bool {
        let in_scope = match chain.iter().position(|&n| n == self.target) {
            Some(0) => true,
            Some(_) => self.options.subtree,
            None => false,
        };
        if !in_scope {
            return false;
        }
        match record.mutation_type {
            MutationType::ChildList => self.options.child_list,
            MutationType::CharacterData => self.options.character_data,
            MutationType::Attributes => {
                self.options.attributes
                    && match (&self.options.attribute_filter, &record.attribute_name) {
                        (Some(filter), Some(name)) => filter.iter().any(|f| f == name),
                        _ => true,
                    }
            }
        }
    }
}

/// Registry of live observers
#[derive(Debug, Default)]
pub(crate) struct ObserverRegistry {
    next_id: u32,
    registrations: Vec<Registration>,
}

impl ObserverRegistry {
    pub fn register(&mut self, target: NodeId, options: MutationObserverInit) -> MutationObserverId {
        let id = MutationObserverId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration {
            id,
            target,
            options,
            records: Vec::new(),
        });
        id
    }

    pub fn unregister(&mut self, id: MutationObserverId) {
        self.registrations.retain(|r| r.id != id);
    }

    pub fn contains(&self, id: MutationObserverId) -> bool {
        self.registrations.iter().any(|r| r.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Queue `record` for every interested observer; `chain` is the
    /// mutated node followed by its ancestors in the same tree scope
    pub fn queue(&mut self, chain: &[NodeId], record: &MutationRecord) {
        for registration in &mut self.registrations {
            if registration.interested(chain, record) {
                registration.records.push(record.clone());
            }
        }
    }

    pub fn take_records(&mut self, id: MutationObserverId) -> Vec<MutationRecord> {
        self.registrations
            .iter_mut()
            .find(|r| r.id == id)
            .map(|r| std::mem::take(&mut r.records))
            .unwrap_or_default()
    }

    pub fn pending(&self) -> Vec<MutationObserverId> {
        self.registrations
            .iter()
            .filter(|r| !r.records.is_empty())
            .map(|r| r.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{DomTree, MutationObserverInit, MutationType};

    #[test]
    fn test_subtree_child_list() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.append_child(tree.root(), div).unwrap();

        let observer = tree
            .observe(div, MutationObserverInit::subtree_content())
            .unwrap();
        let span = tree.create_element("span");
        tree.append_child(div, span).unwrap();
        let text = tree.create_text("a");
        tree.append_child(span, text).unwrap();
        tree.set_text(text, "b").unwrap();

        assert_eq!(tree.pending_observers(), vec![observer]);
        let records = tree.take_records(observer);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].added_nodes, vec![span]);
        assert_eq!(records[2].mutation_type, MutationType::CharacterData);
        assert!(tree.take_records(observer).is_empty());
    }

    #[test]
    fn test_attributes_ignored_without_option() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.append_child(tree.root(), div).unwrap();
        let observer = tree
            .observe(div, MutationObserverInit::subtree_content())
            .unwrap();

        tree.set_attribute(div, "aria-describedby", "x").unwrap();
        assert!(tree.take_records(observer).is_empty());
    }

    #[test]
    fn test_unchanged_writes_are_silent() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.append_child(tree.root(), div).unwrap();
        let observer = tree
            .observe(
                div,
                MutationObserverInit {
                    attributes: true,
                    ..Default::default()
                },
            )
            .unwrap();

        tree.set_attribute(div, "title", "a").unwrap();
        tree.set_attribute(div, "title", "a").unwrap();
        tree.remove_attribute(div, "missing").unwrap();
        assert_eq!(tree.take_records(observer).len(), 1);
    }

    #[test]
    fn test_shadow_boundary_not_crossed() {
        let mut tree = DomTree::new();
        let host = tree.create_element("x-host");
        tree.append_child(tree.root(), host).unwrap();
        let observer = tree
            .observe(tree.root(), MutationObserverInit::subtree_content())
            .unwrap();
        tree.take_records(observer);

        let shadow = tree.attach_shadow(host, Default::default()).unwrap();
        let inner = tree.create_element("p");
        tree.append_child(shadow, inner).unwrap();
        assert!(tree.take_records(observer).is_empty());

        tree.disconnect_observer(observer);
        assert!(!tree.is_observing(observer));
    }
}
