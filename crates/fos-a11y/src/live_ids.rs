//! Live id subscriptions
//!
//! A subscription resolves its fragments against the traversal root,
//! orders the matches and notifies callbacks whenever the resolved list
//! changes.

use fos_dom::{DomTree, NodeId};

use crate::refs::LiveRefs;

/// Callback receiving the resolved id list
pub type LiveIdCallback = Box<dyn FnMut(&str)>;

pub(crate) struct LiveIdSubscription {
    refs: LiveRefs,
    selector: String,
    callbacks: Vec<LiveIdCallback>,
    elements: Vec<NodeId>,
    ids: String,
}

impl LiveIdSubscription {
    pub fn new(refs: LiveRefs) -> Self {
        Self {
            selector: refs.selector(),
            refs,
            callbacks: Vec::new(),
            elements: Vec::new(),
            ids: String::new(),
        }
    }

    pub fn push_callback(&mut self, callback: LiveIdCallback) {
        self.callbacks.push(callback);
    }

    /// Drop cached candidates so the next update re-queries
    pub fn invalidate(&mut self) {
        self.elements.clear();
    }

    pub fn ids(&self) -> &str {
        &self.ids
    }

    /// Resolve against `root`; returns true when callbacks fired
    pub fn update(&mut self, tree: &DomTree, root: NodeId) -> bool {
        if self.elements.is_empty() {
            match tree.query_selector_all(root, &self.selector) {
                Ok(found) => self.elements = found,
                Err(err) => {
                    tracing::warn!("live id ref {:?} not resolvable: {}", self.refs.key(), err);
                    return false;
                }
            }
        }

        let refs = &self.refs;
        self.elements
            .sort_by_key(|&element| refs.sort_key(tree.element_id(element).unwrap_or_default()));

        let ids = self
            .elements
            .iter()
            .filter_map(|&element| tree.element_id(element))
            .filter(|id| refs.matches(id))
            .collect::<Vec<_>>()
            .join(" ");

        if ids.is_empty() || ids == self.ids {
            return false;
        }

        tracing::trace!("live id ref {:?} resolved to {:?}", self.refs.key(), ids);
        for callback in &mut self.callbacks {
            callback(&ids);
        }
        self.ids = ids;
        true
    }
}
