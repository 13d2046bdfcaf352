//! ARIA relationship observer
//!
//! Keeps ARIA id-reference attributes correct when the related elements
//! live on the other side of a shadow boundary. With native shadow and
//! element reflection the target receives element references; otherwise
//! an id list is written. Live id references re-resolve whenever the
//! watched subtree changes.

use std::collections::{HashMap, HashSet};
use std::fmt;

use fos_dom::{Document, DomTree, MutationObserverId, MutationObserverInit, NodeId};
use indexmap::IndexMap;

use crate::aria::AriaRelation;
use crate::config::AriaSyncConfig;
use crate::live_ids::LiveIdSubscription;
use crate::refs::LiveRefs;
use crate::relationship::{RelationshipEntry, RelationshipRequest};
use crate::{A11yError, Result};

/// The component an observer works for
pub trait RenderOwner {
    /// Root the component renders into; target selectors resolve here
    fn render_root(&self, doc: &Document) -> Option<NodeId>;

    /// Root containing the component; related ids resolve here
    fn traversal_root(&self, doc: &Document) -> Option<NodeId>;

    fn is_connected(&self, doc: &Document) -> bool;

    /// Rendered into a native (not synthetic) shadow root
    fn is_native_shadow(&self, doc: &Document) -> bool;
}

/// Owner backed by a custom element host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowHostOwner {
    host: NodeId,
}

impl ShadowHostOwner {
    pub fn new(host: NodeId) -> Self {
        Self { host }
    }

    pub fn host(&self) -> NodeId {
        self.host
    }
}

impl RenderOwner for ShadowHostOwner {
    fn render_root(&self, doc: &Document) -> Option<NodeId> {
        doc.tree.get(self.host)?;
        Some(doc.tree.shadow_root(self.host).unwrap_or(self.host))
    }

    fn traversal_root(&self, doc: &Document) -> Option<NodeId> {
        doc.tree.get(self.host)?;
        Some(doc.tree.root_node(self.host))
    }

    fn is_connected(&self, doc: &Document) -> bool {
        doc.tree.is_connected(self.host)
    }

    fn is_native_shadow(&self, doc: &Document) -> bool {
        doc.tree
            .shadow_root(self.host)
            .and_then(|root| doc.tree.shadow_data(root))
            .is_some_and(|data| !data.synthetic)
    }
}

fn write_id_list(tree: &mut DomTree, node: NodeId, relation: AriaRelation, ids: &str) -> Result<()> {
    if ids.is_empty() {
        tree.remove_attribute(node, relation.attribute_name())?;
    } else {
        tree.set_attribute(node, relation.attribute_name(), ids)?;
    }
    Ok(())
}

/// Per-component ARIA relationship sync engine
pub struct AriaObserver {
    owner: Box<dyn RenderOwner>,
    config: AriaSyncConfig,
    native_shadow: bool,
    relationships: IndexMap<AriaRelation, RelationshipEntry>,
    live_ids: IndexMap<String, LiveIdSubscription>,
    root: Option<NodeId>,
    watcher: Option<MutationObserverId>,
    mirror_container: Option<NodeId>,
    mirrors: HashMap<(AriaRelation, NodeId), NodeId>,
}

impl fmt::Debug for AriaObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AriaObserver")
            .field("native_shadow", &self.native_shadow)
            .field("relationships", &self.relationships)
            .field("live_ids", &self.live_ids.keys().collect::<Vec<_>>())
            .field("root", &self.root)
            .field("watcher", &self.watcher)
            .finish_non_exhaustive()
    }
}

impl AriaObserver {
    pub fn new(doc: &Document, owner: impl RenderOwner + 'static) -> Self {
        Self::with_config(doc, owner, AriaSyncConfig::default())
    }

    pub fn with_config(doc: &Document, owner: impl RenderOwner + 'static, config: AriaSyncConfig) -> Self {
        let native_shadow = owner.is_native_shadow(doc);
        Self {
            owner: Box::new(owner),
            config,
            native_shadow,
            relationships: IndexMap::new(),
            live_ids: IndexMap::new(),
            root: None,
            watcher: None,
            mirror_container: None,
            mirrors: HashMap::new(),
        }
    }

    pub fn config(&self) -> &AriaSyncConfig {
        &self.config
    }

    pub fn is_native_shadow(&self) -> bool {
        self.native_shadow
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    pub fn relationship(&self, relation: AriaRelation) -> Option<&RelationshipEntry> {
        self.relationships.get(&relation)
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn live_subscription_count(&self) -> usize {
        self.live_ids.len()
    }

    /// Last id list delivered for a live reference
    pub fn live_ids(&self, refs: &str) -> Option<&str> {
        self.live_ids.get(LiveRefs::parse(refs).key()).map(LiveIdSubscription::ids)
    }

    /// Register or replace the relationship for `request.attribute`
    ///
    /// Applied right away when the component is mounted, otherwise on the
    /// next [`sync`](Self::sync).
    pub fn connect(&mut self, doc: &mut Document, request: RelationshipRequest) -> Result<()> {
        let entry = RelationshipEntry::from_request(request)?;
        let relation = entry.relation;
        self.relationships.insert(relation, entry);

        if self.owner.is_connected(doc) {
            self.ensure_root(doc);
            self.apply(doc, relation, self.native_shadow)?;
        }
        Ok(())
    }

    /// Subscribe to a live id reference
    ///
    /// The callback runs with the resolved id list on every sync whose
    /// result differs from the previous non-empty one.
    pub fn connect_live_id_ref(
        &mut self,
        doc: &mut Document,
        refs: &str,
        callback: impl FnMut(&str) + 'static,
    ) {
        let refs = LiveRefs::parse(refs);
        self.live_ids
            .entry(refs.key().to_string())
            .or_insert_with(|| LiveIdSubscription::new(refs))
            .push_callback(Box::new(callback));

        if self.root.is_some() && self.watcher.is_none() {
            self.start_watching(doc);
        }
    }

    /// Re-apply every relationship and refresh live ids
    ///
    /// `native_override` forces the reflection decision for this pass.
    pub fn sync(&mut self, doc: &mut Document, native_override: Option<bool>) -> Result<()> {
        if !self.owner.is_connected(doc) {
            return Err(A11yError::InvalidSyncState);
        }
        self.ensure_root(doc);

        let native = native_override.unwrap_or(self.native_shadow);
        tracing::debug!(
            "aria sync: {} relationships, {} live refs, native={}",
            self.relationships.len(),
            self.live_ids.len(),
            native
        );

        self.update_live_ids(doc);
        let relations: Vec<AriaRelation> = self.relationships.keys().copied().collect();
        for relation in relations {
            self.apply(doc, relation, native)?;
        }
        Ok(())
    }

    /// Deliver pending mutation records; resyncs when any arrived
    pub fn process_mutations(&mut self, doc: &mut Document) -> Result<bool> {
        let Some(watcher) = self.watcher else {
            return Ok(false);
        };
        let records = doc.tree.take_records(watcher);
        if records.is_empty() {
            return Ok(false);
        }
        if !self.owner.is_connected(doc) {
            tracing::debug!("dropping {} mutation records for unmounted owner", records.len());
            return Ok(false);
        }

        tracing::trace!("{} mutation records, resyncing", records.len());
        for subscription in self.live_ids.values_mut() {
            subscription.invalidate();
        }
        self.sync(doc, None)?;
        Ok(true)
    }

    /// Stop watching for mutations; safe to call repeatedly
    pub fn disconnect(&mut self, doc: &mut Document) {
        self.stop_watching(doc);
    }

    /// Replace the traversal root, resetting caches and the mutation watch
    pub fn set_root(&mut self, doc: &mut Document, root: Option<NodeId>) {
        self.stop_watching(doc);
        self.root = root;
        self.mirror_container = None;
        self.mirrors.clear();
        for subscription in self.live_ids.values_mut() {
            subscription.invalidate();
        }
        if self.requires_watch() {
            self.start_watching(doc);
        }
    }

    fn ensure_root(&mut self, doc: &mut Document) {
        if self.root.is_none() {
            let root = self.owner.traversal_root(doc);
            self.set_root(doc, root);
        } else if self.watcher.is_none() && self.requires_watch() {
            self.start_watching(doc);
        }
    }

    fn requires_watch(&self) -> bool {
        self.native_shadow || !self.live_ids.is_empty()
    }

    fn start_watching(&mut self, doc: &mut Document) {
        let Some(root) = self.root else {
            return;
        };
        match doc.tree.observe(root, MutationObserverInit::subtree_content()) {
            Ok(id) => self.watcher = Some(id),
            Err(err) => tracing::warn!("cannot watch traversal root {}: {}", root, err),
        }
    }

    fn stop_watching(&mut self, doc: &mut Document) {
        if let Some(id) = self.watcher.take() {
            doc.tree.disconnect_observer(id);
        }
    }

    fn update_live_ids(&mut self, doc: &Document) {
        let Some(root) = self.root else {
            return;
        };
        for subscription in self.live_ids.values_mut() {
            subscription.update(&doc.tree, root);
        }
    }

    fn resolve_target(&self, doc: &Document, entry: &RelationshipEntry) -> Option<NodeId> {
        if let Some(node) = entry.target_node {
            return doc.tree.get(node).map(|_| node);
        }
        let selector = entry.target_selector.as_deref()?;
        let scope = self.owner.render_root(doc)?;
        match doc.tree.query_selector(scope, selector) {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!("{}: bad target selector: {}", entry.relation, err);
                None
            }
        }
    }

    fn apply(&mut self, doc: &mut Document, relation: AriaRelation, native: bool) -> Result<()> {
        let Some(entry) = self.relationships.get(&relation).cloned() else {
            return Ok(());
        };
        let Some(target) = self.resolve_target(doc, &entry) else {
            tracing::trace!("{}: target not rendered yet", relation);
            return Ok(());
        };

        if native && doc.supports_element_reflection() && !self.config.force_polyfill {
            self.reflect(doc, target, &entry)
        } else {
            let ids = entry.id_list(&doc.tree);
            write_id_list(&mut doc.tree, target, relation, &ids)
        }
    }

    fn reflect(&mut self, doc: &mut Document, target: NodeId, entry: &RelationshipEntry) -> Result<()> {
        let resolved: Vec<NodeId> = match self.root {
            Some(root) => entry
                .related_node_ids
                .split_whitespace()
                .filter_map(|id| doc.tree.get_element_by_id_in(root, id))
                .collect(),
            None => Vec::new(),
        };

        let mut elements: Vec<NodeId> = Vec::new();
        for &node in resolved.iter().chain(&entry.related_nodes) {
            if doc.tree.is_element(node) && !elements.contains(&node) {
                elements.push(node);
            }
        }
        if entry.relation.is_single_element() {
            elements.truncate(1);
        }
        tracing::trace!("{}: reflecting {} elements onto {}", entry.relation, elements.len(), target);
        doc.tree
            .set_reflected_elements(target, entry.relation.attribute_name(), elements)?;

        let mut visited = HashSet::new();
        for &node in entry.related_nodes.iter().chain(&resolved) {
            self.propagate_nested(doc, entry.relation, node, &mut visited)?;
        }
        Ok(())
    }

    /// Copy a related element's own relationship onto its mirror so
    /// re-rendered content keeps the reference chain
    fn propagate_nested(
        &mut self,
        doc: &mut Document,
        relation: AriaRelation,
        node: NodeId,
        visited: &mut HashSet<NodeId>,
    ) -> Result<()> {
        let Some(root) = self.root else {
            return Ok(());
        };
        if !visited.insert(node) {
            return Ok(());
        }
        let Some(value) = doc.tree.attribute(node, relation.attribute_name()).map(str::to_owned) else {
            return Ok(());
        };

        let nested: Vec<NodeId> = value
            .split_whitespace()
            .filter_map(|id| doc.tree.get_element_by_id_in(root, id))
            .collect();
        if nested.is_empty() {
            return Ok(());
        }

        let ids = nested
            .iter()
            .filter_map(|&n| doc.tree.element_id(n))
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(mirror) = self.find_mirror(doc, relation, node, &value, &ids) {
            tracing::debug!("{}: mirroring {:?} from {} onto {}", relation, ids, node, mirror);
            write_id_list(&mut doc.tree, mirror, relation, &ids)?;
        }

        for nested_node in nested {
            self.propagate_nested(doc, relation, nested_node, visited)?;
        }
        Ok(())
    }

    /// Mirror of `source` inside the mirror container
    ///
    /// A mirror carries the source's original value until it is patched
    /// and the propagated id list afterwards; either one identifies it.
    fn find_mirror(
        &mut self,
        doc: &Document,
        relation: AriaRelation,
        source: NodeId,
        value: &str,
        propagated: &str,
    ) -> Option<NodeId> {
        if let Some(&mirror) = self.mirrors.get(&(relation, source)) {
            if doc.tree.is_connected(mirror) {
                return Some(mirror);
            }
        }
        let container = self.mirror_container(doc)?;
        let attribute = relation.attribute_name();
        let carries = |wanted: &str| {
            doc.tree
                .descendants(container)
                .find(|&n| n != source && doc.tree.attribute(n, attribute) == Some(wanted))
        };
        let mirror = carries(value).or_else(|| carries(propagated))?;
        self.mirrors.insert((relation, source), mirror);
        Some(mirror)
    }

    /// Only a found container is cached; mirrored content often renders
    /// after the first sync
    fn mirror_container(&mut self, doc: &Document) -> Option<NodeId> {
        if let Some(cached) = self.mirror_container {
            if doc.tree.is_connected(cached) {
                return Some(cached);
            }
            self.mirror_container = None;
        }
        let root = self.root?;
        let found = match doc.tree.query_selector(root, &self.config.mirror_container_selector) {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!("bad mirror container selector: {}", err);
                None
            }
        };
        self.mirror_container = found;
        found
    }
}
