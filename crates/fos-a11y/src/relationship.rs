//! Relationship requests

use fos_dom::{DomTree, NodeId};

use crate::aria::AriaRelation;
use crate::refs::{join_ids, normalize_id_list};
use crate::Result;

/// Declarative description of one ARIA relationship
///
/// Built by the component, handed to [`AriaObserver::connect`](crate::AriaObserver::connect).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipRequest {
    pub attribute: String,
    pub target_selector: Option<String>,
    pub target_node: Option<NodeId>,
    pub related_node_ids: String,
    pub related_nodes: Vec<NodeId>,
}

impl RelationshipRequest {
    pub fn new(attribute: &str) -> Self {
        Self {
            attribute: attribute.to_string(),
            ..Self::default()
        }
    }

    /// Selector resolved inside the component's render root
    pub fn target_selector(mut self, selector: &str) -> Self {
        self.target_selector = Some(selector.to_string());
        self
    }

    /// Direct target reference; wins over the selector
    pub fn target_node(mut self, node: NodeId) -> Self {
        self.target_node = node.is_valid().then_some(node);
        self
    }

    pub fn related_ids(mut self, ids: &str) -> Self {
        self.related_node_ids = normalize_id_list(ids);
        self
    }

    pub fn related_id_list<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.related_node_ids = join_ids(ids);
        self
    }

    pub fn related_node(self, node: NodeId) -> Self {
        self.related_nodes([node])
    }

    pub fn related_nodes<I: IntoIterator<Item = NodeId>>(mut self, nodes: I) -> Self {
        self.related_nodes = nodes.into_iter().filter(|node| node.is_valid()).collect();
        self
    }
}

/// Stored relationship, keyed by its attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipEntry {
    pub relation: AriaRelation,
    pub target_selector: Option<String>,
    pub target_node: Option<NodeId>,
    pub related_node_ids: String,
    pub related_nodes: Vec<NodeId>,
}

impl RelationshipEntry {
    pub(crate) fn from_request(request: RelationshipRequest) -> Result<Self> {
        Ok(Self {
            relation: AriaRelation::parse(&request.attribute)?,
            target_selector: request.target_selector,
            target_node: request.target_node,
            related_node_ids: normalize_id_list(&request.related_node_ids),
            related_nodes: request.related_nodes,
        })
    }

    /// Id list written when element reflection is unavailable: the related
    /// ids followed by the ids of related nodes that have one
    pub fn id_list(&self, tree: &DomTree) -> String {
        let node_ids = self.related_nodes.iter().filter_map(|&node| tree.element_id(node));
        join_ids(self.related_node_ids.split_whitespace().chain(node_ids))
    }
}
