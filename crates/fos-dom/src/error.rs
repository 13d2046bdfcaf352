//! DOM errors

use crate::{NodeId, SelectorError};

/// Result alias for DOM operations
pub type Result<T> = std::result::Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node {0} does not exist")]
    NodeNotFound(NodeId),

    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("node {0} is not a text node")]
    NotText(NodeId),

    #[error("cannot insert {child} into {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("element {0} already has a shadow root")]
    ShadowAlreadyAttached(NodeId),

    #[error(transparent)]
    InvalidSelector(#[from] SelectorError),
}
