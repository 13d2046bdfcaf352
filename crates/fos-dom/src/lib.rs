//! fOS DOM - Document Object Model
//!
//! Arena-backed DOM tree used by the accessibility layer:
//! - Linked parent/child/sibling nodes addressed by `NodeId`
//! - Shadow roots (native and synthetic) with named slot assignment
//! - Simple CSS selector matching scoped to one tree
//! - Focus tracking with shadow-aware retargeting
//! - Mutation observers with explicit record delivery

mod attributes;
mod composed;
mod document;
mod error;
mod events;
mod focus;
mod node;
mod observer;
mod selector;
mod shadow;
mod style;
mod tree;

pub use attributes::{Attr, AttributeMap};
pub use composed::ShadowTraversal;
pub use document::Document;
pub use error::{DomError, Result};
pub use events::{EventKind, KeyboardEvent, ListenerId, ListenerRegistry, MouseEvent};
pub use focus::TabIndex;
pub use node::{ElementData, Node, NodeData, TextData};
pub use observer::{MutationObserverId, MutationObserverInit, MutationRecord, MutationType};
pub use selector::{Selector, SelectorError};
pub use shadow::{ShadowRootData, ShadowRootInit, ShadowRootMode};
pub use style::{Display, ElementStyle, Visibility};
pub use tree::{Ancestors, Children, Descendants, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Marker for a missing link
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check whether this id points at a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#none")
        }
    }
}
