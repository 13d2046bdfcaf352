//! fOS Accessibility
//!
//! Accessibility wiring for fOS components.
//!
//! Features:
//! - ARIA relationship sync across shadow boundaries
//! - Live id references resolved as content renders
//! - F6 region navigation

pub mod aria;
pub mod config;
mod error;
pub mod live_ids;
pub mod observer;
pub mod refs;
pub mod region;
pub mod relationship;

pub use aria::AriaRelation;
pub use config::{AriaSyncConfig, RegionFocusConfig};
pub use error::{A11yError, Result};
pub use live_ids::LiveIdCallback;
pub use observer::{AriaObserver, RenderOwner, ShadowHostOwner};
pub use refs::LiveRefs;
pub use region::{
    with_region_focus, Debouncer, RegionCapabilities, RegionFocusController, RegionFocusService,
    RegionRegistration,
};
pub use relationship::{RelationshipEntry, RelationshipRequest};
