//! F6 region navigation
//!
//! Ctrl/Cmd+F6 moves focus between the page's marked regions, Shift
//! reversing direction. The destination region is highlighted until the
//! next keydown or click.

mod debounce;
pub mod discovery;
pub mod navigation;
mod service;

use std::fmt;
use std::time::Instant;

use fos_dom::{Document, EventKind, KeyboardEvent, ListenerId, NodeId, ShadowTraversal};

use crate::config::RegionFocusConfig;
use crate::Result;

pub use debounce::Debouncer;
pub use service::{with_region_focus, RegionFocusService};

type LastFocused = Box<dyn Fn(&Document) -> Option<NodeId>>;

/// Optional hooks a region exposes to the controller
#[derive(Default)]
pub struct RegionCapabilities {
    last_focused: Option<LastFocused>,
}

impl RegionCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element to restore focus to when the region is re-entered
    pub fn with_last_focused(mut self, hook: impl Fn(&Document) -> Option<NodeId> + 'static) -> Self {
        self.last_focused = Some(Box::new(hook));
        self
    }

    pub fn last_focused(&self, doc: &Document) -> Option<NodeId> {
        self.last_focused.as_ref().and_then(|hook| hook(doc))
    }
}

impl fmt::Debug for RegionCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionCapabilities")
            .field("last_focused", &self.last_focused.is_some())
            .finish()
    }
}

/// Handle returned by [`RegionFocusController::register_region`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionRegistration(u32);

#[derive(Debug)]
struct RegisteredRegion {
    handle: RegionRegistration,
    node: NodeId,
    capabilities: RegionCapabilities,
}

/// Document-wide region navigation
#[derive(Debug)]
pub struct RegionFocusController {
    config: RegionFocusConfig,
    regions: Vec<NodeId>,
    highlighted: Option<NodeId>,
    registered: Vec<RegisteredRegion>,
    next_registration: u32,
    keydown: Debouncer<KeyboardEvent>,
    keydown_listener: Option<ListenerId>,
    click_listener: Option<ListenerId>,
    style_element: Option<NodeId>,
}

impl RegionFocusController {
    /// Inject the highlight style and register document listeners
    ///
    /// The registrations only mark the document as subscribed. The host
    /// event loop delivers input by calling [`on_keydown`](Self::on_keydown),
    /// [`poll`](Self::poll) and [`on_click`](Self::on_click).
    pub fn install(doc: &mut Document, config: RegionFocusConfig) -> Result<Self> {
        let style = doc.tree.create_element("style");
        let css = doc.tree.create_text(&config.highlight_style);
        doc.tree.append_child(style, css)?;
        let head = doc.head();
        doc.tree.append_child(head, style)?;

        let keydown_listener = doc.add_event_listener(EventKind::KeyDown);
        let click_listener = doc.add_event_listener(EventKind::Click);
        tracing::debug!("region focus installed (key {:?})", config.navigation_key);

        Ok(Self {
            keydown: Debouncer::new(config.debounce()),
            config,
            regions: Vec::new(),
            highlighted: None,
            registered: Vec::new(),
            next_registration: 0,
            keydown_listener: Some(keydown_listener),
            click_listener: Some(click_listener),
            style_element: Some(style),
        })
    }

    /// Remove listeners and the injected style; pending keydowns are dropped
    pub fn teardown(&mut self, doc: &mut Document) {
        for listener in [self.keydown_listener.take(), self.click_listener.take()]
            .into_iter()
            .flatten()
        {
            doc.remove_event_listener(listener);
        }
        if let Some(style) = self.style_element.take() {
            if let Err(err) = doc.tree.remove(style) {
                tracing::debug!("highlight style already gone: {}", err);
            }
        }
        self.keydown.cancel();
        tracing::debug!("region focus torn down");
    }

    pub fn is_live(&self) -> bool {
        self.keydown_listener.is_some()
    }

    pub fn config(&self) -> &RegionFocusConfig {
        &self.config
    }

    pub fn style_element(&self) -> Option<NodeId> {
        self.style_element
    }

    /// Regions from the most recent discovery
    pub fn regions(&self) -> &[NodeId] {
        &self.regions
    }

    pub fn highlighted(&self) -> Option<NodeId> {
        self.highlighted
    }

    /// Ctrl or Cmd with the navigation key
    pub fn is_navigation_key(&self, event: &KeyboardEvent) -> bool {
        event.key == self.config.navigation_key && (event.ctrl || event.meta)
    }

    /// Keydown listener
    ///
    /// Navigation keys have their default action suppressed immediately;
    /// the handling itself runs on the debounced trailing edge.
    pub fn on_keydown(&mut self, event: &mut KeyboardEvent, now: Instant) {
        if !self.is_live() {
            return;
        }
        if self.is_navigation_key(event) {
            event.prevent_default();
        }
        self.keydown.push(event.clone(), now);
    }

    /// Run the debounced keydown once due; returns the region focused
    pub fn poll(&mut self, doc: &mut Document, now: Instant) -> Option<NodeId> {
        if !self.is_live() {
            self.keydown.cancel();
            return None;
        }
        let event = self.keydown.poll(now)?;
        self.handle_keydown(doc, &event)
    }

    /// Deadline of the pending keydown, for host timers
    pub fn next_deadline(&self) -> Option<Instant> {
        self.keydown.deadline()
    }

    /// Any key clears the highlight; the navigation key also moves focus
    pub fn handle_keydown(&mut self, doc: &mut Document, event: &KeyboardEvent) -> Option<NodeId> {
        self.clear_highlights(doc);
        if !self.is_navigation_key(event) {
            return None;
        }
        self.handle_navigation(doc, event.shift)
    }

    /// Click listener
    pub fn on_click(&mut self, doc: &mut Document) {
        if self.is_live() {
            self.clear_highlights(doc);
        }
    }

    pub fn populate_regions(&mut self, doc: &Document) -> &[NodeId] {
        self.regions = discovery::populate_regions(doc, &self.config.region_attribute);
        &self.regions
    }

    /// Move focus to the next (or previous) region; returns it
    pub fn handle_navigation(&mut self, doc: &mut Document, reverse: bool) -> Option<NodeId> {
        self.populate_regions(doc);
        if self.regions.is_empty() {
            tracing::debug!("no regions to navigate");
            return None;
        }

        let active = doc.deep_active_element(doc.tree.root());
        let current = navigation::region_index(doc, &self.regions, active);
        let next = navigation::adjacent_index(current, self.regions.len(), reverse)?;
        let region = self.regions[next];
        tracing::debug!("region navigation {:?} -> {} (reverse={})", current, next, reverse);

        if let Err(err) = self.focus_region(doc, region) {
            tracing::warn!("could not focus region {}: {}", region, err);
        }
        if let Err(err) = self.highlight(doc, region) {
            tracing::warn!("could not highlight region {}: {}", region, err);
        }
        Some(region)
    }

    /// Restore remembered focus, else the first tabbable element, else
    /// the region itself
    fn focus_region(&self, doc: &mut Document, region: NodeId) -> Result<()> {
        let remembered = self
            .registered
            .iter()
            .filter(|entry| entry.node == region)
            .find_map(|entry| entry.capabilities.last_focused(doc))
            .filter(|&node| doc.contains_composed(region, node));
        if let Some(node) = remembered {
            if doc.focus(node) {
                return Ok(());
            }
        }

        if let Some(node) = doc.first_tabbable(region) {
            if doc.focus(node) {
                return Ok(());
            }
        }

        if !doc.tree.is_focusable(region) {
            doc.tree.set_attribute(region, "tabindex", "-1")?;
        }
        if !doc.focus(region) {
            tracing::debug!("region {} refused focus", region);
        }
        Ok(())
    }

    fn highlight(&mut self, doc: &mut Document, region: NodeId) -> Result<()> {
        doc.tree.add_class(region, &self.config.highlight_class)?;
        self.highlighted = Some(region);
        Ok(())
    }

    fn clear_highlights(&mut self, doc: &mut Document) {
        let class = &self.config.highlight_class;
        for &region in self.regions.iter().chain(&self.highlighted) {
            if let Err(err) = doc.tree.remove_class(region, class) {
                tracing::trace!("skipping highlight removal on {}: {}", region, err);
            }
        }
        self.highlighted = None;
    }

    /// Attach capabilities to a region element
    pub fn register_region(&mut self, node: NodeId, capabilities: RegionCapabilities) -> RegionRegistration {
        let handle = RegionRegistration(self.next_registration);
        self.next_registration += 1;
        self.registered.push(RegisteredRegion {
            handle,
            node,
            capabilities,
        });
        handle
    }

    pub fn unregister_region(&mut self, handle: RegionRegistration) -> bool {
        let before = self.registered.len();
        self.registered.retain(|entry| entry.handle != handle);
        self.registered.len() != before
    }

    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }
}
