//! Lazily created, process-wide controller

use std::cell::RefCell;

use fos_dom::Document;

use super::RegionFocusController;
use crate::config::RegionFocusConfig;
use crate::Result;

/// Owns at most one [`RegionFocusController`]
#[derive(Debug, Default)]
pub struct RegionFocusService {
    config: RegionFocusConfig,
    controller: Option<RegionFocusController>,
}

impl RegionFocusService {
    pub fn new(config: RegionFocusConfig) -> Self {
        Self {
            config,
            controller: None,
        }
    }

    /// The controller, installing it on first use
    pub fn get_or_create(&mut self, doc: &mut Document) -> Result<&mut RegionFocusController> {
        let controller = match self.controller.take() {
            Some(controller) => controller,
            None => RegionFocusController::install(doc, self.config.clone())?,
        };
        Ok(self.controller.insert(controller))
    }

    pub fn get(&mut self) -> Option<&mut RegionFocusController> {
        self.controller.as_mut()
    }

    pub fn is_created(&self) -> bool {
        self.controller.is_some()
    }

    /// Takes effect for the next controller created
    pub fn set_config(&mut self, config: RegionFocusConfig) {
        self.config = config;
    }

    /// Tear down and forget the controller
    pub fn teardown(&mut self, doc: &mut Document) {
        if let Some(mut controller) = self.controller.take() {
            controller.teardown(doc);
        }
    }
}

thread_local! {
    static REGION_FOCUS: RefCell<RegionFocusService> = RefCell::new(RegionFocusService::default());
}

/// Run `f` against this thread's service
///
/// Not reentrant: calling it again from inside `f` panics.
pub fn with_region_focus<R>(f: impl FnOnce(&mut RegionFocusService) -> R) -> R {
    REGION_FOCUS.with(|service| f(&mut service.borrow_mut()))
}

#[cfg(test)]
mod tests {
    use fos_dom::EventKind;

    use super::*;

    #[test]
    fn test_single_instance() {
        let mut doc = Document::default();
        let mut service = RegionFocusService::default();

        let first = service.get_or_create(&mut doc).unwrap().style_element();
        let second = service.get_or_create(&mut doc).unwrap().style_element();
        assert_eq!(first, second);
        assert_eq!(doc.listener_count(EventKind::KeyDown), 1);

        service.teardown(&mut doc);
        assert!(!service.is_created());
        assert_eq!(doc.listener_count(EventKind::KeyDown), 0);
    }

    #[test]
    fn test_thread_local_service() {
        let mut doc = Document::default();
        with_region_focus(|service| {
            service.get_or_create(&mut doc).unwrap();
        });
        assert!(with_region_focus(|service| service.is_created()));
        with_region_focus(|service| service.teardown(&mut doc));
        assert!(!with_region_focus(|service| service.is_created()));
    }
}
