//! F6 region navigation

use std::time::{Duration, Instant};

use fos_a11y::{RegionCapabilities, RegionFocusConfig, RegionFocusController, RegionFocusService};
use fos_dom::{Display, Document, EventKind, KeyboardEvent, NodeId, ShadowRootInit, ShadowTraversal};

const MARK: &str = "data-f6-region";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// body > section[data-f6-region] > button, for each label
fn page(labels: &[&str]) -> (Document, Vec<NodeId>, Vec<NodeId>) {
    init_tracing();
    let mut doc = Document::default();
    let body = doc.body();
    let mut regions = Vec::new();
    let mut buttons = Vec::new();
    for label in labels {
        let section = doc.tree.create_element("section");
        doc.tree.set_attribute(section, MARK, "").unwrap();
        doc.tree.append_child(body, section).unwrap();
        let button = doc.tree.create_element("button");
        let text = doc.tree.create_text(label);
        doc.tree.append_child(button, text).unwrap();
        doc.tree.append_child(section, button).unwrap();
        regions.push(section);
        buttons.push(button);
    }
    (doc, regions, buttons)
}

fn controller(doc: &mut Document) -> RegionFocusController {
    RegionFocusController::install(doc, RegionFocusConfig::default()).unwrap()
}

fn f6() -> KeyboardEvent {
    KeyboardEvent::new("F6").with_ctrl()
}

#[test]
fn test_adjacency_wraps_both_ways() {
    let (mut doc, regions, buttons) = page(&["nav", "main", "aside"]);
    let mut ctl = controller(&mut doc);

    assert!(doc.focus(buttons[1]));
    assert_eq!(ctl.handle_navigation(&mut doc, false), Some(regions[2]));
    assert_eq!(doc.focused(), Some(buttons[2]));

    assert_eq!(ctl.handle_navigation(&mut doc, false), Some(regions[0]));
    assert_eq!(doc.focused(), Some(buttons[0]));

    assert_eq!(ctl.handle_navigation(&mut doc, true), Some(regions[2]));
    assert_eq!(doc.focused(), Some(buttons[2]));
}

#[test]
fn test_no_regions_is_noop() {
    let (mut doc, _, _) = page(&[]);
    let mut ctl = controller(&mut doc);
    assert_eq!(ctl.handle_navigation(&mut doc, false), None);
    assert_eq!(doc.focused(), None);
}

#[test]
fn test_focus_outside_regions_starts_at_edges() {
    let (mut doc, regions, _) = page(&["a", "b", "c"]);
    let mut ctl = controller(&mut doc);
    assert_eq!(ctl.handle_navigation(&mut doc, false), Some(regions[0]));

    doc.blur();
    assert_eq!(ctl.handle_navigation(&mut doc, true), Some(regions[2]));
}

#[test]
fn test_nested_region_excluded() {
    let (mut doc, regions, _) = page(&["outer"]);
    let inner = doc.tree.create_element("div");
    doc.tree.set_attribute(inner, MARK, "").unwrap();
    let text = doc.tree.create_text("inner");
    doc.tree.append_child(inner, text).unwrap();
    doc.tree.append_child(regions[0], inner).unwrap();

    let mut ctl = controller(&mut doc);
    assert_eq!(ctl.populate_regions(&doc), regions.as_slice());
}

#[test]
fn test_hidden_ancestor_excludes_region() {
    let (mut doc, _, _) = page(&[]);
    let body = doc.body();
    let wrapper = doc.tree.create_element("div");
    doc.tree.append_child(body, wrapper).unwrap();
    let region = doc.tree.create_element("section");
    doc.tree.set_attribute(region, MARK, "").unwrap();
    let text = doc.tree.create_text("Filters");
    doc.tree.append_child(region, text).unwrap();
    doc.tree.append_child(wrapper, region).unwrap();

    let mut ctl = controller(&mut doc);
    doc.tree.set_display(wrapper, Display::None).unwrap();
    assert!(ctl.populate_regions(&doc).is_empty());

    doc.tree.set_display(wrapper, Display::Block).unwrap();
    assert_eq!(ctl.populate_regions(&doc), [region].as_slice());
}

#[test]
fn test_region_with_empty_slot_excluded_until_assigned() {
    let (mut doc, _, _) = page(&[]);
    let body = doc.body();
    let panel = doc.tree.create_element("x-panel");
    doc.tree.append_child(body, panel).unwrap();
    let shadow = doc.tree.attach_shadow(panel, ShadowRootInit::open()).unwrap();
    let region = doc.tree.create_element("section");
    doc.tree.set_attribute(region, MARK, "").unwrap();
    doc.tree.append_child(shadow, region).unwrap();
    let slot = doc.tree.create_element("slot");
    doc.tree.append_child(region, slot).unwrap();

    let mut ctl = controller(&mut doc);
    assert!(ctl.populate_regions(&doc).is_empty());

    let content = doc.tree.create_element("p");
    let text = doc.tree.create_text("Details");
    doc.tree.append_child(content, text).unwrap();
    doc.tree.append_child(panel, content).unwrap();
    assert_eq!(ctl.populate_regions(&doc), [region].as_slice());
}

#[test]
fn test_region_without_tabbable_content_gets_tabindex() {
    let (mut doc, _, _) = page(&[]);
    let body = doc.body();
    let region = doc.tree.create_element("aside");
    doc.tree.set_attribute(region, MARK, "").unwrap();
    let text = doc.tree.create_text("Read only");
    doc.tree.append_child(region, text).unwrap();
    doc.tree.append_child(body, region).unwrap();

    let mut ctl = controller(&mut doc);
    assert_eq!(ctl.handle_navigation(&mut doc, false), Some(region));
    assert_eq!(doc.tree.attribute(region, "tabindex"), Some("-1"));
    assert_eq!(doc.focused(), Some(region));
}

#[test]
fn test_last_focused_capability_restores_focus() {
    let (mut doc, regions, _) = page(&["list", "detail"]);
    let extra = doc.tree.create_element("input");
    doc.tree.append_child(regions[1], extra).unwrap();

    let mut ctl = controller(&mut doc);
    let handle = ctl.register_region(regions[1], RegionCapabilities::new().with_last_focused(move |_| Some(extra)));

    assert_eq!(ctl.handle_navigation(&mut doc, true), Some(regions[1]));
    assert_eq!(doc.focused(), Some(extra));

    assert!(ctl.unregister_region(handle));
    assert!(!ctl.unregister_region(handle));
    assert_eq!(ctl.handle_navigation(&mut doc, false), Some(regions[0]));
    assert_eq!(ctl.handle_navigation(&mut doc, false), Some(regions[1]));
    assert_ne!(doc.focused(), Some(extra));
}

#[test]
fn test_focus_inside_shadow_counts_for_region() {
    let (mut doc, regions, _) = page(&["first"]);
    let body = doc.body();
    let widget = doc.tree.create_element("x-editor");
    doc.tree.set_attribute(widget, MARK, "").unwrap();
    doc.tree.append_child(body, widget).unwrap();
    let shadow = doc.tree.attach_shadow(widget, ShadowRootInit::open()).unwrap();
    let field = doc.tree.create_element("textarea");
    doc.tree.append_child(shadow, field).unwrap();

    let mut ctl = controller(&mut doc);
    assert!(doc.focus(field));
    assert_eq!(doc.deep_active_element(doc.tree.root()), Some(field));
    assert_eq!(ctl.handle_navigation(&mut doc, false), Some(regions[0]));
}

#[test]
fn test_keydown_is_debounced_and_highlights() {
    let (mut doc, regions, _) = page(&["a", "b"]);
    let mut ctl = controller(&mut doc);
    let start = Instant::now();

    let mut event = f6();
    ctl.on_keydown(&mut event, start);
    assert!(event.default_prevented());
    assert_eq!(ctl.poll(&mut doc, start), None);

    let mut again = f6();
    ctl.on_keydown(&mut again, start + Duration::from_millis(50));
    assert_eq!(ctl.poll(&mut doc, start + Duration::from_millis(120)), None);

    let landed = ctl.poll(&mut doc, start + Duration::from_millis(150));
    assert_eq!(landed, Some(regions[0]));
    assert!(doc.tree.has_class(regions[0], "f6-highlight"));
    assert_eq!(ctl.highlighted(), Some(regions[0]));

    ctl.on_click(&mut doc);
    assert!(!doc.tree.has_class(regions[0], "f6-highlight"));
    assert_eq!(ctl.highlighted(), None);
}

#[test]
fn test_other_keys_clear_highlight_only() {
    let (mut doc, regions, _) = page(&["a", "b"]);
    let mut ctl = controller(&mut doc);
    assert_eq!(ctl.handle_keydown(&mut doc, &KeyboardEvent::new("F6").with_meta()), Some(regions[0]));
    assert!(doc.tree.has_class(regions[0], "f6-highlight"));

    let mut plain = KeyboardEvent::new("F6");
    let start = Instant::now();
    ctl.on_keydown(&mut plain, start);
    assert!(!plain.default_prevented());
    assert_eq!(ctl.poll(&mut doc, start + Duration::from_millis(100)), None);
    assert!(!doc.tree.has_class(regions[0], "f6-highlight"));
}

#[test]
fn test_shift_reverses() {
    let (mut doc, regions, _) = page(&["a", "b", "c"]);
    let mut ctl = controller(&mut doc);
    let reverse = KeyboardEvent::new("F6").with_ctrl().with_shift();
    assert_eq!(ctl.handle_keydown(&mut doc, &reverse), Some(regions[2]));
    assert_eq!(ctl.handle_keydown(&mut doc, &reverse), Some(regions[1]));
}

#[test]
fn test_teardown_tolerates_pending_keydown() {
    let (mut doc, _, _) = page(&["a"]);
    let mut ctl = controller(&mut doc);
    let head = doc.head();
    let style = ctl.style_element().unwrap();
    assert_eq!(doc.tree.parent(style), Some(head));
    assert_eq!(doc.listener_count(EventKind::KeyDown), 1);
    assert_eq!(doc.listener_count(EventKind::Click), 1);

    let start = Instant::now();
    ctl.on_keydown(&mut f6(), start);
    ctl.teardown(&mut doc);

    assert!(!ctl.is_live());
    assert_eq!(ctl.poll(&mut doc, start + Duration::from_secs(1)), None);
    assert_eq!(doc.tree.parent(style), None);
    assert_eq!(doc.listener_count(EventKind::KeyDown), 0);
    assert_eq!(doc.listener_count(EventKind::Click), 0);
}

#[test]
fn test_service_resets_between_cases() {
    let (mut doc, regions, _) = page(&["a"]);
    let config = RegionFocusConfig::from_json_str(r#"{ "debounce_ms": 0 }"#).unwrap();
    let mut service = RegionFocusService::new(config);

    let start = Instant::now();
    let ctl = service.get_or_create(&mut doc).unwrap();
    ctl.on_keydown(&mut f6(), start);
    assert_eq!(ctl.poll(&mut doc, start), Some(regions[0]));

    service.teardown(&mut doc);
    assert!(service.get().is_none());
    assert!(service.get_or_create(&mut doc).unwrap().is_live());
}
