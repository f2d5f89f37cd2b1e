use super::*;
use crate::testing::{FakeCapabilities, FakeDom, FakeObserver, NodeId};

fn options() -> ObserverOptions {
    ObserverOptions { root_margin: "0px".to_owned(), threshold: 0.1 }
}

fn entry(target: NodeId, is_intersecting: bool) -> IntersectionEntry<NodeId> {
    IntersectionEntry { target, is_intersecting }
}

#[test]
fn start_observes_matching_elements() {
    let dom = FakeDom::new();
    let card = dom.add("div", &[("class", "card")]);
    let section = dom.add("section", &[("class", "section")]);
    dom.add("div", &[("class", "plain")]);
    let mut registry = ObservationRegistry::<FakeObserver>::new();

    let count =
        start(&dom, &FakeCapabilities::default(), &mut registry, "fadeIn", ".card, .section", &options()).unwrap();

    assert_eq!(count, 2);
    assert!(registry.contains("fadeIn"));
    let doc = dom.doc();
    assert_eq!(doc.observations.len(), 1);
    assert_eq!(doc.observations[0].name, "fadeIn");
    assert_eq!(doc.observations[0].targets, vec![card, section]);
    assert_eq!(doc.observations[0].options, options());
}

#[test]
fn start_without_capability_degrades_to_noop() {
    let dom = FakeDom::new();
    dom.add("div", &[("class", "card")]);
    let caps = FakeCapabilities { observation: false, ..FakeCapabilities::default() };
    let mut registry = ObservationRegistry::<FakeObserver>::new();

    assert_eq!(start(&dom, &caps, &mut registry, "fadeIn", ".card", &options()).unwrap(), 0);
    assert!(registry.is_empty());
    assert!(dom.doc().observations.is_empty());
}

#[test]
fn start_with_no_targets_creates_no_observer() {
    let dom = FakeDom::new();
    let mut registry = ObservationRegistry::<FakeObserver>::new();
    assert_eq!(start(&dom, &FakeCapabilities::default(), &mut registry, "fadeIn", ".card", &options()).unwrap(), 0);
    assert!(registry.is_empty());
}

#[test]
fn start_propagates_observer_failure() {
    let dom = FakeDom::new();
    dom.add("div", &[("class", "card")]);
    dom.doc_mut().fail_observe = true;
    let mut registry = ObservationRegistry::<FakeObserver>::new();
    assert!(start(&dom, &FakeCapabilities::default(), &mut registry, "fadeIn", ".card", &options()).is_err());
    assert!(registry.is_empty());
}

#[test]
fn reveal_adds_class_once_across_reentries() {
    let dom = FakeDom::new();
    let card = dom.add("div", &[("class", "card")]);

    assert_eq!(reveal_intersecting(&dom, &[entry(card, true)], "visible").unwrap(), 1);
    assert_eq!(reveal_intersecting(&dom, &[entry(card, false)], "visible").unwrap(), 0);
    assert_eq!(reveal_intersecting(&dom, &[entry(card, true)], "visible").unwrap(), 0);
    assert_eq!(reveal_intersecting(&dom, &[entry(card, false)], "visible").unwrap(), 0);
    assert_eq!(reveal_intersecting(&dom, &[entry(card, true)], "visible").unwrap(), 0);

    assert_eq!(dom.class_adds(card, "visible"), 1);
    assert!(dom.classes(card).contains("visible"));
}

#[test]
fn reveal_ignores_non_intersecting_entries() {
    let dom = FakeDom::new();
    let a = dom.add("div", &[("class", "card")]);
    let b = dom.add("div", &[("class", "card")]);
    assert_eq!(reveal_intersecting(&dom, &[entry(a, false), entry(b, true)], "visible").unwrap(), 1);
    assert!(!dom.classes(a).contains("visible"));
    assert!(dom.classes(b).contains("visible"));
}

#[test]
fn registry_replacing_a_name_disconnects_previous() {
    let dom = FakeDom::new();
    dom.add("div", &[("class", "card")]);
    let mut registry = ObservationRegistry::<FakeObserver>::new();
    let caps = FakeCapabilities::default();

    start(&dom, &caps, &mut registry, "fadeIn", ".card", &options()).unwrap();
    start(&dom, &caps, &mut registry, "fadeIn", ".card", &options()).unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(dom.connected_observers(), 1);
}

#[test]
fn release_all_disconnects_and_clears() {
    let dom = FakeDom::new();
    dom.add("div", &[("class", "card")]);
    let mut registry = ObservationRegistry::<FakeObserver>::new();
    start(&dom, &FakeCapabilities::default(), &mut registry, "fadeIn", ".card", &options()).unwrap();

    registry.release_all();
    assert!(registry.is_empty());
    assert_eq!(dom.connected_observers(), 0);

    registry.release_all();
    assert!(registry.is_empty());
}
