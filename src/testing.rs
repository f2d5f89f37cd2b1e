//! In-memory DOM, storage, and capability fakes for unit tests.
//!
//! The fake document supports just enough selector syntax for the enhancer's
//! own selectors: `tag`, `.class`, `#id`, `tag[attr="v"]`, `tag[attr^="v"]`,
//! and comma-separated lists of those.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

use crate::dom::{Capabilities, Dom, ListenerKind, ObserverOptions, ViewportObserver};
use crate::error::EnhanceError;
use crate::store::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Default)]
pub struct FakeElement {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
    pub text: String,
}

#[derive(Debug)]
pub struct FakeObservation {
    pub name: String,
    pub targets: Vec<NodeId>,
    pub options: ObserverOptions,
    pub connected: Rc<Cell<bool>>,
}

#[derive(Debug, Default)]
pub struct FakeDocument {
    pub elements: Vec<FakeElement>,
    pub root: Option<NodeId>,
    pub body: Option<NodeId>,
    pub scrolled_to: Vec<NodeId>,
    pub history: Vec<String>,
    pub focused: Option<NodeId>,
    pub listeners: Vec<(NodeId, ListenerKind)>,
    pub observations: Vec<FakeObservation>,
    /// Every successful `add_class`, in order.
    pub class_log: Vec<(NodeId, String)>,
    /// Every successful `set_attribute`, in order.
    pub attr_log: Vec<(NodeId, String, String)>,
    pub fail_attribute: Option<String>,
    pub fail_listen: bool,
    pub fail_observe: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FakeDom(Rc<RefCell<FakeDocument>>);

impl FakeDom {
    /// A document with `<html>` and `<body>` already present.
    pub fn new() -> Self {
        let dom = Self::default();
        let root = dom.add("html", &[]);
        let body = dom.add("body", &[]);
        {
            let mut doc = dom.doc_mut();
            doc.root = Some(root);
            doc.body = Some(body);
        }
        dom
    }

    /// A document with neither `<html>` nor `<body>`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append an element. A `class` attribute is split into the class list.
    pub fn add(&self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut el = FakeElement { tag: tag.to_owned(), ..FakeElement::default() };
        for (name, value) in attrs {
            if *name == "class" {
                el.classes.extend(value.split_whitespace().map(str::to_owned));
            } else {
                el.attrs.insert((*name).to_owned(), (*value).to_owned());
            }
        }
        let mut doc = self.doc_mut();
        doc.elements.push(el);
        NodeId(doc.elements.len() - 1)
    }

    pub fn doc(&self) -> Ref<'_, FakeDocument> {
        self.0.borrow()
    }

    pub fn doc_mut(&self) -> RefMut<'_, FakeDocument> {
        self.0.borrow_mut()
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.doc().elements[node.0].attrs.get(name).cloned()
    }

    pub fn classes(&self, node: NodeId) -> BTreeSet<String> {
        self.doc().elements[node.0].classes.clone()
    }

    pub fn text(&self, node: NodeId) -> String {
        self.doc().elements[node.0].text.clone()
    }

    pub fn root_id(&self) -> NodeId {
        self.doc().root.unwrap_or(NodeId(0))
    }

    pub fn body_id(&self) -> NodeId {
        self.doc().body.unwrap_or(NodeId(1))
    }

    /// Count of `add_class` calls that added `class` to `node`.
    pub fn class_adds(&self, node: NodeId, class: &str) -> usize {
        self.doc().class_log.iter().filter(|(n, c)| *n == node && c == class).count()
    }

    pub fn listeners_of(&self, kind: ListenerKind) -> Vec<NodeId> {
        self.doc().listeners.iter().filter(|(_, k)| *k == kind).map(|(n, _)| *n).collect()
    }

    pub fn connected_observers(&self) -> usize {
        self.doc().observations.iter().filter(|o| o.connected.get()).count()
    }
}

fn matches_simple(el: &FakeElement, selector: &str) -> bool {
    if let Some(class) = selector.strip_prefix('.') {
        return el.classes.contains(class);
    }
    if let Some(id) = selector.strip_prefix('#') {
        return el.attrs.get("id").is_some_and(|v| v == id);
    }
    let Some((tag, rest)) = selector.split_once('[') else {
        return el.tag == selector;
    };
    if !tag.is_empty() && el.tag != tag {
        return false;
    }
    let expr = rest.trim_end_matches(']');
    if let Some((name, value)) = expr.split_once("^=") {
        let value = value.trim_matches('"');
        return el.attrs.get(name).is_some_and(|v| v.starts_with(value));
    }
    if let Some((name, value)) = expr.split_once('=') {
        let value = value.trim_matches('"');
        return el.attrs.get(name).is_some_and(|v| v == value);
    }
    el.attrs.contains_key(expr)
}

impl Dom for FakeDom {
    type Node = NodeId;
    type Observer = FakeObserver;

    fn root(&self) -> Option<NodeId> {
        self.doc().root
    }

    fn body(&self) -> Option<NodeId> {
        self.doc().body
    }

    fn by_id(&self, id: &str) -> Option<NodeId> {
        self.doc()
            .elements
            .iter()
            .position(|el| el.attrs.get("id").is_some_and(|v| v == id))
            .map(NodeId)
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        let parts: Vec<&str> = selector.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
        self.doc()
            .elements
            .iter()
            .enumerate()
            .filter(|(_, el)| parts.iter().any(|sel| matches_simple(el, sel)))
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.attr(*node, name)
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> Result<(), EnhanceError> {
        let mut doc = self.doc_mut();
        if doc.fail_attribute.as_deref() == Some(name) {
            return Err(EnhanceError::dom("set_attribute", format!("{name} rejected")));
        }
        doc.elements[node.0].attrs.insert(name.to_owned(), value.to_owned());
        doc.attr_log.push((*node, name.to_owned(), value.to_owned()));
        Ok(())
    }

    fn remove_attribute(&self, node: &NodeId, name: &str) -> Result<(), EnhanceError> {
        let mut doc = self.doc_mut();
        if doc.fail_attribute.as_deref() == Some(name) {
            return Err(EnhanceError::dom("remove_attribute", format!("{name} rejected")));
        }
        doc.elements[node.0].attrs.remove(name);
        Ok(())
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.doc().elements[node.0].classes.contains(class)
    }

    fn add_class(&self, node: &NodeId, class: &str) -> Result<(), EnhanceError> {
        let mut doc = self.doc_mut();
        doc.elements[node.0].classes.insert(class.to_owned());
        doc.class_log.push((*node, class.to_owned()));
        Ok(())
    }

    fn remove_class(&self, node: &NodeId, class: &str) -> Result<(), EnhanceError> {
        self.doc_mut().elements[node.0].classes.remove(class);
        Ok(())
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        text.clone_into(&mut self.doc_mut().elements[node.0].text);
    }

    fn scroll_to(&self, node: &NodeId) {
        self.doc_mut().scrolled_to.push(*node);
    }

    fn push_fragment(&self, fragment: &str) -> Result<(), EnhanceError> {
        self.doc_mut().history.push(fragment.to_owned());
        Ok(())
    }

    fn focus(&self, node: &NodeId) -> Result<(), EnhanceError> {
        self.doc_mut().focused = Some(*node);
        Ok(())
    }

    fn listen(&self, node: &NodeId, kind: ListenerKind) -> Result<(), EnhanceError> {
        let mut doc = self.doc_mut();
        if doc.fail_listen {
            return Err(EnhanceError::dom("add_event_listener", "listener rejected"));
        }
        doc.listeners.push((*node, kind));
        Ok(())
    }

    fn unlisten_all(&self) {
        self.doc_mut().listeners.clear();
    }

    fn observe_viewport(
        &self,
        name: &str,
        targets: &[NodeId],
        options: &ObserverOptions,
    ) -> Result<FakeObserver, EnhanceError> {
        let mut doc = self.doc_mut();
        if doc.fail_observe {
            return Err(EnhanceError::dom("IntersectionObserver", "constructor threw"));
        }
        let connected = Rc::new(Cell::new(true));
        doc.observations.push(FakeObservation {
            name: name.to_owned(),
            targets: targets.to_vec(),
            options: options.clone(),
            connected: Rc::clone(&connected),
        });
        Ok(FakeObserver { connected })
    }
}

#[derive(Debug)]
pub struct FakeObserver {
    connected: Rc<Cell<bool>>,
}

impl ViewportObserver for FakeObserver {
    fn disconnect(&mut self) {
        self.connected.set(false);
    }
}

/// Shared in-memory storage; clones see the same map.
#[derive(Debug, Clone, Default)]
pub struct FakeStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
    pub fail_reads: Rc<Cell<bool>>,
    pub fail_writes: Rc<Cell<bool>>,
}

impl FakeStorage {
    pub fn with(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage.items.borrow_mut().insert(key.to_owned(), value.to_owned());
        storage
    }

    pub fn failing() -> Self {
        let storage = Self::default();
        storage.fail_reads.set(true);
        storage.fail_writes.set(true);
        storage
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }
}

impl KeyValueStore for FakeStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, EnhanceError> {
        if self.fail_reads.get() {
            return Err(EnhanceError::Storage("SecurityError".to_owned()));
        }
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), EnhanceError> {
        if self.fail_writes.get() {
            return Err(EnhanceError::Storage("QuotaExceededError".to_owned()));
        }
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FakeCapabilities {
    pub dark: bool,
    pub observation: bool,
    pub year: i32,
}

impl Default for FakeCapabilities {
    fn default() -> Self {
        Self { dark: false, observation: true, year: 2026 }
    }
}

impl Capabilities for FakeCapabilities {
    fn prefers_dark(&self) -> bool {
        self.dark
    }

    fn supports_viewport_observation(&self) -> bool {
        self.observation
    }

    fn current_year(&self) -> i32 {
        self.year
    }
}
