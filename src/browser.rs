//! Browser shell: `web-sys` implementations of the core ports plus the
//! `PageEnhancer` class exported to JavaScript.
//!
//! SYSTEM CONTEXT
//! ==============
//! The enhancer lives in an `Rc<RefCell<_>>`. Every listener and observer
//! closure holds a `Weak` to it and routes its event through
//! [`Enhancer::handle_event`] or [`Enhancer::handle_intersections`]. Closures
//! are owned by the DOM adapter (or the observer handle) so teardown can
//! detach them symmetrically.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Array, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, DocumentReadyState, Element, ErrorEvent, Event, EventTarget, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent, PromiseRejectionEvent, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition, Window,
};

use crate::config::EnhancerConfig;
use crate::consts::{CONFIG_ELEMENT_ID, DARK_SCHEME_QUERY};
use crate::dom::{
    Capabilities, Dom, EventOutcome, IntersectionEntry, ListenerKind, ObserverOptions, PageEvent, ViewportObserver,
};
use crate::error::{EnhanceError, UncaughtError, UncaughtKind, report_uncaught};
use crate::lifecycle::{Enhancer, InitStatus, ReadyState};
use crate::perf::TimingRecorder;
use crate::store::KeyValueStore;

pub type BrowserEnhancer = Enhancer<BrowserDom, LocalStorage, BrowserCapabilities>;

type Listener = Closure<dyn FnMut(Event)>;

impl From<EnhanceError> for JsValue {
    fn from(err: EnhanceError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

fn js_detail(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Run `f` against the enhancer if it is still alive and not mid-event.
fn with_enhancer(weak: &Weak<RefCell<BrowserEnhancer>>, f: impl FnOnce(&mut BrowserEnhancer)) {
    let Some(enhancer) = weak.upgrade() else {
        return;
    };
    let Ok(mut enhancer) = enhancer.try_borrow_mut() else {
        log::warn!("event dropped: enhancer is busy");
        return;
    };
    f(&mut enhancer);
}

// =============================================================
// Storage
// =============================================================

/// `window.localStorage`, looked up on every access.
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, EnhanceError> {
        let window = web_sys::window().ok_or(EnhanceError::Unavailable("window"))?;
        window
            .local_storage()
            .map_err(|err| EnhanceError::Storage(js_detail(&err)))?
            .ok_or(EnhanceError::Unavailable("localStorage"))
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, EnhanceError> {
        Self::storage()?.get_item(key).map_err(|err| EnhanceError::Storage(js_detail(&err)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), EnhanceError> {
        Self::storage()?.set_item(key, value).map_err(|err| EnhanceError::Storage(js_detail(&err)))
    }
}

// =============================================================
// Capabilities
// =============================================================

pub struct BrowserCapabilities {
    window: Window,
}

impl BrowserCapabilities {
    #[must_use]
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Capabilities for BrowserCapabilities {
    fn prefers_dark(&self) -> bool {
        matches!(self.window.match_media(DARK_SCHEME_QUERY), Ok(Some(mq)) if mq.matches())
    }

    fn supports_viewport_observation(&self) -> bool {
        Reflect::has(&self.window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
    }

    fn current_year(&self) -> i32 {
        i32::try_from(js_sys::Date::new_0().get_full_year()).unwrap_or_default()
    }
}

// =============================================================
// DOM
// =============================================================

struct AttachedListener {
    target: EventTarget,
    event_type: &'static str,
    callback: Listener,
}

#[derive(Clone)]
pub struct BrowserDom {
    window: Window,
    document: Document,
    enhancer: Weak<RefCell<BrowserEnhancer>>,
    listeners: Rc<RefCell<Vec<AttachedListener>>>,
}

impl BrowserDom {
    fn new(window: Window, document: Document, enhancer: Weak<RefCell<BrowserEnhancer>>) -> Self {
        Self { window, document, enhancer, listeners: Rc::new(RefCell::new(Vec::new())) }
    }
}

fn dispatch(enhancer: &mut BrowserEnhancer, kind: ListenerKind, target: &Element, event: &Event) {
    let outcome = match kind {
        ListenerKind::AnchorClick => enhancer.handle_event(PageEvent::AnchorClick(target)),
        ListenerKind::ImageError => enhancer.handle_event(PageEvent::ImageError(target)),
        ListenerKind::ThemeToggle => enhancer.handle_event(PageEvent::ThemeToggle),
        ListenerKind::KeyDown => {
            let key = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key).unwrap_or_default();
            enhancer.handle_event(PageEvent::KeyDown(&key))
        }
        ListenerKind::PointerDown => enhancer.handle_event(PageEvent::PointerDown),
        ListenerKind::Blur => enhancer.handle_event(PageEvent::Blur(target)),
    };
    if outcome == EventOutcome::PreventDefault {
        event.prevent_default();
    }
}

impl Dom for BrowserDom {
    type Node = Element;
    type Observer = BrowserObserver;

    fn root(&self) -> Option<Element> {
        self.document.document_element()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                log::warn!("bad selector {selector:?}: {}", js_detail(&err));
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_ref::<Element>().cloned())
            .collect()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) -> Result<(), EnhanceError> {
        node.set_attribute(name, value).map_err(|err| EnhanceError::dom("set_attribute", js_detail(&err)))
    }

    fn remove_attribute(&self, node: &Element, name: &str) -> Result<(), EnhanceError> {
        node.remove_attribute(name).map_err(|err| EnhanceError::dom("remove_attribute", js_detail(&err)))
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) -> Result<(), EnhanceError> {
        node.class_list().add_1(class).map_err(|err| EnhanceError::dom("classList.add", js_detail(&err)))
    }

    fn remove_class(&self, node: &Element, class: &str) -> Result<(), EnhanceError> {
        node.class_list().remove_1(class).map_err(|err| EnhanceError::dom("classList.remove", js_detail(&err)))
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn scroll_to(&self, node: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        node.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn push_fragment(&self, fragment: &str) -> Result<(), EnhanceError> {
        self.window
            .history()
            .and_then(|history| history.push_state_with_url(&JsValue::NULL, "", Some(fragment)))
            .map_err(|err| EnhanceError::dom("history.pushState", js_detail(&err)))
    }

    fn focus(&self, node: &Element) -> Result<(), EnhanceError> {
        let el = node.dyn_ref::<HtmlElement>().ok_or_else(|| EnhanceError::dom("focus", "not an HTML element"))?;
        el.focus().map_err(|err| EnhanceError::dom("focus", js_detail(&err)))
    }

    fn listen(&self, node: &Element, kind: ListenerKind) -> Result<(), EnhanceError> {
        let weak = self.enhancer.clone();
        let target = node.clone();
        let callback = Listener::new(move |event: Event| {
            with_enhancer(&weak, |enhancer| dispatch(enhancer, kind, &target, &event));
        });
        node.add_event_listener_with_callback(kind.event_type(), callback.as_ref().unchecked_ref())
            .map_err(|err| EnhanceError::dom("addEventListener", js_detail(&err)))?;
        self.listeners.borrow_mut().push(AttachedListener {
            target: node.clone().into(),
            event_type: kind.event_type(),
            callback,
        });
        Ok(())
    }

    fn unlisten_all(&self) {
        for attached in self.listeners.borrow_mut().drain(..) {
            detach(&attached);
        }
    }

    fn observe_viewport(
        &self,
        name: &str,
        targets: &[Element],
        options: &ObserverOptions,
    ) -> Result<BrowserObserver, EnhanceError> {
        let weak = self.enhancer.clone();
        let name = name.to_owned();
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _observer: IntersectionObserver| {
                let batch: Vec<IntersectionEntry<Element>> = entries
                    .iter()
                    .filter_map(|value| {
                        value.dyn_ref::<IntersectionObserverEntry>().map(|entry| IntersectionEntry {
                            target: entry.target(),
                            is_intersecting: entry.is_intersecting(),
                        })
                    })
                    .collect();
                with_enhancer(&weak, |enhancer| {
                    enhancer.handle_intersections(&name, &batch);
                });
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin);
        init.set_threshold(&JsValue::from_f64(options.threshold));
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            .map_err(|err| EnhanceError::dom("IntersectionObserver", js_detail(&err)))?;
        for target in targets {
            observer.observe(target);
        }
        Ok(BrowserObserver { observer, _callback: callback })
    }
}

pub struct BrowserObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl ViewportObserver for BrowserObserver {
    fn disconnect(&mut self) {
        self.observer.disconnect();
    }
}

// =============================================================
// JS surface
// =============================================================

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

fn init_logging(level: log::Level) {
    if let Err(err) = console_log::init_with_level(level) {
        log::debug!("console logger already installed: {err}");
    }
}

fn load_config(document: &Document, explicit: Option<&str>) -> Result<EnhancerConfig, EnhanceError> {
    if let Some(raw) = explicit {
        return EnhancerConfig::from_json(raw);
    }
    match document.get_element_by_id(CONFIG_ELEMENT_ID).and_then(|el| el.text_content()) {
        Some(raw) if !raw.trim().is_empty() => EnhancerConfig::from_json(&raw),
        _ => Ok(EnhancerConfig::default()),
    }
}

fn ready_state(document: &Document) -> ReadyState {
    match document.ready_state() {
        DocumentReadyState::Loading => ReadyState::Loading,
        DocumentReadyState::Interactive => ReadyState::Interactive,
        _ => ReadyState::Complete,
    }
}

fn now_ms(window: &Window) -> Option<f64> {
    window.performance().map(|p| p.now())
}

fn run_init(
    enhancer: &RefCell<BrowserEnhancer>,
    ready: ReadyState,
    timing: &RefCell<TimingRecorder>,
    window: &Window,
) -> InitStatus {
    let Ok(mut enhancer) = enhancer.try_borrow_mut() else {
        log::warn!("init skipped: enhancer is busy");
        return InitStatus::AlreadyRunning;
    };
    let status = enhancer.init(ready);
    if matches!(status, InitStatus::Ready | InitStatus::Aborted) {
        if let Some(now) = now_ms(window) {
            timing.borrow_mut().mark_ready(now);
        }
    }
    status
}

/// Page enhancer handle exported to JavaScript.
///
/// ```js
/// const page = new PageEnhancer();
/// page.init();
/// ```
#[wasm_bindgen]
pub struct PageEnhancer {
    window: Window,
    document: Document,
    enhancer: Rc<RefCell<BrowserEnhancer>>,
    timing: Rc<RefCell<TimingRecorder>>,
    page_listeners: Vec<AttachedListener>,
    ready_listener: Option<AttachedListener>,
}

#[wasm_bindgen]
impl PageEnhancer {
    /// Build the enhancer. `config_json` overrides the inline config element.
    ///
    /// # Errors
    ///
    /// Fails when there is no window or document, or the config is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PageEnhancer, JsValue> {
        let window = web_sys::window().ok_or(EnhanceError::Unavailable("window"))?;
        let document = window.document().ok_or(EnhanceError::Unavailable("document"))?;
        let config = load_config(&document, config_json.as_deref())?;
        init_logging(config.level());
        let perf_logging = config.perf_logging;

        let enhancer = Rc::new_cyclic(|weak| {
            RefCell::new(Enhancer::new(
                BrowserDom::new(window.clone(), document.clone(), weak.clone()),
                LocalStorage,
                BrowserCapabilities::new(window.clone()),
                config,
            ))
        });
        let mut shell = Self {
            window,
            document,
            enhancer,
            timing: Rc::new(RefCell::new(TimingRecorder::new(perf_logging))),
            page_listeners: Vec::new(),
            ready_listener: None,
        };
        shell.install_error_logger()?;
        if perf_logging {
            shell.install_perf_logger()?;
        }
        Ok(shell)
    }

    /// Run every enhancement now, or once the DOM is ready.
    ///
    /// # Errors
    ///
    /// Fails only if the DOM-ready listener cannot be attached.
    pub fn init(&mut self) -> Result<(), JsValue> {
        let ready = ready_state(&self.document);
        if run_init(&self.enhancer, ready, &self.timing, &self.window) != InitStatus::Deferred {
            return Ok(());
        }

        let weak = Rc::downgrade(&self.enhancer);
        let timing = Rc::clone(&self.timing);
        let window = self.window.clone();
        let callback = Listener::new(move |_event: Event| {
            if let Some(enhancer) = weak.upgrade() {
                run_init(&enhancer, ReadyState::Interactive, &timing, &window);
            }
        });
        self.document
            .add_event_listener_with_callback("DOMContentLoaded", callback.as_ref().unchecked_ref())?;
        self.ready_listener =
            Some(AttachedListener { target: self.document.clone().into(), event_type: "DOMContentLoaded", callback });
        Ok(())
    }

    /// Release every observer and listener. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if let Some(listener) = self.ready_listener.take() {
            detach(&listener);
        }
        match self.enhancer.try_borrow_mut() {
            Ok(mut enhancer) => enhancer.destroy(),
            Err(err) => log::warn!("destroy skipped: {err}"),
        }
    }

    /// The effective theme name.
    #[wasm_bindgen(getter)]
    pub fn theme(&self) -> String {
        self.enhancer.try_borrow().map(|e| e.theme().as_str().to_owned()).unwrap_or_default()
    }
}

impl PageEnhancer {
    fn add_page_listener(
        &mut self,
        target: EventTarget,
        event_type: &'static str,
        callback: Listener,
    ) -> Result<(), JsValue> {
        target.add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())?;
        self.page_listeners.push(AttachedListener { target, event_type, callback });
        Ok(())
    }

    /// Log uncaught errors and unhandled rejections without suppressing them.
    fn install_error_logger(&mut self) -> Result<(), JsValue> {
        let on_error = Listener::new(|event: Event| {
            let Some(err) = event.dyn_ref::<ErrorEvent>() else {
                return;
            };
            let source = err.filename();
            report_uncaught(&UncaughtError {
                kind: UncaughtKind::Error,
                message: err.message(),
                source: (!source.is_empty()).then_some(source),
                line: Some(err.lineno()).filter(|line| *line > 0),
            });
        });
        let on_rejection = Listener::new(|event: Event| {
            let Some(rejection) = event.dyn_ref::<PromiseRejectionEvent>() else {
                return;
            };
            report_uncaught(&UncaughtError {
                kind: UncaughtKind::Rejection,
                message: js_detail(&rejection.reason()),
                source: None,
                line: None,
            });
        });
        let target: EventTarget = self.window.clone().into();
        self.add_page_listener(target.clone(), "error", on_error)?;
        self.add_page_listener(target, "unhandledrejection", on_rejection)
    }

    /// Mark window `load`; the record is logged once init has also run.
    fn install_perf_logger(&mut self) -> Result<(), JsValue> {
        if ready_state(&self.document) == ReadyState::Complete {
            if let Some(now) = now_ms(&self.window) {
                self.timing.borrow_mut().mark_loaded(now);
            }
            return Ok(());
        }
        let timing = Rc::clone(&self.timing);
        let window = self.window.clone();
        let on_load = Listener::new(move |_event: Event| {
            if let Some(now) = now_ms(&window) {
                timing.borrow_mut().mark_loaded(now);
            }
        });
        let target: EventTarget = self.window.clone().into();
        self.add_page_listener(target, "load", on_load)
    }
}

fn detach(listener: &AttachedListener) {
    if let Err(err) = listener
        .target
        .remove_event_listener_with_callback(listener.event_type, listener.callback.as_ref().unchecked_ref())
    {
        log::warn!("removeEventListener({}): {}", listener.event_type, js_detail(&err));
    }
}

impl Drop for PageEnhancer {
    fn drop(&mut self) {
        self.destroy();
        for listener in &self.page_listeners {
            detach(listener);
        }
    }
}
