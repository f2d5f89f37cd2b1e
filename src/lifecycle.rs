//! Lifecycle controller: sequences the enhancement routines and owns their
//! resources.
//!
//! [`Enhancer`] is the single state object for a page. The shell builds one at
//! startup, calls [`Enhancer::init`] once the DOM is ready, routes browser
//! events into [`Enhancer::handle_event`] and intersection batches into
//! [`Enhancer::handle_intersections`], and calls [`Enhancer::destroy`] on
//! teardown.
//!
//! The init routines run under one error boundary. The first routine that
//! fails stops the rest of the sequence; routines that already ran keep their
//! effects. The failure is logged, never returned to the page.

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod lifecycle_test;

use crate::animator::{self, ObservationRegistry};
use crate::config::EnhancerConfig;
use crate::consts::{CURRENT_YEAR_ID, FADE_IN_OBSERVER, THEME_TOGGLE_ID};
use crate::dom::{Capabilities, Dom, EventOutcome, IntersectionEntry, ListenerKind, ObserverOptions, PageEvent};
use crate::error::EnhanceError;
use crate::harden;
use crate::keyboard;
use crate::scroll;
use crate::store::{KeyValueStore, PreferenceStore};
use crate::theme::{Theme, ThemeController};

/// Document readiness as reported by `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

/// Result of an [`Enhancer::init`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStatus {
    /// Still loading; the shell must register one DOM-ready listener.
    Deferred,
    /// Still loading and the DOM-ready listener is already registered.
    AlreadyDeferred,
    /// Every routine ran.
    Ready,
    /// A routine failed; later routines were skipped.
    Aborted,
    /// Already initialized; call [`Enhancer::destroy`] first to re-run.
    AlreadyRunning,
}

pub struct Enhancer<D: Dom, S, C> {
    dom: D,
    store: PreferenceStore<S>,
    caps: C,
    config: EnhancerConfig,
    theme: ThemeController,
    observers: ObservationRegistry<D::Observer>,
    deferred: bool,
    running: bool,
}

impl<D, S, C> Enhancer<D, S, C>
where
    D: Dom,
    S: KeyValueStore,
    C: Capabilities,
{
    pub fn new(dom: D, storage: S, caps: C, config: EnhancerConfig) -> Self {
        let theme = ThemeController::new(config.storage_key.clone(), config.theme_attribute.clone());
        Self {
            dom,
            store: PreferenceStore::new(storage),
            caps,
            config,
            theme,
            observers: ObservationRegistry::new(),
            deferred: false,
            running: false,
        }
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of live observation handles.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Run the enhancement routines, or defer until the DOM is ready.
    pub fn init(&mut self, ready: ReadyState) -> InitStatus {
        if ready == ReadyState::Loading {
            if self.deferred {
                return InitStatus::AlreadyDeferred;
            }
            self.deferred = true;
            return InitStatus::Deferred;
        }
        self.deferred = false;
        if self.running {
            return InitStatus::AlreadyRunning;
        }
        self.running = true;
        match self.run_routines() {
            Ok(()) => {
                log::info!("page enhancements ready (theme: {})", self.theme.current().as_str());
                InitStatus::Ready
            }
            Err(err) => {
                log::error!("init: {err}");
                InitStatus::Aborted
            }
        }
    }

    fn run_routines(&mut self) -> Result<(), EnhanceError> {
        self.theme.init(&self.dom, &self.store, &self.caps)?;
        if let Some(toggle) = self.dom.by_id(THEME_TOGGLE_ID) {
            self.dom.listen(&toggle, ListenerKind::ThemeToggle)?;
        }
        if let Some(year) = self.dom.by_id(CURRENT_YEAR_ID) {
            self.dom.set_text(&year, &self.caps.current_year().to_string());
        }
        let anchors = scroll::wire(&self.dom)?;
        let options =
            ObserverOptions { root_margin: self.config.root_margin.clone(), threshold: self.config.threshold };
        let observed = animator::start(
            &self.dom,
            &self.caps,
            &mut self.observers,
            FADE_IN_OBSERVER,
            &self.config.reveal_selector(),
            &options,
        )?;
        let hardened = harden::harden_external_links(&self.dom)?;
        let images = harden::prepare_images(&self.dom)?;
        keyboard::wire(&self.dom)?;
        log::debug!("wired {anchors} anchors, observing {observed}, hardened {hardened} links, {images} images");
        Ok(())
    }

    /// Release every observer and listener. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.observers.release_all();
        self.dom.unlisten_all();
        self.running = false;
        self.deferred = false;
    }

    /// Route a browser event to its handler.
    ///
    /// Handler failures are logged and the default browser behavior is kept,
    /// except for anchor clicks whose scroll already started.
    pub fn handle_event(&mut self, event: PageEvent<'_, D::Node>) -> EventOutcome {
        let is_anchor = matches!(event, PageEvent::AnchorClick(_));
        let result = match event {
            PageEvent::AnchorClick(anchor) => scroll::handle_anchor_click(&self.dom, anchor),
            PageEvent::ImageError(img) => {
                harden::handle_image_error(&self.dom, img, &self.config.placeholder_src).map(|_| EventOutcome::Default)
            }
            PageEvent::ThemeToggle => self.theme.toggle(&self.dom, &self.store).map(|_| EventOutcome::Default),
            PageEvent::KeyDown(key) => keyboard::handle_key_down(&self.dom, key).map(|()| EventOutcome::Default),
            PageEvent::PointerDown => keyboard::handle_pointer_down(&self.dom).map(|()| EventOutcome::Default),
            PageEvent::Blur(target) => scroll::handle_target_blur(&self.dom, target).map(|_| EventOutcome::Default),
        };
        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                log::error!("event handler: {err}");
                if is_anchor { EventOutcome::PreventDefault } else { EventOutcome::Default }
            }
        }
    }

    /// Apply an intersection batch for the observer registered as `name`.
    ///
    /// Batches for names that are not registered (e.g. after
    /// [`Enhancer::destroy`]) are dropped. Returns the number of newly
    /// revealed elements.
    pub fn handle_intersections(&mut self, name: &str, entries: &[IntersectionEntry<D::Node>]) -> usize {
        if !self.observers.contains(name) {
            return 0;
        }
        match animator::reveal_intersecting(&self.dom, entries, &self.config.visible_class) {
            Ok(revealed) => revealed,
            Err(err) => {
                log::error!("{name}: {err}");
                0
            }
        }
    }
}
