//! Ports between the enhancement core and the browser.
//!
//! The core never touches `web-sys` directly. It drives a [`Dom`] for reads,
//! writes, listeners and viewport observation, a [`KeyValueStore`] for the
//! persisted preference, and a [`Capabilities`] provider for environment
//! signals. The `hydrate` shell implements all three on top of `web-sys`;
//! tests use in-memory fakes.
//!
//! [`KeyValueStore`]: crate::store::KeyValueStore

use crate::error::EnhanceError;

/// Events the enhancer subscribes to on individual nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// `click` on an in-page fragment anchor.
    AnchorClick,
    /// `error` on an `<img>`.
    ImageError,
    /// `click` on the theme toggle control.
    ThemeToggle,
    /// `keydown` on `<body>`.
    KeyDown,
    /// `pointerdown` on `<body>`.
    PointerDown,
    /// `blur` on a fragment target.
    Blur,
}

impl ListenerKind {
    /// DOM event type name.
    #[must_use]
    pub fn event_type(self) -> &'static str {
        match self {
            Self::AnchorClick | Self::ThemeToggle => "click",
            Self::ImageError => "error",
            Self::KeyDown => "keydown",
            Self::PointerDown => "pointerdown",
            Self::Blur => "blur",
        }
    }
}

/// An event delivered back to the enhancer by the shell.
#[derive(Debug)]
pub enum PageEvent<'a, N> {
    AnchorClick(&'a N),
    ImageError(&'a N),
    ThemeToggle,
    KeyDown(&'a str),
    PointerDown,
    Blur(&'a N),
}

/// What the shell should do with the originating browser event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Leave the default browser behavior alone.
    Default,
    /// Call `preventDefault()` on the event.
    PreventDefault,
}

/// One entry of an intersection batch.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry<N> {
    pub target: N,
    pub is_intersecting: bool,
}

/// Options for a viewport observer. The root is always the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    pub root_margin: String,
    pub threshold: f64,
}

/// A live viewport observation. Dropping it does not stop observation;
/// call [`ViewportObserver::disconnect`].
pub trait ViewportObserver {
    fn disconnect(&mut self);
}

/// Document access used by every routine.
pub trait Dom {
    type Node: Clone;
    type Observer: ViewportObserver;

    /// The `<html>` element.
    fn root(&self) -> Option<Self::Node>;
    fn body(&self) -> Option<Self::Node>;
    fn by_id(&self, id: &str) -> Option<Self::Node>;
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    /// # Errors
    ///
    /// Returns [`EnhanceError::Dom`] if the browser rejects the write.
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> Result<(), EnhanceError>;
    /// # Errors
    ///
    /// Returns [`EnhanceError::Dom`] if the browser rejects the removal.
    fn remove_attribute(&self, node: &Self::Node, name: &str) -> Result<(), EnhanceError>;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    /// # Errors
    ///
    /// Returns [`EnhanceError::Dom`] if the class list rejects the token.
    fn add_class(&self, node: &Self::Node, class: &str) -> Result<(), EnhanceError>;
    /// # Errors
    ///
    /// Returns [`EnhanceError::Dom`] if the class list rejects the token.
    fn remove_class(&self, node: &Self::Node, class: &str) -> Result<(), EnhanceError>;

    fn set_text(&self, node: &Self::Node, text: &str);

    /// Smooth-scroll so the node's top aligns with the viewport start.
    fn scroll_to(&self, node: &Self::Node);
    /// Push `fragment` (including `#`) onto history without reloading.
    ///
    /// # Errors
    ///
    /// Returns [`EnhanceError::Dom`] if history is unavailable.
    fn push_fragment(&self, fragment: &str) -> Result<(), EnhanceError>;
    /// # Errors
    ///
    /// Returns [`EnhanceError::Dom`] if the node cannot take focus.
    fn focus(&self, node: &Self::Node) -> Result<(), EnhanceError>;

    /// Subscribe `node` to `kind`; the shell routes it back as a [`PageEvent`].
    ///
    /// # Errors
    ///
    /// Returns [`EnhanceError::Dom`] if the listener cannot be attached.
    fn listen(&self, node: &Self::Node, kind: ListenerKind) -> Result<(), EnhanceError>;
    /// Detach every listener attached through [`Dom::listen`].
    fn unlisten_all(&self);

    /// Start observing `targets`; batches come back tagged with `name`.
    ///
    /// # Errors
    ///
    /// Returns [`EnhanceError::Dom`] if the observer cannot be created.
    fn observe_viewport(
        &self,
        name: &str,
        targets: &[Self::Node],
        options: &ObserverOptions,
    ) -> Result<Self::Observer, EnhanceError>;
}

/// Environment signals injected at construction.
pub trait Capabilities {
    /// OS-level dark color scheme preference.
    fn prefers_dark(&self) -> bool;
    /// Whether viewport observation exists in this runtime.
    fn supports_viewport_observation(&self) -> bool;
    fn current_year(&self) -> i32;
}
