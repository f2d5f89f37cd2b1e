//! Progressive enhancement for a static portfolio page.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It layers
//! theme switching, smooth fragment scrolling, fade-in on scroll, keyboard
//! focus affordances, external-link hardening and image fallbacks onto plain
//! HTML. Every feature degrades to a no-op when the page lacks the markup or
//! the browser lacks the capability.
//!
//! All behavior lives in a browser-independent core driven through the
//! [`dom::Dom`], [`store::KeyValueStore`] and [`dom::Capabilities`] traits, so
//! it is tested natively. The `hydrate` feature adds the `web-sys` shell and
//! the `PageEnhancer` class exported to JavaScript.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`lifecycle`] | [`lifecycle::Enhancer`]: init/destroy sequencing and event routing |
//! | [`theme`] | Theme preference resolution, apply, and toggle |
//! | [`store`] | Failure-tolerant preference store |
//! | [`animator`] | Fade-in on scroll and the observer registry |
//! | [`scroll`] | Smooth scrolling for fragment anchors |
//! | [`harden`] | External link `rel`, lazy images, image fallback |
//! | [`keyboard`] | Keyboard navigation body class |
//! | [`perf`] | Optional page timing log |
//! | [`dom`] | Ports to the browser |
//! | [`config`] | JSON configuration |
//! | [`error`] | Error type and the uncaught-error logger |
//! | [`consts`] | Selectors, ids, and defaults |
//! | `browser` | `web-sys` shell (feature `hydrate`) |

pub mod animator;
pub mod config;
pub mod consts;
pub mod dom;
pub mod error;
pub mod harden;
pub mod keyboard;
pub mod lifecycle;
pub mod perf;
pub mod scroll;
pub mod store;
pub mod theme;

#[cfg(feature = "hydrate")]
pub mod browser;

#[cfg(test)]
mod testing;

pub use config::EnhancerConfig;
pub use error::EnhanceError;
pub use lifecycle::{Enhancer, InitStatus, ReadyState};
pub use theme::Theme;
