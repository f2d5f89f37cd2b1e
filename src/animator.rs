//! Fade-in on scroll via viewport observation.
//!
//! Elements matching the reveal selectors get the visibility class the first
//! time they intersect the viewport. The class is never removed, so an element
//! that scrolls out and back in is not revealed again.

#[cfg(test)]
#[path = "animator_test.rs"]
mod animator_test;

use std::collections::HashMap;

use crate::dom::{Capabilities, Dom, IntersectionEntry, ObserverOptions, ViewportObserver};
use crate::error::EnhanceError;

/// Live observers keyed by logical name. At most one handle per name.
pub struct ObservationRegistry<O: ViewportObserver> {
    handles: HashMap<String, O>,
}

impl<O: ViewportObserver> Default for ObservationRegistry<O> {
    fn default() -> Self {
        Self { handles: HashMap::new() }
    }
}

impl<O: ViewportObserver> ObservationRegistry<O> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `handle` under `name`, disconnecting any handle it replaces.
    pub fn insert(&mut self, name: &str, handle: O) {
        if let Some(mut previous) = self.handles.insert(name.to_owned(), handle) {
            previous.disconnect();
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handles.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Disconnect and drop every handle.
    pub fn release_all(&mut self) {
        for (name, mut handle) in self.handles.drain() {
            handle.disconnect();
            log::debug!("released observer {name}");
        }
    }
}

/// Start observing every element matching `selector`.
///
/// Returns the number of observed elements. Without viewport observation
/// support this logs a warning and observes nothing.
///
/// # Errors
///
/// Propagates a failure to construct the observer.
pub fn start<D, C>(
    dom: &D,
    caps: &C,
    registry: &mut ObservationRegistry<D::Observer>,
    name: &str,
    selector: &str,
    options: &ObserverOptions,
) -> Result<usize, EnhanceError>
where
    D: Dom,
    C: Capabilities,
{
    if !caps.supports_viewport_observation() {
        log::warn!("viewport observation unsupported; {name} animation disabled");
        return Ok(0);
    }
    let targets = dom.query_all(selector);
    if targets.is_empty() {
        return Ok(0);
    }
    let observer = dom.observe_viewport(name, &targets, options)?;
    registry.insert(name, observer);
    Ok(targets.len())
}

/// Reveal every intersecting target that is not yet visible.
///
/// Returns how many elements were newly revealed.
///
/// # Errors
///
/// Propagates a rejected class mutation.
pub fn reveal_intersecting<D: Dom>(
    dom: &D,
    entries: &[IntersectionEntry<D::Node>],
    visible_class: &str,
) -> Result<usize, EnhanceError> {
    let mut revealed = 0;
    for entry in entries.iter().filter(|e| e.is_intersecting) {
        if dom.has_class(&entry.target, visible_class) {
            continue;
        }
        dom.add_class(&entry.target, visible_class)?;
        revealed += 1;
    }
    Ok(revealed)
}
