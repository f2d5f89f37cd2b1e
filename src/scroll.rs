//! Smooth scrolling for in-page fragment anchors.
//!
//! A fragment target with no `tabindex` is made focusable only while it holds
//! focus: the navigator adds `tabindex="-1"` plus a marker attribute, and the
//! target's `blur` removes both. Author-set `tabindex` values are never touched.

#[cfg(test)]
#[path = "scroll_test.rs"]
mod scroll_test;

use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::consts::{FRAGMENT_ANCHOR_SELECTOR, TEMPORARY_TABINDEX_ATTR};
use crate::dom::{Dom, EventOutcome, ListenerKind};
use crate::error::EnhanceError;

/// Attach the click listener to every fragment anchor, and the blur listener
/// to every target those anchors resolve to. Returns the anchor count.
///
/// # Errors
///
/// Propagates a failure to attach a listener.
pub fn wire<D: Dom>(dom: &D) -> Result<usize, EnhanceError> {
    let anchors = dom.query_all(FRAGMENT_ANCHOR_SELECTOR);
    let mut seen = BTreeSet::new();
    for anchor in &anchors {
        dom.listen(anchor, ListenerKind::AnchorClick)?;
        let Some(href) = dom.attribute(anchor, "href") else {
            continue;
        };
        if let Some(target) = fragment_target(dom, &href) {
            if seen.insert(href) {
                dom.listen(&target, ListenerKind::Blur)?;
            }
        }
    }
    Ok(anchors.len())
}

/// Resolve `#fragment` to an element by id, percent-decoding first.
fn fragment_target<D: Dom>(dom: &D, href: &str) -> Option<D::Node> {
    let raw = href.strip_prefix('#')?;
    if raw.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw));
    dom.by_id(&decoded).or_else(|| dom.by_id(raw))
}

/// Handle a click on a fragment anchor.
///
/// A bare `#` or a fragment with no matching element passes through
/// untouched. Otherwise the target is scrolled to, pushed onto history, and
/// focused, and the caller must suppress the default jump.
///
/// # Errors
///
/// Propagates history or focus failures. The scroll has already started by
/// then, so the caller should still prevent the default jump.
pub fn handle_anchor_click<D: Dom>(dom: &D, anchor: &D::Node) -> Result<EventOutcome, EnhanceError> {
    let Some(href) = dom.attribute(anchor, "href") else {
        return Ok(EventOutcome::Default);
    };
    let Some(target) = fragment_target(dom, &href) else {
        if href != "#" {
            log::debug!("no element for anchor {href}");
        }
        return Ok(EventOutcome::Default);
    };

    dom.scroll_to(&target);
    dom.push_fragment(&href)?;
    if dom.attribute(&target, "tabindex").is_none() {
        dom.set_attribute(&target, "tabindex", "-1")?;
        dom.set_attribute(&target, TEMPORARY_TABINDEX_ATTR, "")?;
    }
    dom.focus(&target)?;
    Ok(EventOutcome::PreventDefault)
}

/// Drop the temporary `tabindex` once the target loses focus.
///
/// Returns whether anything was removed.
///
/// # Errors
///
/// Propagates a rejected attribute removal.
pub fn handle_target_blur<D: Dom>(dom: &D, target: &D::Node) -> Result<bool, EnhanceError> {
    if dom.attribute(target, TEMPORARY_TABINDEX_ATTR).is_none() {
        return Ok(false);
    }
    dom.remove_attribute(target, "tabindex")?;
    dom.remove_attribute(target, TEMPORARY_TABINDEX_ATTR)?;
    Ok(true)
}
