//! External link hardening and image loading behavior.
//!
//! Links opening a new browsing context get `rel="noopener noreferrer"` unless
//! the author already chose a `rel`. Images load lazily and fall back to an
//! inline placeholder when they fail.

#[cfg(test)]
#[path = "harden_test.rs"]
mod harden_test;

use crate::consts::{EXTERNAL_LINK_SELECTOR, IMAGE_SELECTOR, SAFE_REL};
use crate::dom::{Dom, ListenerKind};
use crate::error::EnhanceError;

/// Add a safe `rel` to external links missing one. Returns how many changed.
///
/// # Errors
///
/// Propagates a rejected attribute write.
pub fn harden_external_links<D: Dom>(dom: &D) -> Result<usize, EnhanceError> {
    let mut hardened = 0;
    for link in dom.query_all(EXTERNAL_LINK_SELECTOR) {
        if dom.attribute(&link, "rel").is_some() {
            continue;
        }
        dom.set_attribute(&link, "rel", SAFE_REL)?;
        hardened += 1;
    }
    Ok(hardened)
}

/// Mark images lazy and attach the load-failure fallback. Returns the count.
///
/// # Errors
///
/// Propagates a rejected attribute write or listener.
pub fn prepare_images<D: Dom>(dom: &D) -> Result<usize, EnhanceError> {
    let images = dom.query_all(IMAGE_SELECTOR);
    for img in &images {
        if dom.attribute(img, "loading").is_none() {
            dom.set_attribute(img, "loading", "lazy")?;
        }
        dom.listen(img, ListenerKind::ImageError)?;
    }
    Ok(images.len())
}

/// Swap a failed image for the placeholder.
///
/// Returns `false` when the image already shows the placeholder, so a
/// failing placeholder cannot loop.
///
/// # Errors
///
/// Propagates a rejected `src` write.
pub fn handle_image_error<D: Dom>(dom: &D, img: &D::Node, placeholder: &str) -> Result<bool, EnhanceError> {
    if dom.attribute(img, "src").as_deref() == Some(placeholder) {
        return Ok(false);
    }
    dom.set_attribute(img, "src", placeholder)?;
    Ok(true)
}
