//! Keyboard navigation affordance.
//!
//! `<body>` carries a class while the user is tabbing so stylesheets can show
//! focus outlines for keyboard users only.

#[cfg(test)]
#[path = "keyboard_test.rs"]
mod keyboard_test;

use crate::consts::KEYBOARD_NAV_CLASS;
use crate::dom::{Dom, ListenerKind};
use crate::error::EnhanceError;

/// Listen for key and pointer input on `<body>`. No-op without a body.
///
/// # Errors
///
/// Propagates a failure to attach a listener.
pub fn wire<D: Dom>(dom: &D) -> Result<(), EnhanceError> {
    let Some(body) = dom.body() else {
        return Ok(());
    };
    dom.listen(&body, ListenerKind::KeyDown)?;
    dom.listen(&body, ListenerKind::PointerDown)
}

/// # Errors
///
/// Propagates a rejected class mutation.
pub fn handle_key_down<D: Dom>(dom: &D, key: &str) -> Result<(), EnhanceError> {
    if key != "Tab" {
        return Ok(());
    }
    match dom.body() {
        Some(body) if !dom.has_class(&body, KEYBOARD_NAV_CLASS) => dom.add_class(&body, KEYBOARD_NAV_CLASS),
        _ => Ok(()),
    }
}

/// # Errors
///
/// Propagates a rejected class mutation.
pub fn handle_pointer_down<D: Dom>(dom: &D) -> Result<(), EnhanceError> {
    match dom.body() {
        Some(body) if dom.has_class(&body, KEYBOARD_NAV_CLASS) => dom.remove_class(&body, KEYBOARD_NAV_CLASS),
        _ => Ok(()),
    }
}
