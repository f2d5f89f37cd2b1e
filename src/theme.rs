//! Theme initialization and toggle.
//!
//! Reads the stored preference and applies a `data-theme` attribute to the
//! `<html>` element. A stored `auto` (or no usable value at all) resolves
//! through the OS dark-mode signal. Toggle flips the theme, applies it, and
//! writes it back to storage.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use crate::consts::THEME_TOGGLE_ID;
use crate::dom::{Capabilities, Dom};
use crate::error::EnhanceError;
use crate::store::{KeyValueStore, PreferenceStore};

/// Persisted theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
    /// Follow the OS color scheme.
    Auto,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Auto => "auto",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }

    /// Collapse `Auto` to a concrete theme.
    #[must_use]
    pub fn resolve(self, prefers_dark: bool) -> Self {
        match self {
            Self::Auto if prefers_dark => Self::Dark,
            Self::Auto => Self::Light,
            concrete => concrete,
        }
    }

    /// The other concrete theme. `Auto` is treated as `Light`.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light | Self::Auto => Self::Dark,
        }
    }
}

/// Current effective theme plus the names it is applied and stored under.
#[derive(Debug, Clone)]
pub struct ThemeController {
    current: Theme,
    storage_key: String,
    attribute: String,
}

impl ThemeController {
    pub fn new(storage_key: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self { current: Theme::Light, storage_key: storage_key.into(), attribute: attribute.into() }
    }

    /// The effective theme; never `Auto`.
    #[must_use]
    pub fn current(&self) -> Theme {
        self.current
    }

    /// Load the stored preference, resolve it, and apply it.
    ///
    /// # Errors
    ///
    /// Propagates a rejected attribute write on the root or toggle control.
    pub fn init<D, S, C>(&mut self, dom: &D, store: &PreferenceStore<S>, caps: &C) -> Result<Theme, EnhanceError>
    where
        D: Dom,
        S: KeyValueStore,
        C: Capabilities,
    {
        let stored = store.get(&self.storage_key).and_then(|raw| Theme::parse(&raw));
        self.current = stored.unwrap_or(Theme::Auto).resolve(caps.prefers_dark());
        log::debug!("theme resolved to {} (stored: {:?})", self.current.as_str(), stored);
        self.apply(dom)?;
        Ok(self.current)
    }

    /// Flip the theme, apply it, then persist it.
    ///
    /// The new theme is committed and persisted as soon as the root accepts
    /// it; a failure syncing the toggle control is reported afterwards.
    ///
    /// # Errors
    ///
    /// Propagates a rejected attribute write. When the root write fails the
    /// theme is unchanged and nothing is persisted.
    pub fn toggle<D, S>(&mut self, dom: &D, store: &PreferenceStore<S>) -> Result<Theme, EnhanceError>
    where
        D: Dom,
        S: KeyValueStore,
    {
        let next = self.current.flipped();
        self.apply_root(dom, next)?;
        self.current = next;
        store.set(&self.storage_key, next.as_str());
        self.sync_control(dom)?;
        Ok(next)
    }

    /// Set the theme attribute on `<html>` and sync the toggle control.
    ///
    /// # Errors
    ///
    /// Propagates a rejected attribute write.
    pub fn apply<D: Dom>(&self, dom: &D) -> Result<(), EnhanceError> {
        self.apply_root(dom, self.current)?;
        self.sync_control(dom)
    }

    fn apply_root<D: Dom>(&self, dom: &D, theme: Theme) -> Result<(), EnhanceError> {
        match dom.root() {
            Some(root) => dom.set_attribute(&root, &self.attribute, theme.as_str()),
            None => Ok(()),
        }
    }

    fn sync_control<D: Dom>(&self, dom: &D) -> Result<(), EnhanceError> {
        let Some(toggle) = dom.by_id(THEME_TOGGLE_ID) else {
            return Ok(());
        };
        let dark = self.current == Theme::Dark;
        dom.set_attribute(&toggle, "aria-pressed", if dark { "true" } else { "false" })?;
        dom.set_attribute(
            &toggle,
            "aria-label",
            if dark { "Switch to light theme" } else { "Switch to dark theme" },
        )
    }
}
