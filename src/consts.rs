//! Fixed names and defaults for the page contract.

// ── Storage ─────────────────────────────────────────────────────

/// Default `localStorage` key for the theme preference.
pub const DEFAULT_STORAGE_KEY: &str = "theme";

// ── Theme ───────────────────────────────────────────────────────

/// Attribute set on `<html>` with the effective theme.
pub const DEFAULT_THEME_ATTRIBUTE: &str = "data-theme";

/// Id of the optional theme toggle button.
pub const THEME_TOGGLE_ID: &str = "theme-toggle";

/// Media query for the OS dark-mode signal.
pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

// ── Viewport animator ───────────────────────────────────────────

/// Registry name of the fade-in observer.
pub const FADE_IN_OBSERVER: &str = "fadeIn";

/// Class added to an element once it has been revealed.
pub const DEFAULT_VISIBLE_CLASS: &str = "visible";

/// Elements revealed on scroll.
pub const DEFAULT_REVEAL_SELECTORS: [&str; 6] =
    [".card", ".section", ".project-card", ".skill-item", ".timeline-item", ".fade-in"];

/// Fraction of the target that must be visible to count as intersecting.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

pub const DEFAULT_ROOT_MARGIN: &str = "0px";

// ── Navigation and hardening ────────────────────────────────────

pub const FRAGMENT_ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";
/// Marks a `tabindex` the scroll navigator added so blur can take it back.
pub const TEMPORARY_TABINDEX_ATTR: &str = "data-temporary-tabindex";
pub const EXTERNAL_LINK_SELECTOR: &str = "a[target=\"_blank\"]";
pub const IMAGE_SELECTOR: &str = "img";

/// `rel` value that cuts the opener reference and the referrer.
pub const SAFE_REL: &str = "noopener noreferrer";

/// 100x100 neutral grey square.
pub const DEFAULT_PLACEHOLDER_SRC: &str = "data:image/svg+xml,%3Csvg%20xmlns%3D%22http%3A%2F%2Fwww.w3.org%2F2000%2Fsvg%22%20width%3D%22100%22%20height%3D%22100%22%3E%3Crect%20width%3D%22100%22%20height%3D%22100%22%20fill%3D%22%23cccccc%22%2F%3E%3C%2Fsvg%3E";

// ── Misc page hooks ─────────────────────────────────────────────

pub const CURRENT_YEAR_ID: &str = "current-year";

/// Body class present while the user navigates with the keyboard.
pub const KEYBOARD_NAV_CLASS: &str = "keyboard-nav";

/// Id of the optional inline JSON config element.
pub const CONFIG_ELEMENT_ID: &str = "folio-config";
