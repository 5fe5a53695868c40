//! Catalog view-state: variant resolution, URL codecs, pagination.
//!
//! Everything in this module is pure state projection - no network, no
//! browser APIs. Route handlers (and, through them, the front-end) feed in
//! catalog data plus the current query string and get back renderable state
//! and navigation *intents*; an external router is responsible for actually
//! performing navigation.
//!
//! # Modules
//!
//! - [`options`] - resolve a partial/complete option selection to a variant
//!   and per-value availability
//! - [`selection`] - round-trip an option selection through URL query
//!   parameters
//! - [`filters`] - round-trip declared collection facets and sort order
//!   through URL query parameters
//! - [`pager`] - cursor pagination state machine over opaque-cursor
//!   connections

pub mod filters;
pub mod options;
pub mod pager;
pub mod selection;

use serde::Serialize;

/// How a navigation intent should interact with session history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// Push a new history entry.
    Push,
    /// Replace the current history entry.
    Replace,
}

/// A navigation intent emitted by the view-state core.
///
/// The core never touches a history API; it describes the target query
/// string and how the router should treat it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationTarget {
    /// Target query string (percent-encoded, no leading `?`).
    pub query: String,
    /// History behavior for the router.
    pub history: HistoryMode,
    /// Whether scroll position must be preserved across the navigation.
    pub preserve_scroll: bool,
}

impl NavigationTarget {
    /// A history replacement that keeps the scroll position - used when
    /// moving between sibling variants or appending a page of results.
    #[must_use]
    pub const fn replace(query: String) -> Self {
        Self {
            query,
            history: HistoryMode::Replace,
            preserve_scroll: true,
        }
    }

    /// A normal navigation with a new history entry.
    #[must_use]
    pub const fn push(query: String) -> Self {
        Self {
            query,
            history: HistoryMode::Push,
            preserve_scroll: false,
        }
    }
}
