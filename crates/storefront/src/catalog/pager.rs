//! Cursor pagination state machine.
//!
//! Cursors are opaque and only valid for the sort/filter parameters that
//! produced them. The pager carries a fingerprint of those parameters;
//! completions for a superseded fingerprint are ignored, and changing the
//! fingerprint resets pagination to a first page. The pager emits
//! [`PageRequest`] intents - it never touches a navigation API itself.

use serde_json::Value;

use crate::shopify::types::PageInfo;

use super::HistoryMode;
use super::filters::SortOrder;

/// Canonical fingerprint of the parameters that produced a set of cursors.
///
/// Filter inputs are serialized (serde_json maps are ordered, so this is
/// deterministic) and sorted so parameter order in the URL does not matter.
#[must_use]
pub fn query_fingerprint(sort: SortOrder, filters: &[Value]) -> String {
    let mut parts: Vec<String> = filters.iter().map(ToString::to_string).collect();
    parts.sort_unstable();
    format!(
        "{}|{}",
        sort.token().unwrap_or("relevance"),
        parts.join("&")
    )
}

/// Pager state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagerPhase {
    /// No load in flight.
    #[default]
    Idle,
    /// A forward load is in flight.
    LoadingNext,
    /// A backward load is in flight.
    LoadingPrevious,
}

/// What caused a pagination advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTrigger {
    /// Explicit "load more" action (appends; scroll is preserved).
    LoadMore,
    /// Explicit "load previous" action (prepends; scroll is preserved).
    LoadPrevious,
    /// Trigger element entered the viewport (forward only).
    ViewportReveal,
    /// Explicit next-page link.
    NextLink,
    /// Explicit previous-page link.
    PreviousLink,
}

/// Direction of a page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Forward,
    Backward,
}

/// A pagination request the pager wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Which way to paginate.
    pub direction: PageDirection,
    /// Cursor to paginate from (`None` on an un-paginated first page).
    pub cursor: Option<String>,
    /// History behavior for the resulting navigation.
    pub history: HistoryMode,
    /// Whether scroll position must be preserved.
    pub preserve_scroll: bool,
}

/// Cursor pagination state machine over one connection.
///
/// ```text
/// Idle --forward trigger & hasNextPage-->     LoadingNext
/// Idle --backward trigger & hasPreviousPage-> LoadingPrevious
/// Loading* --complete (matching fingerprint)-> Idle
/// Loading* --fail-->                           Idle
/// ```
///
/// Triggers received while loading are ignored; there is at most one
/// in-flight request per direction and the pager holds only one at a time.
#[derive(Debug, Clone)]
pub struct CursorPager {
    phase: PagerPhase,
    fingerprint: String,
    page_info: PageInfo,
}

impl CursorPager {
    /// Pager for a fresh first page: no cursors, nothing before or after.
    #[must_use]
    pub fn new(fingerprint: impl Into<String>) -> Self {
        Self {
            phase: PagerPhase::Idle,
            fingerprint: fingerprint.into(),
            page_info: PageInfo::default(),
        }
    }

    /// Pager positioned on an already-rendered page.
    #[must_use]
    pub fn with_page(fingerprint: impl Into<String>, page_info: PageInfo) -> Self {
        Self {
            phase: PagerPhase::Idle,
            fingerprint: fingerprint.into(),
            page_info,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> PagerPhase {
        self.phase
    }

    /// Cursors and availability of the currently rendered page.
    #[must_use]
    pub const fn page_info(&self) -> &PageInfo {
        &self.page_info
    }

    /// Fingerprint of the parameters the held cursors belong to.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Sort or filters changed: discard all cursors and return to a first
    /// page. Any in-flight load becomes stale (its completion will be
    /// ignored by the fingerprint check).
    pub fn reset(&mut self, fingerprint: impl Into<String>) {
        self.phase = PagerPhase::Idle;
        self.fingerprint = fingerprint.into();
        self.page_info = PageInfo::default();
    }

    /// The request a trigger would start, without transitioning.
    ///
    /// Returns `None` when the trigger must be ignored: a load is already
    /// in flight, or there is no page in that direction.
    #[must_use]
    pub fn peek(&self, trigger: PageTrigger) -> Option<PageRequest> {
        if self.phase != PagerPhase::Idle {
            return None;
        }

        match trigger {
            PageTrigger::LoadMore | PageTrigger::ViewportReveal => {
                self.page_info.has_next_page.then(|| PageRequest {
                    direction: PageDirection::Forward,
                    cursor: self.page_info.end_cursor.clone(),
                    history: HistoryMode::Replace,
                    preserve_scroll: true,
                })
            }
            PageTrigger::NextLink => self.page_info.has_next_page.then(|| PageRequest {
                direction: PageDirection::Forward,
                cursor: self.page_info.end_cursor.clone(),
                history: HistoryMode::Push,
                preserve_scroll: false,
            }),
            PageTrigger::LoadPrevious => {
                self.page_info.has_previous_page.then(|| PageRequest {
                    direction: PageDirection::Backward,
                    cursor: self.page_info.start_cursor.clone(),
                    history: HistoryMode::Replace,
                    preserve_scroll: true,
                })
            }
            PageTrigger::PreviousLink => self.page_info.has_previous_page.then(|| PageRequest {
                direction: PageDirection::Backward,
                cursor: self.page_info.start_cursor.clone(),
                history: HistoryMode::Push,
                preserve_scroll: false,
            }),
        }
    }

    /// Start the load a trigger requests, transitioning to a loading phase.
    ///
    /// Returns `None` (and stays put) when the trigger is ignored - this is
    /// the debounce: repeated "load more" clicks or viewport signals while a
    /// request is in flight do nothing.
    pub fn advance(&mut self, trigger: PageTrigger) -> Option<PageRequest> {
        let request = self.peek(trigger)?;
        self.phase = match request.direction {
            PageDirection::Forward => PagerPhase::LoadingNext,
            PageDirection::Backward => PagerPhase::LoadingPrevious,
        };
        Some(request)
    }

    /// A requested page finished rendering.
    ///
    /// Returns `false` and changes nothing when the completion belongs to a
    /// superseded fingerprint - a response for parameters that are no longer
    /// current must be ignored, not applied.
    pub fn complete(&mut self, fingerprint: &str, page_info: &PageInfo) -> bool {
        if fingerprint != self.fingerprint {
            tracing::debug!(
                stale = %fingerprint,
                current = %self.fingerprint,
                "Ignoring page completion for superseded parameters"
            );
            return false;
        }

        self.phase = PagerPhase::Idle;
        self.page_info = page_info.clone();
        true
    }

    /// The in-flight load failed; return to idle with cursors unchanged.
    pub fn fail(&mut self) {
        self.phase = PagerPhase::Idle;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page_info(has_next: bool, has_previous: bool) -> PageInfo {
        PageInfo {
            has_next_page: has_next,
            has_previous_page: has_previous,
            start_cursor: has_previous.then(|| "start-1".to_string()),
            end_cursor: has_next.then(|| "end-1".to_string()),
        }
    }

    #[test]
    fn test_forward_trigger_requests_end_cursor() {
        let mut pager = CursorPager::with_page("fp", page_info(true, false));

        let request = pager.advance(PageTrigger::LoadMore).unwrap();
        assert_eq!(request.direction, PageDirection::Forward);
        assert_eq!(request.cursor.as_deref(), Some("end-1"));
        assert_eq!(pager.phase(), PagerPhase::LoadingNext);
    }

    #[test]
    fn test_forward_trigger_without_next_page_is_ignored() {
        let mut pager = CursorPager::with_page("fp", page_info(false, true));
        assert!(pager.advance(PageTrigger::LoadMore).is_none());
        assert_eq!(pager.phase(), PagerPhase::Idle);
    }

    #[test]
    fn test_triggers_while_loading_are_ignored() {
        let mut pager = CursorPager::with_page("fp", page_info(true, true));

        assert!(pager.advance(PageTrigger::ViewportReveal).is_some());
        // Same-direction and opposite-direction triggers both debounce
        assert!(pager.advance(PageTrigger::LoadMore).is_none());
        assert!(pager.advance(PageTrigger::ViewportReveal).is_none());
        assert!(pager.advance(PageTrigger::PreviousLink).is_none());
        assert_eq!(pager.phase(), PagerPhase::LoadingNext);
    }

    #[test]
    fn test_complete_returns_to_idle_and_adopts_cursors() {
        let mut pager = CursorPager::with_page("fp", page_info(true, false));
        pager.advance(PageTrigger::LoadMore).unwrap();

        let next = PageInfo {
            has_next_page: false,
            has_previous_page: true,
            start_cursor: Some("start-2".to_string()),
            end_cursor: Some("end-2".to_string()),
        };
        assert!(pager.complete("fp", &next));
        assert_eq!(pager.phase(), PagerPhase::Idle);
        assert_eq!(pager.page_info(), &next);

        // Loading again is allowed now, backward this time
        assert!(pager.advance(PageTrigger::LoadPrevious).is_some());
    }

    #[test]
    fn test_stale_complete_is_ignored() {
        let mut pager = CursorPager::with_page("fp-old", page_info(true, false));
        pager.advance(PageTrigger::LoadMore).unwrap();

        // Filters changed mid-flight
        pager.reset("fp-new");

        let stale = page_info(true, true);
        assert!(!pager.complete("fp-old", &stale));
        assert_eq!(pager.page_info(), &PageInfo::default());
        assert_eq!(pager.phase(), PagerPhase::Idle);
    }

    #[test]
    fn test_reset_clears_cursors_before_next_fetch() {
        let mut pager = CursorPager::with_page("fp", page_info(true, true));
        pager.reset("fp-2");

        let info = pager.page_info();
        assert_eq!(info.start_cursor, None);
        assert_eq!(info.end_cursor, None);
        assert!(!info.has_previous_page);
        assert!(!info.has_next_page);
    }

    #[test]
    fn test_fail_returns_to_idle_keeping_cursors() {
        let mut pager = CursorPager::with_page("fp", page_info(true, false));
        pager.advance(PageTrigger::LoadMore).unwrap();
        pager.fail();

        assert_eq!(pager.phase(), PagerPhase::Idle);
        assert_eq!(pager.page_info().end_cursor.as_deref(), Some("end-1"));
        // Retry is a fresh user-initiated trigger, never automatic
        assert!(pager.advance(PageTrigger::LoadMore).is_some());
    }

    #[test]
    fn test_scroll_triggers_replace_history_link_triggers_push() {
        let pager = CursorPager::with_page("fp", page_info(true, true));

        let load_more = pager.peek(PageTrigger::LoadMore).unwrap();
        assert_eq!(load_more.history, HistoryMode::Replace);
        assert!(load_more.preserve_scroll);

        let reveal = pager.peek(PageTrigger::ViewportReveal).unwrap();
        assert_eq!(reveal.history, HistoryMode::Replace);
        assert!(reveal.preserve_scroll);

        let next_link = pager.peek(PageTrigger::NextLink).unwrap();
        assert_eq!(next_link.history, HistoryMode::Push);
        assert!(!next_link.preserve_scroll);

        let prev_link = pager.peek(PageTrigger::PreviousLink).unwrap();
        assert_eq!(prev_link.history, HistoryMode::Push);
        assert_eq!(prev_link.cursor.as_deref(), Some("start-1"));
    }

    #[test]
    fn test_fingerprint_is_order_insensitive_for_filters() {
        let a = json!({"available": true});
        let b = json!({"variantOption": {"name": "color", "value": "red"}});

        let fp1 = query_fingerprint(SortOrder::Newest, &[a.clone(), b.clone()]);
        let fp2 = query_fingerprint(SortOrder::Newest, &[b, a]);
        assert_eq!(fp1, fp2);
    }

    #[test]
    fn test_fingerprint_changes_with_sort_and_filters() {
        let filter = json!({"available": true});

        let base = query_fingerprint(SortOrder::Relevance, &[]);
        let sorted = query_fingerprint(SortOrder::PriceHighLow, &[]);
        let filtered = query_fingerprint(SortOrder::Relevance, std::slice::from_ref(&filter));

        assert_ne!(base, sorted);
        assert_ne!(base, filtered);
    }
}
