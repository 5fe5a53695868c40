//! Collection route handlers.
//!
//! The collection page round-trips three kinds of state through the query
//! string: facet filters (`filter.*` keys, JSON values), the sort token
//! (`sort`), and pagination cursors (`after`/`before`). Filter and sort
//! targets always drop cursors - cursors belong to the parameters that
//! produced them.

use axum::{
    Json,
    extract::{Path, RawQuery, State},
};
use serde::Serialize;
use tracing::instrument;
use url::form_urlencoded;

use crate::catalog::NavigationTarget;
use crate::catalog::filters::{self, AppliedFilter, FilterCandidate, SORT_MENU, SortOrder};
use crate::catalog::pager::{CursorPager, PageDirection, PageRequest, PageTrigger, query_fingerprint};
use crate::error::Result;
use crate::shopify::types::{Collection, Facet, FacetKind};
use crate::shopify::{CollectionPageParams, PageSelection};
use crate::state::AppState;

pub use super::products::{ImageView, ProductCardView};

/// Products per page for collection and search views.
pub(crate) const PRODUCTS_PER_PAGE: i64 = 12;

// =============================================================================
// Query-string plumbing shared with the search route
// =============================================================================

/// Split a raw query string into decoded `(key, value)` pairs.
pub(crate) fn parse_query_pairs(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// First value for a key, if present.
pub(crate) fn query_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Build a collection/search query string from sort + carried pairs + an
/// optional cursor. Pairs are re-encoded verbatim; the sort token is only
/// emitted for non-default orders.
pub(crate) fn build_query(
    sort: SortOrder,
    pairs: &[(String, String)],
    cursor: Option<(&str, &str)>,
) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    if let Some(token) = sort.token() {
        serializer.append_pair("sort", token);
    }
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    if let Some((key, value)) = cursor {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Turn a pager request into a navigation target for this parameter set.
pub(crate) fn navigation_for(
    sort: SortOrder,
    pairs: &[(String, String)],
    request: &PageRequest,
) -> NavigationTarget {
    let cursor_key = match request.direction {
        PageDirection::Forward => "after",
        PageDirection::Backward => "before",
    };
    NavigationTarget {
        query: build_query(
            sort,
            pairs,
            request.cursor.as_deref().map(|c| (cursor_key, c)),
        ),
        history: request.history,
        preserve_scroll: request.preserve_scroll,
    }
}

// =============================================================================
// View models
// =============================================================================

/// Collection display data.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionView {
    pub handle: String,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<ImageView>,
}

impl From<&Collection> for CollectionView {
    fn from(collection: &Collection) -> Self {
        Self {
            handle: collection.handle.clone(),
            title: collection.title.clone(),
            description: if collection.description.is_empty() {
                None
            } else {
                Some(collection.description.clone())
            },
            image: collection.image.as_ref().map(|img| ImageView {
                url: img.url.clone(),
                alt: img.alt_text.clone().unwrap_or_default(),
            }),
        }
    }
}

/// An active filter with the target that removes it.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedFilterView {
    pub label: String,
    pub remove_target: NavigationTarget,
}

/// One selectable facet value with its toggle target.
#[derive(Debug, Clone, Serialize)]
pub struct FacetValueView {
    pub label: String,
    pub count: i64,
    pub active: bool,
    pub toggle_target: NavigationTarget,
}

/// One declared facet.
#[derive(Debug, Clone, Serialize)]
pub struct FacetView {
    pub id: String,
    pub label: String,
    pub values: Vec<FacetValueView>,
}

/// One sort menu entry.
#[derive(Debug, Clone, Serialize)]
pub struct SortOptionView {
    pub token: Option<&'static str>,
    pub label: &'static str,
    pub selected: bool,
    pub target: NavigationTarget,
}

/// Pagination view state.
#[derive(Debug, Clone, Serialize)]
pub struct PagerView {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    /// Scroll-preserving forward load (also fired by viewport reveal).
    pub load_more: Option<NavigationTarget>,
    /// Explicit next-page link (new history entry).
    pub next: Option<NavigationTarget>,
    /// Explicit previous-page link (new history entry).
    pub previous: Option<NavigationTarget>,
}

/// Collection page view state.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionPageView {
    pub collection: CollectionView,
    pub products: Vec<ProductCardView>,
    pub applied_filters: Vec<AppliedFilterView>,
    pub facets: Vec<FacetView>,
    pub sort_options: Vec<SortOptionView>,
    pub pager: PagerView,
}

// =============================================================================
// View assembly
// =============================================================================

/// Filter `(key, raw)` pairs carried into built URLs, optionally excluding
/// one candidate (for remove/toggle-off targets).
fn filter_pairs(
    candidates: &[FilterCandidate],
    excluded: Option<&serde_json::Value>,
) -> Vec<(String, String)> {
    candidates
        .iter()
        .filter(|candidate| excluded != Some(&candidate.input))
        .map(|candidate| (candidate.key.clone(), candidate.raw.clone()))
        .collect()
}

fn applied_filter_views(
    sort: SortOrder,
    candidates: &[FilterCandidate],
    applied: &[AppliedFilter],
) -> Vec<AppliedFilterView> {
    applied
        .iter()
        .map(|filter| AppliedFilterView {
            label: filter.label.clone(),
            // Removing a filter changes the parameter set: cursors dropped
            remove_target: NavigationTarget::push(build_query(
                sort,
                &filter_pairs(candidates, Some(&filter.input)),
                None,
            )),
        })
        .collect()
}

fn facet_views(
    sort: SortOrder,
    candidates: &[FilterCandidate],
    facets: &[Facet],
) -> Vec<FacetView> {
    facets
        .iter()
        .map(|facet| FacetView {
            id: facet.id.clone(),
            label: facet.label.clone(),
            values: facet
                .values
                .iter()
                .map(|value| {
                    // A price facet is active when any price input is applied
                    let active = candidates.iter().any(|candidate| {
                        if facet.kind == FacetKind::PriceRange {
                            candidate.input.get("price").is_some()
                        } else {
                            candidate.input == value.input
                        }
                    });

                    let toggle_pairs = if active {
                        let excluded = if facet.kind == FacetKind::PriceRange {
                            candidates
                                .iter()
                                .find(|c| c.input.get("price").is_some())
                                .map(|c| c.input.clone())
                        } else {
                            Some(value.input.clone())
                        };
                        filter_pairs(candidates, excluded.as_ref())
                    } else {
                        let mut pairs = filter_pairs(candidates, None);
                        pairs.push((facet.id.clone(), value.input.to_string()));
                        pairs
                    };

                    FacetValueView {
                        label: value.label.clone(),
                        count: value.count,
                        active,
                        toggle_target: NavigationTarget::push(build_query(
                            sort,
                            &toggle_pairs,
                            None,
                        )),
                    }
                })
                .collect(),
        })
        .collect()
}

pub(crate) fn sort_option_views(
    current: SortOrder,
    pairs: &[(String, String)],
) -> Vec<SortOptionView> {
    SORT_MENU
        .iter()
        .map(|order| SortOptionView {
            token: order.token(),
            label: order.label(),
            selected: *order == current,
            // Changing sort invalidates cursors: none are carried over
            target: NavigationTarget::push(build_query(*order, pairs, None)),
        })
        .collect()
}

pub(crate) fn pager_view(
    pager: &CursorPager,
    sort: SortOrder,
    pairs: &[(String, String)],
) -> PagerView {
    let page_info = pager.page_info();
    PagerView {
        has_next_page: page_info.has_next_page,
        has_previous_page: page_info.has_previous_page,
        load_more: pager
            .peek(PageTrigger::LoadMore)
            .map(|req| navigation_for(sort, pairs, &req)),
        next: pager
            .peek(PageTrigger::NextLink)
            .map(|req| navigation_for(sort, pairs, &req)),
        previous: pager
            .peek(PageTrigger::PreviousLink)
            .map(|req| navigation_for(sort, pairs, &req)),
    }
}

// =============================================================================
// Handler
// =============================================================================

/// Collection page state: filtered/sorted products plus facet, sort, and
/// pagination targets.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Json<CollectionPageView>> {
    let pairs = parse_query_pairs(query.as_deref().unwrap_or(""));

    let sort = SortOrder::from_token(query_value(&pairs, "sort"));
    let candidates = filters::parse_filters(&pairs);
    let inputs: Vec<serde_json::Value> = candidates.iter().map(|c| c.input.clone()).collect();

    let (sort_key, reverse) = sort.collection_sort();
    let page = match (
        query_value(&pairs, "after"),
        query_value(&pairs, "before"),
    ) {
        (_, Some(before)) => PageSelection::Backward {
            last: PRODUCTS_PER_PAGE,
            before: Some(before.to_string()),
        },
        (after, None) => PageSelection::Forward {
            first: PRODUCTS_PER_PAGE,
            after: after.map(ToString::to_string),
        },
    };

    let params = CollectionPageParams {
        filters: inputs.clone(),
        sort_key,
        reverse,
        page,
    };
    let page_data = state.catalog().collection_page(&handle, &params).await?;

    let applied = filters::resolve_applied(&candidates, &page_data.facets);
    let carried = filter_pairs(&candidates, None);

    let pager = CursorPager::with_page(
        query_fingerprint(sort, &inputs),
        page_data.page_info.clone(),
    );

    Ok(Json(CollectionPageView {
        collection: CollectionView::from(&page_data.collection),
        products: page_data.products.iter().map(ProductCardView::from).collect(),
        applied_filters: applied_filter_views(sort, &candidates, &applied),
        facets: facet_views(sort, &candidates, &page_data.facets),
        sort_options: sort_option_views(sort, &carried),
        pager: pager_view(&pager, sort, &carried),
    }))
}
