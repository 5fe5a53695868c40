//! Search route handlers.
//!
//! Store-wide product search shares the sort and pagination plumbing of the
//! collection view; there are no declared facets here, and an absent or
//! unrecognized sort token falls back to relevance ordering.

use axum::{
    Json,
    extract::{RawQuery, State},
};
use serde::Serialize;
use tracing::instrument;

use crate::catalog::filters::SortOrder;
use crate::catalog::pager::{CursorPager, query_fingerprint};
use crate::error::Result;
use crate::shopify::{PageSelection, SearchParams};
use crate::state::AppState;

use super::collections::{
    PRODUCTS_PER_PAGE, PagerView, SortOptionView, parse_query_pairs, pager_view, query_value,
    sort_option_views,
};
use super::products::ProductCardView;

/// Search page view state.
#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    /// The search query, empty when browsing all products.
    pub query: String,
    pub products: Vec<ProductCardView>,
    pub sort_options: Vec<SortOptionView>,
    pub pager: PagerView,
}

/// Search page state for a query string of `q`, `sort`, `after`/`before`.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<SearchView>> {
    let pairs = parse_query_pairs(query.as_deref().unwrap_or(""));

    let q = query_value(&pairs, "q").unwrap_or("").trim().to_string();
    let sort = SortOrder::from_token(query_value(&pairs, "sort"));
    let (sort_key, reverse) = sort.search_sort();

    let page = match (query_value(&pairs, "after"), query_value(&pairs, "before")) {
        (_, Some(before)) => PageSelection::Backward {
            last: PRODUCTS_PER_PAGE,
            before: Some(before.to_string()),
        },
        (after, None) => PageSelection::Forward {
            first: PRODUCTS_PER_PAGE,
            after: after.map(ToString::to_string),
        },
    };

    let params = SearchParams {
        query: if q.is_empty() { None } else { Some(q.clone()) },
        sort_key,
        reverse,
        page,
    };
    let connection = state.catalog().search_products(&params).await?;

    // The search term is part of the parameter fingerprint: changing it
    // invalidates held cursors just like a filter change would
    let fingerprint = format!("q:{q}|{}", query_fingerprint(sort, &[]));
    let pager = CursorPager::with_page(fingerprint, connection.page_info.clone());

    let carried: Vec<(String, String)> = if q.is_empty() {
        Vec::new()
    } else {
        vec![("q".to_string(), q.clone())]
    };

    Ok(Json(SearchView {
        query: q,
        products: connection
            .products
            .iter()
            .map(ProductCardView::from)
            .collect(),
        sort_options: sort_option_views(sort, &carried),
        pager: pager_view(&pager, sort, &carried),
    }))
}
