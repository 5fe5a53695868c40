//! Product route handlers.
//!
//! The product page is driven by the option selection in the query string:
//! decode it, resolve it against the option matrix, and hand back the
//! resolved variant, per-value availability, and a navigation target for
//! every selectable value.

use axum::{
    Json,
    extract::{Path, RawQuery, State},
};
use serde::Serialize;
use tracing::instrument;

use crate::catalog::NavigationTarget;
use crate::catalog::options::{self, OptionState};
use crate::catalog::selection::{self, Selection};
use crate::error::Result;
use crate::shopify::types::{Money, Product, ProductRecommendationIntent, ProductVariant};
use crate::state::AppState;

/// Image display data.
#[derive(Debug, Clone, Serialize)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
}

/// Compact product display data for listings and recommendations.
#[derive(Debug, Clone, Serialize)]
pub struct ProductCardView {
    pub handle: String,
    pub title: String,
    pub price: String,
    pub available_for_sale: bool,
    pub image: Option<ImageView>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            handle: product.handle.clone(),
            title: product.title.clone(),
            price: product.price_range.min_variant_price.display(),
            available_for_sale: product.available_for_sale,
            image: product.featured_image.as_ref().map(|img| ImageView {
                url: img.url.clone(),
                alt: img.alt_text.clone().unwrap_or_default(),
            }),
        }
    }
}

/// Variant display data.
#[derive(Debug, Clone, Serialize)]
pub struct VariantView {
    pub id: String,
    pub title: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub available_for_sale: bool,
}

impl From<&ProductVariant> for VariantView {
    fn from(variant: &ProductVariant) -> Self {
        Self {
            id: variant.id.to_string(),
            title: variant.title.clone(),
            price: variant.price.display(),
            compare_at_price: variant.compare_at_price.as_ref().map(Money::display),
            available_for_sale: variant.available_for_sale,
        }
    }
}

/// One selectable option value, with its render state and the navigation
/// target that selecting it produces.
#[derive(Debug, Clone, Serialize)]
pub struct OptionValueView {
    pub value: String,
    pub selected: bool,
    pub available: bool,
    pub target: NavigationTarget,
}

/// One product option.
#[derive(Debug, Clone, Serialize)]
pub struct OptionView {
    pub name: String,
    pub values: Vec<OptionValueView>,
}

/// Product page view state.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPageView {
    pub handle: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub images: Vec<ImageView>,
    /// The variant to display and price. Absent only for a product with no
    /// variants.
    pub selected_variant: Option<VariantView>,
    pub options: Vec<OptionView>,
    /// Canonical query string for the current selection (deep link).
    pub canonical_query: String,
}

fn option_views(product: &Product, current: &Selection, states: &[OptionState]) -> Vec<OptionView> {
    states
        .iter()
        .map(|option| OptionView {
            name: option.name.clone(),
            values: option
                .values
                .iter()
                .map(|value| OptionValueView {
                    value: value.value.clone(),
                    selected: value.selected,
                    available: value.available,
                    target: selection::select_value(product, current, &option.name, &value.value),
                })
                .collect(),
        })
        .collect()
}

/// Product page state for the given handle and selection query.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Json<ProductPageView>> {
    let product = state.catalog().product_by_handle(&handle).await?;

    let current = selection::decode(query.as_deref().unwrap_or(""), &product);
    let resolution = options::resolve(&product, &current);

    Ok(Json(ProductPageView {
        handle: product.handle.clone(),
        title: product.title.clone(),
        description: product.description.clone(),
        tags: product.tags.clone(),
        images: product
            .images
            .iter()
            .map(|img| ImageView {
                url: img.url.clone(),
                alt: img.alt_text.clone().unwrap_or_default(),
            })
            .collect(),
        selected_variant: resolution.variant.map(VariantView::from),
        options: option_views(&product, &current, &resolution.options),
        canonical_query: selection::encode(&current, &product),
    }))
}

/// Recommended products for a product page.
#[instrument(skip(state))]
pub async fn recommendations(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Vec<ProductCardView>>> {
    let product = state.catalog().product_by_handle(&handle).await?;
    let related = state
        .catalog()
        .recommendations(product.id.as_str(), Some(ProductRecommendationIntent::Related))
        .await?;

    Ok(Json(related.iter().map(ProductCardView::from).collect()))
}
