//! Wire-to-domain conversions for Storefront API responses.
//!
//! Wire structs mirror the camelCase GraphQL response shapes; conversion
//! functions produce the domain types in [`super::types`]. Facet inputs
//! arrive as JSON-encoded strings and are parsed here; values that fail to
//! parse are dropped with a diagnostic rather than surfaced as errors.

use serde::Deserialize;
use tracing::warn;

use super::types::{
    Cart, CartCost, CartDiscountCode, CartLine, CartLineCost, CartMerchandise,
    CartMerchandiseProduct, CartUserError, Collection, CollectionPage, DiscountAllocation, Facet,
    FacetKind, FacetValue, Image, Money, PageInfo, PriceRange, Product, ProductConnection,
    ProductOption, ProductVariant, SelectedOption, Seo,
};

// =============================================================================
// Wire shapes (GraphQL response JSON)
// =============================================================================

/// Connection wrapper for `nodes`-style pagination.
#[derive(Debug, Deserialize)]
pub(super) struct Nodes<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

// Manual impl: the derive would needlessly require `T: Default`
impl<T> Default for Nodes<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireMoney {
    pub amount: String,
    pub currency_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireImage {
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireSeo {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WirePriceRange {
    pub min_variant_price: WireMoney,
    pub max_variant_price: WireMoney,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireSelectedOption {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireProductOption {
    pub id: String,
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireVariant {
    pub id: String,
    pub title: String,
    pub available_for_sale: bool,
    pub price: WireMoney,
    pub compare_at_price: Option<WireMoney>,
    pub selected_options: Vec<WireSelectedOption>,
    pub image: Option<WireImage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireProduct {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub available_for_sale: bool,
    pub vendor: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub seo: Option<WireSeo>,
    pub price_range: WirePriceRange,
    pub featured_image: Option<WireImage>,
    #[serde(default)]
    pub images: Nodes<WireImage>,
    #[serde(default = "Vec::new")]
    pub options: Vec<WireProductOption>,
    #[serde(default)]
    pub variants: Nodes<WireVariant>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WirePageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireFilterValue {
    pub id: String,
    pub label: String,
    pub count: i64,
    /// JSON-encoded filter input object.
    pub input: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireFilter {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub values: Vec<WireFilterValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireProductConnection {
    pub nodes: Vec<WireProduct>,
    pub page_info: WirePageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireFilteredProductConnection {
    #[serde(default = "Vec::new")]
    pub filters: Vec<WireFilter>,
    pub nodes: Vec<WireProduct>,
    pub page_info: WirePageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireCollection {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub seo: Option<WireSeo>,
    pub image: Option<WireImage>,
    pub products: WireFilteredProductConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireMerchandiseProduct {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub featured_image: Option<WireImage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireMerchandise {
    pub id: String,
    pub title: String,
    pub available_for_sale: bool,
    pub price: WireMoney,
    pub selected_options: Vec<WireSelectedOption>,
    pub image: Option<WireImage>,
    pub product: WireMerchandiseProduct,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireCartLineCost {
    pub amount_per_quantity: WireMoney,
    pub subtotal_amount: WireMoney,
    pub total_amount: WireMoney,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireDiscountAllocation {
    pub discounted_amount: WireMoney,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireCartLine {
    pub id: String,
    pub quantity: i64,
    pub cost: WireCartLineCost,
    #[serde(default = "Vec::new")]
    pub discount_allocations: Vec<WireDiscountAllocation>,
    pub merchandise: WireMerchandise,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireCartCost {
    pub subtotal_amount: WireMoney,
    pub total_amount: WireMoney,
    pub total_tax_amount: Option<WireMoney>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireDiscountCode {
    pub code: String,
    pub applicable: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireCart {
    pub id: String,
    pub checkout_url: String,
    pub total_quantity: i64,
    pub cost: WireCartCost,
    #[serde(default = "Vec::new")]
    pub discount_codes: Vec<WireDiscountCode>,
    #[serde(default)]
    pub lines: Nodes<WireCartLine>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireUserError {
    pub code: Option<String>,
    pub field: Option<Vec<String>>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireCartPayload {
    pub cart: Option<WireCart>,
    #[serde(default = "Vec::new")]
    pub user_errors: Vec<WireUserError>,
}

// =============================================================================
// Query data roots
// =============================================================================

#[derive(Debug, Deserialize)]
pub(super) struct ProductData {
    pub product: Option<WireProduct>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CollectionPageData {
    pub collection: Option<WireCollection>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchData {
    pub products: WireProductConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RecommendationsData {
    pub product_recommendations: Option<Vec<WireProduct>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CartData {
    pub cart: Option<WireCart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CartCreateData {
    pub cart_create: Option<WireCartPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CartLinesAddData {
    pub cart_lines_add: Option<WireCartPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CartLinesUpdateData {
    pub cart_lines_update: Option<WireCartPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CartLinesRemoveData {
    pub cart_lines_remove: Option<WireCartPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CartDiscountCodesUpdateData {
    pub cart_discount_codes_update: Option<WireCartPayload>,
}

// =============================================================================
// Conversions
// =============================================================================

fn convert_money(money: WireMoney) -> Money {
    Money {
        amount: money.amount,
        currency_code: money.currency_code,
    }
}

fn convert_image(image: WireImage) -> Image {
    Image {
        url: image.url,
        alt_text: image.alt_text,
        width: image.width,
        height: image.height,
    }
}

fn convert_seo(seo: WireSeo) -> Seo {
    Seo {
        title: seo.title,
        description: seo.description,
    }
}

fn convert_selected_option(option: WireSelectedOption) -> SelectedOption {
    SelectedOption {
        name: option.name,
        value: option.value,
    }
}

fn convert_variant(variant: WireVariant) -> ProductVariant {
    ProductVariant {
        id: variant.id.into(),
        title: variant.title,
        available_for_sale: variant.available_for_sale,
        price: convert_money(variant.price),
        compare_at_price: variant.compare_at_price.map(convert_money),
        selected_options: variant
            .selected_options
            .into_iter()
            .map(convert_selected_option)
            .collect(),
        image: variant.image.map(convert_image),
    }
}

pub(super) fn convert_product(product: WireProduct) -> Product {
    Product {
        id: product.id.into(),
        handle: product.handle,
        title: product.title,
        description: product.description,
        available_for_sale: product.available_for_sale,
        vendor: product.vendor,
        tags: product.tags,
        seo: product.seo.map(convert_seo),
        price_range: PriceRange {
            min_variant_price: convert_money(product.price_range.min_variant_price),
            max_variant_price: convert_money(product.price_range.max_variant_price),
        },
        featured_image: product.featured_image.map(convert_image),
        images: product.images.nodes.into_iter().map(convert_image).collect(),
        options: product
            .options
            .into_iter()
            .map(|o| ProductOption {
                id: o.id,
                name: o.name,
                values: o.values,
            })
            .collect(),
        variants: product
            .variants
            .nodes
            .into_iter()
            .map(convert_variant)
            .collect(),
    }
}

fn convert_page_info(page_info: WirePageInfo) -> PageInfo {
    PageInfo {
        has_next_page: page_info.has_next_page,
        has_previous_page: page_info.has_previous_page,
        start_cursor: page_info.start_cursor,
        end_cursor: page_info.end_cursor,
    }
}

/// Convert a declared filter, parsing each value's JSON input.
///
/// Values whose input fails to parse are dropped with a diagnostic.
fn convert_filter(filter: WireFilter) -> Facet {
    let kind = match filter.kind.as_str() {
        "PRICE_RANGE" => FacetKind::PriceRange,
        // LIST and BOOLEAN are both categorical for our purposes
        _ => FacetKind::List,
    };

    let values = filter
        .values
        .into_iter()
        .filter_map(|value| match serde_json::from_str(&value.input) {
            Ok(input) => Some(FacetValue {
                id: value.id,
                label: value.label,
                count: value.count,
                input,
            }),
            Err(e) => {
                warn!(
                    filter_value = %value.id,
                    error = %e,
                    "Dropping facet value with undecodable input"
                );
                None
            }
        })
        .collect();

    Facet {
        id: filter.id,
        label: filter.label,
        kind,
        values,
    }
}

pub(super) fn convert_collection_page(collection: WireCollection) -> CollectionPage {
    let products = collection.products;
    CollectionPage {
        collection: Collection {
            id: collection.id.into(),
            handle: collection.handle,
            title: collection.title,
            description: collection.description,
            seo: collection.seo.map(convert_seo),
            image: collection.image.map(convert_image),
        },
        products: products.nodes.into_iter().map(convert_product).collect(),
        facets: products.filters.into_iter().map(convert_filter).collect(),
        page_info: convert_page_info(products.page_info),
    }
}

pub(super) fn convert_product_connection(connection: WireProductConnection) -> ProductConnection {
    ProductConnection {
        products: connection
            .nodes
            .into_iter()
            .map(convert_product)
            .collect(),
        page_info: convert_page_info(connection.page_info),
    }
}

fn convert_cart_line(line: WireCartLine) -> CartLine {
    CartLine {
        id: line.id.into(),
        quantity: line.quantity,
        cost: CartLineCost {
            amount_per_quantity: convert_money(line.cost.amount_per_quantity),
            subtotal_amount: convert_money(line.cost.subtotal_amount),
            total_amount: convert_money(line.cost.total_amount),
        },
        merchandise: CartMerchandise {
            id: line.merchandise.id.into(),
            title: line.merchandise.title,
            available_for_sale: line.merchandise.available_for_sale,
            price: convert_money(line.merchandise.price),
            selected_options: line
                .merchandise
                .selected_options
                .into_iter()
                .map(convert_selected_option)
                .collect(),
            image: line.merchandise.image.map(convert_image),
            product: CartMerchandiseProduct {
                id: line.merchandise.product.id.into(),
                handle: line.merchandise.product.handle,
                title: line.merchandise.product.title,
                featured_image: line.merchandise.product.featured_image.map(convert_image),
            },
        },
        discount_allocations: line
            .discount_allocations
            .into_iter()
            .map(|a| DiscountAllocation {
                discounted_amount: convert_money(a.discounted_amount),
            })
            .collect(),
    }
}

pub(super) fn convert_cart(cart: WireCart) -> Cart {
    Cart {
        id: cart.id.into(),
        checkout_url: cart.checkout_url,
        total_quantity: cart.total_quantity,
        cost: CartCost {
            subtotal: convert_money(cart.cost.subtotal_amount),
            total: convert_money(cart.cost.total_amount),
            total_tax: cart.cost.total_tax_amount.map(convert_money),
        },
        discount_codes: cart
            .discount_codes
            .into_iter()
            .map(|d| CartDiscountCode {
                code: d.code,
                applicable: d.applicable,
            })
            .collect(),
        lines: cart
            .lines
            .nodes
            .into_iter()
            .map(convert_cart_line)
            .collect(),
    }
}

pub(super) fn convert_user_errors(errors: Vec<WireUserError>) -> Vec<CartUserError> {
    errors
        .into_iter()
        .map(|e| CartUserError {
            code: e.code,
            field: e.field,
            message: e.message,
        })
        .collect()
}
