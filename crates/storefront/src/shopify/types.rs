//! Domain types for the Shopify Storefront API.
//!
//! These types provide a clean, ergonomic API separate from the raw
//! GraphQL wire shapes (see `conversions`). They are the read-only inputs
//! to the view-state core: the option matrix resolver and the selection
//! codec consume [`Product`]; the facet codec consumes [`Facet`]; the
//! cursor pager consumes [`PageInfo`]; the optimistic ledger consumes
//! [`Cart`].

use serde::{Deserialize, Serialize};
use tidepool_core::{CartId, CollectionId, LineId, Price, ProductId, VariantId};

// =============================================================================
// Money Types
// =============================================================================

/// Monetary amount with currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Money {
    /// Parse into a typed [`Price`], if the amount and currency are valid.
    #[must_use]
    pub fn to_price(&self) -> Option<Price> {
        Price::parse(&self.amount, &self.currency_code).ok()
    }

    /// Format for display (e.g., `$19.99`), falling back to the raw amount
    /// when the wire value cannot be parsed.
    #[must_use]
    pub fn display(&self) -> String {
        self.to_price()
            .map_or_else(|| format!("${}", self.amount), |price| price.display())
    }
}

/// Price range for a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRange {
    /// Minimum price among all variants.
    pub min_variant_price: Money,
    /// Maximum price among all variants.
    pub max_variant_price: Money,
}

// =============================================================================
// Image / SEO Types
// =============================================================================

/// Product or collection image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
    /// Image width in pixels.
    pub width: Option<i64>,
    /// Image height in pixels.
    pub height: Option<i64>,
}

/// SEO metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seo {
    /// Page title for search engines.
    pub title: Option<String>,
    /// Meta description.
    pub description: Option<String>,
}

// =============================================================================
// Product Types
// =============================================================================

/// Selected option on a product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Selected value (e.g., "Large", "Blue").
    pub value: String,
}

/// Product option definition.
///
/// Value ordering is stable and drives rendering order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option ID.
    pub id: String,
    /// Option name (e.g., "Size").
    pub name: String,
    /// Available values (e.g., `["Small", "Medium", "Large"]`).
    pub values: Vec<String>,
}

/// A product variant (specific combination of options).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant ID.
    pub id: VariantId,
    /// Variant title (combination of option values).
    pub title: String,
    /// Whether this variant is available for sale.
    pub available_for_sale: bool,
    /// Current price.
    pub price: Money,
    /// Compare-at price (original price if on sale).
    pub compare_at_price: Option<Money>,
    /// Selected options for this variant. Covers exactly the product's
    /// option set.
    pub selected_options: Vec<SelectedOption>,
    /// Variant image.
    pub image: Option<Image>,
}

/// A product in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// Whether any variant is available.
    pub available_for_sale: bool,
    /// Vendor name.
    pub vendor: String,
    /// Product tags.
    pub tags: Vec<String>,
    /// SEO metadata.
    pub seo: Option<Seo>,
    /// Price range across variants.
    pub price_range: PriceRange,
    /// Featured image.
    pub featured_image: Option<Image>,
    /// All product images.
    pub images: Vec<Image>,
    /// Product options, in declared order.
    pub options: Vec<ProductOption>,
    /// Product variants, in declared order.
    pub variants: Vec<ProductVariant>,
}

// =============================================================================
// Collection Types
// =============================================================================

/// A collection of products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    /// Collection ID.
    pub id: CollectionId,
    /// URL handle.
    pub handle: String,
    /// Collection title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// SEO metadata.
    pub seo: Option<Seo>,
    /// Collection image.
    pub image: Option<Image>,
}

// =============================================================================
// Facet (filter) Types
// =============================================================================

/// Kind of a declared collection facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacetKind {
    /// Categorical enumeration (vendor, variant option, availability, ...).
    List,
    /// Continuous numeric price range.
    PriceRange,
}

/// One selectable value of a declared facet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetValue {
    /// Value identifier.
    pub id: String,
    /// Human-readable label.
    pub label: String,
    /// Number of matching products.
    pub count: i64,
    /// Machine-readable filter input. Passing this JSON back to the catalog
    /// query applies the filter.
    pub input: serde_json::Value,
}

/// A declared filterable dimension of a collection.
///
/// Supplied by the catalog per page load; immutable for that load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facet {
    /// Facet identifier.
    pub id: String,
    /// Display label (e.g., "Color", "Price").
    pub label: String,
    /// Facet kind.
    pub kind: FacetKind,
    /// Candidate values.
    pub values: Vec<FacetValue>,
}

// =============================================================================
// Pagination Types
// =============================================================================

/// Pagination information.
///
/// Cursors are opaque and only meaningful relative to the sort/filter
/// parameters that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Whether there are more items after this page.
    pub has_next_page: bool,
    /// Whether there are items before this page.
    pub has_previous_page: bool,
    /// Cursor for the first item.
    pub start_cursor: Option<String>,
    /// Cursor for the last item.
    pub end_cursor: Option<String>,
}

/// Paginated list of products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConnection {
    /// Products in this page.
    pub products: Vec<Product>,
    /// Pagination info.
    pub page_info: PageInfo,
}

/// One page of a collection: the collection itself, a page of its products,
/// and the facets declared for filtering it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionPage {
    /// The collection.
    pub collection: Collection,
    /// Products on this page.
    pub products: Vec<Product>,
    /// Declared facets for this collection.
    pub facets: Vec<Facet>,
    /// Pagination info.
    pub page_info: PageInfo,
}

// =============================================================================
// Cart Types
// =============================================================================

/// Simplified product info for cart merchandise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartMerchandiseProduct {
    /// Product ID.
    pub id: ProductId,
    /// Product handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Featured image.
    pub featured_image: Option<Image>,
}

/// Merchandise in a cart line (simplified product variant info).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartMerchandise {
    /// Variant ID.
    pub id: VariantId,
    /// Variant title.
    pub title: String,
    /// Whether available for sale.
    pub available_for_sale: bool,
    /// Current price.
    pub price: Money,
    /// Selected options.
    pub selected_options: Vec<SelectedOption>,
    /// Variant image.
    pub image: Option<Image>,
    /// Parent product info.
    pub product: CartMerchandiseProduct,
}

/// Cost for a cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineCost {
    /// Price per unit.
    pub amount_per_quantity: Money,
    /// Subtotal (before discounts).
    pub subtotal_amount: Money,
    /// Total (after discounts).
    pub total_amount: Money,
}

/// Discount allocation on a cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountAllocation {
    /// Amount discounted.
    pub discounted_amount: Money,
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Cart line ID.
    pub id: LineId,
    /// Quantity (non-negative).
    pub quantity: i64,
    /// Line cost.
    pub cost: CartLineCost,
    /// Product variant.
    pub merchandise: CartMerchandise,
    /// Discount amounts applied to this line.
    pub discount_allocations: Vec<DiscountAllocation>,
}

/// Cart cost summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartCost {
    /// Subtotal before tax/shipping.
    pub subtotal: Money,
    /// Total amount.
    pub total: Money,
    /// Total tax amount.
    pub total_tax: Option<Money>,
}

/// Discount code applied to cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartDiscountCode {
    /// The discount code.
    pub code: String,
    /// Whether the code is applicable.
    pub applicable: bool,
}

/// A shopping cart.
///
/// Owned by the remote cart authority; each snapshot wholly replaces the
/// previous one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Cart ID.
    pub id: CartId,
    /// Checkout URL.
    pub checkout_url: String,
    /// Total item quantity.
    pub total_quantity: i64,
    /// Cart cost summary.
    pub cost: CartCost,
    /// Applied discount codes.
    pub discount_codes: Vec<CartDiscountCode>,
    /// Cart lines.
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Find a line by its ID.
    #[must_use]
    pub fn line(&self, id: &LineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.id == id)
    }
}

/// Input for adding a line to cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineInput {
    /// Product variant ID.
    pub merchandise_id: VariantId,
    /// Quantity to add.
    pub quantity: i64,
}

/// Input for updating a cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineUpdateInput {
    /// Cart line ID.
    pub id: LineId,
    /// New quantity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    /// New merchandise ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchandise_id: Option<VariantId>,
}

/// User error from cart mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartUserError {
    /// Error code.
    pub code: Option<String>,
    /// Field path that caused the error.
    pub field: Option<Vec<String>>,
    /// Human-readable error message.
    pub message: String,
}

// =============================================================================
// Sort Keys
// =============================================================================

/// Sort keys for product search queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductSortKey {
    /// Sort by title.
    Title,
    /// Sort by vendor.
    Vendor,
    /// Sort by last update.
    UpdatedAt,
    /// Sort by creation date.
    CreatedAt,
    /// Sort by best selling.
    BestSelling,
    /// Sort by price.
    Price,
    /// Sort by ID.
    Id,
    /// Sort by relevance (for search).
    Relevance,
}

impl ProductSortKey {
    /// Wire token understood by the catalog query.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "TITLE",
            Self::Vendor => "VENDOR",
            Self::UpdatedAt => "UPDATED_AT",
            Self::CreatedAt => "CREATED_AT",
            Self::BestSelling => "BEST_SELLING",
            Self::Price => "PRICE",
            Self::Id => "ID",
            Self::Relevance => "RELEVANCE",
        }
    }
}

/// Sort keys for collection product queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductCollectionSortKey {
    /// Default collection order.
    CollectionDefault,
    /// Sort by title.
    Title,
    /// Sort by price.
    Price,
    /// Sort by best selling.
    BestSelling,
    /// Sort by creation date.
    Created,
    /// Sort by ID.
    Id,
    /// Sort manually.
    Manual,
    /// Sort by relevance.
    Relevance,
}

impl ProductCollectionSortKey {
    /// Wire token understood by the catalog query.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CollectionDefault => "COLLECTION_DEFAULT",
            Self::Title => "TITLE",
            Self::Price => "PRICE",
            Self::BestSelling => "BEST_SELLING",
            Self::Created => "CREATED",
            Self::Id => "ID",
            Self::Manual => "MANUAL",
            Self::Relevance => "RELEVANCE",
        }
    }
}

/// Intent for product recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductRecommendationIntent {
    /// Related products.
    Related,
    /// Complementary products.
    Complementary,
}

impl ProductRecommendationIntent {
    /// Wire token understood by the catalog query.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Related => "RELATED",
            Self::Complementary => "COMPLEMENTARY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_display_parses_wire_amount() {
        let money = Money {
            amount: "19.9".to_string(),
            currency_code: "USD".to_string(),
        };
        assert_eq!(money.display(), "$19.90");
    }

    #[test]
    fn test_money_display_falls_back_on_garbage() {
        let money = Money {
            amount: "n/a".to_string(),
            currency_code: "USD".to_string(),
        };
        assert_eq!(money.display(), "$n/a");
    }

    #[test]
    fn test_cart_line_lookup() {
        let cart = Cart {
            id: CartId::new("cart-1"),
            checkout_url: "https://checkout.test/1".to_string(),
            total_quantity: 1,
            cost: CartCost {
                subtotal: Money {
                    amount: "10.00".to_string(),
                    currency_code: "USD".to_string(),
                },
                total: Money {
                    amount: "10.00".to_string(),
                    currency_code: "USD".to_string(),
                },
                total_tax: None,
            },
            discount_codes: Vec::new(),
            lines: Vec::new(),
        };
        assert!(cart.line(&LineId::new("missing")).is_none());
    }
}
