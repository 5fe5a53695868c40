//! Catalog and cart fixtures for integration tests.

use tidepool_core::{CartId, LineId, ProductId, VariantId};
use tidepool_storefront::shopify::types::{
    Cart, CartCost, CartLine, CartLineCost, CartMerchandise, CartMerchandiseProduct, Money,
    PriceRange, Product, ProductOption, ProductVariant, SelectedOption,
};

/// A USD money value.
#[must_use]
pub fn money(amount: &str) -> Money {
    Money {
        amount: amount.to_string(),
        currency_code: "USD".to_string(),
    }
}

/// A variant with the given availability and `(option, value)` pairs.
#[must_use]
pub fn variant(id: &str, available: bool, options: &[(&str, &str)]) -> ProductVariant {
    ProductVariant {
        id: VariantId::new(id),
        title: options
            .iter()
            .map(|(_, v)| *v)
            .collect::<Vec<_>>()
            .join(" / "),
        available_for_sale: available,
        price: money("25.00"),
        compare_at_price: None,
        selected_options: options
            .iter()
            .map(|(name, value)| SelectedOption {
                name: (*name).to_string(),
                value: (*value).to_string(),
            })
            .collect(),
        image: None,
    }
}

/// A product with the given options and variants.
#[must_use]
pub fn product(
    handle: &str,
    options: &[(&str, &[&str])],
    variants: Vec<ProductVariant>,
) -> Product {
    Product {
        id: ProductId::new(format!("gid://shopify/Product/{handle}")),
        handle: handle.to_string(),
        title: handle.to_string(),
        description: String::new(),
        available_for_sale: variants.iter().any(|v| v.available_for_sale),
        vendor: "Tidepool".to_string(),
        tags: Vec::new(),
        seo: None,
        price_range: PriceRange {
            min_variant_price: money("25.00"),
            max_variant_price: money("25.00"),
        },
        featured_image: None,
        images: Vec::new(),
        options: options
            .iter()
            .enumerate()
            .map(|(i, (name, values))| ProductOption {
                id: format!("opt-{i}"),
                name: (*name).to_string(),
                values: values.iter().map(|v| (*v).to_string()).collect(),
            })
            .collect(),
        variants,
    }
}

/// A cart line with the given quantity.
#[must_use]
pub fn cart_line(id: &str, quantity: i64) -> CartLine {
    CartLine {
        id: LineId::new(id),
        quantity,
        cost: CartLineCost {
            amount_per_quantity: money("25.00"),
            subtotal_amount: money("25.00"),
            total_amount: money("25.00"),
        },
        merchandise: CartMerchandise {
            id: VariantId::new("gid://shopify/ProductVariant/1"),
            title: "M / Blue".to_string(),
            available_for_sale: true,
            price: money("25.00"),
            selected_options: Vec::new(),
            image: None,
            product: CartMerchandiseProduct {
                id: ProductId::new("gid://shopify/Product/1"),
                handle: "tide-chart-tee".to_string(),
                title: "Tide Chart Tee".to_string(),
                featured_image: None,
            },
        },
        discount_allocations: Vec::new(),
    }
}

/// A cart snapshot with the given lines and subtotal.
#[must_use]
pub fn cart(subtotal: &str, lines: Vec<CartLine>) -> Cart {
    let total_quantity = lines.iter().map(|l| l.quantity).sum();
    Cart {
        id: CartId::new("gid://shopify/Cart/c1"),
        checkout_url: "https://shop.test/checkout/c1".to_string(),
        total_quantity,
        cost: CartCost {
            subtotal: money(subtotal),
            total: money(subtotal),
            total_tax: None,
        },
        discount_codes: Vec::new(),
        lines,
    }
}
