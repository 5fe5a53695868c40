//! Integration tests for option selection: URL decode -> resolve -> encode.
//!
//! Walks the product page flow the way a visitor drives it: land on a deep
//! link, click option values, and check that the resolved variant, the
//! grayed-out values, and the canonical URL stay consistent.

use tidepool_core::VariantId;
use tidepool_integration_tests::fixtures::{product, variant};
use tidepool_storefront::catalog::HistoryMode;
use tidepool_storefront::catalog::options::resolve;
use tidepool_storefront::catalog::selection::{self, Selection};

fn tee() -> tidepool_storefront::shopify::types::Product {
    product(
        "tide-chart-tee",
        &[("Size", &["S", "M", "L"]), ("Color", &["Red", "Blue"])],
        vec![
            variant("v-s-red", true, &[("Size", "S"), ("Color", "Red")]),
            variant("v-s-blue", false, &[("Size", "S"), ("Color", "Blue")]),
            variant("v-m-red", true, &[("Size", "M"), ("Color", "Red")]),
        ],
    )
}

#[test]
fn deep_link_resolves_to_exact_variant() {
    let product = tee();
    let selection = selection::decode("Size=S&Color=Red", &product);

    assert!(selection.is_complete(&product));
    let resolution = resolve(&product, &selection);
    assert_eq!(resolution.variant.map(|v| v.id.clone()), Some(VariantId::new("v-s-red")));
}

#[test]
fn deep_link_with_foreign_params_still_resolves() {
    let product = tee();
    // utm noise and filter params share the query string with the selection
    let selection = selection::decode(
        "utm_source=newsletter&Size=M&filter.v.availability=true&Color=Red",
        &product,
    );

    let resolution = resolve(&product, &selection);
    assert_eq!(resolution.variant.map(|v| v.id.clone()), Some(VariantId::new("v-m-red")));
}

#[test]
fn dead_selection_falls_back_to_first_available_variant() {
    let product = tee();
    let selection = selection::decode("Size=L&Color=Blue", &product);

    // No (L, Blue) variant exists; the page still needs a priceable variant
    let resolution = resolve(&product, &selection);
    assert_eq!(resolution.variant.map(|v| v.id.clone()), Some(VariantId::new("v-s-red")));
}

#[test]
fn availability_grays_out_unpurchasable_combinations() {
    let product = tee();
    let selection: Selection = selection::decode("Size=S", &product);

    let resolution = resolve(&product, &selection);
    let color = resolution
        .options
        .iter()
        .find(|o| o.name == "Color")
        .expect("color option");

    // (S, Red) is purchasable; (S, Blue) exists but is not for sale
    assert!(color.values.iter().find(|v| v.value == "Red").expect("red").available);
    assert!(!color.values.iter().find(|v| v.value == "Blue").expect("blue").available);
}

#[test]
fn clicking_a_value_produces_scroll_preserving_replacement() {
    let product = tee();
    let current = selection::decode("Size=S&Color=Red", &product);

    let target = selection::select_value(&product, &current, "Size", "M");
    assert_eq!(target.query, "Size=M&Color=Red");
    assert_eq!(target.history, HistoryMode::Replace);
    assert!(target.preserve_scroll);

    // Following the target round-trips into the selection it encodes
    let next = selection::decode(&target.query, &product);
    let expected: Selection = [("Size", "M"), ("Color", "Red")].into_iter().collect();
    assert_eq!(next, expected);
}

#[test]
fn encode_decode_roundtrip_is_canonical() {
    let product = tee();
    let selection: Selection = [("Color", "Blue"), ("Size", "S")].into_iter().collect();

    let encoded = selection::encode(&selection, &product);
    assert_eq!(encoded, "Size=S&Color=Blue");
    assert_eq!(selection::decode(&encoded, &product), selection);
}
