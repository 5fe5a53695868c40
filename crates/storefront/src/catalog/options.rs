//! Option matrix resolution: selection -> variant + per-value availability.
//!
//! Matching is set containment over normalized `(optionName, value)` tuples:
//! a variant matches a selection when it carries every chosen value;
//! unchosen options are wildcards. Everything here is a pure function of
//! `(product, selection)` and is cheap enough to run on every click.

use crate::shopify::types::{Product, ProductVariant};

use super::selection::Selection;

/// Render state for one option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionValueState {
    /// The option value (e.g., "Blue").
    pub value: String,
    /// Whether this value equals the current selection's choice.
    pub selected: bool,
    /// Whether choosing this value (keeping the other chosen options fixed)
    /// still resolves to a purchasable variant.
    pub available: bool,
}

/// Render state for one option, values in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionState {
    /// Option name (e.g., "Color").
    pub name: String,
    /// Value states in declared order.
    pub values: Vec<OptionValueState>,
}

/// Result of resolving a selection against a product.
#[derive(Debug)]
pub struct Resolution<'a> {
    /// The variant to display. `None` only for a product with no variants.
    pub variant: Option<&'a ProductVariant>,
    /// Per-option render state, in declared option order.
    pub options: Vec<OptionState>,
}

/// Whether a variant matches a selection (set containment; unchosen options
/// are wildcards).
fn variant_matches(variant: &ProductVariant, selection: &Selection) -> bool {
    selection.iter().all(|(name, value)| {
        variant
            .selected_options
            .iter()
            .any(|opt| opt.name == name && opt.value == value)
    })
}

/// First declared variant matching the selection.
///
/// For a complete selection this is the exact match; with duplicate tuples
/// (a data inconsistency) the first declared variant wins.
#[must_use]
pub fn first_matching<'a>(
    product: &'a Product,
    selection: &Selection,
) -> Option<&'a ProductVariant> {
    product
        .variants
        .iter()
        .find(|variant| variant_matches(variant, selection))
}

/// Fallback when nothing matches: first available variant by declaration
/// order, then the first variant overall. The UI always needs a priceable
/// variant to display.
fn fallback_variant(product: &Product) -> Option<&ProductVariant> {
    product
        .variants
        .iter()
        .find(|variant| variant.available_for_sale)
        .or_else(|| product.variants.first())
}

/// Whether some purchasable variant matches the selection with this option
/// forced to the given value and all other chosen options held fixed.
fn value_available(product: &Product, selection: &Selection, option: &str, value: &str) -> bool {
    let hypothetical = selection.without(option).with(option, value);
    product
        .variants
        .iter()
        .any(|variant| variant.available_for_sale && variant_matches(variant, &hypothetical))
}

/// Resolve a selection against a product.
///
/// Returns the variant to display plus per-value `selected`/`available`
/// state for every declared option value, so the UI can gray out
/// combinations without changing selection state.
#[must_use]
pub fn resolve<'a>(product: &'a Product, selection: &Selection) -> Resolution<'a> {
    let variant = first_matching(product, selection).or_else(|| fallback_variant(product));

    let options = product
        .options
        .iter()
        .map(|option| OptionState {
            name: option.name.clone(),
            values: option
                .values
                .iter()
                .map(|value| OptionValueState {
                    value: value.clone(),
                    selected: selection.get(&option.name) == Some(value.as_str()),
                    available: value_available(product, selection, &option.name, value),
                })
                .collect(),
        })
        .collect();

    Resolution { variant, options }
}
