//! Option selection and its URL query representation.
//!
//! A [`Selection`] is the user's in-progress choice of option values for one
//! product. It is created from the page's query parameters on load, mutated
//! by clicks, and serialized back into a query string before navigation -
//! never persisted server-side.

use tracing::debug;
use url::form_urlencoded;

use crate::shopify::types::Product;

use super::NavigationTarget;

/// A partial or complete mapping from option name to chosen value.
///
/// Equality is set-based: two selections are equal when they contain the
/// same `(name, value)` entries regardless of insertion order.
#[derive(Debug, Clone, Default, Eq)]
pub struct Selection {
    entries: Vec<(String, String)>,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The chosen value for an option, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Choose a value for an option, replacing any prior choice.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Copy of this selection with an option's choice replaced.
    #[must_use]
    pub fn with(&self, name: &str, value: &str) -> Self {
        let mut next = self.clone();
        next.set(name, value);
        next
    }

    /// Copy of this selection with an option's choice removed.
    #[must_use]
    pub fn without(&self, name: &str) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(n, _)| n != name)
                .cloned()
                .collect(),
        }
    }

    /// Number of chosen options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no options are chosen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every option of the product has a chosen value.
    #[must_use]
    pub fn is_complete(&self, product: &Product) -> bool {
        product
            .options
            .iter()
            .all(|option| self.get(&option.name).is_some())
    }

    /// Iterate over `(name, value)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(name, value)| other.get(name) == Some(value.as_str()))
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Selection {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        let mut selection = Self::new();
        for (name, value) in iter {
            selection.set(name, value);
        }
        selection
    }
}

// =============================================================================
// URL codec
// =============================================================================

/// Decode a selection from a query string.
///
/// Keys that are not option names of this product are ignored (the query
/// string also carries sort/filter/cursor parameters). Entries with an empty
/// value are malformed and dropped with a diagnostic; decoding itself never
/// fails.
#[must_use]
pub fn decode(query: &str, product: &Product) -> Selection {
    let mut selection = Selection::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let Some(option) = product.options.iter().find(|o| o.name == key) else {
            continue;
        };
        if value.is_empty() {
            debug!(option = %key, "Dropping selection entry with empty value");
            continue;
        }
        selection.set(option.name.clone(), value.into_owned());
    }

    selection
}

/// Encode a selection as a canonical query string.
///
/// One entry per chosen option, emitted in the product's declared option
/// order; values are percent-encoded.
#[must_use]
pub fn encode(selection: &Selection, product: &Product) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for option in &product.options {
        if let Some(value) = selection.get(&option.name) {
            serializer.append_pair(&option.name, value);
        }
    }
    serializer.finish()
}

/// Navigation intent for choosing a value on the current product page.
///
/// Moving between sibling variants is a history replacement that keeps the
/// scroll position.
#[must_use]
pub fn select_value(
    product: &Product,
    current: &Selection,
    option_name: &str,
    value: &str,
) -> NavigationTarget {
    let next = current.with(option_name, value);
    NavigationTarget::replace(encode(&next, product))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::HistoryMode;
    use crate::shopify::types::{Money, PriceRange, Product, ProductOption};
    use tidepool_core::ProductId;

    fn money(amount: &str) -> Money {
        Money {
            amount: amount.to_string(),
            currency_code: "USD".to_string(),
        }
    }

    fn product_with_options(options: &[(&str, &[&str])]) -> Product {
        Product {
            id: ProductId::new("gid://shopify/Product/1"),
            handle: "test-product".to_string(),
            title: "Test Product".to_string(),
            description: String::new(),
            available_for_sale: true,
            vendor: "Tidepool".to_string(),
            tags: Vec::new(),
            seo: None,
            price_range: PriceRange {
                min_variant_price: money("10.00"),
                max_variant_price: money("20.00"),
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
            variants: Vec::new(),
        }
    }

    #[test]
    fn test_roundtrip_url_safe_values() {
        let product = product_with_options(&[("Size", &["S", "M"]), ("Color", &["Red", "Blue"])]);
        let selection: Selection = [("Color", "Blue"), ("Size", "M")].into_iter().collect();

        let encoded = encode(&selection, &product);
        // Canonical form follows declared option order
        assert_eq!(encoded, "Size=M&Color=Blue");

        let decoded = decode(&encoded, &product);
        assert_eq!(decoded, selection);
    }

    #[test]
    fn test_roundtrip_values_needing_encoding() {
        let product = product_with_options(&[("Material", &["Wool & Silk"])]);
        let selection: Selection = [("Material", "Wool & Silk")].into_iter().collect();

        let decoded = decode(&encode(&selection, &product), &product);
        assert_eq!(decoded, selection);
    }

    #[test]
    fn test_decode_ignores_unknown_keys() {
        let product = product_with_options(&[("Size", &["S", "M"])]);
        let decoded = decode("Size=M&sort=price-low-high&after=abc", &product);

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.get("Size"), Some("M"));
    }

    #[test]
    fn test_decode_tolerates_partial_selection() {
        let product = product_with_options(&[("Size", &["S"]), ("Color", &["Red"])]);
        let decoded = decode("Color=Red", &product);

        assert!(!decoded.is_complete(&product));
        assert_eq!(decoded.get("Color"), Some("Red"));
        assert_eq!(decoded.get("Size"), None);
    }

    #[test]
    fn test_decode_drops_malformed_entries() {
        let product = product_with_options(&[("Size", &["S"])]);
        let decoded = decode("Size=", &product);
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_decode_keeps_last_duplicate() {
        let product = product_with_options(&[("Size", &["S", "M"])]);
        let decoded = decode("Size=S&Size=M", &product);
        assert_eq!(decoded.get("Size"), Some("M"));
    }

    #[test]
    fn test_select_value_is_scroll_preserving_replacement() {
        let product = product_with_options(&[("Size", &["S", "M"])]);
        let current: Selection = [("Size", "S")].into_iter().collect();

        let target = select_value(&product, &current, "Size", "M");
        assert_eq!(target.query, "Size=M");
        assert_eq!(target.history, HistoryMode::Replace);
        assert!(target.preserve_scroll);
    }

    #[test]
    fn test_selection_set_replaces() {
        let mut selection = Selection::new();
        selection.set("Size", "S");
        selection.set("Size", "M");
        assert_eq!(selection.len(), 1);
        assert_eq!(selection.get("Size"), Some("M"));
    }
}
