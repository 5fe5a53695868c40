//! Facet filter and sort-order URL codec.
//!
//! Filter query parameters carry a reserved `filter.` key prefix and a
//! JSON-encoded facet input as their value. Decoding is lenient (malformed
//! entries are dropped with a diagnostic); resolution against the declared
//! facets is strict - an input that matches no declared facet value is
//! dropped, never applied as an "unknown" filter.

use rust_decimal::Decimal;
use serde_json::Value;
use tidepool_core::{CurrencyCode, Price};
use tracing::{debug, warn};

use crate::shopify::types::{Facet, FacetKind, ProductCollectionSortKey, ProductSortKey};

/// Reserved query-parameter key prefix for facet encoding.
pub const FILTER_PREFIX: &str = "filter.";

/// A filter candidate decoded from the URL, before resolution against the
/// declared facets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCandidate {
    /// Query parameter key (carries the `filter.` prefix).
    pub key: String,
    /// Raw JSON-encoded parameter value, as it appeared in the URL.
    pub raw: String,
    /// Decoded facet input object.
    pub input: Value,
}

/// A filter currently active on a collection view, with its display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedFilter {
    /// The facet input (passed back to the catalog query).
    pub input: Value,
    /// Human-readable label.
    pub label: String,
}

/// Decode filter candidates from query parameters.
///
/// Parameters without the [`FILTER_PREFIX`] are ignored; values that are not
/// valid JSON are skipped with a diagnostic, never fatal.
#[must_use]
pub fn parse_filters(pairs: &[(String, String)]) -> Vec<FilterCandidate> {
    pairs
        .iter()
        .filter(|(key, _)| key.starts_with(FILTER_PREFIX))
        .filter_map(|(key, value)| match serde_json::from_str(value) {
            Ok(input) => Some(FilterCandidate {
                key: key.clone(),
                raw: value.clone(),
                input,
            }),
            Err(e) => {
                debug!(key = %key, error = %e, "Skipping undecodable filter parameter");
                None
            }
        })
        .collect()
}

/// Whether a facet input is a price-range input.
fn is_price_input(input: &Value) -> bool {
    input.get("price").is_some()
}

/// Resolve decoded candidates against the declared facets.
///
/// Matching is structural equality of the input JSON, except that a price
/// range input matches any declared price-range facet value regardless of
/// bounds - the UI offers one continuous price control, not discrete
/// buckets. Candidates that resolve to no declared facet value are dropped
/// with a diagnostic.
#[must_use]
pub fn resolve_applied(candidates: &[FilterCandidate], facets: &[Facet]) -> Vec<AppliedFilter> {
    candidates
        .iter()
        .filter_map(|candidate| {
            for facet in facets {
                for value in &facet.values {
                    let matched = if facet.kind == FacetKind::PriceRange
                        && is_price_input(&candidate.input)
                    {
                        is_price_input(&value.input)
                    } else {
                        candidate.input == value.input
                    };

                    if matched {
                        let label = if facet.kind == FacetKind::PriceRange {
                            price_range_label(&candidate.input)
                        } else {
                            value.label.clone()
                        };
                        return Some(AppliedFilter {
                            input: candidate.input.clone(),
                            label,
                        });
                    }
                }
            }

            warn!(key = %candidate.key, "Dropping filter that matches no declared facet value");
            None
        })
        .collect()
}

/// Read one bound of a price input as a decimal.
fn price_bound(input: &Value, bound: &str) -> Option<Decimal> {
    input
        .get("price")?
        .get(bound)?
        .as_f64()
        .and_then(|v| Decimal::try_from(v).ok())
}

/// Synthesize a label for a price-range input from its bounds.
///
/// Currency formatting is deliberately simple here; locale-aware formatting
/// belongs to the presentation layer.
fn price_range_label(input: &Value) -> String {
    let currency = CurrencyCode::default();
    let display = |amount: Decimal| Price::new(amount, currency).display();

    match (price_bound(input, "min"), price_bound(input, "max")) {
        (Some(min), Some(max)) => format!("{} - {}", display(min), display(max)),
        (Some(min), None) => format!("From {}", display(min)),
        (None, Some(max)) => format!("Up to {}", display(max)),
        (None, None) => "Price".to_string(),
    }
}

// =============================================================================
// Sort order
// =============================================================================

/// Sort orders offered on collection and search views.
///
/// Each maps a stable URL token to the `(sortKey, reverse)` pair the catalog
/// query understands. An unrecognized or absent token is [`Self::Relevance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Default ordering (no URL token).
    #[default]
    Relevance,
    /// Collection's curated order.
    Featured,
    /// Best sellers first.
    BestSelling,
    /// Newest products first.
    Newest,
    /// Cheapest first.
    PriceLowHigh,
    /// Most expensive first.
    PriceHighLow,
}

/// Menu of sort orders, in display order.
pub const SORT_MENU: &[SortOrder] = &[
    SortOrder::Relevance,
    SortOrder::Featured,
    SortOrder::BestSelling,
    SortOrder::Newest,
    SortOrder::PriceLowHigh,
    SortOrder::PriceHighLow,
];

impl SortOrder {
    /// Parse a URL token; unrecognized or absent tokens map to the default.
    #[must_use]
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("featured") => Self::Featured,
            Some("best-selling") => Self::BestSelling,
            Some("newest") => Self::Newest,
            Some("price-low-high") => Self::PriceLowHigh,
            Some("price-high-low") => Self::PriceHighLow,
            _ => Self::Relevance,
        }
    }

    /// Stable URL token; the default order has none.
    #[must_use]
    pub const fn token(self) -> Option<&'static str> {
        match self {
            Self::Relevance => None,
            Self::Featured => Some("featured"),
            Self::BestSelling => Some("best-selling"),
            Self::Newest => Some("newest"),
            Self::PriceLowHigh => Some("price-low-high"),
            Self::PriceHighLow => Some("price-high-low"),
        }
    }

    /// Display label for the sort menu.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Relevance => "Relevance",
            Self::Featured => "Featured",
            Self::BestSelling => "Best selling",
            Self::Newest => "Newest",
            Self::PriceLowHigh => "Price: Low to high",
            Self::PriceHighLow => "Price: High to low",
        }
    }

    /// `(sortKey, reverse)` for a collection product query.
    #[must_use]
    pub const fn collection_sort(self) -> (ProductCollectionSortKey, bool) {
        match self {
            Self::Relevance => (ProductCollectionSortKey::Relevance, false),
            Self::Featured => (ProductCollectionSortKey::CollectionDefault, false),
            Self::BestSelling => (ProductCollectionSortKey::BestSelling, false),
            Self::Newest => (ProductCollectionSortKey::Created, true),
            Self::PriceLowHigh => (ProductCollectionSortKey::Price, false),
            Self::PriceHighLow => (ProductCollectionSortKey::Price, true),
        }
    }

    /// `(sortKey, reverse)` for a store-wide product search query.
    #[must_use]
    pub const fn search_sort(self) -> (ProductSortKey, bool) {
        match self {
            Self::Relevance | Self::Featured => (ProductSortKey::Relevance, false),
            Self::BestSelling => (ProductSortKey::BestSelling, false),
            Self::Newest => (ProductSortKey::CreatedAt, true),
            Self::PriceLowHigh => (ProductSortKey::Price, false),
            Self::PriceHighLow => (ProductSortKey::Price, true),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::shopify::types::FacetValue;
    use serde_json::json;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn color_facet() -> Facet {
        Facet {
            id: "filter.v.option.color".to_string(),
            label: "Color".to_string(),
            kind: FacetKind::List,
            values: vec![
                FacetValue {
                    id: "filter.v.option.color.red".to_string(),
                    label: "Red".to_string(),
                    count: 3,
                    input: json!({"variantOption": {"name": "color", "value": "red"}}),
                },
                FacetValue {
                    id: "filter.v.option.color.blue".to_string(),
                    label: "Blue".to_string(),
                    count: 1,
                    input: json!({"variantOption": {"name": "color", "value": "blue"}}),
                },
            ],
        }
    }

    fn price_facet() -> Facet {
        Facet {
            id: "filter.v.price".to_string(),
            label: "Price".to_string(),
            kind: FacetKind::PriceRange,
            values: vec![FacetValue {
                id: "filter.v.price".to_string(),
                label: "Price".to_string(),
                count: 4,
                input: json!({"price": {"min": 0, "max": 200}}),
            }],
        }
    }

    #[test]
    fn test_parse_filters_keeps_only_prefixed_keys() {
        let candidates = parse_filters(&pairs(&[
            (
                "filter.v.option.color",
                r#"{"variantOption":{"name":"color","value":"red"}}"#,
            ),
            ("sort", "price-low-high"),
            ("q", "tee"),
        ]));

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].key, "filter.v.option.color");
    }

    #[test]
    fn test_parse_filters_skips_malformed_json() {
        let candidates = parse_filters(&pairs(&[
            ("filter.v.option.color", "{broken"),
            ("filter.v.availability", "true"),
        ]));

        // Malformed entry is dropped; valid JSON scalar still decodes
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].input, json!(true));
    }

    #[test]
    fn test_resolve_applied_uses_declared_label() {
        let candidates = parse_filters(&pairs(&[(
            "filter.v.option.color",
            r#"{"variantOption":{"name":"color","value":"blue"}}"#,
        )]));

        let applied = resolve_applied(&candidates, &[color_facet(), price_facet()]);
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].label, "Blue");
    }

    #[test]
    fn test_resolve_applied_drops_unknown_inputs() {
        let candidates = parse_filters(&pairs(&[(
            "filter.v.option.color",
            r#"{"variantOption":{"name":"color","value":"chartreuse"}}"#,
        )]));

        let applied = resolve_applied(&candidates, &[color_facet()]);
        assert!(applied.is_empty());
    }

    #[test]
    fn test_price_filter_matches_any_declared_bounds() {
        // The declared price facet advertises 0..200; the applied range is
        // 10..50. It must still match, with a label from the applied bounds.
        let candidates = parse_filters(&pairs(&[(
            "filter.v.price",
            r#"{"price":{"min":10,"max":50}}"#,
        )]));

        let applied = resolve_applied(&candidates, &[color_facet(), price_facet()]);
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].label, "$10.00 - $50.00");
    }

    #[test]
    fn test_price_label_single_bounds() {
        assert_eq!(
            price_range_label(&json!({"price": {"min": 10}})),
            "From $10.00"
        );
        assert_eq!(
            price_range_label(&json!({"price": {"max": 50}})),
            "Up to $50.00"
        );
        assert_eq!(price_range_label(&json!({"price": {}})), "Price");
    }

    #[test]
    fn test_sort_token_roundtrip() {
        for order in SORT_MENU {
            assert_eq!(SortOrder::from_token(order.token()), *order);
        }
    }

    #[test]
    fn test_sort_unrecognized_token_is_default() {
        assert_eq!(SortOrder::from_token(Some("trending")), SortOrder::Relevance);
        assert_eq!(SortOrder::from_token(None), SortOrder::Relevance);
    }

    #[test]
    fn test_sort_key_mapping() {
        assert_eq!(
            SortOrder::PriceHighLow.collection_sort(),
            (ProductCollectionSortKey::Price, true)
        );
        assert_eq!(
            SortOrder::PriceLowHigh.collection_sort(),
            (ProductCollectionSortKey::Price, false)
        );
        assert_eq!(
            SortOrder::Newest.search_sort(),
            (ProductSortKey::CreatedAt, true)
        );
        assert_eq!(
            SortOrder::Relevance.collection_sort(),
            (ProductCollectionSortKey::Relevance, false)
        );
    }
}
