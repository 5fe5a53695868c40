//! Cart view-state: optimistic overlay over authoritative snapshots.
//!
//! The remote cart authority owns all cart data. This module keeps the last
//! authoritative snapshot per cart, records in-flight mutation intents in a
//! keyed ledger ([`optimistic`]), and projects both into a [`CartView`] in
//! which pending intents win over stale authoritative values for the lines
//! they touch - and nothing else.

pub mod optimistic;
pub mod store;

use serde::Serialize;

use crate::shopify::types::{Cart, CartLine};

use optimistic::MutationLedger;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    /// Cart line ID.
    pub id: String,
    /// Parent product handle (for linking).
    pub handle: String,
    /// Parent product title.
    pub title: String,
    /// Variant title, omitted for single-variant products.
    pub variant_title: Option<String>,
    /// Rendered quantity (intent wins over the snapshot).
    pub quantity: i64,
    /// Per-unit price, formatted.
    pub unit_price: String,
    /// Line total, formatted. Always authoritative.
    pub line_total: String,
    /// Variant or product image URL.
    pub image_url: Option<String>,
    /// Whether a mutation for this line is still in flight.
    pub pending: bool,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    /// Lines, with pending intents applied.
    pub lines: Vec<CartLineView>,
    /// Subtotal, formatted. Always authoritative.
    pub subtotal: String,
    /// Total, formatted. Always authoritative.
    pub total: String,
    /// Applied discount codes.
    pub discount_codes: Vec<String>,
    /// Item count consistent with the rendered lines.
    pub total_quantity: i64,
    /// Whether any mutation is still in flight.
    pub pending: bool,
}

impl CartView {
    /// An empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            subtotal: "$0.00".to_string(),
            total: "$0.00".to_string(),
            discount_codes: Vec::new(),
            total_quantity: 0,
            pending: false,
        }
    }

    /// Project the authoritative snapshot plus pending intents into view
    /// state.
    ///
    /// The overlay is purely additive: money totals, discount codes, and
    /// untouched lines come straight from the snapshot; only the rendered
    /// quantity/visibility of lines with a pending intent differ.
    #[must_use]
    pub fn project(cart: Option<&Cart>, ledger: &MutationLedger) -> Self {
        let Some(cart) = cart else {
            return Self::empty();
        };

        let lines: Vec<CartLineView> = cart
            .lines
            .iter()
            .filter_map(|line| {
                let quantity = ledger.rendered_quantity(line)?;
                Some(line_view(line, quantity, ledger.pending(&line.id).is_some()))
            })
            .collect();

        let total_quantity = lines.iter().map(|line| line.quantity).sum();

        Self {
            lines,
            subtotal: cart.cost.subtotal.display(),
            total: cart.cost.total.display(),
            discount_codes: cart
                .discount_codes
                .iter()
                .filter(|code| code.applicable)
                .map(|code| code.code.clone())
                .collect(),
            total_quantity,
            pending: !ledger.is_empty(),
        }
    }
}

fn line_view(line: &CartLine, quantity: i64, pending: bool) -> CartLineView {
    CartLineView {
        id: line.id.to_string(),
        handle: line.merchandise.product.handle.clone(),
        title: line.merchandise.product.title.clone(),
        variant_title: if line.merchandise.title == "Default Title" {
            None
        } else {
            Some(line.merchandise.title.clone())
        },
        quantity,
        unit_price: line.cost.amount_per_quantity.display(),
        line_total: line.cost.total_amount.display(),
        image_url: line
            .merchandise
            .image
            .as_ref()
            .or(line.merchandise.product.featured_image.as_ref())
            .map(|img| img.url.clone()),
        pending,
    }
}
