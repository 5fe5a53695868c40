//! Optimistic mutation ledger for cart lines.
//!
//! Cart mutations are submitted asynchronously and may complete out of
//! order. The ledger records the *intended* effect of each in-flight
//! mutation, keyed by line ID, so rendering can overlay intent on top of the
//! last authoritative snapshot and never flickers back to the pre-mutation
//! value. The ledger is passed explicitly through the view layer - never
//! ambient state - so reconciliation stays testable in isolation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tidepool_core::LineId;

use crate::shopify::types::{Cart, CartLine};

/// Intended effect of an in-flight cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationIntent {
    /// Set the line's quantity. Zero is equivalent to removal for
    /// rendering purposes.
    QuantityChange { new_quantity: u32 },
    /// Remove the line entirely.
    Removal,
    /// The line's discount allocations are being recalculated; quantity and
    /// visibility are unaffected.
    DiscountUpdate,
}

/// One in-flight mutation for a line.
#[derive(Debug, Clone)]
pub struct PendingMutation {
    /// The intended effect.
    pub intent: MutationIntent,
    /// When the mutation request was fired.
    pub submitted_at: DateTime<Utc>,
}

/// In-flight mutations keyed by line ID.
///
/// At most one pending mutation is retained per line: a newer proposal on
/// the same line supersedes an older unresolved one rather than queuing
/// behind it. Lines are reconciled independently, which is what makes
/// out-of-order completion tolerable.
#[derive(Debug, Clone, Default)]
pub struct MutationLedger {
    pending: HashMap<LineId, PendingMutation>,
}

impl MutationLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no mutations are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of pending mutations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// The pending mutation for a line, if any.
    #[must_use]
    pub fn pending(&self, line_id: &LineId) -> Option<&PendingMutation> {
        self.pending.get(line_id)
    }

    /// Record an in-flight mutation, superseding any prior unresolved one
    /// for the same line.
    pub fn propose(&mut self, line_id: LineId, intent: MutationIntent) {
        self.pending.insert(
            line_id,
            PendingMutation {
                intent,
                submitted_at: Utc::now(),
            },
        );
    }

    /// An authoritative snapshot arrived: clear every pending mutation the
    /// snapshot already reflects.
    ///
    /// A quantity change clears once the line shows the intended quantity
    /// (or is gone, for an intent of zero); a removal clears once the line
    /// is gone; a discount update clears as soon as any snapshot reports on
    /// the cart, since its allocations are then authoritative.
    pub fn reconcile(&mut self, cart: &Cart) {
        self.pending.retain(|line_id, mutation| {
            let line = cart.line(line_id);
            let satisfied = match mutation.intent {
                MutationIntent::QuantityChange { new_quantity } => match line {
                    Some(line) => line.quantity == i64::from(new_quantity),
                    None => new_quantity == 0,
                },
                MutationIntent::Removal => line.is_none(),
                MutationIntent::DiscountUpdate => true,
            };
            !satisfied
        });
    }

    /// The mutation for this line definitively failed: discard the overlay
    /// so rendering reverts to the last authoritative value. Failed
    /// mutations are never retried silently.
    pub fn fail(&mut self, line_id: &LineId) {
        self.pending.remove(line_id);
    }

    /// Quantity to render for an authoritative line, or `None` when the
    /// line must be hidden (pending removal, or pending decrease to zero).
    #[must_use]
    pub fn rendered_quantity(&self, line: &CartLine) -> Option<i64> {
        match self.pending.get(&line.id).map(|m| m.intent) {
            Some(MutationIntent::QuantityChange { new_quantity: 0 } | MutationIntent::Removal) => {
                None
            }
            Some(MutationIntent::QuantityChange { new_quantity }) => {
                Some(i64::from(new_quantity))
            }
            Some(MutationIntent::DiscountUpdate) | None => Some(line.quantity),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::shopify::types::{
        Cart, CartCost, CartLine, CartLineCost, CartMerchandise, CartMerchandiseProduct, Money,
    };
    use tidepool_core::{CartId, ProductId, VariantId};

    fn money(amount: &str) -> Money {
        Money {
            amount: amount.to_string(),
            currency_code: "USD".to_string(),
        }
    }

    fn line(id: &str, quantity: i64) -> CartLine {
        CartLine {
            id: LineId::new(id),
            quantity,
            cost: CartLineCost {
                amount_per_quantity: money("10.00"),
                subtotal_amount: money("10.00"),
                total_amount: money("10.00"),
            },
            merchandise: CartMerchandise {
                id: VariantId::new("v1"),
                title: "Default Title".to_string(),
                available_for_sale: true,
                price: money("10.00"),
                selected_options: Vec::new(),
                image: None,
                product: CartMerchandiseProduct {
                    id: ProductId::new("p1"),
                    handle: "p1".to_string(),
                    title: "Product".to_string(),
                    featured_image: None,
                },
            },
            discount_allocations: Vec::new(),
        }
    }

    fn cart(lines: Vec<CartLine>) -> Cart {
        let total_quantity = lines.iter().map(|l| l.quantity).sum();
        Cart {
            id: CartId::new("c1"),
            checkout_url: "https://shop.test/checkout".to_string(),
            total_quantity,
            cost: CartCost {
                subtotal: money("10.00"),
                total: money("10.00"),
                total_tax: None,
            },
            discount_codes: Vec::new(),
            lines,
        }
    }

    #[test]
    fn test_overlay_wins_over_authoritative_quantity() {
        let mut ledger = MutationLedger::new();
        ledger.propose(
            LineId::new("L1"),
            MutationIntent::QuantityChange { new_quantity: 3 },
        );

        let authoritative = line("L1", 1);
        assert_eq!(ledger.rendered_quantity(&authoritative), Some(3));
    }

    #[test]
    fn test_newer_proposal_supersedes_older() {
        let mut ledger = MutationLedger::new();
        let id = LineId::new("L1");
        ledger.propose(id.clone(), MutationIntent::QuantityChange { new_quantity: 2 });
        ledger.propose(id.clone(), MutationIntent::QuantityChange { new_quantity: 1 });

        assert_eq!(ledger.len(), 1);
        assert_eq!(
            ledger.pending(&id).unwrap().intent,
            MutationIntent::QuantityChange { new_quantity: 1 }
        );
    }

    #[test]
    fn test_reconcile_clears_satisfied_quantity_change() {
        let mut ledger = MutationLedger::new();
        let id = LineId::new("L1");
        ledger.propose(id.clone(), MutationIntent::QuantityChange { new_quantity: 3 });

        // Snapshot still shows the old quantity: overlay stays
        ledger.reconcile(&cart(vec![line("L1", 1)]));
        assert!(ledger.pending(&id).is_some());

        // Snapshot caught up: overlay cleared
        ledger.reconcile(&cart(vec![line("L1", 3)]));
        assert!(ledger.pending(&id).is_none());
    }

    #[test]
    fn test_reconcile_clears_removal_when_line_gone() {
        let mut ledger = MutationLedger::new();
        let id = LineId::new("L1");
        ledger.propose(id.clone(), MutationIntent::Removal);

        ledger.reconcile(&cart(vec![line("L1", 1)]));
        assert!(ledger.pending(&id).is_some());

        ledger.reconcile(&cart(Vec::new()));
        assert!(ledger.pending(&id).is_none());
    }

    #[test]
    fn test_zero_quantity_is_removal_for_rendering_and_reconcile() {
        let mut ledger = MutationLedger::new();
        let id = LineId::new("L1");
        ledger.propose(id.clone(), MutationIntent::QuantityChange { new_quantity: 0 });

        assert_eq!(ledger.rendered_quantity(&line("L1", 1)), None);

        ledger.reconcile(&cart(Vec::new()));
        assert!(ledger.pending(&id).is_none());
    }

    #[test]
    fn test_fail_discards_overlay() {
        let mut ledger = MutationLedger::new();
        let id = LineId::new("L1");
        ledger.propose(id.clone(), MutationIntent::QuantityChange { new_quantity: 5 });

        ledger.fail(&id);
        // Rendering reverts to the authoritative value
        assert_eq!(ledger.rendered_quantity(&line("L1", 1)), Some(1));
    }

    #[test]
    fn test_lines_reconcile_independently() {
        let mut ledger = MutationLedger::new();
        ledger.propose(
            LineId::new("L1"),
            MutationIntent::QuantityChange { new_quantity: 3 },
        );
        ledger.propose(LineId::new("L2"), MutationIntent::Removal);

        // Snapshot reflects L1's change but L2 is still present
        ledger.reconcile(&cart(vec![line("L1", 3), line("L2", 1)]));
        assert!(ledger.pending(&LineId::new("L1")).is_none());
        assert!(ledger.pending(&LineId::new("L2")).is_some());
    }

    #[test]
    fn test_discount_update_keeps_quantity_and_clears_on_snapshot() {
        let mut ledger = MutationLedger::new();
        let id = LineId::new("L1");
        ledger.propose(id.clone(), MutationIntent::DiscountUpdate);

        assert_eq!(ledger.rendered_quantity(&line("L1", 2)), Some(2));

        ledger.reconcile(&cart(vec![line("L1", 2)]));
        assert!(ledger.pending(&id).is_none());
    }
}
