//! Shared per-cart state: authoritative snapshot + mutation ledger.
//!
//! Route handlers and background reconciliation tasks share one
//! [`CartState`] per cart, behind a `tokio::sync::RwLock` and handed out as
//! cheap clones from a `moka` cache keyed by cart ID. Snapshots are
//! append-only-replaced: an arriving snapshot wholly replaces the baseline,
//! never a field-by-field merge.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tidepool_core::{CartId, LineId};
use tokio::sync::RwLock;

use crate::shopify::types::Cart;

use super::CartView;
use super::optimistic::{MutationIntent, MutationLedger};

/// Authoritative snapshot plus pending intents for one cart.
#[derive(Debug, Default)]
pub struct CartState {
    snapshot: Option<Cart>,
    ledger: MutationLedger,
}

impl CartState {
    /// Create empty state (no snapshot seen yet).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last authoritative snapshot, if any.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&Cart> {
        self.snapshot.as_ref()
    }

    /// The pending-mutation ledger.
    #[must_use]
    pub const fn ledger(&self) -> &MutationLedger {
        &self.ledger
    }

    /// Record an in-flight mutation intent for a line.
    pub fn propose(&mut self, line_id: LineId, intent: MutationIntent) {
        self.ledger.propose(line_id, intent);
    }

    /// An authoritative snapshot arrived: wholly replace the baseline and
    /// reconcile the ledger against it.
    pub fn apply_snapshot(&mut self, cart: Cart) {
        self.ledger.reconcile(&cart);
        self.snapshot = Some(cart);
    }

    /// The mutation for a line definitively failed: discard its overlay.
    pub fn fail(&mut self, line_id: &LineId) {
        self.ledger.fail(line_id);
    }

    /// Project current state into view data.
    #[must_use]
    pub fn view(&self) -> CartView {
        CartView::project(self.snapshot.as_ref(), &self.ledger)
    }
}

/// Cheaply clonable handle to one cart's shared state.
pub type CartHandle = Arc<RwLock<CartState>>;

/// Per-cart state keyed by cart ID.
///
/// Entries idle out after an hour; the next request simply refetches the
/// authoritative snapshot.
#[derive(Clone)]
pub struct CartStateStore {
    carts: Cache<String, CartHandle>,
}

impl CartStateStore {
    /// Create a new store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            carts: Cache::builder()
                .max_capacity(10_000)
                .time_to_idle(Duration::from_secs(3600))
                .build(),
        }
    }

    /// Get (or create) the shared state handle for a cart.
    pub async fn handle(&self, cart_id: &CartId) -> CartHandle {
        self.carts
            .get_with(cart_id.to_string(), async {
                Arc::new(RwLock::new(CartState::new()))
            })
            .await
    }
}

impl Default for CartStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::shopify::types::{
        CartCost, CartLine, CartLineCost, CartMerchandise, CartMerchandiseProduct, Money,
    };
    use tidepool_core::{ProductId, VariantId};

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

    fn cart(total: &str, lines: Vec<CartLine>) -> Cart {
        let total_quantity = lines.iter().map(|l| l.quantity).sum();
        Cart {
            id: CartId::new("c1"),
            checkout_url: "https://shop.test/checkout".to_string(),
            total_quantity,
            cost: CartCost {
                subtotal: money(total),
                total: money(total),
                total_tax: None,
            },
            discount_codes: Vec::new(),
            lines,
        }
    }

    #[test]
    fn test_apply_snapshot_wholly_replaces_baseline() {
        let mut state = CartState::new();
        state.apply_snapshot(cart("20.00", vec![line("L1", 2)]));
        state.apply_snapshot(cart("10.00", vec![line("L2", 1)]));

        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.lines.len(), 1);
        assert_eq!(snapshot.lines[0].id, LineId::new("L2"));
        assert_eq!(snapshot.cost.total.amount, "10.00");
    }

    #[test]
    fn test_apply_snapshot_reconciles_ledger() {
        let mut state = CartState::new();
        state.apply_snapshot(cart("20.00", vec![line("L1", 2)]));
        state.propose(
            LineId::new("L1"),
            MutationIntent::QuantityChange { new_quantity: 4 },
        );
        assert_eq!(state.view().lines[0].quantity, 4);

        // Authoritative state catches up; the overlay retires
        state.apply_snapshot(cart("40.00", vec![line("L1", 4)]));
        assert!(state.ledger().is_empty());
        assert_eq!(state.view().lines[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_store_returns_same_handle_for_same_cart() {
        let store = CartStateStore::new();
        let id = CartId::new("gid://shopify/Cart/1");

        let a = store.handle(&id).await;
        let b = store.handle(&id).await;
        assert!(Arc::ptr_eq(&a, &b));

        let other = store.handle(&CartId::new("gid://shopify/Cart/2")).await;
        assert!(!Arc::ptr_eq(&a, &other));
    }
}
