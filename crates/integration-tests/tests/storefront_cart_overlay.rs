//! Integration tests for the optimistic cart overlay.
//!
//! Exercises the ledger through the shared cart store the way the cart
//! routes do: propose intents, render immediately, then apply authoritative
//! snapshots in whatever order they arrive.

use tidepool_core::{CartId, LineId};
use tidepool_integration_tests::fixtures::{cart, cart_line};
use tidepool_storefront::cart::optimistic::MutationIntent;
use tidepool_storefront::cart::store::{CartState, CartStateStore};

#[test]
fn proposed_quantity_renders_immediately_and_survives_stale_snapshots() {
    let mut state = CartState::new();
    state.apply_snapshot(cart("25.00", vec![cart_line("L1", 1)]));

    state.propose(
        LineId::new("L1"),
        MutationIntent::QuantityChange { new_quantity: 3 },
    );

    // Rendered quantity is the intent, regardless of the snapshot
    assert_eq!(state.view().lines[0].quantity, 3);

    // A stale snapshot (still quantity 1) arrives: no flicker back
    state.apply_snapshot(cart("25.00", vec![cart_line("L1", 1)]));
    assert_eq!(state.view().lines[0].quantity, 3);
    assert!(state.view().pending);

    // The snapshot reflecting the intent arrives: overlay retires
    state.apply_snapshot(cart("75.00", vec![cart_line("L1", 3)]));
    assert_eq!(state.view().lines[0].quantity, 3);
    assert!(!state.view().pending);
}

#[test]
fn newest_proposal_wins_and_is_the_only_pending_entry() {
    let mut state = CartState::new();
    state.apply_snapshot(cart("25.00", vec![cart_line("L1", 1)]));

    state.propose(
        LineId::new("L1"),
        MutationIntent::QuantityChange { new_quantity: 2 },
    );
    state.propose(
        LineId::new("L1"),
        MutationIntent::QuantityChange { new_quantity: 1 },
    );

    assert_eq!(state.ledger().len(), 1);
    assert_eq!(state.view().lines[0].quantity, 1);

    // A snapshot satisfying the superseded intent does not clear the newer one
    state.apply_snapshot(cart("50.00", vec![cart_line("L1", 2)]));
    assert_eq!(state.ledger().len(), 1);
    assert_eq!(state.view().lines[0].quantity, 1);
}

#[test]
fn removal_hides_line_until_authority_confirms() {
    let mut state = CartState::new();
    state.apply_snapshot(cart("50.00", vec![cart_line("L1", 1), cart_line("L2", 1)]));

    state.propose(LineId::new("L1"), MutationIntent::Removal);
    let view = state.view();
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].id, "L2");

    // Authority confirms the removal; ledger is clean
    state.apply_snapshot(cart("25.00", vec![cart_line("L2", 1)]));
    assert!(state.ledger().is_empty());
    assert_eq!(state.view().lines.len(), 1);
}

#[test]
fn failure_reverts_to_pre_mutation_authoritative_value() {
    let mut state = CartState::new();
    state.apply_snapshot(cart("25.00", vec![cart_line("L1", 1)]));

    let line_id = LineId::new("L1");
    state.propose(
        line_id.clone(),
        MutationIntent::QuantityChange { new_quantity: 7 },
    );
    assert_eq!(state.view().lines[0].quantity, 7);

    // The mutation collaborator reports failure: overlay is discarded, the
    // previous authoritative value shows again, nothing is retried
    state.fail(&line_id);
    assert_eq!(state.view().lines[0].quantity, 1);
    assert!(!state.view().pending);
}

#[test]
fn independent_lines_reconcile_out_of_order() {
    let mut state = CartState::new();
    state.apply_snapshot(cart("50.00", vec![cart_line("L1", 1), cart_line("L2", 1)]));

    state.propose(
        LineId::new("L1"),
        MutationIntent::QuantityChange { new_quantity: 2 },
    );
    state.propose(LineId::new("L2"), MutationIntent::Removal);

    // L2's mutation completes first (out of order): L2 gone, L1 still stale
    state.apply_snapshot(cart("25.00", vec![cart_line("L1", 1)]));
    assert!(state.ledger().pending(&LineId::new("L2")).is_none());
    assert!(state.ledger().pending(&LineId::new("L1")).is_some());
    assert_eq!(state.view().lines[0].quantity, 2);

    // L1's mutation completes: everything reconciled
    state.apply_snapshot(cart("50.00", vec![cart_line("L1", 2)]));
    assert!(state.ledger().is_empty());
}

#[test]
fn decrease_to_zero_renders_as_removal() {
    let mut state = CartState::new();
    state.apply_snapshot(cart("25.00", vec![cart_line("L1", 1)]));

    state.propose(
        LineId::new("L1"),
        MutationIntent::QuantityChange { new_quantity: 0 },
    );

    let view = state.view();
    assert!(view.lines.is_empty());
    assert_eq!(view.total_quantity, 0);
    // Money totals still come from the authoritative snapshot
    assert_eq!(view.subtotal, "$25.00");
}

#[tokio::test]
async fn store_shares_state_between_request_and_reconciler() {
    let store = CartStateStore::new();
    let cart_id = CartId::new("gid://shopify/Cart/c1");

    // "Request" task proposes an intent
    let handle = store.handle(&cart_id).await;
    {
        let mut guard = handle.write().await;
        guard.apply_snapshot(cart("25.00", vec![cart_line("L1", 1)]));
        guard.propose(
            LineId::new("L1"),
            MutationIntent::QuantityChange { new_quantity: 4 },
        );
    }

    // "Background" task gets its own handle and reconciles
    let reconciler = store.handle(&cart_id).await;
    tokio::spawn(async move {
        reconciler
            .write()
            .await
            .apply_snapshot(cart("100.00", vec![cart_line("L1", 4)]));
    })
    .await
    .expect("reconciler task");

    let guard = handle.read().await;
    assert!(guard.ledger().is_empty());
    assert_eq!(guard.view().lines[0].quantity, 4);
    assert_eq!(guard.view().subtotal, "$100.00");
}
