//! Cart route handlers.
//!
//! The cart ID lives in the session; authoritative snapshots and the
//! optimistic mutation ledger live in the shared per-cart store. Line
//! mutations respond immediately with the overlaid view and submit the
//! mutation in a background task; the task reconciles the authoritative
//! response (or discards the overlay on failure) whenever it lands, in
//! whatever order responses arrive.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tidepool_core::{CartId, LineId, VariantId};
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::CartView;
use crate::cart::optimistic::MutationIntent;
use crate::cart::store::CartHandle;
use crate::error::{AppError, Result};
use crate::shopify::CartClient;
use crate::shopify::types::{Cart, CartLineInput, CartLineUpdateInput};
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Session key for the Shopify cart ID.
const CART_ID_KEY: &str = "cart_id";

/// Get the cart ID from the session.
async fn get_cart_id(session: &Session) -> Option<CartId> {
    session
        .get::<String>(CART_ID_KEY)
        .await
        .ok()
        .flatten()
        .map(CartId::new)
}

/// Set the cart ID in the session.
async fn set_cart_id(
    session: &Session,
    cart_id: &CartId,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(CART_ID_KEY, cart_id.as_str()).await
}

// =============================================================================
// Request bodies
// =============================================================================

/// Add-to-cart request.
#[derive(Debug, Deserialize)]
pub struct AddLineRequest {
    pub variant_id: String,
    pub quantity: Option<u32>,
}

/// Quantity-change request.
#[derive(Debug, Deserialize)]
pub struct UpdateLineRequest {
    pub line_id: String,
    pub quantity: u32,
}

/// Line-removal request.
#[derive(Debug, Deserialize)]
pub struct RemoveLineRequest {
    pub line_id: String,
}

/// Discount-codes request; replaces the full set of codes on the cart.
#[derive(Debug, Deserialize)]
pub struct DiscountCodesRequest {
    pub codes: Vec<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Current cart view with any pending intents applied.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let Some(cart_id) = get_cart_id(&session).await else {
        return Ok(Json(CartView::empty()));
    };

    let handle = state.carts().handle(&cart_id).await;
    if let Some(view) = {
        let guard = handle.read().await;
        guard.snapshot().is_some().then(|| guard.view())
    } {
        return Ok(Json(view));
    }

    // No snapshot yet this process lifetime: fetch one
    match state.cart().get(&cart_id).await {
        Ok(cart) => {
            let mut guard = handle.write().await;
            guard.apply_snapshot(cart);
            Ok(Json(guard.view()))
        }
        Err(e) => {
            tracing::warn!(cart_id = %cart_id, "Failed to fetch cart: {e}");
            Ok(Json(CartView::empty()))
        }
    }
}

/// Add an item to the cart.
///
/// Adds create a line the core has never seen, so there is nothing to
/// overlay; this waits for the authoritative response. Creates a new cart
/// when the session has none.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddLineRequest>,
) -> Result<Json<CartView>> {
    let quantity = i64::from(request.quantity.unwrap_or(1));
    if quantity < 1 {
        return Err(AppError::BadRequest("quantity must be at least 1".to_string()));
    }

    let line = CartLineInput {
        merchandise_id: VariantId::new(request.variant_id),
        quantity,
    };

    let cart = match get_cart_id(&session).await {
        Some(cart_id) => state.cart().lines_add(&cart_id, vec![line]).await?,
        None => state.cart().create(vec![line]).await?,
    };

    if let Err(e) = set_cart_id(&session, &cart.id).await {
        tracing::error!("Failed to save cart ID to session: {e}");
    }

    let handle = state.carts().handle(&cart.id).await;
    let mut guard = handle.write().await;
    guard.apply_snapshot(cart);
    Ok(Json(guard.view()))
}

/// Change a line's quantity (optimistic).
///
/// Records the intent, fires the mutation in the background, and responds
/// immediately with the overlaid view; a quantity of zero renders - and is
/// submitted - as a removal.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<UpdateLineRequest>,
) -> Result<Json<CartView>> {
    let Some(cart_id) = get_cart_id(&session).await else {
        return Ok(Json(CartView::empty()));
    };

    let line_id = LineId::new(request.line_id);
    let quantity = request.quantity;

    let handle = state.carts().handle(&cart_id).await;
    let view = {
        let mut guard = handle.write().await;
        guard.propose(
            line_id.clone(),
            MutationIntent::QuantityChange {
                new_quantity: quantity,
            },
        );
        guard.view()
    };

    submit(
        state.cart().clone(),
        cart_id,
        handle,
        line_id.clone(),
        move |client, cart_id, line_id| async move {
            if quantity == 0 {
                client.lines_remove(&cart_id, vec![line_id]).await
            } else {
                client
                    .lines_update(
                        &cart_id,
                        vec![CartLineUpdateInput {
                            id: line_id,
                            quantity: Some(i64::from(quantity)),
                            merchandise_id: None,
                        }],
                    )
                    .await
            }
        },
    );

    Ok(Json(view))
}

/// Remove a line (optimistic).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RemoveLineRequest>,
) -> Result<Json<CartView>> {
    let Some(cart_id) = get_cart_id(&session).await else {
        return Ok(Json(CartView::empty()));
    };

    let line_id = LineId::new(request.line_id);

    let handle = state.carts().handle(&cart_id).await;
    let view = {
        let mut guard = handle.write().await;
        guard.propose(line_id.clone(), MutationIntent::Removal);
        guard.view()
    };

    submit(
        state.cart().clone(),
        cart_id,
        handle,
        line_id.clone(),
        move |client, cart_id, line_id| async move {
            client.lines_remove(&cart_id, vec![line_id]).await
        },
    );

    Ok(Json(view))
}

/// Replace the cart's discount codes (optimistic).
///
/// Every current line's allocations will be recalculated, so each gets a
/// pending discount-update intent until the authoritative snapshot lands.
#[instrument(skip(state, session))]
pub async fn discounts(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<DiscountCodesRequest>,
) -> Result<Json<CartView>> {
    let Some(cart_id) = get_cart_id(&session).await else {
        return Ok(Json(CartView::empty()));
    };

    let handle = state.carts().handle(&cart_id).await;
    let (view, line_ids) = {
        let mut guard = handle.write().await;
        let line_ids: Vec<LineId> = guard
            .snapshot()
            .map(|cart| cart.lines.iter().map(|line| line.id.clone()).collect())
            .unwrap_or_default();
        for line_id in &line_ids {
            guard.propose(line_id.clone(), MutationIntent::DiscountUpdate);
        }
        (guard.view(), line_ids)
    };

    let client = state.cart().clone();
    let task_handle = handle.clone();
    tokio::spawn(async move {
        match client.discount_codes_update(&cart_id, request.codes).await {
            Ok(cart) => task_handle.write().await.apply_snapshot(cart),
            Err(e) => {
                tracing::error!(cart_id = %cart_id, "Discount update failed: {e}");
                let mut guard = task_handle.write().await;
                for line_id in &line_ids {
                    guard.fail(line_id);
                }
            }
        }
    });

    Ok(Json(view))
}

/// Redirect to Shopify checkout.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Response {
    let Some(cart_id) = get_cart_id(&session).await else {
        // No cart, redirect to cart view
        return Redirect::to("/cart").into_response();
    };

    match state.cart().get(&cart_id).await {
        Ok(cart) => Redirect::to(&cart.checkout_url).into_response(),
        Err(e) => {
            tracing::error!("Failed to get cart for checkout: {e}");
            Redirect::to("/cart").into_response()
        }
    }
}

// =============================================================================
// Background submission
// =============================================================================

/// Fire a single-line mutation in the background and reconcile its result.
///
/// On success the authoritative snapshot wholly replaces the baseline and
/// retires any satisfied intents; on failure the line's overlay is discarded
/// so rendering reverts to the last authoritative value. Either outcome may
/// arrive after newer proposals for the same line - reconciliation is keyed,
/// so out-of-order completion is harmless.
fn submit<F, Fut>(
    client: CartClient,
    cart_id: CartId,
    handle: CartHandle,
    line_id: LineId,
    mutation: F,
) where
    F: FnOnce(CartClient, CartId, LineId) -> Fut + Send + 'static,
    Fut: Future<Output = std::result::Result<Cart, crate::shopify::ShopifyError>> + Send + 'static,
{
    tokio::spawn(async move {
        match mutation(client, cart_id.clone(), line_id.clone()).await {
            Ok(cart) => handle.write().await.apply_snapshot(cart),
            Err(e) => {
                tracing::error!(cart_id = %cart_id, line_id = %line_id, "Cart mutation failed: {e}");
                handle.write().await.fail(&line_id);
            }
        }
    });
}
