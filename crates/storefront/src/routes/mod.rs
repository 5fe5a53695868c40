//! HTTP route handlers for storefront view models.
//!
//! Every route returns JSON view state; navigation is expressed as
//! [`crate::catalog::NavigationTarget`] intents for the front-end router to
//! perform.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check
//!
//! # Products
//! GET  /products/{handle}               - Product page state (selection via query)
//! GET  /products/{handle}/recommendations - Recommended products
//!
//! # Collections & search
//! GET  /collections/{handle}            - Collection page state (filters/sort/cursors via query)
//! GET  /search                          - Store-wide product search
//!
//! # Cart
//! GET  /cart                            - Cart view (overlay applied)
//! POST /cart/lines                      - Add line (synchronous)
//! POST /cart/lines/update               - Change quantity (optimistic)
//! POST /cart/lines/remove               - Remove line (optimistic)
//! POST /cart/discounts                  - Replace discount codes (optimistic)
//!
//! # Checkout
//! GET  /checkout                        - Redirect to Shopify checkout
//! ```

pub mod cart;
pub mod collections;
pub mod products;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{handle}", get(products::show))
        .route("/{handle}/recommendations", get(products::recommendations))
}

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new().route("/{handle}", get(collections::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/lines", post(cart::add))
        .route("/lines/update", post(cart::update))
        .route("/lines/remove", post(cart::remove))
        .route("/discounts", post(cart::discounts))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/collections", collection_routes())
        .route("/search", get(search::show))
        .nest("/cart", cart_routes())
        .route("/checkout", get(cart::checkout))
}
