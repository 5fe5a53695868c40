//! Session layer for cart identity.
//!
//! The only session state the storefront keeps is the Shopify cart ID - the
//! server-side equivalent of a cart cookie. Sessions live in memory; losing
//! one on restart just means the visitor starts a fresh cart.

use tower_sessions::{MemoryStore, SessionManagerLayer};

/// Session cookie name.
const SESSION_COOKIE: &str = "tidepool.sid";

/// Create the session management layer.
#[must_use]
pub fn create_session_layer() -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();
    SessionManagerLayer::new(store).with_name(SESSION_COOKIE)
}
