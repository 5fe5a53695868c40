//! Shopify Storefront API clients.
//!
//! # Architecture
//!
//! - Hand-written GraphQL documents (see `queries`) posted over `reqwest`;
//!   responses deserialize into wire structs (`conversions`) and convert
//!   into the domain types of [`types`]
//! - Shopify is source of truth - NO local sync, direct API calls
//! - Catalog reads cached in-memory via `moka` (5 minute TTL); cart
//!   operations are never cached
//!
//! # Clients
//!
//! - [`CatalogClient`] - products, collections, search, recommendations
//! - [`CartClient`] - cart creation and line mutations
//!
//! # Example
//!
//! ```rust,ignore
//! use tidepool_storefront::shopify::{CatalogClient, CartClient};
//! use tidepool_storefront::shopify::types::CartLineInput;
//!
//! let catalog = CatalogClient::new(&config.shopify);
//! let cart_api = CartClient::new(&config.shopify);
//!
//! let product = catalog.product_by_handle("tide-chart-tee").await?;
//! let cart = cart_api
//!     .create(vec![CartLineInput {
//!         merchandise_id: product.variants[0].id.clone(),
//!         quantity: 1,
//!     }])
//!     .await?;
//! ```

mod cart;
mod catalog;
mod conversions;
mod queries;
mod transport;
pub mod types;

pub use cart::CartClient;
pub use catalog::{CatalogClient, CollectionPageParams, PageSelection, SearchParams};

use thiserror::Error;

/// Errors that can occur when interacting with the Storefront API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),
}

impl ShopifyError {
    /// Build a `GraphQL` error from a single message.
    pub(crate) fn graphql(message: impl Into<String>) -> Self {
        Self::GraphQL(vec![GraphQLError {
            message: message.into(),
            path: Vec::new(),
        }])
    }
}

/// A GraphQL error returned by the Storefront API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
