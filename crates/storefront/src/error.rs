//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::shopify::ShopifyError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storefront API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture unexpected server-side failures to Sentry; expected
        // request-level outcomes (not-found, user errors) stay out of it
        let capture = match &self {
            Self::Internal(_) => true,
            Self::Shopify(err) => !matches!(
                err,
                ShopifyError::NotFound(_) | ShopifyError::UserError(_)
            ),
            Self::NotFound(_) | Self::BadRequest(_) => false,
        };
        if capture {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Shopify(err) => match err {
                ShopifyError::NotFound(_) => StatusCode::NOT_FOUND,
                ShopifyError::UserError(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ShopifyError::RateLimited(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Shopify(err) => match err {
                ShopifyError::NotFound(_) => "Not found".to_string(),
                ShopifyError::UserError(msg) => msg.clone(),
                ShopifyError::RateLimited(_) => "Upstream rate limited".to_string(),
                _ => "External service error".to_string(),
            },
            _ => self.to_string(),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
