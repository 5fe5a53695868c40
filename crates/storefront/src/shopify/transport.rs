//! HTTP transport shared by the catalog and cart clients.
//!
//! Posts a GraphQL document plus variables to the Storefront API endpoint
//! and deserializes the `data` payload into the caller's wire type.

use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::ShopifyApiConfig;

use super::{GraphQLError, ShopifyError};

/// GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

/// Shared transport for Storefront API GraphQL requests.
///
/// Cheap to clone; `reqwest::Client` is reference-counted internally.
#[derive(Clone)]
pub(super) struct Transport {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl Transport {
    /// Create a transport from the Shopify API configuration.
    pub(super) fn new(config: &ShopifyApiConfig) -> Self {
        let endpoint = format!(
            "https://{}/api/{}/graphql.json",
            config.store, config.api_version
        );

        Self {
            client: reqwest::Client::new(),
            endpoint,
            access_token: config.storefront_private_token.expose_secret().to_string(),
        }
    }

    /// Execute a GraphQL document and deserialize the `data` payload.
    pub(super) async fn execute<T: DeserializeOwned>(
        &self,
        document: &str,
        variables: serde_json::Value,
    ) -> Result<T, ShopifyError> {
        let request_body = serde_json::json!({
            "query": document,
            "variables": variables,
        });

        let response = self
            .client
            .post(&self.endpoint)
            // Private access tokens use a different header than public tokens
            // See: https://shopify.dev/docs/storefronts/headless/building-with-the-storefront-api/getting-started
            .header("Shopify-Storefront-Private-Token", &self.access_token)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Storefront API returned non-success status"
            );
            return Err(ShopifyError::graphql(format!(
                "HTTP {status}: {}",
                response_text.chars().take(200).collect::<String>()
            )));
        }

        let response: GraphQLResponse<T> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Storefront API response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            tracing::debug!(errors = ?errors, "GraphQL errors in response");

            return Err(ShopifyError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        path: e.path,
                    })
                    .collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                body = %response_text.chars().take(500).collect::<String>(),
                "Storefront API response has no data and no errors"
            );
            ShopifyError::graphql("No data in response")
        })
    }
}
