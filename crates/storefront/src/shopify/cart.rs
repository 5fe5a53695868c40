//! Cart mutations against the Storefront API.
//!
//! Every mutation returns the full authoritative cart snapshot; the caller
//! reconciles it into local state (see `crate::cart`). Cart state is never
//! cached here - each response wholly replaces the previous snapshot.

use serde_json::json;
use tidepool_core::{CartId, LineId};
use tracing::instrument;

use crate::config::ShopifyApiConfig;

use super::conversions::{
    CartCreateData, CartData, CartDiscountCodesUpdateData, CartLinesAddData, CartLinesRemoveData,
    CartLinesUpdateData, WireCartPayload, convert_cart, convert_user_errors,
};
use super::queries;
use super::types::{Cart, CartLineInput, CartLineUpdateInput};
use super::{ShopifyError, transport::Transport};

/// Client for cart operations against the Storefront API.
#[derive(Clone)]
pub struct CartClient {
    transport: Transport,
}

impl CartClient {
    /// Create a new cart client.
    #[must_use]
    pub fn new(config: &ShopifyApiConfig) -> Self {
        Self {
            transport: Transport::new(config),
        }
    }

    /// Create a new cart, optionally seeded with lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart creation fails or user errors are
    /// returned.
    #[instrument(skip(self, lines))]
    pub async fn create(&self, lines: Vec<CartLineInput>) -> Result<Cart, ShopifyError> {
        let document = queries::document(queries::CART_CREATE, &[queries::CART_FRAGMENT]);
        let data: CartCreateData = self
            .transport
            .execute(&document, json!({ "lines": line_inputs(&lines) }))
            .await?;

        cart_from_payload(data.cart_create, "cartCreate")
    }

    /// Get an existing cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is not found or the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get(&self, cart_id: &CartId) -> Result<Cart, ShopifyError> {
        let document = queries::document(queries::GET_CART, &[queries::CART_FRAGMENT]);
        let data: CartData = self
            .transport
            .execute(&document, json!({ "cartId": cart_id }))
            .await?;

        data.cart
            .map(convert_cart)
            .ok_or_else(|| ShopifyError::NotFound(format!("Cart not found: {cart_id}")))
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn lines_add(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError> {
        let document = queries::document(queries::CART_LINES_ADD, &[queries::CART_FRAGMENT]);
        let data: CartLinesAddData = self
            .transport
            .execute(
                &document,
                json!({ "cartId": cart_id, "lines": line_inputs(&lines) }),
            )
            .await?;

        cart_from_payload(data.cart_lines_add, "cartLinesAdd")
    }

    /// Update cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn lines_update(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, ShopifyError> {
        let lines: Vec<_> = lines
            .iter()
            .map(|line| {
                let mut input = serde_json::Map::new();
                input.insert("id".into(), json!(line.id));
                if let Some(quantity) = line.quantity {
                    input.insert("quantity".into(), json!(quantity));
                }
                if let Some(merchandise_id) = &line.merchandise_id {
                    input.insert("merchandiseId".into(), json!(merchandise_id));
                }
                serde_json::Value::Object(input)
            })
            .collect();

        let document = queries::document(queries::CART_LINES_UPDATE, &[queries::CART_FRAGMENT]);
        let data: CartLinesUpdateData = self
            .transport
            .execute(&document, json!({ "cartId": cart_id, "lines": lines }))
            .await?;

        cart_from_payload(data.cart_lines_update, "cartLinesUpdate")
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails or user errors are returned.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id))]
    pub async fn lines_remove(
        &self,
        cart_id: &CartId,
        line_ids: Vec<LineId>,
    ) -> Result<Cart, ShopifyError> {
        let document = queries::document(queries::CART_LINES_REMOVE, &[queries::CART_FRAGMENT]);
        let data: CartLinesRemoveData = self
            .transport
            .execute(&document, json!({ "cartId": cart_id, "lineIds": line_ids }))
            .await?;

        cart_from_payload(data.cart_lines_remove, "cartLinesRemove")
    }

    /// Replace the discount codes on a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails or user errors are returned.
    #[instrument(skip(self, discount_codes), fields(cart_id = %cart_id))]
    pub async fn discount_codes_update(
        &self,
        cart_id: &CartId,
        discount_codes: Vec<String>,
    ) -> Result<Cart, ShopifyError> {
        let document =
            queries::document(queries::CART_DISCOUNT_CODES_UPDATE, &[queries::CART_FRAGMENT]);
        let data: CartDiscountCodesUpdateData = self
            .transport
            .execute(
                &document,
                json!({ "cartId": cart_id, "discountCodes": discount_codes }),
            )
            .await?;

        cart_from_payload(data.cart_discount_codes_update, "cartDiscountCodesUpdate")
    }
}

/// Serialize cart line inputs into GraphQL variables.
fn line_inputs(lines: &[CartLineInput]) -> serde_json::Value {
    serde_json::Value::Array(
        lines
            .iter()
            .map(|line| {
                json!({
                    "merchandiseId": line.merchandise_id,
                    "quantity": line.quantity,
                })
            })
            .collect(),
    )
}

/// Unwrap a mutation payload into a cart, surfacing user errors.
fn cart_from_payload(
    payload: Option<WireCartPayload>,
    mutation: &str,
) -> Result<Cart, ShopifyError> {
    let Some(payload) = payload else {
        return Err(ShopifyError::graphql(format!("{mutation}: empty payload")));
    };

    let user_errors = convert_user_errors(payload.user_errors);
    if !user_errors.is_empty() {
        return Err(ShopifyError::UserError(
            user_errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; "),
        ));
    }

    payload
        .cart
        .map(convert_cart)
        .ok_or_else(|| ShopifyError::graphql(format!("{mutation}: no cart returned")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use tidepool_core::VariantId;

    #[test]
    fn test_line_inputs_use_wire_casing() {
        let lines = vec![CartLineInput {
            merchandise_id: VariantId::new("gid://shopify/ProductVariant/1"),
            quantity: 2,
        }];
        let value = line_inputs(&lines);
        assert_eq!(
            value[0]["merchandiseId"],
            serde_json::json!("gid://shopify/ProductVariant/1")
        );
        assert_eq!(value[0]["quantity"], serde_json::json!(2));
    }

    #[test]
    fn test_cart_from_payload_surfaces_user_errors() {
        let payload: WireCartPayload = serde_json::from_value(serde_json::json!({
            "cart": null,
            "userErrors": [
                {"code": "INVALID", "field": ["lines"], "message": "Quantity too large"}
            ]
        }))
        .unwrap();

        let err = cart_from_payload(Some(payload), "cartLinesUpdate").unwrap_err();
        assert!(matches!(err, ShopifyError::UserError(ref msg) if msg == "Quantity too large"));
    }

    #[test]
    fn test_cart_from_payload_missing_payload() {
        let err = cart_from_payload(None, "cartCreate").unwrap_err();
        assert!(err.to_string().contains("cartCreate"));
    }
}
