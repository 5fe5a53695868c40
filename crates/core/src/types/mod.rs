//! Core types for Tidepool.
//!
//! This module provides type-safe wrappers for common domain concepts.

mod id;
mod price;

pub use id::{CartId, CollectionId, LineId, ProductId, VariantId};
pub use price::{CurrencyCode, Price};
