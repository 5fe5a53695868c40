//! Integration tests for Tidepool.
//!
//! These tests exercise the storefront view-state core across module
//! boundaries - option matrix + selection codec, facet codec + cursor
//! pager, optimistic ledger + cart store - without any network access.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tidepool-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_option_matrix` - variant resolution and availability
//! - `storefront_collection_state` - filter/sort/cursor round-tripping
//! - `storefront_cart_overlay` - optimistic mutation lifecycle
//!
//! The [`fixtures`] module provides catalog and cart builders shared by the
//! test binaries.

pub mod fixtures;
