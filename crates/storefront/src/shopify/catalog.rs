//! Catalog reads: products, collection pages, search, recommendations.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde_json::json;
use tracing::{debug, instrument};

use crate::config::ShopifyApiConfig;

use super::conversions::{
    CollectionPageData, ProductData, RecommendationsData, SearchData, convert_collection_page,
    convert_product, convert_product_connection,
};
use super::queries;
use super::types::{
    CollectionPage, Product, ProductCollectionSortKey, ProductConnection,
    ProductRecommendationIntent, ProductSortKey,
};
use super::{ShopifyError, transport::Transport};

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<Product>),
    CollectionPage(Box<CollectionPage>),
    Products(ProductConnection),
}

// =============================================================================
// Query parameters
// =============================================================================

/// Which page of a connection to request.
///
/// Cursors are opaque and belong to the sort/filter parameters that produced
/// them; callers reset to `Forward { after: None }` whenever those change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSelection {
    /// First `first` items after the given cursor.
    Forward {
        first: i64,
        after: Option<String>,
    },
    /// Last `last` items before the given cursor.
    Backward {
        last: i64,
        before: Option<String>,
    },
}

impl PageSelection {
    fn apply(&self, variables: &mut serde_json::Map<String, serde_json::Value>) {
        match self {
            Self::Forward { first, after } => {
                variables.insert("first".into(), json!(first));
                variables.insert("after".into(), json!(after));
            }
            Self::Backward { last, before } => {
                variables.insert("last".into(), json!(last));
                variables.insert("before".into(), json!(before));
            }
        }
    }

    fn cache_key_part(&self) -> String {
        match self {
            Self::Forward { first, after } => {
                format!("f{first}:{}", after.as_deref().unwrap_or(""))
            }
            Self::Backward { last, before } => {
                format!("b{last}:{}", before.as_deref().unwrap_or(""))
            }
        }
    }
}

/// Parameters for one collection page fetch.
#[derive(Debug, Clone)]
pub struct CollectionPageParams {
    /// Declared facet inputs to apply (already-decoded JSON objects).
    pub filters: Vec<serde_json::Value>,
    /// Sort key for the product connection.
    pub sort_key: ProductCollectionSortKey,
    /// Whether to reverse the sort.
    pub reverse: bool,
    /// Page selection.
    pub page: PageSelection,
}

impl CollectionPageParams {
    fn cache_key(&self, handle: &str) -> String {
        // serde_json maps are ordered, so this is deterministic
        let filters = serde_json::Value::Array(self.filters.clone()).to_string();
        format!(
            "collection:{handle}:{}:{}:{}:{}",
            self.sort_key.as_str(),
            self.reverse,
            filters,
            self.page.cache_key_part()
        )
    }
}

/// Parameters for one product search fetch.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Free-text search query; `None` lists all products.
    pub query: Option<String>,
    /// Sort key for the product connection.
    pub sort_key: ProductSortKey,
    /// Whether to reverse the sort.
    pub reverse: bool,
    /// Page selection.
    pub page: PageSelection,
}

impl SearchParams {
    fn cache_key(&self) -> String {
        format!(
            "products:{}:{}:{}",
            self.sort_key.as_str(),
            self.reverse,
            self.page.cache_key_part()
        )
    }
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for catalog reads against the Storefront API.
///
/// Products and collection pages are cached for 5 minutes; search queries
/// and recommendations are always fetched fresh.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    transport: Transport,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &ShopifyApiConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                transport: Transport::new(config),
                cache,
            }),
        }
    }

    /// Get a product by its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn product_by_handle(&self, handle: &str) -> Result<Product, ShopifyError> {
        let cache_key = format!("product:{handle}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let document = queries::document(queries::GET_PRODUCT, &[queries::PRODUCT_FRAGMENT]);
        let data: ProductData = self
            .inner
            .transport
            .execute(&document, json!({ "handle": handle }))
            .await?;

        let product = data
            .product
            .map(convert_product)
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {handle}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get one page of a collection: products, declared facets, cursors.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection is not found or the API request
    /// fails.
    #[instrument(skip(self, params), fields(handle = %handle))]
    pub async fn collection_page(
        &self,
        handle: &str,
        params: &CollectionPageParams,
    ) -> Result<CollectionPage, ShopifyError> {
        let cache_key = params.cache_key(handle);

        if let Some(CacheValue::CollectionPage(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for collection page");
            return Ok(*page);
        }

        let mut variables = serde_json::Map::new();
        variables.insert("handle".into(), json!(handle));
        variables.insert(
            "filters".into(),
            if params.filters.is_empty() {
                serde_json::Value::Null
            } else {
                serde_json::Value::Array(params.filters.clone())
            },
        );
        variables.insert("sortKey".into(), json!(params.sort_key.as_str()));
        variables.insert("reverse".into(), json!(params.reverse));
        params.page.apply(&mut variables);

        let document =
            queries::document(queries::GET_COLLECTION_PAGE, &[queries::PRODUCT_FRAGMENT]);
        let data: CollectionPageData = self
            .inner
            .transport
            .execute(&document, serde_json::Value::Object(variables))
            .await?;

        let page = data
            .collection
            .map(convert_collection_page)
            .ok_or_else(|| ShopifyError::NotFound(format!("Collection not found: {handle}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::CollectionPage(Box::new(page.clone())))
            .await;

        Ok(page)
    }

    /// Search products store-wide.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, params))]
    pub async fn search_products(
        &self,
        params: &SearchParams,
    ) -> Result<ProductConnection, ShopifyError> {
        let cache_key = params.cache_key();

        // Only cache browse listings, not free-text searches
        if params.query.is_none()
            && let Some(CacheValue::Products(connection)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(connection);
        }

        let mut variables = serde_json::Map::new();
        variables.insert("query".into(), json!(params.query));
        variables.insert("sortKey".into(), json!(params.sort_key.as_str()));
        variables.insert("reverse".into(), json!(params.reverse));
        params.page.apply(&mut variables);

        let document = queries::document(queries::SEARCH_PRODUCTS, &[queries::PRODUCT_FRAGMENT]);
        let data: SearchData = self
            .inner
            .transport
            .execute(&document, serde_json::Value::Object(variables))
            .await?;

        let connection = convert_product_connection(data.products);

        if params.query.is_none() {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(connection.clone()))
                .await;
        }

        Ok(connection)
    }

    /// Get product recommendations.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn recommendations(
        &self,
        product_id: &str,
        intent: Option<ProductRecommendationIntent>,
    ) -> Result<Vec<Product>, ShopifyError> {
        let document = queries::document(
            queries::GET_PRODUCT_RECOMMENDATIONS,
            &[queries::PRODUCT_FRAGMENT],
        );
        let data: RecommendationsData = self
            .inner
            .transport
            .execute(
                &document,
                json!({
                    "productId": product_id,
                    "intent": intent.map(ProductRecommendationIntent::as_str),
                }),
            )
            .await?;

        Ok(data
            .product_recommendations
            .map(|products| products.into_iter().map(convert_product).collect())
            .unwrap_or_default())
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, handle: &str) {
        let cache_key = format!("product:{handle}");
        self.inner.cache.invalidate(&cache_key).await;
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}
