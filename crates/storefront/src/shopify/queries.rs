//! GraphQL documents for the Storefront API.
//!
//! Documents are hand-written and posted as plain strings; variables travel
//! as JSON. Fragments are kept separate and joined into a full document with
//! [`document`] at the call site.

/// Join query body and fragments into one GraphQL document.
pub(super) fn document(body: &str, fragments: &[&str]) -> String {
    let mut doc = String::from(body);
    for fragment in fragments {
        doc.push('\n');
        doc.push_str(fragment);
    }
    doc
}

// =============================================================================
// Fragments
// =============================================================================

pub(super) const PRODUCT_FRAGMENT: &str = r"
fragment ProductFields on Product {
  id
  handle
  title
  description
  availableForSale
  vendor
  tags
  seo {
    title
    description
  }
  priceRange {
    minVariantPrice {
      amount
      currencyCode
    }
    maxVariantPrice {
      amount
      currencyCode
    }
  }
  featuredImage {
    url
    altText
    width
    height
  }
  images(first: 10) {
    nodes {
      url
      altText
      width
      height
    }
  }
  options {
    id
    name
    values
  }
  variants(first: 250) {
    nodes {
      id
      title
      availableForSale
      price {
        amount
        currencyCode
      }
      compareAtPrice {
        amount
        currencyCode
      }
      selectedOptions {
        name
        value
      }
      image {
        url
        altText
        width
        height
      }
    }
  }
}
";

pub(super) const CART_FRAGMENT: &str = r"
fragment CartFields on Cart {
  id
  checkoutUrl
  totalQuantity
  cost {
    subtotalAmount {
      amount
      currencyCode
    }
    totalAmount {
      amount
      currencyCode
    }
    totalTaxAmount {
      amount
      currencyCode
    }
  }
  discountCodes {
    code
    applicable
  }
  lines(first: 100) {
    nodes {
      id
      quantity
      cost {
        amountPerQuantity {
          amount
          currencyCode
        }
        subtotalAmount {
          amount
          currencyCode
        }
        totalAmount {
          amount
          currencyCode
        }
      }
      discountAllocations {
        discountedAmount {
          amount
          currencyCode
        }
      }
      merchandise {
        ... on ProductVariant {
          id
          title
          availableForSale
          price {
            amount
            currencyCode
          }
          selectedOptions {
            name
            value
          }
          image {
            url
            altText
            width
            height
          }
          product {
            id
            handle
            title
            featuredImage {
              url
              altText
              width
              height
            }
          }
        }
      }
    }
  }
}
";

// =============================================================================
// Catalog queries
// =============================================================================

pub(super) const GET_PRODUCT: &str = r"
query GetProduct($handle: String!) {
  product(handle: $handle) {
    ...ProductFields
  }
}
";

pub(super) const GET_COLLECTION_PAGE: &str = r"
query GetCollectionPage(
  $handle: String!
  $filters: [ProductFilter!]
  $sortKey: ProductCollectionSortKeys
  $reverse: Boolean
  $first: Int
  $after: String
  $last: Int
  $before: String
) {
  collection(handle: $handle) {
    id
    handle
    title
    description
    seo {
      title
      description
    }
    image {
      url
      altText
      width
      height
    }
    products(
      filters: $filters
      sortKey: $sortKey
      reverse: $reverse
      first: $first
      after: $after
      last: $last
      before: $before
    ) {
      filters {
        id
        label
        type
        values {
          id
          label
          count
          input
        }
      }
      nodes {
        ...ProductFields
      }
      pageInfo {
        hasNextPage
        hasPreviousPage
        startCursor
        endCursor
      }
    }
  }
}
";

pub(super) const SEARCH_PRODUCTS: &str = r"
query SearchProducts(
  $query: String
  $sortKey: ProductSortKeys
  $reverse: Boolean
  $first: Int
  $after: String
  $last: Int
  $before: String
) {
  products(
    query: $query
    sortKey: $sortKey
    reverse: $reverse
    first: $first
    after: $after
    last: $last
    before: $before
  ) {
    nodes {
      ...ProductFields
    }
    pageInfo {
      hasNextPage
      hasPreviousPage
      startCursor
      endCursor
    }
  }
}
";

pub(super) const GET_PRODUCT_RECOMMENDATIONS: &str = r"
query GetProductRecommendations($productId: ID!, $intent: ProductRecommendationIntent) {
  productRecommendations(productId: $productId, intent: $intent) {
    ...ProductFields
  }
}
";

// =============================================================================
// Cart queries and mutations
// =============================================================================

pub(super) const GET_CART: &str = r"
query GetCart($cartId: ID!) {
  cart(id: $cartId) {
    ...CartFields
  }
}
";

pub(super) const CART_CREATE: &str = r"
mutation CartCreate($lines: [CartLineInput!]) {
  cartCreate(input: { lines: $lines }) {
    cart {
      ...CartFields
    }
    userErrors {
      code
      field
      message
    }
  }
}
";

pub(super) const CART_LINES_ADD: &str = r"
mutation CartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart {
      ...CartFields
    }
    userErrors {
      code
      field
      message
    }
  }
}
";

pub(super) const CART_LINES_UPDATE: &str = r"
mutation CartLinesUpdate($cartId: ID!, $lines: [CartLineUpdateInput!]!) {
  cartLinesUpdate(cartId: $cartId, lines: $lines) {
    cart {
      ...CartFields
    }
    userErrors {
      code
      field
      message
    }
  }
}
";

pub(super) const CART_LINES_REMOVE: &str = r"
mutation CartLinesRemove($cartId: ID!, $lineIds: [ID!]!) {
  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {
    cart {
      ...CartFields
    }
    userErrors {
      code
      field
      message
    }
  }
}
";

pub(super) const CART_DISCOUNT_CODES_UPDATE: &str = r"
mutation CartDiscountCodesUpdate($cartId: ID!, $discountCodes: [String!]) {
  cartDiscountCodesUpdate(cartId: $cartId, discountCodes: $discountCodes) {
    cart {
      ...CartFields
    }
    userErrors {
      code
      field
      message
    }
  }
}
";
