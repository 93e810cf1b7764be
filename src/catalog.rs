use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use serde::Deserialize;

/// Endpoint queried for reference product data. A single page of up to 100
/// products is requested; there is no retry, pagination, or caching.
pub const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com/products?limit=100";

const DEFAULT_TITLE: &str = "Unknown Product";
const DEFAULT_CATEGORY: &str = "General";
const DEFAULT_BRAND: &str = "Generic";
const DEFAULT_RATING: f64 = 0.0;

/// Error returned when the catalog endpoint could not be fetched or its
/// payload could not be decoded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CatalogError {
    /// The HTTP request itself failed (connection, DNS, timeout).
    Transport(String),
    /// The endpoint answered with a non-success status code.
    HttpStatus(u16),
    /// The response body was not the expected JSON payload.
    InvalidPayload(String),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&match self {
            CatalogError::Transport(err) => format!("Connection error: {}", err),
            CatalogError::HttpStatus(status) => {
                format!("Received status code {}", status)
            }
            CatalogError::InvalidPayload(err) => format!("Invalid payload: {}", err),
        })
    }
}

/// One product object as returned by the catalog endpoint. Every field
/// except `id` may be absent from the payload.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ApiProduct {
    /// Numeric product id, the join key.
    pub id: i64,
    /// Product title, if present.
    #[serde(default)]
    pub title: Option<String>,
    /// Product category, if present.
    #[serde(default)]
    pub category: Option<String>,
    /// Product brand, if present.
    #[serde(default)]
    pub brand: Option<String>,
    /// Product rating, if present.
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ProductsPayload {
    #[serde(default)]
    products: Vec<ApiProduct>,
}

/// Catalog metadata for one product, with missing payload fields resolved
/// to defaults at construction time.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogEntry {
    /// Product title, defaulted to `"Unknown Product"`.
    pub title: String,
    /// Product category, defaulted to `"General"`.
    pub category: String,
    /// Product brand, defaulted to `"Generic"`.
    pub brand: String,
    /// Product rating, defaulted to `0.0`.
    pub rating: f64,
}

impl From<ApiProduct> for CatalogEntry {
    fn from(product: ApiProduct) -> Self {
        Self {
            title: product.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            category: product
                .category
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            brand: product.brand.unwrap_or_else(|| DEFAULT_BRAND.to_string()),
            rating: product.rating.unwrap_or(DEFAULT_RATING),
        }
    }
}

/// Lookup from numeric product id to catalog metadata, built once per run
/// and read-only during enrichment.
pub type CatalogMapping = HashMap<i64, CatalogEntry>;

/// Fetches the product list from the catalog endpoint.
///
/// Any failure -- transport error, non-success status, undecodable body --
/// is a recoverable condition: it is logged and an empty list is returned,
/// so downstream enrichment marks everything unmatched instead of aborting
/// the pipeline.
#[must_use]
pub fn fetch_all_products(url: &str) -> Vec<ApiProduct> {
    match try_fetch(url) {
        Ok(products) => products,
        Err(err) => {
            log::warn!("Catalog fetch failed: {}", err);
            Vec::new()
        }
    }
}

fn try_fetch(url: &str) -> Result<Vec<ApiProduct>, CatalogError> {
    let response =
        reqwest::blocking::get(url).map_err(|err| CatalogError::Transport(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::HttpStatus(status.as_u16()));
    }

    let body = response
        .text()
        .map_err(|err| CatalogError::Transport(err.to_string()))?;
    parse_products(&body)
}

/// Decodes the endpoint's JSON body: a top-level object whose `products`
/// field holds the product list.
pub fn parse_products(body: &str) -> Result<Vec<ApiProduct>, CatalogError> {
    let payload: ProductsPayload = serde_json::from_str(body)
        .map_err(|err| CatalogError::InvalidPayload(err.to_string()))?;
    Ok(payload.products)
}

/// Builds the id-keyed [`CatalogMapping`], resolving field defaults. Later
/// duplicates of an id overwrite earlier ones; the endpoint does not emit
/// duplicates in practice.
#[must_use]
pub fn create_product_mapping(products: Vec<ApiProduct>) -> CatalogMapping {
    products
        .into_iter()
        .map(|product| (product.id, CatalogEntry::from(product)))
        .collect()
}
