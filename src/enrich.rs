use crate::catalog::CatalogMapping;
use crate::{EnrichedTransaction, Transaction};

/// Sentinel key guaranteed not to match any real catalog id; produced when
/// a `ProductID` has no numeric suffix.
pub const UNMATCHED_KEY: i64 = -1;

/// Derives the numeric catalog key from a `ProductID` by stripping the
/// fixed `P` prefix and parsing the remainder. A missing prefix or a
/// non-numeric remainder yields [`UNMATCHED_KEY`] rather than an error.
#[must_use]
pub fn catalog_key(product_id: &str) -> i64 {
    product_id
        .strip_prefix('P')
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(UNMATCHED_KEY)
}

/// Joins each transaction against the catalog mapping.
///
/// The join is total and order-preserving: one [`EnrichedTransaction`] per
/// input record, in input order. A lookup hit copies category, brand, and
/// rating; a miss leaves them `None` with `api_match` false. The source
/// transactions are never altered.
#[must_use]
pub fn enrich_sales_data(
    transactions: &[Transaction],
    mapping: &CatalogMapping,
) -> Vec<EnrichedTransaction> {
    transactions
        .iter()
        .map(|tx| match mapping.get(&catalog_key(&tx.product_id)) {
            Some(entry) => EnrichedTransaction {
                transaction: tx.clone(),
                api_category: Some(entry.category.clone()),
                api_brand: Some(entry.brand.clone()),
                api_rating: Some(entry.rating),
                api_match: true,
            },
            None => EnrichedTransaction {
                transaction: tx.clone(),
                api_category: None,
                api_brand: None,
                api_rating: None,
                api_match: false,
            },
        })
        .collect()
}
