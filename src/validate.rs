use crate::numeric::Money;
use crate::Transaction;

/// Optional user-supplied filters, applied after validation in fixed order:
/// region, then minimum amount, then maximum amount. An absent value means
/// "no constraint".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterOptions {
    /// Exact-match region filter (case-sensitive, no partial match).
    pub region: Option<String>,
    /// Keep transactions with `amount >= min_amount`.
    pub min_amount: Option<Money>,
    /// Keep transactions with `amount <= max_amount`.
    pub max_amount: Option<Money>,
}

impl FilterOptions {
    /// Returns true if no filter is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.region.is_none() && self.min_amount.is_none() && self.max_amount.is_none()
    }
}

/// Counts describing one validation-and-filter pass.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FilterSummary {
    /// Number of parsed records handed to the validator.
    pub total_input: usize,
    /// Number of records failing at least one validation predicate.
    pub invalid: usize,
    /// Number of records surviving validation and all filters.
    pub final_count: usize,
}

/// Whether a transaction satisfies every business-rule predicate: `T`/`P`/
/// `C` identifier prefixes, strictly positive quantity and unit price, and
/// non-empty customer and region.
#[must_use]
pub fn is_valid(tx: &Transaction) -> bool {
    tx.transaction_id.starts_with('T')
        && tx.product_id.starts_with('P')
        && tx.customer_id.starts_with('C')
        && tx.quantity > 0
        && tx.unit_price.is_positive()
        && !tx.customer_id.is_empty()
        && !tx.region.is_empty()
}

/// Validates `transactions` and applies the optional `filters`.
///
/// Invalid records are counted and excluded, not retained or individually
/// reported. Returns the surviving records (input order preserved) and a
/// [`FilterSummary`].
#[must_use]
pub fn validate_and_filter(
    transactions: Vec<Transaction>,
    filters: &FilterOptions,
) -> (Vec<Transaction>, FilterSummary) {
    let total_input = transactions.len();

    let valid: Vec<Transaction> = transactions.into_iter().filter(is_valid).collect();
    let invalid = total_input - valid.len();

    let filtered: Vec<Transaction> = valid
        .into_iter()
        .filter(|tx| match &filters.region {
            Some(region) => tx.region == *region,
            None => true,
        })
        .filter(|tx| match filters.min_amount {
            Some(min) => tx.amount() >= min,
            None => true,
        })
        .filter(|tx| match filters.max_amount {
            Some(max) => tx.amount() <= max,
            None => true,
        })
        .collect();

    let summary = FilterSummary {
        total_input,
        invalid,
        final_count: filtered.len(),
    };
    (filtered, summary)
}
