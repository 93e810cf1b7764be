//! Sales analytics library -- exposes the batch pipeline stages which are
//! sequenced by the CLI frontend.
//!
//! The pipeline is strictly linear: raw lines are read ([`reader`]), parsed
//! into [`Transaction`] records ([`parser`]), validated and optionally
//! filtered ([`validate`]), aggregated into statistics ([`analytics`]),
//! joined against a fetched product catalog ([`catalog`], [`enrich`]), and
//! finally persisted and rendered as a report ([`output`]).

#![deny(missing_docs)]

use crate::numeric::Money;

/// Aggregation functions: revenue, region/product/customer/day breakdowns.
pub mod analytics;
/// Remote product catalog client and id-keyed lookup.
pub mod catalog;
/// Joins validated transactions against the catalog lookup.
pub mod enrich;
/// Numeric module: contains currency-related types.
pub mod numeric;
/// Enriched dataset persistence and report rendering.
pub mod output;
/// Pipe-delimited line parsing into transaction records.
pub mod parser;
/// Composition of the validation and enrichment stages.
pub mod pipeline;
/// Raw text line acquisition with encoding fallback.
pub mod reader;
/// Business-rule validation and optional user filters.
pub mod validate;

/// One parsed sales record, immutable after parse.
///
/// Enrichment produces a separate [`EnrichedTransaction`] and never mutates
/// the source record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    /// Transaction identifier; valid records start with `T`.
    pub transaction_id: String,
    /// Free-form date token, used only for grouping and lexical sorting.
    pub date: String,
    /// Product identifier; valid records start with `P`, and the digits
    /// after the prefix form the catalog join key.
    pub product_id: String,
    /// Product name, with embedded commas normalised to spaces at parse
    /// time.
    pub product_name: String,
    /// Number of units sold; valid records are strictly positive.
    pub quantity: i64,
    /// Price per unit; valid records are strictly positive.
    pub unit_price: Money,
    /// Customer identifier; valid records are non-empty and start with `C`.
    pub customer_id: String,
    /// Sales region; valid records are non-empty.
    pub region: String,
}

impl Transaction {
    /// The transaction amount: quantity times unit price. Not stored;
    /// recomputed wherever needed.
    #[must_use]
    pub fn amount(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// A transaction augmented with catalog metadata and a match flag.
///
/// Exactly one enriched record exists per input transaction, in input
/// order. On a catalog miss all three metadata fields are `None` and
/// `api_match` is false.
#[derive(Clone, Debug, PartialEq)]
pub struct EnrichedTransaction {
    /// The source transaction, unchanged.
    pub transaction: Transaction,
    /// Product category from the catalog, if matched.
    pub api_category: Option<String>,
    /// Product brand from the catalog, if matched.
    pub api_brand: Option<String>,
    /// Product rating from the catalog, if matched.
    pub api_rating: Option<f64>,
    /// Whether the catalog lookup found the product.
    pub api_match: bool,
}
