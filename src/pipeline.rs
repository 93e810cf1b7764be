use crate::catalog::CatalogMapping;
use crate::enrich::enrich_sales_data;
use crate::validate::{validate_and_filter, FilterOptions, FilterSummary};
use crate::{EnrichedTransaction, Transaction};

/// The data produced by one pipeline pass: the validated transaction set,
/// its validation summary, and the enriched copy of every surviving record.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineOutput {
    /// Transactions surviving validation and filtering, in input order.
    pub transactions: Vec<Transaction>,
    /// Counts from the validation-and-filter pass.
    pub summary: FilterSummary,
    /// One enriched record per surviving transaction, in the same order.
    pub enriched: Vec<EnrichedTransaction>,
}

/// Runs the state-free core of the pipeline over already-parsed records:
/// validation and filtering, then enrichment against `mapping`.
///
/// Reading, parsing, the catalog fetch, persistence, and progress
/// narration are sequenced by the caller; this function has no side
/// effects.
#[must_use]
pub fn process(
    parsed: Vec<Transaction>,
    filters: &FilterOptions,
    mapping: &CatalogMapping,
) -> PipelineOutput {
    let (transactions, summary) = validate_and_filter(parsed, filters);
    let enriched = enrich_sales_data(&transactions, mapping);
    PipelineOutput {
        transactions,
        summary,
        enriched,
    }
}
