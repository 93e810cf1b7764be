//! Command line interface for the sales analytics pipeline.
//!
//! Makes use of the API in `lib.rs`: reads the sales feed, solicits
//! optional filters, validates and aggregates, enriches against the remote
//! product catalog, and writes the enriched dataset and the report.

#![deny(missing_docs)]

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::io;

use log::LevelFilter;
use sales_analytics::catalog::{create_product_mapping, fetch_all_products};
use sales_analytics::enrich::enrich_sales_data;
use sales_analytics::output::{save_enriched_data, save_report, OutputError};
use sales_analytics::parser::parse_transactions;
use sales_analytics::reader::read_sales_data;
use sales_analytics::validate::{validate_and_filter, FilterOptions};
use sales_analytics::Transaction;

use crate::args::{parse_args, Args, ArgsError};
use crate::prompt::{prompt_filters, PromptError};

mod args;
mod prompt;

fn main() {
    if let Err(err) = env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .try_init()
    {
        eprintln!("Failed to create logger ({}). Continuing anyway.", err);
    }

    if let Err(err) = sales_analytics_cli() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

/// Parses the command line arguments and runs the pipeline.
fn sales_analytics_cli() -> Result<(), SalesCliError> {
    let args = parse_args()?;
    run(&args)
}

/// Sequences the pipeline stages, narrating progress to stdout. The
/// narration is cosmetic; every count it prints comes from the stage
/// results themselves.
fn run(args: &Args) -> Result<(), SalesCliError> {
    println!("{}", "=".repeat(45));
    println!("{}SALES ANALYTICS SYSTEM", " ".repeat(12));
    println!("{}\n", "=".repeat(45));

    println!("[1/10] Reading sales data...");
    let raw_lines = read_sales_data(args.input());
    if raw_lines.is_empty() {
        // Nothing to process; the reader already logged the reason.
        println!("No sales data available.");
        return Ok(());
    }
    println!("Successfully read {} transactions", raw_lines.len());

    println!("\n[2/10] Parsing and cleaning data...");
    let parsed = parse_transactions(&raw_lines);
    println!("Parsed {} records", parsed.len());

    println!("\n[3/10] Filter Options Available:");
    print_filter_preview(&parsed);
    let filters = select_filters(args)?;

    println!("\n[4/10] Validating transactions...");
    let (valid, summary) = validate_and_filter(parsed, &filters);
    println!("Valid: {} | Invalid: {}", summary.final_count, summary.invalid);

    println!("\n[5/10] Analyzing sales data...");
    // Aggregates are pure functions over the valid set; the report renders
    // them in step 9.
    println!("Analysis complete");

    println!("\n[6/10] Fetching product data from API...");
    let products = fetch_all_products(args.catalog_url());
    println!("Fetched {} products", products.len());

    println!("\n[7/10] Enriching sales data...");
    let mapping = create_product_mapping(products);
    let enriched = enrich_sales_data(&valid, &mapping);
    let matched = enriched.iter().filter(|record| record.api_match).count();
    println!("Enriched {}/{} transactions", matched, enriched.len());

    println!("\n[8/10] Saving enriched data...");
    save_enriched_data(args.enriched_out(), &enriched)?;
    println!("Saved to: {}", args.enriched_out());

    println!("\n[9/10] Generating report...");
    match save_report(args.report_out(), &valid, &enriched) {
        Ok(()) => println!("Report saved to: {}", args.report_out()),
        Err(err) => log::error!("Error writing report: {}", err),
    }

    println!("\n[10/10] Process Complete!");
    println!("{}", "=".repeat(45));

    Ok(())
}

/// Prints the distinct regions and the amount range of the parsed data, so
/// the user knows what the filters can act on.
fn print_filter_preview(parsed: &[Transaction]) {
    let regions: BTreeSet<&str> = parsed
        .iter()
        .map(|tx| tx.region.as_str())
        .filter(|region| !region.is_empty())
        .collect();
    println!(
        "Regions: {}",
        regions.into_iter().collect::<Vec<_>>().join(", ")
    );

    let amounts = parsed.iter().map(Transaction::amount);
    if let (Some(min), Some(max)) = (amounts.clone().min(), amounts.max()) {
        println!("Amount Range: ${} - ${}", min.grouped(), max.grouped());
    }
}

/// Resolves the filter options: command line flags win, otherwise the
/// interactive prompt runs on the terminal.
fn select_filters(args: &Args) -> Result<FilterOptions, SalesCliError> {
    if args.no_filter() {
        return Ok(FilterOptions::default());
    }
    if let Some(overrides) = args.filter_overrides() {
        return Ok(overrides);
    }
    let stdin = io::stdin();
    let mut stdin = stdin.lock();
    Ok(prompt_filters(&mut stdin, &mut io::stdout())?)
}

/// Fatal error occurred when running the application.
#[derive(Debug)]
enum SalesCliError {
    /// There was a problem with the provided command line arguments.
    Args(ArgsError),
    /// The interactive filter prompt failed or got invalid input.
    Prompt(PromptError),
    /// An output artifact could not be written.
    Output(OutputError),
}

impl Display for SalesCliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&match self {
            SalesCliError::Args(err) => format!("Invalid arguments: {}", err),
            SalesCliError::Prompt(err) => format!("Filter input error: {}", err),
            SalesCliError::Output(err) => format!("Failed to write output: {}", err),
        })
    }
}

impl From<ArgsError> for SalesCliError {
    fn from(err: ArgsError) -> Self {
        Self::Args(err)
    }
}

impl From<PromptError> for SalesCliError {
    fn from(err: PromptError) -> Self {
        Self::Prompt(err)
    }
}

impl From<OutputError> for SalesCliError {
    fn from(err: OutputError) -> Self {
        Self::Output(err)
    }
}
