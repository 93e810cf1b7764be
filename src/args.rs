#![allow(clippy::module_name_repetitions)]

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use clap::{Arg, Command};
use sales_analytics::catalog::DEFAULT_CATALOG_URL;
use sales_analytics::numeric::Money;
use sales_analytics::validate::FilterOptions;

const DEFAULT_INPUT: &str = "data/sales_data.txt";
const DEFAULT_ENRICHED_OUT: &str = "data/enriched_sales_data.txt";
const DEFAULT_REPORT_OUT: &str = "output/sales_report.txt";

/// Command line arguments for the CLI interface.
pub struct Args {
    input: String,
    enriched_out: String,
    report_out: String,
    catalog_url: String,
    region: Option<String>,
    min_amount: Option<Money>,
    max_amount: Option<Money>,
    no_filter: bool,
}

impl Args {
    /// Path to the pipe-delimited sales feed.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Path the enriched dataset is written to.
    pub fn enriched_out(&self) -> &str {
        &self.enriched_out
    }

    /// Path the rendered sales report is written to.
    pub fn report_out(&self) -> &str {
        &self.report_out
    }

    /// Product catalog endpoint URL.
    pub fn catalog_url(&self) -> &str {
        &self.catalog_url
    }

    /// True when the interactive filter prompt is suppressed entirely.
    pub fn no_filter(&self) -> bool {
        self.no_filter
    }

    /// Filters given on the command line, if any. When present, the
    /// interactive prompt is skipped.
    pub fn filter_overrides(&self) -> Option<FilterOptions> {
        if self.region.is_none() && self.min_amount.is_none() && self.max_amount.is_none() {
            return None;
        }
        Some(FilterOptions {
            region: self.region.clone(),
            min_amount: self.min_amount,
            max_amount: self.max_amount,
        })
    }
}

#[derive(Clone, Debug)]
pub enum ArgsError {
    InvalidAmount { flag: &'static str, value: String },
}

impl Display for ArgsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&match self {
            ArgsError::InvalidAmount { flag, value } => {
                format!("Invalid value for --{}: '{}' is not a number", flag, value)
            }
        })
    }
}

pub fn parse_args() -> Result<Args, ArgsError> {
    let arg_matches = Command::new("sales-analytics")
        .about("Sales analytics batch pipeline")
        .arg(
            Arg::new("input")
                .long("input")
                .takes_value(true)
                .default_value(DEFAULT_INPUT)
                .help("Path to the pipe-delimited sales feed"),
        )
        .arg(
            Arg::new("enriched-out")
                .long("enriched-out")
                .takes_value(true)
                .default_value(DEFAULT_ENRICHED_OUT)
                .help("Path the enriched dataset is written to"),
        )
        .arg(
            Arg::new("report-out")
                .long("report-out")
                .takes_value(true)
                .default_value(DEFAULT_REPORT_OUT)
                .help("Path the sales report is written to"),
        )
        .arg(
            Arg::new("catalog-url")
                .long("catalog-url")
                .takes_value(true)
                .default_value(DEFAULT_CATALOG_URL)
                .help("Product catalog endpoint"),
        )
        .arg(
            Arg::new("region")
                .long("region")
                .takes_value(true)
                .help("Keep only this region (exact match, skips the prompt)"),
        )
        .arg(
            Arg::new("min-amount")
                .long("min-amount")
                .takes_value(true)
                .help("Keep only transactions with amount >= this value (skips the prompt)"),
        )
        .arg(
            Arg::new("max-amount")
                .long("max-amount")
                .takes_value(true)
                .help("Keep only transactions with amount <= this value (skips the prompt)"),
        )
        .arg(
            Arg::new("no-filter")
                .long("no-filter")
                .help("Skip the interactive filter prompt and apply no filters"),
        )
        .get_matches();

    let amount = |flag: &'static str| -> Result<Option<Money>, ArgsError> {
        arg_matches
            .value_of(flag)
            .map(|value| {
                Money::from_str(value).map_err(|_| ArgsError::InvalidAmount {
                    flag,
                    value: value.to_string(),
                })
            })
            .transpose()
    };

    Ok(Args {
        input: arg_matches.value_of("input").unwrap_or(DEFAULT_INPUT).to_string(),
        enriched_out: arg_matches
            .value_of("enriched-out")
            .unwrap_or(DEFAULT_ENRICHED_OUT)
            .to_string(),
        report_out: arg_matches
            .value_of("report-out")
            .unwrap_or(DEFAULT_REPORT_OUT)
            .to_string(),
        catalog_url: arg_matches
            .value_of("catalog-url")
            .unwrap_or(DEFAULT_CATALOG_URL)
            .to_string(),
        region: arg_matches.value_of("region").map(String::from),
        min_amount: amount("min-amount")?,
        max_amount: amount("max-amount")?,
        no_filter: arg_matches.is_present("no-filter"),
    })
}
