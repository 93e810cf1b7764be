use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::Path;

use chrono::Local;
use csv::QuoteStyle;

use crate::analytics::{
    daily_sales_trend, find_peak_sales_day, low_performing_products, region_wise_sales,
    top_selling_products, total_revenue, DEFAULT_LOW_THRESHOLD, DEFAULT_TOP_N,
};
use crate::numeric::Money;
use crate::{EnrichedTransaction, Transaction};

/// Literal written for absent values in the enriched dataset. A defined
/// serialization token, distinct from `Option::None` internally.
pub const NULL_TOKEN: &str = "None";

/// Fixed column header of the enriched dataset.
pub const ENRICHED_HEADER: [&str; 12] = [
    "TransactionID",
    "Date",
    "ProductID",
    "ProductName",
    "Quantity",
    "UnitPrice",
    "CustomerID",
    "Region",
    "API_Category",
    "API_Brand",
    "API_Rating",
    "API_Match",
];

/// Error occurring while writing an output artifact. Recoverable at the
/// writer level; the caller decides whether to treat it as fatal.
#[derive(Debug)]
pub enum OutputError {
    /// Filesystem operation failed.
    Io(io::Error),
    /// The delimited writer rejected a record.
    Csv(String),
}

impl Display for OutputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&match self {
            OutputError::Io(err) => format!("I/O error: {}", err),
            OutputError::Csv(err) => format!("Write error: {}", err),
        })
    }
}

impl From<io::Error> for OutputError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for OutputError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

fn enriched_row(record: &EnrichedTransaction) -> [String; 12] {
    let tx = &record.transaction;
    let null = || NULL_TOKEN.to_string();
    [
        tx.transaction_id.clone(),
        tx.date.clone(),
        tx.product_id.clone(),
        tx.product_name.clone(),
        tx.quantity.to_string(),
        tx.unit_price.to_string(),
        tx.customer_id.clone(),
        tx.region.clone(),
        record.api_category.clone().unwrap_or_else(null),
        record.api_brand.clone().unwrap_or_else(null),
        record
            .api_rating
            .map_or_else(null, |rating| rating.to_string()),
        if record.api_match { "True" } else { "False" }.to_string(),
    ]
}

/// Writes the enriched dataset as pipe-delimited text: the fixed 12-column
/// header, then one row per record with absent values rendered as the
/// literal [`NULL_TOKEN`].
pub fn write_enriched(
    writer: impl io::Write,
    records: &[EnrichedTransaction],
) -> Result<(), OutputError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'|')
        .quote_style(QuoteStyle::Never)
        .from_writer(writer);

    writer.write_record(ENRICHED_HEADER)?;
    for record in records {
        writer.write_record(enriched_row(record))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the enriched dataset to the file at `path`, overwriting any
/// previous run's output.
pub fn save_enriched_data(
    path: impl AsRef<Path>,
    records: &[EnrichedTransaction],
) -> Result<(), OutputError> {
    let file = fs::File::create(path.as_ref())?;
    write_enriched(file, records)?;
    log::info!("Enriched data saved to {}", path.as_ref().display());
    Ok(())
}

/// Renders the formatted sales report over the validated transaction set
/// and its enriched counterpart. `generated_at` is the timestamp printed in
/// the title block; [`save_report`] supplies the current local time.
#[must_use]
pub fn render_report(
    transactions: &[Transaction],
    enriched: &[EnrichedTransaction],
    generated_at: &str,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    let total_rev = total_revenue(transactions);
    let total_tx = transactions.len();
    let avg_order = Money::average(total_rev, total_tx);
    let date_range = match (
        transactions.iter().map(|tx| tx.date.as_str()).min(),
        transactions.iter().map(|tx| tx.date.as_str()).max(),
    ) {
        (Some(first), Some(last)) => format!("{} to {}", first, last),
        _ => "N/A".to_string(),
    };

    lines.push("=".repeat(60));
    lines.push(format!("{}SALES ANALYTICS REPORT", " ".repeat(20)));
    lines.push(format!("Generated: {}", generated_at));
    lines.push(format!("Records Processed: {}", total_tx));
    lines.push("=".repeat(60));
    lines.push(String::new());

    lines.push("OVERALL SUMMARY".to_string());
    lines.push("-".repeat(30));
    lines.push(format!("Total Revenue:       ${}", total_rev.grouped()));
    lines.push(format!("Total Transactions:  {}", total_tx));
    lines.push(format!("Average Order Value: ${}", avg_order.grouped()));
    lines.push(format!("Date Range:          {}", date_range));
    lines.push(String::new());

    lines.push("REGION-WISE PERFORMANCE".to_string());
    lines.push("-".repeat(60));
    lines.push(format!(
        "{:<12} {:<15} {:<12} {}",
        "Region", "Sales", "% of Total", "Transactions"
    ));
    for stats in region_wise_sales(transactions) {
        lines.push(format!(
            "{:<12} ${:<14} {:<12}% {}",
            stats.region,
            stats.total_sales.grouped(),
            stats.percentage.to_string(),
            stats.transaction_count
        ));
    }
    lines.push(String::new());

    lines.push("TOP 5 PRODUCTS".to_string());
    lines.push("-".repeat(60));
    lines.push(format!(
        "{:<5} {:<25} {:<10} {}",
        "Rank", "Product Name", "Qty Sold", "Revenue"
    ));
    for (rank, product) in top_selling_products(transactions, DEFAULT_TOP_N)
        .iter()
        .enumerate()
    {
        lines.push(format!(
            "{:<5} {:<25} {:<10} ${}",
            rank + 1,
            product.name,
            product.quantity,
            product.revenue.grouped()
        ));
    }
    lines.push(String::new());

    lines.push("DAILY SALES TREND".to_string());
    lines.push("-".repeat(60));
    lines.push(format!(
        "{:<15} {:<15} {:<10} {}",
        "Date", "Revenue", "Orders", "Unique Customers"
    ));
    for day in daily_sales_trend(transactions) {
        lines.push(format!(
            "{:<15} ${:<14} {:<10} {}",
            day.date,
            day.revenue.grouped(),
            day.transaction_count,
            day.unique_customers
        ));
    }
    lines.push(String::new());

    lines.push("PRODUCT PERFORMANCE ANALYSIS".to_string());
    lines.push("-".repeat(30));
    match find_peak_sales_day(transactions) {
        Some(peak) => lines.push(format!(
            "Best Selling Day:  {} (${})",
            peak.date,
            peak.revenue.grouped()
        )),
        None => lines.push("Best Selling Day:  N/A".to_string()),
    }
    let low = low_performing_products(transactions, DEFAULT_LOW_THRESHOLD);
    let low_list = if low.is_empty() {
        "None".to_string()
    } else {
        low.iter()
            .map(|product| product.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    lines.push(format!("Low Performers:    {}", low_list));
    lines.push(String::new());

    lines.push("API ENRICHMENT SUMMARY".to_string());
    lines.push("-".repeat(30));
    let matched = enriched.iter().filter(|record| record.api_match).count();
    let success_rate = if enriched.is_empty() {
        0.0
    } else {
        matched as f64 / enriched.len() as f64 * 100.0
    };
    lines.push(format!("Total Products Enriched: {}", matched));
    lines.push(format!("Success Rate:            {:.1}%", success_rate));
    let unmatched: BTreeSet<&str> = enriched
        .iter()
        .filter(|record| !record.api_match)
        .map(|record| record.transaction.product_name.as_str())
        .collect();
    if !unmatched.is_empty() {
        let sample: Vec<&str> = unmatched.into_iter().take(5).collect();
        lines.push(format!("Unmatched Products:      {}...", sample.join(", ")));
    }

    lines.join("\n")
}

/// Renders the sales report and writes it to `path`, creating the output
/// directory if absent. The report is the only persisted form of the
/// aggregates.
pub fn save_report(
    path: impl AsRef<Path>,
    transactions: &[Transaction],
    enriched: &[EnrichedTransaction],
) -> Result<(), OutputError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    fs::write(path, render_report(transactions, enriched, &generated_at))?;
    log::info!("Report saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use crate::numeric::Money;
    use crate::output::{render_report, write_enriched, ENRICHED_HEADER, NULL_TOKEN};
    use crate::{EnrichedTransaction, Transaction};

    fn tx(id: &str, product: &str) -> Transaction {
        Transaction {
            transaction_id: id.to_string(),
            date: "2024-01-01".to_string(),
            product_id: "P001".to_string(),
            product_name: product.to_string(),
            quantity: 5,
            unit_price: Money::from_str("10.00").unwrap(),
            customer_id: "C001".to_string(),
            region: "North".to_string(),
        }
    }

    fn matched(id: &str) -> EnrichedTransaction {
        EnrichedTransaction {
            transaction: tx(id, "Widget"),
            api_category: Some("tools".to_string()),
            api_brand: Some("Acme".to_string()),
            api_rating: Some(4.5),
            api_match: true,
        }
    }

    fn unmatched(id: &str, product: &str) -> EnrichedTransaction {
        EnrichedTransaction {
            transaction: tx(id, product),
            api_category: None,
            api_brand: None,
            api_rating: None,
            api_match: false,
        }
    }

    fn written(records: &[EnrichedTransaction]) -> Vec<String> {
        let mut buffer = Vec::new();
        write_enriched(&mut buffer, records).unwrap();
        String::from_utf8(buffer)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_enriched_header() {
        let lines = written(&[]);
        assert_eq!(
            "TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region|\
             API_Category|API_Brand|API_Rating|API_Match",
            lines[0]
        );
        assert_eq!(1, lines.len());
    }

    #[test]
    fn test_enriched_rows() {
        let lines = written(&[matched("T001"), unmatched("T002", "Mystery Box")]);

        assert_eq!(3, lines.len());
        assert_eq!(
            "T001|2024-01-01|P001|Widget|5|10.00|C001|North|tools|Acme|4.5|True",
            lines[1]
        );
        assert_eq!(
            "T002|2024-01-01|P001|Mystery Box|5|10.00|C001|North|None|None|None|False",
            lines[2]
        );
    }

    #[test]
    fn test_enriched_round_trip() {
        let records = vec![matched("T001"), unmatched("T002", "Mystery Box")];
        let lines = written(&records);

        for (line, record) in lines[1..].iter().zip(&records) {
            let fields: Vec<&str> = line.split('|').collect();
            assert_eq!(ENRICHED_HEADER.len(), fields.len());

            let tx = &record.transaction;
            assert_eq!(tx.transaction_id, fields[0]);
            assert_eq!(tx.date, fields[1]);
            assert_eq!(tx.product_id, fields[2]);
            assert_eq!(tx.product_name, fields[3]);
            assert_eq!(tx.quantity.to_string(), fields[4]);
            assert_eq!(tx.unit_price.to_string(), fields[5]);
            assert_eq!(tx.customer_id, fields[6]);
            assert_eq!(tx.region, fields[7]);
            match &record.api_category {
                Some(category) => assert_eq!(category, fields[8]),
                None => assert_eq!(NULL_TOKEN, fields[8]),
            }
        }
    }

    #[test]
    fn test_report_content() {
        let transactions = vec![tx("T001", "Widget"), tx("T002", "Gadget")];
        let enriched = vec![matched("T001"), unmatched("T002", "Gadget")];

        let report = render_report(&transactions, &enriched, "2024-01-31 12:00:00");

        assert!(report.contains("SALES ANALYTICS REPORT"));
        assert!(report.contains("Generated: 2024-01-31 12:00:00"));
        assert!(report.contains("Records Processed: 2"));
        assert!(report.contains("Total Revenue:       $100.00"));
        assert!(report.contains("Average Order Value: $50.00"));
        assert!(report.contains("Date Range:          2024-01-01 to 2024-01-01"));
        assert!(report.contains("REGION-WISE PERFORMANCE"));
        let region_line = format!("{:<12} ${:<14} {:<12}% {}", "North", "100.00", "100", 2);
        assert!(report.contains(&region_line));
        assert!(report.contains("TOP 5 PRODUCTS"));
        assert!(report.contains("Widget"));
        assert!(report.contains("Best Selling Day:  2024-01-01 ($100.00)"));
        // Both products sold fewer than 10 units.
        assert!(report.contains("Low Performers:    Gadget, Widget"));
        assert!(report.contains("Total Products Enriched: 1"));
        assert!(report.contains("Success Rate:            50.0%"));
        assert!(report.contains("Unmatched Products:      Gadget..."));
    }

    #[test]
    fn test_report_empty_input() {
        let report = render_report(&[], &[], "2024-01-31 12:00:00");

        assert!(report.contains("Records Processed: 0"));
        assert!(report.contains("Total Revenue:       $0.00"));
        assert!(report.contains("Average Order Value: $0.00"));
        assert!(report.contains("Date Range:          N/A"));
        assert!(report.contains("Best Selling Day:  N/A"));
        assert!(report.contains("Low Performers:    None"));
        assert!(report.contains("Success Rate:            0.0%"));
        assert!(!report.contains("Unmatched Products"));
    }
}
