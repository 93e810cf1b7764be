use std::str::FromStr;

use csv::{StringRecord, Trim};

use crate::numeric::Money;
use crate::Transaction;

/// Fixed field order of the sales feed:
/// `TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region`.
const FIELD_COUNT: usize = 8;

/// Parses raw feed lines into [`Transaction`] records.
///
/// A line is skipped silently (logged at debug level only) when it does not
/// split into exactly eight `|`-delimited fields, or when its quantity or
/// unit price fails numeric conversion. Output order matches input order;
/// malformed lines are simply absent.
#[must_use]
pub fn parse_transactions(lines: &[String]) -> Vec<Transaction> {
    let joined = lines.join("\n");
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(joined.as_bytes());

    let mut parsed = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                log::debug!("Skipping unreadable line: {}", err);
                continue;
            }
        };
        match parse_record(&record) {
            Some(transaction) => parsed.push(transaction),
            None => log::debug!("Skipping malformed line: {:?}", record),
        }
    }
    parsed
}

fn parse_record(record: &StringRecord) -> Option<Transaction> {
    if record.len() != FIELD_COUNT {
        return None;
    }

    // Quantity and price may carry thousands separators; the product name
    // may embed commas, which are normalised to spaces.
    let quantity = record[4].replace(',', "").parse::<i64>().ok()?;
    let unit_price = Money::from_str(&record[5]).ok()?;

    Some(Transaction {
        transaction_id: record[0].to_string(),
        date: record[1].to_string(),
        product_id: record[2].to_string(),
        product_name: record[3].replace(',', " ").trim().to_string(),
        quantity,
        unit_price,
        customer_id: record[6].to_string(),
        region: record[7].to_string(),
    })
}
