//! Pure aggregation functions over a transaction set.
//!
//! Every function recomputes from scratch; there is no shared or
//! incremental state. Accumulation goes through `BTreeMap` keyed by
//! region/product/customer/date and the metric sorts are stable, so
//! equal-metric entries order deterministically by lexical key.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use crate::numeric::Money;
use crate::Transaction;

/// Default number of entries reported by the top-products table.
pub const DEFAULT_TOP_N: usize = 5;
/// Default quantity threshold below which a product is a low performer.
pub const DEFAULT_LOW_THRESHOLD: i64 = 10;

/// Sales and transaction count for one region.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegionStats {
    /// Region name.
    pub region: String,
    /// Sum of transaction amounts in the region.
    pub total_sales: Money,
    /// Number of transactions in the region.
    pub transaction_count: usize,
    /// Share of overall revenue, as a percentage rounded to two decimals.
    pub percentage: Decimal,
}

/// Aggregate quantity and revenue for one product.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProductSales {
    /// Product name.
    pub name: String,
    /// Total units sold.
    pub quantity: i64,
    /// Total revenue for the product.
    pub revenue: Money,
}

/// Spending profile for one customer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CustomerStats {
    /// Customer identifier.
    pub customer_id: String,
    /// Sum of the customer's transaction amounts.
    pub total_spent: Money,
    /// Number of purchases made.
    pub purchase_count: usize,
    /// Average order value, rounded to two decimals.
    pub avg_order_value: Money,
    /// Sorted distinct names of the products purchased.
    pub products_bought: Vec<String>,
}

/// Revenue and activity for one calendar date.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DailyStats {
    /// Date token, as it appears in the feed.
    pub date: String,
    /// Revenue for the date, rounded to two decimals.
    pub revenue: Money,
    /// Number of transactions on the date.
    pub transaction_count: usize,
    /// Number of distinct customers active on the date.
    pub unique_customers: usize,
}

/// The date with the highest aggregate revenue.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PeakDay {
    /// Date token of the peak day.
    pub date: String,
    /// Revenue on the peak day.
    pub revenue: Money,
    /// Number of transactions on the peak day.
    pub transaction_count: usize,
}

/// Sum of `quantity * unit_price` over the whole set.
#[must_use]
pub fn total_revenue(transactions: &[Transaction]) -> Money {
    transactions.iter().map(Transaction::amount).sum()
}

/// Per-region totals, counts, and revenue share, ordered by descending
/// total sales (ties by region name).
#[must_use]
pub fn region_wise_sales(transactions: &[Transaction]) -> Vec<RegionStats> {
    let overall = total_revenue(transactions);

    let mut by_region: BTreeMap<&str, (Money, usize)> = BTreeMap::new();
    for tx in transactions {
        let entry = by_region
            .entry(tx.region.as_str())
            .or_insert((Money::ZERO, 0));
        entry.0 += tx.amount();
        entry.1 += 1;
    }

    let mut stats: Vec<RegionStats> = by_region
        .into_iter()
        .map(|(region, (total_sales, transaction_count))| RegionStats {
            region: region.to_string(),
            total_sales,
            transaction_count,
            percentage: total_sales.percent_of(overall),
        })
        .collect();
    stats.sort_by(|a, b| b.total_sales.cmp(&a.total_sales));
    stats
}

/// The `n` best-selling products by total quantity, descending (ties by
/// product name).
#[must_use]
pub fn top_selling_products(transactions: &[Transaction], n: usize) -> Vec<ProductSales> {
    let mut products = product_sales(transactions);
    products.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    products.truncate(n);
    products
}

/// Products whose total quantity sold is strictly below `threshold`,
/// ascending by quantity (ties by product name).
#[must_use]
pub fn low_performing_products(transactions: &[Transaction], threshold: i64) -> Vec<ProductSales> {
    let mut products = product_sales(transactions);
    products.retain(|product| product.quantity < threshold);
    products.sort_by(|a, b| a.quantity.cmp(&b.quantity));
    products
}

fn product_sales(transactions: &[Transaction]) -> Vec<ProductSales> {
    let mut by_product: BTreeMap<&str, (i64, Money)> = BTreeMap::new();
    for tx in transactions {
        let entry = by_product
            .entry(tx.product_name.as_str())
            .or_insert((0, Money::ZERO));
        entry.0 += tx.quantity;
        entry.1 += tx.amount();
    }

    by_product
        .into_iter()
        .map(|(name, (quantity, revenue))| ProductSales {
            name: name.to_string(),
            quantity,
            revenue,
        })
        .collect()
}

/// Per-customer spend, purchase count, average order value, and distinct
/// product names, ordered by descending total spend (ties by customer id).
#[must_use]
pub fn customer_analysis(transactions: &[Transaction]) -> Vec<CustomerStats> {
    let mut by_customer: BTreeMap<&str, (Money, usize, BTreeSet<&str>)> = BTreeMap::new();
    for tx in transactions {
        let entry = by_customer
            .entry(tx.customer_id.as_str())
            .or_insert((Money::ZERO, 0, BTreeSet::new()));
        entry.0 += tx.amount();
        entry.1 += 1;
        entry.2.insert(tx.product_name.as_str());
    }

    let mut stats: Vec<CustomerStats> = by_customer
        .into_iter()
        .map(|(customer_id, (total_spent, purchase_count, products))| CustomerStats {
            customer_id: customer_id.to_string(),
            total_spent,
            purchase_count,
            avg_order_value: Money::average(total_spent, purchase_count),
            products_bought: products.into_iter().map(String::from).collect(),
        })
        .collect();
    stats.sort_by(|a, b| b.total_spent.cmp(&a.total_spent));
    stats
}

/// Per-date revenue, transaction count, and distinct customer count,
/// ascending by date token (lexical order, assumed ISO-like).
#[must_use]
pub fn daily_sales_trend(transactions: &[Transaction]) -> Vec<DailyStats> {
    let mut by_date: BTreeMap<&str, (Money, usize, BTreeSet<&str>)> = BTreeMap::new();
    for tx in transactions {
        let entry = by_date
            .entry(tx.date.as_str())
            .or_insert((Money::ZERO, 0, BTreeSet::new()));
        entry.0 += tx.amount();
        entry.1 += 1;
        entry.2.insert(tx.customer_id.as_str());
    }

    by_date
        .into_iter()
        .map(|(date, (revenue, transaction_count, customers))| DailyStats {
            date: date.to_string(),
            revenue: revenue.round2(),
            transaction_count,
            unique_customers: customers.len(),
        })
        .collect()
}

/// The date with maximum revenue, or `None` for an empty set. When several
/// dates tie, the earliest wins.
#[must_use]
pub fn find_peak_sales_day(transactions: &[Transaction]) -> Option<PeakDay> {
    let mut peak: Option<PeakDay> = None;
    for day in daily_sales_trend(transactions) {
        let better = match &peak {
            Some(current) => day.revenue > current.revenue,
            None => true,
        };
        if better {
            peak = Some(PeakDay {
                date: day.date,
                revenue: day.revenue,
                transaction_count: day.transaction_count,
            });
        }
    }
    peak
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use crate::analytics::{
        customer_analysis, daily_sales_trend, find_peak_sales_day, low_performing_products,
        region_wise_sales, top_selling_products, total_revenue,
    };
    use crate::numeric::Money;
    use crate::Transaction;

    fn tx(date: &str, product: &str, quantity: i64, price: &str, customer: &str, region: &str) -> Transaction {
        Transaction {
            transaction_id: "T001".to_string(),
            date: date.to_string(),
            product_id: "P001".to_string(),
            product_name: product.to_string(),
            quantity,
            unit_price: Money::from_str(price).unwrap(),
            customer_id: customer.to_string(),
            region: region.to_string(),
        }
    }

    fn money(value: &str) -> Money {
        Money::from_str(value).unwrap()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("2024-01-01", "Widget", 5, "10.00", "C001", "North"),
            tx("2024-01-01", "Gadget", 2, "25.00", "C002", "South"),
            tx("2024-01-02", "Widget", 3, "10.00", "C001", "North"),
            tx("2024-01-02", "Gizmo", 1, "100.00", "C003", "East"),
        ]
    }

    #[test]
    fn test_total_revenue() {
        // 50 + 50 + 30 + 100
        assert_eq!(money("230.00"), total_revenue(&sample()));
        assert_eq!(Money::ZERO, total_revenue(&[]));
    }

    #[test]
    fn test_region_stats_sum_to_revenue() {
        let stats = region_wise_sales(&sample());

        let sum: Money = stats.iter().map(|s| s.total_sales).sum();
        assert_eq!(total_revenue(&sample()), sum);
    }

    #[test]
    fn test_region_stats_order_and_percentage() {
        let stats = region_wise_sales(&sample());

        assert_eq!(3, stats.len());
        assert_eq!("East", stats[0].region);
        assert_eq!(money("100.00"), stats[0].total_sales);
        assert_eq!("North", stats[1].region);
        assert_eq!(money("80.00"), stats[1].total_sales);
        assert_eq!(2, stats[1].transaction_count);
        assert_eq!("South", stats[2].region);

        // 100 / 230 = 43.48%, 80 / 230 = 34.78%, 50 / 230 = 21.74%
        assert_eq!("43.48", stats[0].percentage.to_string());
        assert_eq!("34.78", stats[1].percentage.to_string());
        assert_eq!("21.74", stats[2].percentage.to_string());
    }

    #[test]
    fn test_region_percentage_zero_revenue() {
        let zero = vec![tx("2024-01-01", "Widget", 0, "0", "C001", "North")];
        let stats = region_wise_sales(&zero);
        assert_eq!("0", stats[0].percentage.to_string());
    }

    #[test]
    fn test_top_selling_products() {
        let top = top_selling_products(&sample(), 5);

        assert_eq!(3, top.len());
        assert_eq!("Widget", top[0].name);
        assert_eq!(8, top[0].quantity);
        assert_eq!(money("80.00"), top[0].revenue);
        assert_eq!("Gadget", top[1].name);
        assert_eq!("Gizmo", top[2].name);

        assert_eq!(2, top_selling_products(&sample(), 2).len());
        assert!(top_selling_products(&[], 5).is_empty());
    }

    #[test]
    fn test_top_selling_tie_breaks_by_name() {
        let txs = vec![
            tx("2024-01-01", "Zebra", 2, "1.00", "C001", "North"),
            tx("2024-01-01", "Apple", 2, "1.00", "C001", "North"),
        ];

        let top = top_selling_products(&txs, 5);
        assert_eq!("Apple", top[0].name);
        assert_eq!("Zebra", top[1].name);
    }

    #[test]
    fn test_customer_analysis() {
        let stats = customer_analysis(&sample());

        assert_eq!(3, stats.len());
        assert_eq!("C003", stats[0].customer_id);
        assert_eq!(money("100.00"), stats[0].total_spent);

        assert_eq!("C001", stats[1].customer_id);
        assert_eq!(money("80.00"), stats[1].total_spent);
        assert_eq!(2, stats[1].purchase_count);
        assert_eq!(money("40.00"), stats[1].avg_order_value);
        assert_eq!(vec!["Widget".to_string()], stats[1].products_bought);

        assert_eq!("C002", stats[2].customer_id);
    }

    #[test]
    fn test_low_performing_products() {
        let low = low_performing_products(&sample(), 10);

        // All three products sold fewer than 10 units; ascending quantity.
        assert_eq!(3, low.len());
        assert_eq!("Gizmo", low[0].name);
        assert_eq!(1, low[0].quantity);
        assert_eq!("Gadget", low[1].name);
        assert_eq!("Widget", low[2].name);

        assert!(low_performing_products(&sample(), 1).is_empty());
    }

    #[test]
    fn test_daily_sales_trend() {
        let trend = daily_sales_trend(&sample());

        assert_eq!(2, trend.len());
        assert_eq!("2024-01-01", trend[0].date);
        assert_eq!(money("100.00"), trend[0].revenue);
        assert_eq!(2, trend[0].transaction_count);
        assert_eq!(2, trend[0].unique_customers);

        assert_eq!("2024-01-02", trend[1].date);
        assert_eq!(money("130.00"), trend[1].revenue);
        assert_eq!(2, trend[1].unique_customers);
    }

    #[test]
    fn test_peak_day() {
        let peak = find_peak_sales_day(&sample()).unwrap();
        assert_eq!("2024-01-02", peak.date);
        assert_eq!(money("130.00"), peak.revenue);
        assert_eq!(2, peak.transaction_count);

        assert_eq!(None, find_peak_sales_day(&[]));
    }

    #[test]
    fn test_peak_day_tie_earliest_wins() {
        let txs = vec![
            tx("2024-01-02", "Widget", 1, "10.00", "C001", "North"),
            tx("2024-01-01", "Widget", 1, "10.00", "C001", "North"),
        ];
        assert_eq!("2024-01-01", find_peak_sales_day(&txs).unwrap().date);
    }
}
