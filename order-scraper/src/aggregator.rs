//! Order aggregation
//!
//! Pure fold: orders in, per-title unit totals out. No I/O.

use shared::models::{Order, ProductTotals};

/// Sum line-item quantities per product title
///
/// Every title that appears gets an entry, even when all its quantities are
/// zero. Order of input does not affect the result.
pub fn aggregate(orders: &[Order]) -> ProductTotals {
    let mut totals = ProductTotals::new();
    for item in orders.iter().flat_map(|order| &order.line_items) {
        let total = totals.entry(item.title.clone()).or_insert(0);
        *total = total.saturating_add(item.quantity);
    }
    totals
}

/// Number of line items across all orders
pub fn count_line_items(orders: &[Order]) -> usize {
    orders.iter().map(|order| order.line_items.len()).sum()
}
