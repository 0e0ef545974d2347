//! Order Model
//!
//! Orders are transient: fetched once per reconciliation cycle, reduced into
//! per-product totals and dropped. They are never persisted locally.

use serde::{Deserialize, Serialize};

/// A single product/quantity pair within an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product title, used as the product identifier
    pub title: String,
    pub quantity: u64,
}

impl LineItem {
    pub fn new(title: impl Into<String>, quantity: u64) -> Self {
        Self {
            title: title.into(),
            quantity,
        }
    }
}

/// Order as returned by the remote platform
///
/// Only the fields needed for aggregation are modelled; everything else in the
/// platform payload is ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

impl Order {
    pub fn new(line_items: Vec<LineItem>) -> Self {
        Self {
            id: None,
            line_items,
        }
    }

    /// Total units across all line items
    pub fn total_units(&self) -> u64 {
        self.line_items
            .iter()
            .fold(0u64, |acc, item| acc.saturating_add(item.quantity))
    }
}
