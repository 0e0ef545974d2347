//! Product Model

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-title quantity totals for one cycle (title -> total quantity)
pub type ProductTotals = HashMap<String, u64>;

/// Persisted product row, keyed uniquely by `title`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub title: String,
    pub quantity: u64,
}

/// Product ranked by quantity, as served by the read endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedProduct {
    pub title: String,
    /// 1-based position in the descending quantity ordering
    pub rank: u32,
    pub quantity: u64,
}

impl RankedProduct {
    /// Attach 1-based ranks to records that are already ordered
    pub fn rank_all(records: impl IntoIterator<Item = ProductRecord>) -> Vec<Self> {
        records
            .into_iter()
            .zip(1u32..)
            .map(|(record, rank)| Self {
                title: record.title,
                rank,
                quantity: record.quantity,
            })
            .collect()
    }
}
