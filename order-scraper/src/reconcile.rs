//! Reconciliation loop
//!
//! ```text
//! loop {
//!     fetch all orders ──> aggregate ──> upsert every title ──> sleep(interval)
//! }
//! ```
//!
//! Every cycle recomputes totals from scratch and overwrites the stored value
//! per title, so repeating a cycle over the same orders is a no-op. Titles
//! absent from the current orders keep whatever the store already holds.
//! Any fetch or write failure ends the loop.

use shared::store::{ProductStore, StoreError};
use std::convert::Infallible;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::aggregator::{aggregate, count_line_items};
use crate::source::{OrderSource, SourceError};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Errors that terminate the loop
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("fetching orders failed: {0}")]
    Fetch(#[from] SourceError),

    #[error("writing '{title}' failed: {source}")]
    Persist {
        title: String,
        #[source]
        source: StoreError,
    },
}

/// What one cycle did
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub orders: usize,
    pub line_items: usize,
    /// Distinct titles written
    pub products: usize,
    pub elapsed: Duration,
}

/// Drives fetch → aggregate → persist against injected dependencies
pub struct Reconciler<S> {
    source: S,
    store: ProductStore,
    interval: Duration,
}

impl<S: OrderSource> Reconciler<S> {
    pub fn new(source: S, store: ProductStore) -> Self {
        Self {
            source,
            store,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One full cycle
    pub async fn run_cycle(&self) -> Result<CycleReport, ReconcileError> {
        let started = Instant::now();

        let orders = self.source.fetch_orders().await?;
        let totals = aggregate(&orders);

        // 按标题排序写入, 日志更易读
        let mut entries: Vec<_> = totals.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        for (title, quantity) in entries {
            self.store
                .upsert(title, *quantity)
                .await
                .map_err(|source| ReconcileError::Persist {
                    title: title.clone(),
                    source,
                })?;
            tracing::trace!(title = %title, quantity, "Product total written");
        }

        Ok(CycleReport {
            orders: orders.len(),
            line_items: count_line_items(&orders),
            products: totals.len(),
            elapsed: started.elapsed(),
        })
    }

    /// Run cycles until one fails
    ///
    /// Only returns on error; cancellation is up to the caller (drop the
    /// future, e.g. from `tokio::select!`).
    pub async fn run(&self) -> Result<Infallible, ReconcileError> {
        tracing::info!(interval_ms = self.interval.as_millis() as u64, "Reconciliation loop started");

        let mut cycle: u64 = 0;
        loop {
            cycle += 1;
            match self.run_cycle().await {
                Ok(report) => {
                    tracing::info!(
                        cycle,
                        orders = report.orders,
                        line_items = report.line_items,
                        products = report.products,
                        elapsed_ms = report.elapsed.as_millis() as u64,
                        "Cycle complete"
                    );
                }
                Err(e) => {
                    tracing::error!(cycle, error = %e, "Cycle failed, stopping reconciliation");
                    return Err(e);
                }
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}
