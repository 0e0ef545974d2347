//! Top products endpoint
//!
//! `GET /top-products?count=N` → `[{"title", "rank", "quantity"}, ...]`

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::Deserialize;
use shared::{AppError, AppResult, Json, RankedProduct};

use crate::state::AppState;

pub const DEFAULT_COUNT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct TopProductsQuery {
    pub count: Option<String>,
}

/// Lenient `count`: unreadable → default, negative → 0
fn parse_count(raw: Option<&str>) -> usize {
    match raw.map(|v| v.trim().parse::<i128>()) {
        None | Some(Err(_)) => DEFAULT_COUNT,
        Some(Ok(n)) if n <= 0 => 0,
        Some(Ok(n)) => usize::try_from(n).unwrap_or(usize::MAX),
    }
}

pub async fn top_products(
    State(state): State<AppState>,
    query: Result<Query<TopProductsQuery>, QueryRejection>,
) -> AppResult<Json<Vec<RankedProduct>>> {
    // e.g. `count` given twice
    let Query(query) = query.map_err(|rejection| {
        AppError::validation("malformed query string").with_detail("reason", rejection.body_text())
    })?;
    let count = parse_count(query.count.as_deref());

    let products = state
        .products
        .query_top(count)
        .await
        .map_err(|e| AppError::store_unavailable(e.to_string()))?;

    tracing::debug!(count, returned = products.len(), "Top products served");
    Ok(Json(products))
}
