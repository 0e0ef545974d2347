//! Health check endpoint

use axum::Json;
use axum::extract::State;

use crate::state::AppState;

/// Always 200 while the process serves; `store` reports the backend separately
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let store = match state.products.health().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "Store health probe failed");
            "error"
        }
    };

    Json(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "store": store,
    }))
}
