//! API endpoint handlers

use crate::analytics;
use crate::server::types::{ApiResponse, Empty, SummaryParams};
use crate::state::AppState;
use axum::{
    extract::{Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{error, info};

/// Health check endpoint - GET /health or GET /
pub async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::<Empty>::success_with_message(
        "Stockpulse API is running",
    ))
}

/// Inventory summary - GET /api/v1/inventory_summary?days=&days_to_predict=
///
/// Loads a fresh catalog snapshot, runs the summary pipeline, and returns
/// one JSON object per product group. Nothing is cached between calls.
pub async fn inventory_summary(
    AxumState(state): AxumState<Arc<AppState>>,
    Query(params): Query<SummaryParams>,
) -> Response {
    let snapshot = match state.sqlite.load_catalog_snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Failed to load catalog snapshot: {}", e);
            return storage_error();
        }
    };

    let rows = analytics::compute_summary(&snapshot, params.days, params.days_to_predict);

    info!(
        "Inventory summary computed: {} product groups (days={}, days_to_predict={})",
        rows.len(),
        params.days,
        params.days_to_predict
    );

    Json(rows).into_response()
}

/// Distinct attribute values - GET /api/v1/unique_values
pub async fn unique_values(AxumState(state): AxumState<Arc<AppState>>) -> Response {
    match state.sqlite.distinct_values() {
        Ok(values) => Json(values).into_response(),
        Err(e) => {
            error!("Failed to load distinct values: {}", e);
            storage_error()
        }
    }
}

fn storage_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<Empty>::error("Something went wrong")),
    )
        .into_response()
}
