use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use perflab_core::bulk::bulk_insert;
use perflab_core::{BulkInsertReport, InsertMode};
use perflab_services::SERVICE_A;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct BulkInsertParams {
    pub count: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub total: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders/bulk-naive", post(bulk_naive))
        .route("/orders/bulk-optimized", post(bulk_optimized))
        .route("/orders/count", get(count_orders))
        .route("/orders/ping-a-service", get(ping_a_service))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /orders/bulk-naive
/// One insert and one commit per generated order
pub async fn bulk_naive(
    State(state): State<AppState>,
    Query(params): Query<BulkInsertParams>,
) -> Result<Json<BulkInsertReport>, AppError> {
    run_bulk_insert(&state, InsertMode::Naive, params).await
}

/// POST /orders/bulk-optimized
/// All generated orders written in a single batch and commit
pub async fn bulk_optimized(
    State(state): State<AppState>,
    Query(params): Query<BulkInsertParams>,
) -> Result<Json<BulkInsertReport>, AppError> {
    run_bulk_insert(&state, InsertMode::Optimized, params).await
}

async fn run_bulk_insert(
    state: &AppState,
    mode: InsertMode,
    params: BulkInsertParams,
) -> Result<Json<BulkInsertReport>, AppError> {
    let requested = params.count.unwrap_or(state.bulk.default_count);

    let report =
        bulk_insert(state.orders.as_ref(), mode, requested, state.bulk.max_count).await?;
    Ok(Json(report))
}

/// GET /orders/count
pub async fn count_orders(State(state): State<AppState>) -> Result<Json<CountResponse>, AppError> {
    let total = state.orders.count().await?;
    Ok(Json(CountResponse { total }))
}

/// GET /orders/ping-a-service
/// Runs the A → B chain on services built for this request only
pub async fn ping_a_service(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    let scope = state.services.create_scope()?;
    scope.resolve(SERVICE_A)?.do_work().await;

    Ok(Json(MessageResponse {
        message: "work executed".to_string(),
    }))
}
