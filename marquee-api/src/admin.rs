use axum::{
    extract::{Json, State},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct CancelScreeningRequest {
    id: i64,
}

#[derive(Debug, Serialize)]
struct CancelScreeningResponse {
    ok: bool,
}

#[derive(Debug, Deserialize)]
struct ExpireUnpaidRequest {
    minutes: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ExpireUnpaidResponse {
    expired: u64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/cancel-screening", post(cancel_screening))
        .route("/api/admin/expire-unpaid", post(expire_unpaid))
}

/// POST /api/admin/cancel-screening — soft-delete; the booking engine
/// rejects bookings against cancelled screenings from here on.
async fn cancel_screening(
    State(state): State<AppState>,
    Json(req): Json<CancelScreeningRequest>,
) -> Result<Json<CancelScreeningResponse>, AppError> {
    let found = state.catalog.cancel_screening(req.id).await?;
    if !found {
        return Err(AppError::NotFound(format!("screening {} not found", req.id)));
    }

    info!(screening_id = req.id, "screening cancelled");
    Ok(Json(CancelScreeningResponse { ok: true }))
}

/// POST /api/admin/expire-unpaid — on-demand sweep; the configured default
/// cutoff applies when `minutes` is omitted.
async fn expire_unpaid(
    State(state): State<AppState>,
    Json(req): Json<ExpireUnpaidRequest>,
) -> Result<Json<ExpireUnpaidResponse>, AppError> {
    let expired = state.sweep.run(req.minutes).await?;
    Ok(Json(ExpireUnpaidResponse { expired }))
}
