use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use marquee_core::catalog::ScreeningDetails;
use marquee_core::CatalogStore;
use marquee_store::catalog_repo::ScreeningSummary;
use marquee_store::ticket_repo::SeatOccupancy;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct ScreeningDetailResponse {
    screening: ScreeningDetails,
    seats: Vec<SeatOccupancy>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/screenings", get(list_screenings))
        .route("/api/screenings/{id}", get(get_screening))
}

/// GET /api/screenings — upcoming screenings joined to their shows.
async fn list_screenings(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScreeningSummary>>, AppError> {
    let screenings = state.catalog.list_upcoming().await?;
    Ok(Json(screenings))
}

/// GET /api/screenings/{id} — one screening plus its active seats.
async fn get_screening(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ScreeningDetailResponse>, AppError> {
    let screening = state
        .catalog
        .screening_with_show(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("screening {} not found", id)))?;

    let seats = state.ledger.active_seats(id).await?;

    Ok(Json(ScreeningDetailResponse { screening, seats }))
}
