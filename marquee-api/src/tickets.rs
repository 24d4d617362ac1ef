use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::post,
    Router,
};

use marquee_core::reservation::{BookingConfirmation, BookingRequest};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/tickets", post(create_booking))
}

/// POST /api/tickets — book a set of seats on one screening, all-or-nothing.
async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingConfirmation>), AppError> {
    let confirmation = state.engine.book(&req).await?;
    Ok((StatusCode::CREATED, Json(confirmation)))
}
