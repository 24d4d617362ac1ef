use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use marquee_core::{BookingError, StoreError};

/// HTTP-facing error. Each variant carries a stable `code` in the body so
/// callers can branch on the failure class without string-matching.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    State(String),
    Policy(String),
    Conflict(String),
    Internal(String),
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::State(_) => "state",
            AppError::Policy(_) => "policy",
            AppError::Conflict(_) => "conflict",
            AppError::Internal(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::State(_) => StatusCode::CONFLICT,
            AppError::Policy(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let status = self.status();
        let message = match self {
            AppError::Internal(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                "Internal Server Error".to_string()
            }
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::State(msg)
            | AppError::Policy(msg)
            | AppError::Conflict(msg) => msg,
        };

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::InvalidInput(_) | BookingError::SeatOutOfRange { .. } => {
                AppError::Validation(err.to_string())
            }
            BookingError::ScreeningNotFound(_) => AppError::NotFound(err.to_string()),
            BookingError::ScreeningCancelled(_) => AppError::State(err.to_string()),
            BookingError::AgeRestricted { .. } => AppError::Policy(err.to_string()),
            BookingError::SeatConflict => AppError::Conflict(err.to_string()),
            BookingError::Store(store) => store.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            // A unique violation that escapes the engine unmapped is still a
            // conflict, not an infrastructure fault.
            StoreError::UniqueViolation => {
                AppError::Conflict("seat already reserved or paid".to_string())
            }
            StoreError::Backend(e) => AppError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_errors_map_to_distinct_classes() {
        let cases: Vec<(BookingError, StatusCode, &str)> = vec![
            (
                BookingError::InvalidInput("bad".into()),
                StatusCode::BAD_REQUEST,
                "validation",
            ),
            (
                BookingError::SeatOutOfRange { seat: 99, capacity: 50 },
                StatusCode::BAD_REQUEST,
                "validation",
            ),
            (
                BookingError::ScreeningNotFound(7),
                StatusCode::NOT_FOUND,
                "not_found",
            ),
            (
                BookingError::ScreeningCancelled(7),
                StatusCode::CONFLICT,
                "state",
            ),
            (
                BookingError::AgeRestricted { min_age: 18 },
                StatusCode::FORBIDDEN,
                "policy",
            ),
            (BookingError::SeatConflict, StatusCode::CONFLICT, "conflict"),
        ];

        for (err, status, code) in cases {
            let app_err = AppError::from(err);
            assert_eq!(app_err.status(), status);
            assert_eq!(app_err.code(), code);
        }
    }

    #[test]
    fn conflict_is_not_confused_with_store_failure() {
        let conflict = AppError::from(StoreError::UniqueViolation);
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let backend = AppError::from(StoreError::Backend(anyhow::anyhow!("connection reset")));
        assert_eq!(backend.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
