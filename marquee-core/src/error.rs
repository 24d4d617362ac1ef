use crate::repository::StoreError;

/// Everything a booking attempt can fail with. Each variant is a distinct
/// class the caller can branch on without string-matching; none are retried
/// by the engine itself.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("screening {0} not found")]
    ScreeningNotFound(i64),

    #[error("screening {0} is cancelled")]
    ScreeningCancelled(i64),

    #[error("seat {seat} is out of range 1..={capacity}")]
    SeatOutOfRange { seat: i32, capacity: i32 },

    #[error("buyer must be at least {min_age} years old at screening time")]
    AgeRestricted { min_age: i32 },

    #[error("at least one requested seat is already reserved or paid")]
    SeatConflict,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type BookingResult<T> = Result<T, BookingError>;
