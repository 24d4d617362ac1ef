use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::catalog::ScreeningDetails;
use crate::reservation::NewReservation;

/// Storage failure, with the uniqueness violation kept distinct: it is the
/// one store outcome the engine reacts to (an active seat collision), and it
/// must never be confused with an infrastructure fault.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violation")]
    UniqueViolation,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Read-only catalog access for the booking engine.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn screening_with_show(
        &self,
        screening_id: i64,
    ) -> Result<Option<ScreeningDetails>, StoreError>;
}

/// The durable seat-assignment ledger, source of truth for occupancy.
#[async_trait]
pub trait ReservationLedger: Send + Sync {
    /// Insert every row as ONE atomic unit of work: all rows commit or none
    /// do. Implementations must enforce at most one active reservation per
    /// (screening, seat) via a store-level constraint and report a collision
    /// as `StoreError::UniqueViolation`. Pre-checking occupancy in the
    /// application is not an acceptable substitute (check-then-act races).
    async fn insert_reservations(&self, rows: &[NewReservation]) -> Result<(), StoreError>;

    /// Atomically transition every `reserved` row with `created_at` before
    /// the cutoff to `expired`. A single predicate-based update, so it is
    /// idempotent and safe to run concurrently with bookings. Returns the
    /// number of rows transitioned.
    async fn expire_unpaid(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;
}
