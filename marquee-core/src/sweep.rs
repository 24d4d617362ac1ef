use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use crate::repository::{ReservationLedger, StoreError};

/// Reclaims seats held too long without payment.
///
/// The whole sweep is one conditional bulk transition in the ledger
/// (`reserved` and stale → `expired`), so overlapping runs are harmless and
/// a row that just became `paid` is skipped. Seats only become rebookable
/// once the transition commits.
pub struct ExpirySweep {
    ledger: Arc<dyn ReservationLedger>,
    default_older_than_minutes: u32,
}

impl ExpirySweep {
    pub fn new(ledger: Arc<dyn ReservationLedger>, default_older_than_minutes: u32) -> Self {
        Self {
            ledger,
            default_older_than_minutes,
        }
    }

    /// Expire unpaid reservations older than `older_than_minutes` (falls back
    /// to the configured default). Returns the number of rows expired; zero
    /// is a normal outcome.
    pub async fn run(&self, older_than_minutes: Option<u32>) -> Result<u64, StoreError> {
        let minutes = older_than_minutes.unwrap_or(self.default_older_than_minutes);
        let cutoff = Utc::now() - Duration::minutes(i64::from(minutes));

        let expired = self.ledger.expire_unpaid(cutoff).await?;
        if expired > 0 {
            info!(expired, older_than_minutes = minutes, "expired stale reservations");
        }
        Ok(expired)
    }
}
