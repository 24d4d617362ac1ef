use std::sync::Arc;

use tokio::time::{interval, Duration};
use tracing::{error, info};

use marquee_core::ExpirySweep;

/// Timer-driven sweep. Each tick is one idempotent predicate-based
/// transition in the ledger, so overlap with on-demand sweeps or concurrent
/// bookings is harmless.
pub async fn start_expiry_worker(sweep: Arc<ExpirySweep>, interval_seconds: u64) {
    let mut ticker = interval(Duration::from_secs(interval_seconds));

    info!("Expiry worker started, sweeping every {}s", interval_seconds);

    loop {
        ticker.tick().await;
        if let Err(e) = sweep.run(None).await {
            error!("Expiry sweep failed: {}", e);
        }
    }
}
