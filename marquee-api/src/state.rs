use std::sync::Arc;

use marquee_core::{BookingEngine, ExpirySweep};
use marquee_store::{PostgresCatalogStore, PostgresReservationLedger};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<BookingEngine>,
    pub sweep: Arc<ExpirySweep>,
    pub catalog: Arc<PostgresCatalogStore>,
    pub ledger: Arc<PostgresReservationLedger>,
}
