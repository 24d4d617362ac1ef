use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Months, NaiveDate, Utc};
use tracing::{debug, info};

use crate::error::{BookingError, BookingResult};
use crate::pricing::PricePolicy;
use crate::repository::{CatalogStore, ReservationLedger, StoreError};
use crate::reservation::{BookingConfirmation, BookingRequest, NewReservation, ReservationStatus};

/// Turns one booking request into an all-or-nothing set of ledger rows.
///
/// The engine never pre-checks occupancy: the ledger's uniqueness constraint
/// is the only arbiter of conflict. A concurrent booking for the same seat
/// simply loses the atomic insert and surfaces as `SeatConflict`.
pub struct BookingEngine {
    catalog: Arc<dyn CatalogStore>,
    ledger: Arc<dyn ReservationLedger>,
    pricing: Arc<dyn PricePolicy>,
}

impl BookingEngine {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        ledger: Arc<dyn ReservationLedger>,
        pricing: Arc<dyn PricePolicy>,
    ) -> Self {
        Self {
            catalog,
            ledger,
            pricing,
        }
    }

    pub async fn book(&self, req: &BookingRequest) -> BookingResult<BookingConfirmation> {
        validate_request_shape(req)?;

        let screening = self
            .catalog
            .screening_with_show(req.screening_id)
            .await?
            .ok_or(BookingError::ScreeningNotFound(req.screening_id))?;

        if screening.is_cancelled() {
            return Err(BookingError::ScreeningCancelled(screening.id));
        }

        for &seat in &req.seat_numbers {
            if seat < 1 || seat > screening.capacity {
                return Err(BookingError::SeatOutOfRange {
                    seat,
                    capacity: screening.capacity,
                });
            }
        }

        let min_age = screening.show.min_age;
        if !meets_min_age(req.buyer_dob, min_age, screening.starts_at) {
            return Err(BookingError::AgeRestricted { min_age });
        }

        let status = if req.pay_now {
            ReservationStatus::Paid
        } else {
            ReservationStatus::Reserved
        };
        let paid_at = req.pay_now.then(Utc::now);

        // Price each seat exactly once, before the write. The charged price
        // is fixed on the row from here on.
        let prices: Vec<i64> = req
            .seat_numbers
            .iter()
            .map(|&seat| self.pricing.price_for(&screening, seat))
            .collect();

        let rows: Vec<NewReservation> = req
            .seat_numbers
            .iter()
            .zip(&prices)
            .map(|(&seat_number, &price_cents)| NewReservation {
                screening_id: screening.id,
                seat_number,
                buyer_name: req.buyer_name.trim().to_string(),
                buyer_email: req.buyer_email.clone(),
                buyer_dob: req.buyer_dob,
                status,
                price_cents,
                paid_at,
            })
            .collect();

        // One atomic batch. Never a per-seat loop: partial failures must not
        // leave a subset of the requested seats committed.
        match self.ledger.insert_reservations(&rows).await {
            Ok(()) => {
                info!(
                    screening_id = screening.id,
                    seats = rows.len(),
                    paid = req.pay_now,
                    "booking committed"
                );
                let total_price = prices.iter().sum();
                Ok(BookingConfirmation {
                    seats: req.seat_numbers.clone(),
                    prices,
                    total_price,
                })
            }
            Err(StoreError::UniqueViolation) => {
                debug!(screening_id = screening.id, "seat conflict, booking rolled back");
                Err(BookingError::SeatConflict)
            }
            Err(other) => Err(other.into()),
        }
    }
}

fn validate_request_shape(req: &BookingRequest) -> BookingResult<()> {
    if req.seat_numbers.is_empty() {
        return Err(BookingError::InvalidInput(
            "seat_numbers must not be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for &seat in &req.seat_numbers {
        if !seen.insert(seat) {
            return Err(BookingError::InvalidInput(format!(
                "seat {} requested more than once",
                seat
            )));
        }
    }

    if req.buyer_name.trim().is_empty() {
        return Err(BookingError::InvalidInput(
            "buyer_name must not be empty".to_string(),
        ));
    }

    Ok(())
}

/// Age policy: the buyer must have turned `min_age` by the screening start.
fn meets_min_age(dob: NaiveDate, min_age: i32, starts_at: DateTime<Utc>) -> bool {
    if min_age <= 0 {
        return true;
    }
    match dob.checked_add_months(Months::new(min_age as u32 * 12)) {
        Some(birthday) => birthday <= starts_at.date_naive(),
        // DOB so far in the future the addition overflows; treat as underage.
        None => false,
    }
}
