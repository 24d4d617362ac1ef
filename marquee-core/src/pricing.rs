use crate::catalog::ScreeningDetails;

/// Derives the price charged for one seat at booking time.
///
/// Must be a pure function of (screening, seat): the charged price is
/// recorded on the ledger row and never recomputed, so later policy changes
/// only affect future bookings. The seat number is part of the signature so
/// tiered policies slot in without touching callers.
pub trait PricePolicy: Send + Sync {
    fn price_for(&self, screening: &ScreeningDetails, seat_number: i32) -> i64;
}

/// Flat price per screening: whatever the catalog row carries.
pub struct FlatPolicy;

impl PricePolicy for FlatPolicy {
    fn price_for(&self, screening: &ScreeningDetails, _seat_number: i32) -> i64 {
        screening.base_price_cents
    }
}

/// Seat-tier pricing: a surcharge on the first rows of the house.
pub struct FrontRowPolicy {
    /// Seats 1..=front_rows carry the surcharge.
    pub front_rows: i32,
    pub surcharge_cents: i64,
}

impl PricePolicy for FrontRowPolicy {
    fn price_for(&self, screening: &ScreeningDetails, seat_number: i32) -> i64 {
        if seat_number <= self.front_rows {
            screening.base_price_cents + self.surcharge_cents
        } else {
            screening.base_price_cents
        }
    }
}
