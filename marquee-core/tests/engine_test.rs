use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use marquee_core::catalog::{ScreeningDetails, ShowDetails};
use marquee_core::pricing::{FlatPolicy, PricePolicy};
use marquee_core::reservation::{BookingRequest, NewReservation, Reservation, ReservationStatus};
use marquee_core::{BookingEngine, BookingError, CatalogStore, ExpirySweep, ReservationLedger, StoreError};

// ---------------------------------------------------------------------------
// In-memory substitutes. The ledger holds one Mutex across the whole batch,
// which gives the same all-or-nothing + uniqueness semantics the Postgres
// partial unique index provides.
// ---------------------------------------------------------------------------

struct MemoryCatalog {
    screenings: HashMap<i64, ScreeningDetails>,
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn screening_with_show(
        &self,
        screening_id: i64,
    ) -> Result<Option<ScreeningDetails>, StoreError> {
        Ok(self.screenings.get(&screening_id).cloned())
    }
}

#[derive(Default)]
struct MemoryLedger {
    rows: Mutex<Vec<Reservation>>,
}

impl MemoryLedger {
    fn snapshot(&self) -> Vec<Reservation> {
        self.rows.lock().unwrap().clone()
    }

    fn backdate_all(&self, by: Duration) {
        for row in self.rows.lock().unwrap().iter_mut() {
            row.created_at = row.created_at - by;
        }
    }
}

#[async_trait]
impl ReservationLedger for MemoryLedger {
    async fn insert_reservations(&self, rows: &[NewReservation]) -> Result<(), StoreError> {
        let mut guard = self.rows.lock().unwrap();

        // Constraint check across the whole batch before any row lands.
        for row in rows {
            let taken = guard.iter().any(|existing| {
                existing.screening_id == row.screening_id
                    && existing.seat_number == row.seat_number
                    && existing.status.is_active()
            });
            if taken {
                return Err(StoreError::UniqueViolation);
            }
        }

        let next_id = guard.len() as i64 + 1;
        for (offset, row) in rows.iter().enumerate() {
            guard.push(Reservation {
                id: next_id + offset as i64,
                screening_id: row.screening_id,
                seat_number: row.seat_number,
                buyer_name: row.buyer_name.clone(),
                buyer_email: row.buyer_email.clone(),
                buyer_dob: row.buyer_dob,
                status: row.status,
                price_cents: row.price_cents,
                paid_at: row.paid_at,
                created_at: Utc::now(),
            });
        }
        Ok(())
    }

    async fn expire_unpaid(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut guard = self.rows.lock().unwrap();
        let mut expired = 0;
        for row in guard.iter_mut() {
            if row.status == ReservationStatus::Reserved && row.created_at < cutoff {
                row.status = ReservationStatus::Expired;
                expired += 1;
            }
        }
        Ok(expired)
    }
}

/// Flat policy whose price can be changed after bookings exist, to prove
/// charged prices are immutable.
struct AdjustablePolicy {
    price_cents: AtomicI64,
}

impl PricePolicy for AdjustablePolicy {
    fn price_for(&self, _screening: &ScreeningDetails, _seat_number: i32) -> i64 {
        self.price_cents.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

fn screening(id: i64, capacity: i32, min_age: i32, cancelled: bool) -> ScreeningDetails {
    ScreeningDetails {
        id,
        venue: "Hall A".to_string(),
        starts_at: Utc.with_ymd_and_hms(2026, 9, 1, 20, 0, 0).unwrap(),
        capacity,
        base_price_cents: 1500,
        cancelled_at: cancelled.then(|| Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap()),
        show: ShowDetails {
            title: "The Long Intermission".to_string(),
            category: "drama".to_string(),
            min_age,
        },
    }
}

struct Fixture {
    engine: Arc<BookingEngine>,
    ledger: Arc<MemoryLedger>,
    sweep: ExpirySweep,
}

fn fixture_with(screenings: Vec<ScreeningDetails>, pricing: Arc<dyn PricePolicy>) -> Fixture {
    let catalog = Arc::new(MemoryCatalog {
        screenings: screenings.into_iter().map(|s| (s.id, s)).collect(),
    });
    let ledger = Arc::new(MemoryLedger::default());
    let engine = Arc::new(BookingEngine::new(catalog, ledger.clone(), pricing));
    let sweep = ExpirySweep::new(ledger.clone(), 15);
    Fixture { engine, ledger, sweep }
}

fn fixture() -> Fixture {
    fixture_with(vec![screening(1, 50, 0, false)], Arc::new(FlatPolicy))
}

fn request(seats: Vec<i32>, pay_now: bool) -> BookingRequest {
    BookingRequest {
        screening_id: 1,
        seat_numbers: seats,
        buyer_name: "Ada Lovelace".to_string(),
        buyer_email: Some("ada@example.com".to_string()),
        buyer_dob: NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(),
        pay_now,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn books_two_seats_with_flat_prices() {
    let fx = fixture();

    let confirmation = fx.engine.book(&request(vec![1, 2], false)).await.unwrap();

    assert_eq!(confirmation.seats, vec![1, 2]);
    assert_eq!(confirmation.prices, vec![1500, 1500]);
    assert_eq!(confirmation.total_price, 3000);

    let rows = fx.ledger.snapshot();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.status == ReservationStatus::Reserved));
    assert!(rows.iter().all(|r| r.paid_at.is_none()));
}

#[tokio::test]
async fn pay_now_records_paid_status_and_timestamp() {
    let fx = fixture();

    fx.engine.book(&request(vec![7], true)).await.unwrap();

    let rows = fx.ledger.snapshot();
    assert_eq!(rows[0].status, ReservationStatus::Paid);
    assert!(rows[0].paid_at.is_some());
}

#[tokio::test]
async fn rebooking_a_held_seat_is_a_conflict() {
    let fx = fixture();

    fx.engine.book(&request(vec![1, 2], false)).await.unwrap();
    let err = fx.engine.book(&request(vec![1], false)).await.unwrap_err();

    assert!(matches!(err, BookingError::SeatConflict));
}

#[tokio::test]
async fn partial_conflict_commits_nothing() {
    let fx = fixture();

    fx.engine.book(&request(vec![4], false)).await.unwrap();

    // {3,4,5} with 4 held: all-or-nothing, so 3 and 5 must not appear.
    let err = fx.engine.book(&request(vec![3, 4, 5], false)).await.unwrap_err();
    assert!(matches!(err, BookingError::SeatConflict));
    assert_eq!(fx.ledger.snapshot().len(), 1);
}

#[tokio::test]
async fn concurrent_requests_for_one_seat_have_exactly_one_winner() {
    let fx = fixture();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let engine = fx.engine.clone();
        handles.push(tokio::spawn(async move {
            engine.book(&request(vec![13], false)).await
        }));
    }

    let mut wins = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => wins += 1,
            Err(BookingError::SeatConflict) => conflicts += 1,
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(conflicts, 15);

    let active = fx
        .ledger
        .snapshot()
        .iter()
        .filter(|r| r.seat_number == 13 && r.status.is_active())
        .count();
    assert_eq!(active, 1);
}

#[tokio::test]
async fn unknown_screening_is_not_found() {
    let fx = fixture();
    let mut req = request(vec![1], false);
    req.screening_id = 99;

    let err = fx.engine.book(&req).await.unwrap_err();
    assert!(matches!(err, BookingError::ScreeningNotFound(99)));
}

#[tokio::test]
async fn cancelled_screening_rejects_bookings() {
    let fx = fixture_with(vec![screening(1, 50, 0, true)], Arc::new(FlatPolicy));

    let err = fx.engine.book(&request(vec![1], false)).await.unwrap_err();
    assert!(matches!(err, BookingError::ScreeningCancelled(1)));
    assert!(fx.ledger.snapshot().is_empty());
}

#[tokio::test]
async fn seat_outside_capacity_is_rejected() {
    let fx = fixture();

    let err = fx.engine.book(&request(vec![51], false)).await.unwrap_err();
    assert!(matches!(
        err,
        BookingError::SeatOutOfRange { seat: 51, capacity: 50 }
    ));

    let err = fx.engine.book(&request(vec![0], false)).await.unwrap_err();
    assert!(matches!(err, BookingError::SeatOutOfRange { seat: 0, .. }));
}

#[tokio::test]
async fn underage_buyer_is_rejected_before_any_write() {
    let fx = fixture_with(vec![screening(1, 50, 18, false)], Arc::new(FlatPolicy));
    let mut req = request(vec![1], false);
    req.buyer_dob = NaiveDate::from_ymd_opt(2012, 3, 3).unwrap();

    let err = fx.engine.book(&req).await.unwrap_err();
    assert!(matches!(err, BookingError::AgeRestricted { min_age: 18 }));
    assert!(fx.ledger.snapshot().is_empty());
}

#[tokio::test]
async fn sweep_is_idempotent() {
    let fx = fixture();

    fx.engine.book(&request(vec![1, 2], false)).await.unwrap();
    fx.ledger.backdate_all(Duration::minutes(30));

    assert_eq!(fx.sweep.run(Some(15)).await.unwrap(), 2);
    assert_eq!(fx.sweep.run(Some(15)).await.unwrap(), 0);
}

#[tokio::test]
async fn paid_reservations_are_never_expired() {
    let fx = fixture();

    fx.engine.book(&request(vec![1], true)).await.unwrap();
    fx.ledger.backdate_all(Duration::days(365));

    assert_eq!(fx.sweep.run(Some(0)).await.unwrap(), 0);
    assert_eq!(fx.ledger.snapshot()[0].status, ReservationStatus::Paid);
}

#[tokio::test]
async fn expired_seat_becomes_bookable_again_as_a_new_row() {
    let fx = fixture();

    fx.engine.book(&request(vec![5], false)).await.unwrap();
    fx.ledger.backdate_all(Duration::minutes(1));
    assert_eq!(fx.sweep.run(Some(0)).await.unwrap(), 1);

    // The expired row stays as history; the rebooking is a fresh row.
    fx.engine.book(&request(vec![5], false)).await.unwrap();

    let rows = fx.ledger.snapshot();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].status, ReservationStatus::Expired);
    assert_eq!(rows[1].status, ReservationStatus::Reserved);
}

#[tokio::test]
async fn charged_price_survives_policy_changes() {
    let policy = Arc::new(AdjustablePolicy {
        price_cents: AtomicI64::new(1500),
    });
    let fx = fixture_with(vec![screening(1, 50, 0, false)], policy.clone());

    fx.engine.book(&request(vec![1], false)).await.unwrap();

    policy.price_cents.store(9900, Ordering::SeqCst);

    // Existing row keeps the price it was charged; new bookings see the
    // policy's new output.
    assert_eq!(fx.ledger.snapshot()[0].price_cents, 1500);
    let confirmation = fx.engine.book(&request(vec![2], false)).await.unwrap();
    assert_eq!(confirmation.prices, vec![9900]);
}

#[tokio::test]
async fn reserve_then_conflict_then_expire_scenario() {
    // The end-to-end scenario: capacity 50, book [1,2] unpaid, rebooking
    // seat 1 conflicts, an immediate zero-minute sweep reclaims both.
    let fx = fixture();

    let confirmation = fx.engine.book(&request(vec![1, 2], false)).await.unwrap();
    assert_eq!(confirmation.seats, vec![1, 2]);
    assert_eq!(confirmation.total_price, 2 * 1500);

    let err = fx.engine.book(&request(vec![1], false)).await.unwrap_err();
    assert!(matches!(err, BookingError::SeatConflict));

    fx.ledger.backdate_all(Duration::seconds(1));
    assert_eq!(fx.sweep.run(Some(0)).await.unwrap(), 2);
    assert!(fx
        .ledger
        .snapshot()
        .iter()
        .all(|r| r.status == ReservationStatus::Expired));
}
