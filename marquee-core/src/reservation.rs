use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Reservation status. String form matches the ledger's status column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Reserved,
    Paid,
    Expired,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Reserved => "reserved",
            ReservationStatus::Paid => "paid",
            ReservationStatus::Expired => "expired",
        }
    }

    /// Active rows occupy the seat; expired rows are history.
    pub fn is_active(&self) -> bool {
        matches!(self, ReservationStatus::Reserved | ReservationStatus::Paid)
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reserved" => Ok(ReservationStatus::Reserved),
            "paid" => Ok(ReservationStatus::Paid),
            "expired" => Ok(ReservationStatus::Expired),
            other => Err(format!("unknown reservation status: {}", other)),
        }
    }
}

/// A ledger row about to be inserted. Price is fixed here, at booking time,
/// and never recomputed afterwards.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub screening_id: i64,
    pub seat_number: i32,
    pub buyer_name: String,
    pub buyer_email: Option<String>,
    pub buyer_dob: NaiveDate,
    pub status: ReservationStatus,
    pub price_cents: i64,
    pub paid_at: Option<DateTime<Utc>>,
}

/// A persisted ledger row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub screening_id: i64,
    pub seat_number: i32,
    pub buyer_name: String,
    pub buyer_email: Option<String>,
    pub buyer_dob: NaiveDate,
    pub status: ReservationStatus,
    pub price_cents: i64,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// One booking request as it arrives over the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub screening_id: i64,
    pub seat_numbers: Vec<i32>,
    pub buyer_name: String,
    #[serde(default)]
    pub buyer_email: Option<String>,
    pub buyer_dob: NaiveDate,
    #[serde(default)]
    pub pay_now: bool,
}

/// Committed booking: seats and prices in request order, plus their sum.
#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub seats: Vec<i32>,
    pub prices: Vec<i64>,
    pub total_price: i64,
}
