pub mod booking;
pub mod catalog;
pub mod error;
pub mod pricing;
pub mod repository;
pub mod reservation;
pub mod sweep;

pub use booking::BookingEngine;
pub use error::BookingError;
pub use repository::{CatalogStore, ReservationLedger, StoreError};
pub use sweep::ExpirySweep;
