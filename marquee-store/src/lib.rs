pub mod app_config;
pub mod catalog_repo;
pub mod database;
pub mod ticket_repo;

pub use catalog_repo::PostgresCatalogStore;
pub use database::DbClient;
pub use ticket_repo::PostgresReservationLedger;
