use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Show metadata as read from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowDetails {
    pub title: String,
    pub category: String,
    pub min_age: i32,
}

/// A screening joined to its show — the catalog read the booking engine
/// consumes. Catalog rows are foreign, trusted input: mutations happen in
/// admin tooling, the core only reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningDetails {
    pub id: i64,
    pub venue: String,
    pub starts_at: DateTime<Utc>,
    pub capacity: i32,
    pub base_price_cents: i64,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub show: ShowDetails,
}

impl ScreeningDetails {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled_at.is_some()
    }
}
