use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use marquee_core::catalog::{ScreeningDetails, ShowDetails};
use marquee_core::repository::{CatalogStore, StoreError};

pub struct PostgresCatalogStore {
    pool: PgPool,
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct ScreeningRow {
    id: i64,
    venue: String,
    starts_at: DateTime<Utc>,
    capacity: i32,
    base_price_cents: i64,
    cancelled_at: Option<DateTime<Utc>>,
    title: String,
    category: String,
    min_age: i32,
}

impl From<ScreeningRow> for ScreeningDetails {
    fn from(row: ScreeningRow) -> Self {
        ScreeningDetails {
            id: row.id,
            venue: row.venue,
            starts_at: row.starts_at,
            capacity: row.capacity,
            base_price_cents: row.base_price_cents,
            cancelled_at: row.cancelled_at,
            show: ShowDetails {
                title: row.title,
                category: row.category,
                min_age: row.min_age,
            },
        }
    }
}

/// A row of the upcoming-screenings listing.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ScreeningSummary {
    pub id: i64,
    pub starts_at: DateTime<Utc>,
    pub venue: String,
    pub capacity: i32,
    pub base_price_cents: i64,
    pub title: String,
    pub category: String,
    pub min_age: i32,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upcoming, not-cancelled screenings joined to their shows.
    pub async fn list_upcoming(&self) -> Result<Vec<ScreeningSummary>, StoreError> {
        let rows = sqlx::query_as::<_, ScreeningSummary>(
            r#"
            SELECT sc.id, sc.starts_at, sc.venue, sc.capacity, sc.base_price_cents,
                   sh.title, sh.category, sh.min_age
            FROM screenings sc
            JOIN shows sh ON sh.id = sc.show_id
            WHERE sc.cancelled_at IS NULL AND sc.starts_at > now()
            ORDER BY sc.starts_at
            LIMIT 100
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows)
    }

    /// Admin-side soft delete. COALESCE keeps the timestamp set-once, so
    /// repeated cancels succeed without moving it. Returns false when the
    /// screening does not exist.
    pub async fn cancel_screening(&self, screening_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE screenings SET cancelled_at = COALESCE(cancelled_at, now()) WHERE id = $1",
        )
        .bind(screening_id)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    async fn screening_with_show(
        &self,
        screening_id: i64,
    ) -> Result<Option<ScreeningDetails>, StoreError> {
        let row = sqlx::query_as::<_, ScreeningRow>(
            r#"
            SELECT sc.id, sc.venue, sc.starts_at, sc.capacity, sc.base_price_cents,
                   sc.cancelled_at, sh.title, sh.category, sh.min_age
            FROM screenings sc
            JOIN shows sh ON sh.id = sc.show_id
            WHERE sc.id = $1
            "#,
        )
        .bind(screening_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.map(ScreeningDetails::from))
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.into())
}
