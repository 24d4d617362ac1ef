use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, QueryBuilder};

use marquee_core::repository::{ReservationLedger, StoreError};
use marquee_core::reservation::NewReservation;

pub struct PostgresReservationLedger {
    pool: PgPool,
}

impl PostgresReservationLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active seat occupancy for one screening, for the read-only facade.
    pub async fn active_seats(&self, screening_id: i64) -> Result<Vec<SeatOccupancy>, StoreError> {
        let seats = sqlx::query_as::<_, SeatOccupancy>(
            r#"
            SELECT seat_number, status FROM tickets
            WHERE screening_id = $1 AND status IN ('reserved', 'paid')
            ORDER BY seat_number
            "#,
        )
        .bind(screening_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_store_err)?;

        Ok(seats)
    }
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct SeatOccupancy {
    pub seat_number: i32,
    pub status: String,
}

#[async_trait]
impl ReservationLedger for PostgresReservationLedger {
    async fn insert_reservations(&self, rows: &[NewReservation]) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }

        // One multi-row INSERT statement: Postgres applies it atomically, so
        // a unique-index hit on any seat rolls back the whole batch. The
        // partial unique index on active (screening_id, seat_number) is the
        // arbiter of conflict; there is no occupancy pre-check here.
        let mut qb: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "INSERT INTO tickets \
             (screening_id, seat_number, buyer_name, buyer_email, buyer_dob, status, price_cents, paid_at) ",
        );
        qb.push_values(rows, |mut b, row| {
            b.push_bind(row.screening_id)
                .push_bind(row.seat_number)
                .push_bind(row.buyer_name.clone())
                .push_bind(row.buyer_email.clone())
                .push_bind(row.buyer_dob)
                .push_bind(row.status.as_str())
                .push_bind(row.price_cents)
                .push_bind(row.paid_at);
        });

        qb.build()
            .execute(&self.pool)
            .await
            .map_err(map_store_err)?;

        Ok(())
    }

    async fn expire_unpaid(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        // Single conditional bulk update. Rows that became 'paid' no longer
        // match the predicate, so overlapping sweeps and concurrent payment
        // confirmation are both safe.
        let result = sqlx::query(
            r#"
            UPDATE tickets
            SET status = 'expired'
            WHERE status = 'reserved' AND created_at < $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(map_store_err)?;

        Ok(result.rows_affected())
    }
}

fn map_store_err(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::UniqueViolation,
        _ => StoreError::Backend(e.into()),
    }
}
