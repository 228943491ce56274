//! Fare class repository implementation
//!
//! Classes are reference data read by the coordinator to reject unknown class
//! names before the booking function is called.

use rail_core::{models::FareClass, traits::FareClassRepository, AppError, AppResult};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of FareClassRepository
pub struct PgFareClassRepository {
    pool: PgPool,
}

impl PgFareClassRepository {
    /// Create a new fare class repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CLASS_COLUMNS: &str = "class_name, fare_per_km, seat_capacity, seats_per_coach, coach_prefix";

#[async_trait]
impl FareClassRepository for PgFareClassRepository {
    #[instrument(skip(self))]
    async fn list_all(&self) -> AppResult<Vec<FareClass>> {
        debug!("Listing fare classes");

        let query = format!(
            "SELECT {} FROM classes ORDER BY fare_per_km, class_name",
            CLASS_COLUMNS
        );

        let rows = sqlx::query_as::<sqlx::Postgres, FareClassRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error listing classes: {}", e);
                AppError::Database(format!("Failed to fetch classes: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, class_name: &str) -> AppResult<Option<FareClass>> {
        debug!("Finding fare class: {}", class_name);

        let query = format!(
            "SELECT {} FROM classes WHERE LOWER(class_name) = LOWER($1)",
            CLASS_COLUMNS
        );

        let result = sqlx::query_as::<sqlx::Postgres, FareClassRow>(&query)
            .bind(class_name.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding class {}: {}", class_name, e);
                AppError::Database(format!("Failed to find class: {}", e))
            })?;

        Ok(result.map(Into::into))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FareClassRow {
    class_name: String,
    fare_per_km: Decimal,
    seat_capacity: i32,
    seats_per_coach: i32,
    coach_prefix: String,
}

impl From<FareClassRow> for FareClass {
    fn from(row: FareClassRow) -> Self {
        Self {
            class_name: row.class_name,
            fare_per_km: row.fare_per_km,
            seat_capacity: row.seat_capacity,
            seats_per_coach: row.seats_per_coach,
            coach_prefix: row.coach_prefix,
        }
    }
}
