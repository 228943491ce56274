//! Station repository implementation

use rail_core::{models::Station, traits::StationRepository, AppError, AppResult};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of StationRepository
pub struct PgStationRepository {
    pool: PgPool,
}

impl PgStationRepository {
    /// Create a new station repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StationRepository for PgStationRepository {
    #[instrument(skip(self))]
    async fn list_all(&self) -> AppResult<Vec<Station>> {
        debug!("Listing stations");

        let rows = sqlx::query_as::<sqlx::Postgres, StationRow>(
            "SELECT station_id, station_code, station_name FROM stations ORDER BY station_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing stations: {}", e);
            AppError::Database(format!("Failed to fetch stations: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StationRow {
    station_id: i32,
    station_code: String,
    station_name: String,
}

impl From<StationRow> for Station {
    fn from(row: StationRow) -> Self {
        Self {
            id: row.station_id,
            station_code: row.station_code,
            station_name: row.station_name,
        }
    }
}
