//! Train repository implementation
//!
//! Provides PostgreSQL-backed storage for trains. Listings join the origin and
//! destination stations so callers get names rather than ids.

use rail_core::{
    models::{Train, TrainSummary, TrainType},
    traits::{Repository, TrainRepository},
    AppError, AppResult,
};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, error, instrument, warn};

/// PostgreSQL implementation of TrainRepository
pub struct PgTrainRepository {
    pool: PgPool,
}

impl PgTrainRepository {
    /// Create a new train repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convert database train type string to enum
    fn parse_train_type(s: &str) -> TrainType {
        TrainType::from_str(s).unwrap_or_else(|| {
            warn!("Unknown train type '{}', treating as Other", s);
            TrainType::Other
        })
    }
}

const TRAIN_COLUMNS: &str = r#"
    train_id, train_number, train_name, train_type,
    origin_station_id, destination_station_id,
    total_distance, is_active
"#;

const TRAIN_SUMMARY_SELECT: &str = r#"
    SELECT
        t.train_id, t.train_number, t.train_name, t.train_type,
        s1.station_name AS origin, s2.station_name AS destination,
        t.total_distance, t.is_active
    FROM trains t
    JOIN stations s1 ON t.origin_station_id = s1.station_id
    JOIN stations s2 ON t.destination_station_id = s2.station_id
"#;

#[async_trait]
impl Repository<Train, i32> for PgTrainRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Train>> {
        debug!("Finding train by id: {}", id);

        let query = format!("SELECT {} FROM trains WHERE train_id = $1", TRAIN_COLUMNS);

        let result = sqlx::query_as::<sqlx::Postgres, TrainRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding train {}: {}", id, e);
                AppError::Database(format!("Failed to find train: {}", e))
            })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Train>> {
        debug!("Finding all trains with limit {} offset {}", limit, offset);

        let query = format!(
            "SELECT {} FROM trains ORDER BY train_number LIMIT $1 OFFSET $2",
            TRAIN_COLUMNS
        );

        let rows = sqlx::query_as::<sqlx::Postgres, TrainRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding trains: {}", e);
                AppError::Database(format!("Failed to fetch trains: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM trains")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting trains: {}", e);
                AppError::Database(format!("Failed to count trains: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Train) -> AppResult<Train> {
        debug!("Creating train: {}", entity.train_number);

        let query = format!(
            r#"
            INSERT INTO trains (
                train_number, train_name, train_type,
                origin_station_id, destination_station_id,
                total_distance, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            TRAIN_COLUMNS
        );

        let row = sqlx::query_as::<sqlx::Postgres, TrainRow>(&query)
            .bind(&entity.train_number)
            .bind(&entity.train_name)
            .bind(entity.train_type.to_string())
            .bind(entity.origin_station_id)
            .bind(entity.destination_station_id)
            .bind(entity.total_distance)
            .bind(entity.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error creating train: {}", e);
                if e.to_string().contains("unique constraint") {
                    AppError::AlreadyExists(format!("Train {} already exists", entity.train_number))
                } else {
                    AppError::Database(format!("Failed to create train: {}", e))
                }
            })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Train) -> AppResult<Train> {
        debug!("Updating train: {}", entity.id);

        let query = format!(
            r#"
            UPDATE trains
            SET train_number = $2,
                train_name = $3,
                train_type = $4,
                origin_station_id = $5,
                destination_station_id = $6,
                total_distance = $7,
                is_active = $8
            WHERE train_id = $1
            RETURNING {}
            "#,
            TRAIN_COLUMNS
        );

        let row = sqlx::query_as::<sqlx::Postgres, TrainRow>(&query)
            .bind(entity.id)
            .bind(&entity.train_number)
            .bind(&entity.train_name)
            .bind(entity.train_type.to_string())
            .bind(entity.origin_station_id)
            .bind(entity.destination_station_id)
            .bind(entity.total_distance)
            .bind(entity.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error updating train {}: {}", entity.id, e);
                AppError::Database(format!("Failed to update train: {}", e))
            })?
            .ok_or_else(|| AppError::TrainNotFound(entity.id.to_string()))?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> AppResult<bool> {
        debug!("Deleting train: {}", id);

        let result = sqlx::query("DELETE FROM trains WHERE train_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting train {}: {}", id, e);
                if e.to_string().contains("foreign key") {
                    AppError::Conflict(format!(
                        "Train {} has tickets; deactivate it instead",
                        id
                    ))
                } else {
                    AppError::Database(format!("Failed to delete train: {}", e))
                }
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TrainRepository for PgTrainRepository {
    #[instrument(skip(self))]
    async fn search(
        &self,
        term: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<TrainSummary>, i64)> {
        debug!(
            "Searching trains: term={:?}, limit={}, offset={}",
            term, limit, offset
        );

        let term = term.map(str::trim).filter(|t| !t.is_empty());
        let condition =
            "($1::TEXT IS NULL OR t.train_number ILIKE '%' || $1 || '%' OR t.train_name ILIKE '%' || $1 || '%')";

        let count_query = format!("SELECT COUNT(*) FROM trains t WHERE {}", condition);
        let total: (i64,) = sqlx::query_as(&count_query)
            .bind(term)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting trains: {}", e);
                AppError::Database(format!("Failed to count trains: {}", e))
            })?;

        let data_query = format!(
            "{} WHERE {} ORDER BY t.train_number LIMIT $2 OFFSET $3",
            TRAIN_SUMMARY_SELECT, condition
        );
        let rows = sqlx::query_as::<sqlx::Postgres, TrainSummaryRow>(&data_query)
            .bind(term)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error searching trains: {}", e);
                AppError::Database(format!("Failed to fetch trains: {}", e))
            })?;

        Ok((rows.into_iter().map(Into::into).collect(), total.0))
    }

    #[instrument(skip(self))]
    async fn list_active(&self) -> AppResult<Vec<TrainSummary>> {
        debug!("Listing active trains");

        let query = format!(
            "{} WHERE t.is_active ORDER BY t.train_number",
            TRAIN_SUMMARY_SELECT
        );

        let rows = sqlx::query_as::<sqlx::Postgres, TrainSummaryRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error listing active trains: {}", e);
                AppError::Database(format!("Failed to fetch active trains: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct TrainRow {
    train_id: i32,
    train_number: String,
    train_name: String,
    train_type: String,
    origin_station_id: i32,
    destination_station_id: i32,
    total_distance: i32,
    is_active: bool,
}

impl From<TrainRow> for Train {
    fn from(row: TrainRow) -> Self {
        Self {
            id: row.train_id,
            train_number: row.train_number,
            train_name: row.train_name,
            train_type: PgTrainRepository::parse_train_type(&row.train_type),
            origin_station_id: row.origin_station_id,
            destination_station_id: row.destination_station_id,
            total_distance: row.total_distance,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TrainSummaryRow {
    train_id: i32,
    train_number: String,
    train_name: String,
    train_type: String,
    origin: String,
    destination: String,
    total_distance: i32,
    is_active: bool,
}

impl From<TrainSummaryRow> for TrainSummary {
    fn from(row: TrainSummaryRow) -> Self {
        Self {
            id: row.train_id,
            train_number: row.train_number,
            train_name: row.train_name,
            train_type: PgTrainRepository::parse_train_type(&row.train_type),
            origin: row.origin,
            destination: row.destination,
            total_distance: row.total_distance,
            is_active: row.is_active,
        }
    }
}
