//! Passenger repository implementation
//!
//! Provides PostgreSQL-backed storage for passengers with name search.

use rail_core::{
    models::{Gender, Passenger},
    traits::{PassengerRepository, Repository},
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of PassengerRepository
pub struct PgPassengerRepository {
    pool: PgPool,
}

impl PgPassengerRepository {
    /// Create a new passenger repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PASSENGER_COLUMNS: &str = r#"
    passenger_id, first_name, last_name, age, gender,
    email, phone, disability, created_at
"#;

#[async_trait]
impl Repository<Passenger, i32> for PgPassengerRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Passenger>> {
        debug!("Finding passenger by id: {}", id);

        let query = format!(
            "SELECT {} FROM passengers WHERE passenger_id = $1",
            PASSENGER_COLUMNS
        );

        let result = sqlx::query_as::<sqlx::Postgres, PassengerRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding passenger {}: {}", id, e);
                AppError::Database(format!("Failed to find passenger: {}", e))
            })?;

        result.map(Passenger::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Passenger>> {
        let (passengers, _) = self.search(None, limit, offset).await?;
        Ok(passengers)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM passengers")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting passengers: {}", e);
                AppError::Database(format!("Failed to count passengers: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Passenger) -> AppResult<Passenger> {
        debug!("Creating passenger: {}", entity.full_name());

        let query = format!(
            r#"
            INSERT INTO passengers (first_name, last_name, age, gender, email, phone, disability)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PASSENGER_COLUMNS
        );

        let row = sqlx::query_as::<sqlx::Postgres, PassengerRow>(&query)
            .bind(&entity.first_name)
            .bind(&entity.last_name)
            .bind(entity.age)
            .bind(entity.gender.to_string())
            .bind(&entity.email)
            .bind(&entity.phone)
            .bind(entity.disability)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error creating passenger: {}", e);
                AppError::Database(format!("Failed to create passenger: {}", e))
            })?;

        row.try_into()
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Passenger) -> AppResult<Passenger> {
        debug!("Updating passenger: {}", entity.id);

        let query = format!(
            r#"
            UPDATE passengers
            SET first_name = $2,
                last_name = $3,
                age = $4,
                gender = $5,
                email = $6,
                phone = $7,
                disability = $8
            WHERE passenger_id = $1
            RETURNING {}
            "#,
            PASSENGER_COLUMNS
        );

        let row = sqlx::query_as::<sqlx::Postgres, PassengerRow>(&query)
            .bind(entity.id)
            .bind(&entity.first_name)
            .bind(&entity.last_name)
            .bind(entity.age)
            .bind(entity.gender.to_string())
            .bind(&entity.email)
            .bind(&entity.phone)
            .bind(entity.disability)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error updating passenger {}: {}", entity.id, e);
                AppError::Database(format!("Failed to update passenger: {}", e))
            })?
            .ok_or_else(|| AppError::PassengerNotFound(entity.id.to_string()))?;

        row.try_into()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> AppResult<bool> {
        debug!("Deleting passenger: {}", id);

        let result = sqlx::query("DELETE FROM passengers WHERE passenger_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting passenger {}: {}", id, e);
                if e.to_string().contains("foreign key") {
                    AppError::Conflict(format!("Passenger {} has tickets", id))
                } else {
                    AppError::Database(format!("Failed to delete passenger: {}", e))
                }
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PassengerRepository for PgPassengerRepository {
    #[instrument(skip(self))]
    async fn search(
        &self,
        name: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Passenger>, i64)> {
        debug!(
            "Searching passengers: name={:?}, limit={}, offset={}",
            name, limit, offset
        );

        let name = name.map(str::trim).filter(|n| !n.is_empty());
        let condition = "($1::TEXT IS NULL OR first_name ILIKE '%' || $1 || '%' OR last_name ILIKE '%' || $1 || '%')";

        let count_query = format!("SELECT COUNT(*) FROM passengers WHERE {}", condition);
        let total: (i64,) = sqlx::query_as(&count_query)
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting passengers: {}", e);
                AppError::Database(format!("Failed to count passengers: {}", e))
            })?;

        let data_query = format!(
            "SELECT {} FROM passengers WHERE {} ORDER BY passenger_id LIMIT $2 OFFSET $3",
            PASSENGER_COLUMNS, condition
        );
        let rows = sqlx::query_as::<sqlx::Postgres, PassengerRow>(&data_query)
            .bind(name)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error searching passengers: {}", e);
                AppError::Database(format!("Failed to fetch passengers: {}", e))
            })?;

        let passengers = rows
            .into_iter()
            .map(Passenger::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((passengers, total.0))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct PassengerRow {
    passenger_id: i32,
    first_name: String,
    last_name: String,
    age: i32,
    gender: String,
    email: Option<String>,
    phone: Option<String>,
    disability: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<PassengerRow> for Passenger {
    type Error = AppError;

    fn try_from(row: PassengerRow) -> AppResult<Self> {
        let gender = Gender::from_str(&row.gender).ok_or_else(|| {
            AppError::Database(format!(
                "Passenger {} has unknown gender '{}'",
                row.passenger_id, row.gender
            ))
        })?;

        Ok(Self {
            id: row.passenger_id,
            first_name: row.first_name,
            last_name: row.last_name,
            age: row.age,
            gender,
            email: row.email,
            phone: row.phone,
            disability: row.disability,
            created_at: row.created_at,
        })
    }
}
