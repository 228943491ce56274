//! Payment repository implementation
//!
//! Payments are created by the booking function and flipped to Refunded by
//! the ticket cancellation; this repository only reads them.

use rail_core::{
    models::{Payment, PaymentDetails, PaymentFilter, PaymentMode, PaymentStatus, PaymentSummary},
    traits::PaymentRepository,
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of PaymentRepository
pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    /// Create a new payment repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn parse_mode(payment_id: i64, s: &str) -> AppResult<PaymentMode> {
        PaymentMode::from_str(s).ok_or_else(|| {
            AppError::Database(format!(
                "Payment {} has unknown payment mode '{}'",
                payment_id, s
            ))
        })
    }

    fn parse_status(payment_id: i64, s: &str) -> AppResult<PaymentStatus> {
        PaymentStatus::from_str(s).ok_or_else(|| {
            AppError::Database(format!("Payment {} has unknown status '{}'", payment_id, s))
        })
    }
}

const PAYMENT_COLUMNS: &str = r#"
    py.payment_id, py.ticket_id, py.amount, py.payment_mode,
    py.payment_status, py.transaction_id, py.transaction_date_time
"#;

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    #[instrument(skip(self))]
    async fn find_details_by_id(&self, id: i64) -> AppResult<Option<PaymentDetails>> {
        debug!("Finding payment details by id: {}", id);

        let query = format!(
            r#"
            SELECT {},
                t.pnr_no,
                p.first_name || ' ' || p.last_name AS passenger_name,
                tr.train_name,
                t.class AS class_name,
                t.journey_date
            FROM payments py
            JOIN tickets t ON py.ticket_id = t.ticket_id
            JOIN passengers p ON t.passenger_id = p.passenger_id
            JOIN trains tr ON t.train_id = tr.train_id
            WHERE py.payment_id = $1
            "#,
            PAYMENT_COLUMNS
        );

        let result = sqlx::query_as::<sqlx::Postgres, PaymentDetailsRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding payment {}: {}", id, e);
                AppError::Database(format!("Failed to find payment: {}", e))
            })?;

        result.map(PaymentDetails::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_ticket(&self, ticket_id: i64) -> AppResult<Option<Payment>> {
        debug!("Finding payment for ticket {}", ticket_id);

        let query = format!(
            "SELECT {} FROM payments py WHERE py.ticket_id = $1",
            PAYMENT_COLUMNS
        );

        let result = sqlx::query_as::<sqlx::Postgres, PaymentRow>(&query)
            .bind(ticket_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding payment for ticket {}: {}", ticket_id, e);
                AppError::Database(format!("Failed to find payment: {}", e))
            })?;

        result.map(Payment::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_filtered(
        &self,
        filter: &PaymentFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<PaymentSummary>, i64)> {
        debug!(
            "Listing payments with filter {:?}, limit={}, offset={}",
            filter, limit, offset
        );

        filter.validate()?;
        let status = filter.status.map(|s| s.to_string());

        let from_clause = r#"
            FROM payments py
            JOIN tickets t ON py.ticket_id = t.ticket_id
            WHERE ($1::DATE IS NULL OR py.transaction_date_time::DATE >= $1)
              AND ($2::DATE IS NULL OR py.transaction_date_time::DATE <= $2)
              AND ($3::TEXT IS NULL OR py.payment_status = $3)
        "#;

        let count_query = format!("SELECT COUNT(*) {}", from_clause);
        let total: (i64,) = sqlx::query_as(&count_query)
            .bind(filter.from)
            .bind(filter.to)
            .bind(&status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting payments: {}", e);
                AppError::Database(format!("Failed to count payments: {}", e))
            })?;

        let data_query = format!(
            r#"
            SELECT
                py.payment_id, t.pnr_no, py.amount, py.payment_mode,
                py.payment_status, py.transaction_date_time, py.transaction_id
            {}
            ORDER BY py.transaction_date_time DESC, py.payment_id DESC
            LIMIT $4 OFFSET $5
            "#,
            from_clause
        );

        let rows = sqlx::query_as::<sqlx::Postgres, PaymentSummaryRow>(&data_query)
            .bind(filter.from)
            .bind(filter.to)
            .bind(&status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error listing payments: {}", e);
                AppError::Database(format!("Failed to fetch payments: {}", e))
            })?;

        let payments = rows
            .into_iter()
            .map(PaymentSummary::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((payments, total.0))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    payment_id: i64,
    ticket_id: i64,
    amount: Decimal,
    payment_mode: String,
    payment_status: String,
    transaction_id: String,
    transaction_date_time: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = AppError;

    fn try_from(row: PaymentRow) -> AppResult<Self> {
        Ok(Self {
            payment_mode: PgPaymentRepository::parse_mode(row.payment_id, &row.payment_mode)?,
            status: PgPaymentRepository::parse_status(row.payment_id, &row.payment_status)?,
            id: row.payment_id,
            ticket_id: row.ticket_id,
            amount: row.amount,
            transaction_id: row.transaction_id,
            transacted_at: row.transaction_date_time,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentDetailsRow {
    #[sqlx(flatten)]
    payment: PaymentRow,
    pnr_no: String,
    passenger_name: String,
    train_name: String,
    class_name: String,
    journey_date: NaiveDate,
}

impl TryFrom<PaymentDetailsRow> for PaymentDetails {
    type Error = AppError;

    fn try_from(row: PaymentDetailsRow) -> AppResult<Self> {
        Ok(Self {
            payment: row.payment.try_into()?,
            pnr: row.pnr_no,
            passenger_name: row.passenger_name,
            train_name: row.train_name,
            class_name: row.class_name,
            journey_date: row.journey_date,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentSummaryRow {
    payment_id: i64,
    pnr_no: String,
    amount: Decimal,
    payment_mode: String,
    payment_status: String,
    transaction_date_time: DateTime<Utc>,
    transaction_id: String,
}

impl TryFrom<PaymentSummaryRow> for PaymentSummary {
    type Error = AppError;

    fn try_from(row: PaymentSummaryRow) -> AppResult<Self> {
        Ok(Self {
            payment_mode: PgPaymentRepository::parse_mode(row.payment_id, &row.payment_mode)?,
            status: PgPaymentRepository::parse_status(row.payment_id, &row.payment_status)?,
            id: row.payment_id,
            pnr: row.pnr_no,
            amount: row.amount,
            transacted_at: row.transaction_date_time,
            transaction_id: row.transaction_id,
        })
    }
}
