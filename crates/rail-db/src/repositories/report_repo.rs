//! Report repository implementation
//!
//! Aggregations for the dashboard and the reports screen. Revenue figures
//! count Completed payments only; ticket sales count every booked ticket.

use rail_core::{
    models::{
        ClassRevenue, DailyCancellations, DailyCount, DailySales, DateRange, DistributionBucket,
        TrainRevenue,
    },
    traits::ReportRepository,
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of ReportRepository
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    /// Create a new report repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn scalar_count(&self, what: &str, query: &str) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as(query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting {}: {}", what, e);
                AppError::Database(format!("Failed to count {}: {}", what, e))
            })?;

        Ok(result.0)
    }
}

fn report_error(report: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        error!("Database error building {} report: {}", report, e);
        AppError::Database(format!("Failed to build {} report: {}", report, e))
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    #[instrument(skip(self))]
    async fn total_passengers(&self) -> AppResult<i64> {
        self.scalar_count("passengers", "SELECT COUNT(*) FROM passengers")
            .await
    }

    #[instrument(skip(self))]
    async fn active_trains(&self) -> AppResult<i64> {
        self.scalar_count("active trains", "SELECT COUNT(*) FROM trains WHERE is_active")
            .await
    }

    #[instrument(skip(self))]
    async fn tickets_booked_on(&self, day: NaiveDate) -> AppResult<i64> {
        debug!("Counting tickets booked on {}", day);

        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tickets WHERE booking_date_time::DATE = $1")
                .bind(day)
                .fetch_one(&self.pool)
                .await
                .map_err(report_error("tickets today"))?;

        Ok(result.0)
    }

    #[instrument(skip(self))]
    async fn completed_revenue_on(&self, day: NaiveDate) -> AppResult<Decimal> {
        debug!("Summing completed revenue on {}", day);

        let result: (Decimal,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM payments
            WHERE payment_status = 'Completed'
              AND transaction_date_time::DATE = $1
            "#,
        )
        .bind(day)
        .fetch_one(&self.pool)
        .await
        .map_err(report_error("revenue today"))?;

        Ok(result.0)
    }

    #[instrument(skip(self))]
    async fn tickets_per_day(&self, range: DateRange) -> AppResult<Vec<DailyCount>> {
        let rows: Vec<(NaiveDate, i64)> = sqlx::query_as(
            r#"
            SELECT booking_date_time::DATE AS day, COUNT(*)
            FROM tickets
            WHERE booking_date_time::DATE BETWEEN $1 AND $2
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(range.from)
        .bind(range.to)
        .fetch_all(&self.pool)
        .await
        .map_err(report_error("ticket sales trend"))?;

        Ok(rows
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect())
    }

    #[instrument(skip(self))]
    async fn daily_sales(&self, range: DateRange) -> AppResult<Vec<DailySales>> {
        let rows: Vec<(NaiveDate, i64, Decimal)> = sqlx::query_as(
            r#"
            SELECT booking_date_time::DATE AS day, COUNT(*), COALESCE(SUM(fare), 0)
            FROM tickets
            WHERE booking_date_time::DATE BETWEEN $1 AND $2
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(range.from)
        .bind(range.to)
        .fetch_all(&self.pool)
        .await
        .map_err(report_error("daily sales"))?;

        Ok(rows
            .into_iter()
            .map(|(date, tickets, revenue)| DailySales {
                date,
                tickets,
                revenue,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn revenue_by_train(&self, range: DateRange) -> AppResult<Vec<TrainRevenue>> {
        let rows: Vec<(String, i64, Decimal)> = sqlx::query_as(
            r#"
            SELECT tr.train_name, COUNT(t.ticket_id), COALESCE(SUM(py.amount), 0) AS revenue
            FROM payments py
            JOIN tickets t ON py.ticket_id = t.ticket_id
            JOIN trains tr ON t.train_id = tr.train_id
            WHERE py.payment_status = 'Completed'
              AND py.transaction_date_time::DATE BETWEEN $1 AND $2
            GROUP BY tr.train_id, tr.train_name
            ORDER BY revenue DESC, tr.train_name
            "#,
        )
        .bind(range.from)
        .bind(range.to)
        .fetch_all(&self.pool)
        .await
        .map_err(report_error("revenue by train"))?;

        Ok(rows
            .into_iter()
            .map(|(train_name, tickets, revenue)| TrainRevenue {
                train_name,
                tickets,
                revenue,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn revenue_by_class(&self, range: DateRange) -> AppResult<Vec<ClassRevenue>> {
        let rows: Vec<(String, i64, Decimal)> = sqlx::query_as(
            r#"
            SELECT t.class, COUNT(t.ticket_id), COALESCE(SUM(py.amount), 0) AS revenue
            FROM payments py
            JOIN tickets t ON py.ticket_id = t.ticket_id
            WHERE py.payment_status = 'Completed'
              AND py.transaction_date_time::DATE BETWEEN $1 AND $2
            GROUP BY t.class
            ORDER BY revenue DESC, t.class
            "#,
        )
        .bind(range.from)
        .bind(range.to)
        .fetch_all(&self.pool)
        .await
        .map_err(report_error("revenue by class"))?;

        Ok(rows
            .into_iter()
            .map(|(class_name, tickets, revenue)| ClassRevenue {
                class_name,
                tickets,
                revenue,
                share_percent: Decimal::ZERO,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn daily_cancellations(&self, range: DateRange) -> AppResult<Vec<DailyCancellations>> {
        let rows: Vec<(NaiveDate, i64, Decimal)> = sqlx::query_as(
            r#"
            SELECT cancellation_date_time::DATE AS day, COUNT(*), COALESCE(SUM(refund_amount), 0)
            FROM cancellations
            WHERE cancellation_date_time::DATE BETWEEN $1 AND $2
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(range.from)
        .bind(range.to)
        .fetch_all(&self.pool)
        .await
        .map_err(report_error("cancellation analysis"))?;

        Ok(rows
            .into_iter()
            .map(|(date, cancellations, refund_amount)| DailyCancellations {
                date,
                cancellations,
                refund_amount,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn age_distribution(&self) -> AppResult<Vec<DistributionBucket>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT
                CASE
                    WHEN age < 18 THEN 'Under 18'
                    WHEN age <= 30 THEN '18-30'
                    WHEN age <= 45 THEN '31-45'
                    WHEN age <= 60 THEN '46-60'
                    ELSE 'Over 60'
                END AS age_group,
                COUNT(*)
            FROM passengers
            GROUP BY age_group
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(report_error("age distribution"))?;

        Ok(rows
            .into_iter()
            .map(|(label, count)| DistributionBucket { label, count })
            .collect())
    }

    #[instrument(skip(self))]
    async fn gender_distribution(&self) -> AppResult<Vec<DistributionBucket>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT gender, COUNT(*) AS passengers
            FROM passengers
            GROUP BY gender
            ORDER BY passengers DESC, gender
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(report_error("gender distribution"))?;

        Ok(rows
            .into_iter()
            .map(|(label, count)| DistributionBucket { label, count })
            .collect())
    }
}
