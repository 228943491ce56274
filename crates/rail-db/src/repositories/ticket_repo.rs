//! Ticket repository implementation
//!
//! Provides PostgreSQL-backed ticket lookups and searches, and the
//! cancellation unit of work. Tickets themselves are only ever inserted by the
//! booking function.

use rail_core::{
    models::{
        Cancellation, CancellationOutcome, RefundStatus, Ticket, TicketDetails, TicketFilter,
        TicketStatus, TicketSummary,
    },
    traits::TicketRepository,
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};

/// PostgreSQL implementation of TicketRepository
pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    /// Create a new ticket repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convert database ticket status string to enum
    fn parse_status(ticket_id: i64, s: &str) -> AppResult<TicketStatus> {
        TicketStatus::from_str(s).ok_or_else(|| {
            AppError::Database(format!("Ticket {} has unknown status '{}'", ticket_id, s))
        })
    }
}

const TICKET_COLUMNS: &str = r#"
    t.ticket_id, t.pnr_no, t.passenger_id, t.train_id, t.class AS class_name,
    t.journey_date, t.source_station_id, t.destination_station_id,
    t.seat_no, t.coach_no, t.fare, t.concession_amount,
    t.status, t.booking_date_time
"#;

const CANCELLATION_COLUMNS: &str = r#"
    cancellation_id, ticket_id, cancellation_date_time, refund_amount, refund_status
"#;

/// Map a failed step of the cancellation unit to a single persistence error
fn persistence_error(step: &'static str, ticket_id: i64) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        error!("Cancellation of ticket {} failed to {}: {}", ticket_id, step, e);
        AppError::Persistence(format!("Failed to {} for ticket {}: {}", step, ticket_id, e))
    }
}

#[async_trait]
impl TicketRepository for PgTicketRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Ticket>> {
        debug!("Finding ticket by id: {}", id);

        let query = format!("SELECT {} FROM tickets t WHERE t.ticket_id = $1", TICKET_COLUMNS);

        let result = sqlx::query_as::<sqlx::Postgres, TicketRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding ticket {}: {}", id, e);
                AppError::Database(format!("Failed to find ticket: {}", e))
            })?;

        result.map(Ticket::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_pnr(&self, pnr: &str) -> AppResult<Option<Ticket>> {
        debug!("Finding ticket by PNR: {}", pnr);

        let query = format!("SELECT {} FROM tickets t WHERE t.pnr_no = $1", TICKET_COLUMNS);

        let result = sqlx::query_as::<sqlx::Postgres, TicketRow>(&query)
            .bind(pnr.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding ticket {}: {}", pnr, e);
                AppError::Database(format!("Failed to find ticket: {}", e))
            })?;

        result.map(Ticket::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_details_by_pnr(&self, pnr: &str) -> AppResult<Option<TicketDetails>> {
        debug!("Finding ticket details by PNR: {}", pnr);

        let query = format!(
            r#"
            SELECT {},
                p.first_name || ' ' || p.last_name AS passenger_name,
                p.age AS passenger_age,
                p.gender AS passenger_gender,
                tr.train_number, tr.train_name,
                s1.station_name AS source_station,
                s2.station_name AS destination_station
            FROM tickets t
            JOIN passengers p ON t.passenger_id = p.passenger_id
            JOIN trains tr ON t.train_id = tr.train_id
            JOIN stations s1 ON t.source_station_id = s1.station_id
            JOIN stations s2 ON t.destination_station_id = s2.station_id
            WHERE t.pnr_no = $1
            "#,
            TICKET_COLUMNS
        );

        let result = sqlx::query_as::<sqlx::Postgres, TicketDetailsRow>(&query)
            .bind(pnr.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding ticket details {}: {}", pnr, e);
                AppError::Database(format!("Failed to find ticket details: {}", e))
            })?;

        result.map(TicketDetails::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_filtered(
        &self,
        filter: &TicketFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<TicketSummary>, i64)> {
        debug!(
            "Listing tickets with filter {:?}, limit={}, offset={}",
            filter, limit, offset
        );

        filter.validate()?;

        let pnr = filter.pnr.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let name = filter
            .passenger_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let from_clause = r#"
            FROM tickets t
            JOIN passengers p ON t.passenger_id = p.passenger_id
            JOIN trains tr ON t.train_id = tr.train_id
            WHERE ($1::TEXT IS NULL OR t.pnr_no ILIKE '%' || $1 || '%')
              AND ($2::TEXT IS NULL
                   OR p.first_name ILIKE '%' || $2 || '%'
                   OR p.last_name ILIKE '%' || $2 || '%'
                   OR (p.first_name || ' ' || p.last_name) ILIKE '%' || $2 || '%')
              AND ($3::DATE IS NULL OR t.journey_date >= $3)
              AND ($4::DATE IS NULL OR t.journey_date <= $4)
        "#;

        let count_query = format!("SELECT COUNT(*) {}", from_clause);
        let total: (i64,) = sqlx::query_as(&count_query)
            .bind(pnr)
            .bind(name)
            .bind(filter.journey_from)
            .bind(filter.journey_to)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting tickets: {}", e);
                AppError::Database(format!("Failed to count tickets: {}", e))
            })?;

        let data_query = format!(
            r#"
            SELECT
                t.ticket_id, t.pnr_no,
                p.first_name || ' ' || p.last_name AS passenger_name,
                tr.train_name, t.class AS class_name,
                t.journey_date, t.status, t.fare
            {}
            ORDER BY t.journey_date DESC, t.ticket_id DESC
            LIMIT $5 OFFSET $6
            "#,
            from_clause
        );

        let rows = sqlx::query_as::<sqlx::Postgres, TicketSummaryRow>(&data_query)
            .bind(pnr)
            .bind(name)
            .bind(filter.journey_from)
            .bind(filter.journey_to)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error listing tickets: {}", e);
                AppError::Database(format!("Failed to fetch tickets: {}", e))
            })?;

        let tickets = rows
            .into_iter()
            .map(TicketSummary::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((tickets, total.0))
    }

    #[instrument(skip(self))]
    async fn find_cancellation(&self, ticket_id: i64) -> AppResult<Option<Cancellation>> {
        debug!("Finding cancellation for ticket {}", ticket_id);

        let query = format!(
            "SELECT {} FROM cancellations WHERE ticket_id = $1",
            CANCELLATION_COLUMNS
        );

        let result = sqlx::query_as::<sqlx::Postgres, CancellationRow>(&query)
            .bind(ticket_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding cancellation for {}: {}", ticket_id, e);
                AppError::Database(format!("Failed to find cancellation: {}", e))
            })?;

        result.map(Cancellation::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn cancel_confirmed(
        &self,
        ticket_id: i64,
        refund_amount: Decimal,
    ) -> AppResult<CancellationOutcome> {
        debug!(
            "Cancelling ticket {} with refund {}",
            ticket_id, refund_amount
        );

        // Dropping the transaction without commit rolls every step back
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(persistence_error("start transaction", ticket_id))?;

        // Lock the ticket so concurrent cancellations serialize here
        let query = format!(
            "SELECT {} FROM tickets t WHERE t.ticket_id = $1 FOR UPDATE",
            TICKET_COLUMNS
        );
        let ticket: Ticket = sqlx::query_as::<sqlx::Postgres, TicketRow>(&query)
            .bind(ticket_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(persistence_error("lock ticket", ticket_id))?
            .ok_or_else(|| AppError::TicketNotFound(ticket_id.to_string()))?
            .try_into()?;

        if !ticket.status.is_cancellable() {
            warn!(
                "Ticket {} is {} and cannot be cancelled",
                ticket.pnr, ticket.status
            );
            return Err(AppError::InvalidTicketState {
                pnr: ticket.pnr,
                status: ticket.status.to_string(),
            });
        }

        sqlx::query("UPDATE tickets SET status = 'Cancelled' WHERE ticket_id = $1")
            .bind(ticket_id)
            .execute(&mut *tx)
            .await
            .map_err(persistence_error("mark ticket cancelled", ticket_id))?;

        let query = format!(
            r#"
            INSERT INTO cancellations (ticket_id, refund_amount, refund_status)
            VALUES ($1, $2, 'Pending')
            RETURNING {}
            "#,
            CANCELLATION_COLUMNS
        );
        let cancellation: Cancellation = sqlx::query_as::<sqlx::Postgres, CancellationRow>(&query)
            .bind(ticket_id)
            .bind(refund_amount)
            .fetch_one(&mut *tx)
            .await
            .map_err(persistence_error("record cancellation", ticket_id))?
            .try_into()?;

        let refunded = sqlx::query(
            "UPDATE payments SET payment_status = 'Refunded' WHERE ticket_id = $1",
        )
        .bind(ticket_id)
        .execute(&mut *tx)
        .await
        .map_err(persistence_error("mark payment refunded", ticket_id))?;

        if refunded.rows_affected() == 0 {
            error!("Ticket {} has no payment to refund", ticket_id);
            return Err(AppError::Persistence(format!(
                "Ticket {} has no linked payment; cancellation rolled back",
                ticket_id
            )));
        }

        tx.commit()
            .await
            .map_err(persistence_error("commit cancellation", ticket_id))?;

        info!(
            "Cancelled ticket {} (PNR {}), refund {}",
            ticket_id, ticket.pnr, refund_amount
        );

        Ok(CancellationOutcome {
            ticket_id,
            pnr: ticket.pnr,
            refund_amount,
            cancellation,
        })
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    ticket_id: i64,
    pnr_no: String,
    passenger_id: i32,
    train_id: i32,
    class_name: String,
    journey_date: NaiveDate,
    source_station_id: i32,
    destination_station_id: i32,
    seat_no: Option<i32>,
    coach_no: Option<String>,
    fare: Decimal,
    concession_amount: Decimal,
    status: String,
    booking_date_time: DateTime<Utc>,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = AppError;

    fn try_from(row: TicketRow) -> AppResult<Self> {
        Ok(Self {
            status: PgTicketRepository::parse_status(row.ticket_id, &row.status)?,
            id: row.ticket_id,
            pnr: row.pnr_no,
            passenger_id: row.passenger_id,
            train_id: row.train_id,
            class_name: row.class_name,
            journey_date: row.journey_date,
            source_station_id: row.source_station_id,
            destination_station_id: row.destination_station_id,
            seat_no: row.seat_no,
            coach_no: row.coach_no,
            fare: row.fare,
            concession_amount: row.concession_amount,
            booked_at: row.booking_date_time,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TicketDetailsRow {
    #[sqlx(flatten)]
    ticket: TicketRow,
    passenger_name: String,
    passenger_age: i32,
    passenger_gender: String,
    train_number: String,
    train_name: String,
    source_station: String,
    destination_station: String,
}

impl TryFrom<TicketDetailsRow> for TicketDetails {
    type Error = AppError;

    fn try_from(row: TicketDetailsRow) -> AppResult<Self> {
        Ok(Self {
            ticket: row.ticket.try_into()?,
            passenger_name: row.passenger_name,
            passenger_age: row.passenger_age,
            passenger_gender: row.passenger_gender,
            train_number: row.train_number,
            train_name: row.train_name,
            source_station: row.source_station,
            destination_station: row.destination_station,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TicketSummaryRow {
    ticket_id: i64,
    pnr_no: String,
    passenger_name: String,
    train_name: String,
    class_name: String,
    journey_date: NaiveDate,
    status: String,
    fare: Decimal,
}

impl TryFrom<TicketSummaryRow> for TicketSummary {
    type Error = AppError;

    fn try_from(row: TicketSummaryRow) -> AppResult<Self> {
        Ok(Self {
            status: PgTicketRepository::parse_status(row.ticket_id, &row.status)?,
            id: row.ticket_id,
            pnr: row.pnr_no,
            passenger_name: row.passenger_name,
            train_name: row.train_name,
            class_name: row.class_name,
            journey_date: row.journey_date,
            fare: row.fare,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CancellationRow {
    cancellation_id: i64,
    ticket_id: i64,
    cancellation_date_time: DateTime<Utc>,
    refund_amount: Decimal,
    refund_status: String,
}

impl TryFrom<CancellationRow> for Cancellation {
    type Error = AppError;

    fn try_from(row: CancellationRow) -> AppResult<Self> {
        let refund_status = RefundStatus::from_str(&row.refund_status).ok_or_else(|| {
            AppError::Database(format!(
                "Cancellation {} has unknown refund status '{}'",
                row.cancellation_id, row.refund_status
            ))
        })?;

        Ok(Self {
            id: row.cancellation_id,
            ticket_id: row.ticket_id,
            cancelled_at: row.cancellation_date_time,
            refund_amount: row.refund_amount,
            refund_status,
        })
    }
}
