//! Adapter for the database booking and fare functions
//!
//! `book_ticket` allocates a seat or a waiting-list position and inserts the
//! ticket and its payment inside the single statement that calls it, so a
//! rejected booking leaves nothing behind.

use rail_core::{
    models::{BookingConfirmation, TicketStatus, ValidatedBooking},
    traits::BookingService,
    AppError, AppResult,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};

/// Booking service backed by PostgreSQL functions
pub struct PgBookingService {
    pool: PgPool,
}

impl PgBookingService {
    /// Create a new booking service
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Distinguish a rejection raised by the function from an infrastructure failure
fn booking_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| match e {
        sqlx::Error::Database(db) => {
            warn!("{} rejected by database: {}", operation, db.message());
            AppError::BookingFailed(db.message().to_string())
        }
        other => {
            error!("{} failed: {}", operation, other);
            AppError::Database(format!("{} failed: {}", operation, other))
        }
    }
}

#[async_trait]
impl BookingService for PgBookingService {
    #[instrument(skip(self, booking), fields(passenger = booking.passenger_id, train = booking.train_id))]
    async fn book(&self, booking: &ValidatedBooking) -> AppResult<BookingConfirmation> {
        debug!(
            "Booking {} on {} paid by {}",
            booking.class_name, booking.journey_date, booking.payment_mode
        );

        let row = sqlx::query_as::<sqlx::Postgres, BookingRow>(
            r#"
            SELECT ticket_id, pnr_no, fare, status, seat_no, coach_no
            FROM book_ticket($1, $2, $3, $4, $5)
            "#,
        )
        .bind(booking.passenger_id)
        .bind(booking.train_id)
        .bind(&booking.class_name)
        .bind(booking.journey_date)
        .bind(booking.payment_mode.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(booking_error("Booking"))?;

        let confirmation = BookingConfirmation::try_from(row)?;

        info!(
            "Booked ticket {} (PNR {}) status {} fare {}",
            confirmation.ticket_id, confirmation.pnr, confirmation.status, confirmation.fare
        );

        Ok(confirmation)
    }

    #[instrument(skip(self))]
    async fn calculate_fare(
        &self,
        train_id: i32,
        class_name: &str,
        passenger_id: i32,
    ) -> AppResult<Decimal> {
        debug!("Calculating fare");

        let result: (Decimal,) = sqlx::query_as("SELECT calculate_ticket_fare($1, $2, $3)")
            .bind(train_id)
            .bind(class_name)
            .bind(passenger_id)
            .fetch_one(&self.pool)
            .await
            .map_err(booking_error("Fare calculation"))?;

        Ok(result.0)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    ticket_id: i64,
    pnr_no: String,
    fare: Decimal,
    status: String,
    seat_no: Option<i32>,
    coach_no: Option<String>,
}

impl TryFrom<BookingRow> for BookingConfirmation {
    type Error = AppError;

    fn try_from(row: BookingRow) -> AppResult<Self> {
        let status = TicketStatus::from_str(&row.status).ok_or_else(|| {
            AppError::Database(format!(
                "Booking function returned unknown status '{}'",
                row.status
            ))
        })?;

        Ok(Self {
            ticket_id: row.ticket_id,
            pnr: row.pnr_no,
            fare: row.fare,
            status,
            seat_no: row.seat_no,
            coach_no: row.coach_no,
        })
    }
}
