//! Database-backed ticket lifecycle tests
//!
//! Require a PostgreSQL instance reachable through `DATABASE_URL`; run with
//! `cargo test -p rail-db -- --ignored`.

use chrono::NaiveDate;
use rail_core::config::DatabaseConfig;
use rail_core::models::{
    refund_for, PaymentMode, PaymentStatus, RefundStatus, TicketStatus, ValidatedBooking,
};
use rail_core::traits::{BookingService, PaymentRepository, TicketRepository};
use rail_core::AppError;
use rail_db::{
    create_pool, run_migrations, PgBookingService, PgPaymentRepository, PgPool,
    PgTicketRepository,
};
use rust_decimal_macros::dec;

async fn setup() -> PgPool {
    let config = DatabaseConfig {
        url: std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/rail_reservation_test".to_string()),
        max_connections: 5,
        min_connections: 1,
        acquire_timeout_secs: 5,
        idle_timeout_secs: 60,
        run_migrations: true,
    };
    let pool = create_pool(&config).await.expect("database");
    run_migrations(&pool).await.expect("migrations");
    pool
}

/// Insert a passenger and an active train with unique identifiers, returning their ids
async fn seed(pool: &PgPool, tag: &str) -> (i32, i32) {
    sqlx::query(
        "INSERT INTO classes (class_name, fare_per_km, seat_capacity, seats_per_coach, coach_prefix)
         VALUES ('Sleeper', 0.50, 2, 72, 'S') ON CONFLICT (class_name) DO NOTHING",
    )
    .execute(pool)
    .await
    .unwrap();

    let (origin,): (i32,) = sqlx::query_as(
        "INSERT INTO stations (station_code, station_name) VALUES ($1, 'Origin') RETURNING station_id",
    )
    .bind(format!("O{}", tag))
    .fetch_one(pool)
    .await
    .unwrap();

    let (destination,): (i32,) = sqlx::query_as(
        "INSERT INTO stations (station_code, station_name) VALUES ($1, 'Destination') RETURNING station_id",
    )
    .bind(format!("D{}", tag))
    .fetch_one(pool)
    .await
    .unwrap();

    let (train_id,): (i32,) = sqlx::query_as(
        "INSERT INTO trains (train_number, train_name, origin_station_id, destination_station_id, total_distance)
         VALUES ($1, 'Test Express', $2, $3, 1000) RETURNING train_id",
    )
    .bind(tag)
    .bind(origin)
    .bind(destination)
    .fetch_one(pool)
    .await
    .unwrap();

    let (passenger_id,): (i32,) = sqlx::query_as(
        "INSERT INTO passengers (first_name, last_name, age, gender)
         VALUES ('Asha', 'Rao', 34, 'Female') RETURNING passenger_id",
    )
    .fetch_one(pool)
    .await
    .unwrap();

    (passenger_id, train_id)
}

fn unique_tag() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    format!("{:08}", nanos % 100_000_000)
}

#[tokio::test]
#[ignore] // Requires database
async fn test_book_then_cancel_applies_all_three_writes() {
    let pool = setup().await;
    let (passenger_id, train_id) = seed(&pool, &unique_tag()).await;

    let booking = PgBookingService::new(pool.clone());
    let confirmation = booking
        .book(&ValidatedBooking {
            passenger_id,
            train_id,
            class_name: "Sleeper".to_string(),
            journey_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            payment_mode: PaymentMode::Upi,
        })
        .await
        .unwrap();

    assert!(!confirmation.pnr.is_empty());
    assert_eq!(confirmation.fare, dec!(500.00));
    assert_eq!(confirmation.status, TicketStatus::Confirmed);

    let tickets = PgTicketRepository::new(pool.clone());
    let payments = PgPaymentRepository::new(pool.clone());

    let outcome = tickets
        .cancel_confirmed(confirmation.ticket_id, refund_for(confirmation.fare))
        .await
        .unwrap();
    assert_eq!(outcome.refund_amount, dec!(400.00));
    assert_eq!(outcome.cancellation.refund_status, RefundStatus::Pending);

    let ticket = tickets.find_by_id(confirmation.ticket_id).await.unwrap().unwrap();
    assert_eq!(ticket.status, TicketStatus::Cancelled);

    let payment = payments.find_by_ticket(confirmation.ticket_id).await.unwrap().unwrap();
    assert_eq!(payment.status, PaymentStatus::Refunded);

    // Second cancellation is rejected and changes nothing
    let err = tickets
        .cancel_confirmed(confirmation.ticket_id, dec!(400.00))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTicketState { .. }));

    let cancellation = tickets
        .find_cancellation(confirmation.ticket_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cancellation.id, outcome.cancellation.id);

    pool.close().await;
}

#[tokio::test]
#[ignore] // Requires database
async fn test_cancel_without_payment_rolls_back() {
    let pool = setup().await;
    let (passenger_id, train_id) = seed(&pool, &unique_tag()).await;

    let confirmation = PgBookingService::new(pool.clone())
        .book(&ValidatedBooking {
            passenger_id,
            train_id,
            class_name: "Sleeper".to_string(),
            journey_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            payment_mode: PaymentMode::Cash,
        })
        .await
        .unwrap();

    sqlx::query("DELETE FROM payments WHERE ticket_id = $1")
        .bind(confirmation.ticket_id)
        .execute(&pool)
        .await
        .unwrap();

    let tickets = PgTicketRepository::new(pool.clone());
    let err = tickets
        .cancel_confirmed(confirmation.ticket_id, dec!(400.00))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Persistence(_)));

    let ticket = tickets.find_by_id(confirmation.ticket_id).await.unwrap().unwrap();
    assert_eq!(ticket.status, TicketStatus::Confirmed);
    assert!(tickets
        .find_cancellation(confirmation.ticket_id)
        .await
        .unwrap()
        .is_none());

    pool.close().await;
}

#[tokio::test]
#[ignore] // Requires database
async fn test_inactive_train_is_booking_failure() {
    let pool = setup().await;
    let (passenger_id, train_id) = seed(&pool, &unique_tag()).await;

    sqlx::query("UPDATE trains SET is_active = FALSE WHERE train_id = $1")
        .bind(train_id)
        .execute(&pool)
        .await
        .unwrap();

    let err = PgBookingService::new(pool.clone())
        .book(&ValidatedBooking {
            passenger_id,
            train_id,
            class_name: "Sleeper".to_string(),
            journey_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            payment_mode: PaymentMode::Upi,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BookingFailed(_)));

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tickets WHERE train_id = $1")
        .bind(train_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);

    pool.close().await;
}

#[tokio::test]
#[ignore] // Requires database
async fn test_concurrent_cancellations_refund_once() {
    let pool = setup().await;
    let (passenger_id, train_id) = seed(&pool, &unique_tag()).await;

    let confirmation = PgBookingService::new(pool.clone())
        .book(&ValidatedBooking {
            passenger_id,
            train_id,
            class_name: "Sleeper".to_string(),
            journey_date: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
            payment_mode: PaymentMode::DebitCard,
        })
        .await
        .unwrap();

    let tickets = PgTicketRepository::new(pool.clone());
    let refund = refund_for(confirmation.fare);

    let (first, second) = tokio::join!(
        tickets.cancel_confirmed(confirmation.ticket_id, refund),
        tickets.cancel_confirmed(confirmation.ticket_id, refund),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(AppError::InvalidTicketState { .. }))));

    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM cancellations WHERE ticket_id = $1")
            .bind(confirmation.ticket_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);

    let payment = PgPaymentRepository::new(pool.clone())
        .find_by_ticket(confirmation.ticket_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Refunded);

    pool.close().await;
}
