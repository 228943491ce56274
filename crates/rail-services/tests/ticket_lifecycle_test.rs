//! Ticket lifecycle coordinator tests against in-memory collaborators

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rail_core::models::{
    BookingConfirmation, BookingRequest, Cancellation, CancellationOutcome, FareClass,
    PaymentStatus, RefundStatus, Ticket, TicketDetails, TicketFilter, TicketStatus,
    TicketSummary, ValidatedBooking,
};
use rail_core::traits::{BookingService, FareClassRepository, TicketRepository};
use rail_core::{AppError, AppResult};
use rail_services::TicketLifecycleCoordinator;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Step of the cancellation unit at which the fake store fails
#[derive(Debug, Clone, Copy, PartialEq)]
enum FailAt {
    RecordCancellation,
    RefundPayment,
    Commit,
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    tickets: HashMap<i64, Ticket>,
    payments: HashMap<i64, PaymentStatus>,
    cancellations: Vec<Cancellation>,
}

#[derive(Default)]
struct InMemoryTickets {
    state: Mutex<StoreState>,
    fail_at: Mutex<Option<FailAt>>,
}

impl InMemoryTickets {
    fn with_ticket(id: i64, fare: Decimal, status: TicketStatus) -> Self {
        let store = Self::default();
        store.insert(id, fare, status);
        store
    }

    fn insert(&self, id: i64, fare: Decimal, status: TicketStatus) {
        let ticket = Ticket {
            id,
            pnr: format!("40000000{:02}", id),
            passenger_id: 7,
            train_id: 3,
            class_name: "Sleeper".to_string(),
            journey_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            source_station_id: 1,
            destination_station_id: 2,
            seat_no: (status == TicketStatus::Confirmed).then_some(14),
            coach_no: (status == TicketStatus::Confirmed).then(|| "S1".to_string()),
            fare,
            status,
            ..Default::default()
        };
        let mut state = self.state.lock().unwrap();
        state.tickets.insert(id, ticket);
        state.payments.insert(id, PaymentStatus::Completed);
    }

    fn fail_at(&self, step: FailAt) {
        *self.fail_at.lock().unwrap() = Some(step);
    }

    fn snapshot(&self) -> StoreState {
        self.state.lock().unwrap().clone()
    }
}

#[async_trait]
impl TicketRepository for InMemoryTickets {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Ticket>> {
        Ok(self.state.lock().unwrap().tickets.get(&id).cloned())
    }

    async fn find_by_pnr(&self, pnr: &str) -> AppResult<Option<Ticket>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .tickets
            .values()
            .find(|t| t.pnr == pnr)
            .cloned())
    }

    async fn find_details_by_pnr(&self, _pnr: &str) -> AppResult<Option<TicketDetails>> {
        Ok(None)
    }

    async fn list_filtered(
        &self,
        _filter: &TicketFilter,
        _limit: i64,
        _offset: i64,
    ) -> AppResult<(Vec<TicketSummary>, i64)> {
        Ok((Vec::new(), 0))
    }

    async fn find_cancellation(&self, ticket_id: i64) -> AppResult<Option<Cancellation>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .cancellations
            .iter()
            .find(|c| c.ticket_id == ticket_id)
            .cloned())
    }

    async fn cancel_confirmed(
        &self,
        ticket_id: i64,
        refund_amount: Decimal,
    ) -> AppResult<CancellationOutcome> {
        let fail_at = *self.fail_at.lock().unwrap();
        let mut state = self.state.lock().unwrap();

        // Work on a copy and publish it only on commit
        let mut tx = state.clone();

        let ticket = tx
            .tickets
            .get_mut(&ticket_id)
            .ok_or_else(|| AppError::TicketNotFound(ticket_id.to_string()))?;
        if ticket.status != TicketStatus::Confirmed {
            return Err(AppError::InvalidTicketState {
                pnr: ticket.pnr.clone(),
                status: ticket.status.to_string(),
            });
        }
        ticket.status = TicketStatus::Cancelled;
        let pnr = ticket.pnr.clone();

        if fail_at == Some(FailAt::RecordCancellation) {
            return Err(AppError::Persistence("insert failed".to_string()));
        }
        let cancellation = Cancellation {
            id: tx.cancellations.len() as i64 + 1,
            ticket_id,
            cancelled_at: Utc::now(),
            refund_amount,
            refund_status: RefundStatus::Pending,
        };
        tx.cancellations.push(cancellation.clone());

        if fail_at == Some(FailAt::RefundPayment) {
            return Err(AppError::Persistence("payment update failed".to_string()));
        }
        match tx.payments.get_mut(&ticket_id) {
            Some(status) => *status = PaymentStatus::Refunded,
            None => return Err(AppError::Persistence("no linked payment".to_string())),
        }

        if fail_at == Some(FailAt::Commit) {
            return Err(AppError::Persistence("commit failed".to_string()));
        }
        *state = tx;

        Ok(CancellationOutcome {
            ticket_id,
            pnr,
            refund_amount,
            cancellation,
        })
    }
}

struct FakeBooking {
    calls: AtomicUsize,
    reject_with: Option<String>,
}

impl FakeBooking {
    fn accepting() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            reject_with: None,
        }
    }

    fn rejecting(cause: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            reject_with: Some(cause.to_string()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BookingService for FakeBooking {
    async fn book(&self, booking: &ValidatedBooking) -> AppResult<BookingConfirmation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(cause) = &self.reject_with {
            return Err(AppError::BookingFailed(cause.clone()));
        }
        assert_eq!(booking.class_name, "Sleeper");

        Ok(BookingConfirmation {
            ticket_id: 101,
            pnr: "4000000101".to_string(),
            fare: dec!(500.00),
            status: TicketStatus::Confirmed,
            seat_no: Some(14),
            coach_no: Some("S1".to_string()),
        })
    }

    async fn calculate_fare(
        &self,
        _train_id: i32,
        _class_name: &str,
        passenger_id: i32,
    ) -> AppResult<Decimal> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Passenger 60 is a senior citizen in these fixtures
        Ok(if passenger_id == 60 {
            dec!(300.00)
        } else {
            dec!(500.00)
        })
    }
}

struct FixedClasses;

#[async_trait]
impl FareClassRepository for FixedClasses {
    async fn list_all(&self) -> AppResult<Vec<FareClass>> {
        Ok(vec![FareClass {
            class_name: "Sleeper".to_string(),
            fare_per_km: dec!(0.50),
            seat_capacity: 72,
            seats_per_coach: 72,
            coach_prefix: "S".to_string(),
        }])
    }

    async fn find_by_name(&self, class_name: &str) -> AppResult<Option<FareClass>> {
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .find(|c| c.matches(class_name)))
    }
}

type Coordinator = TicketLifecycleCoordinator<FakeBooking, InMemoryTickets, FixedClasses>;

fn coordinator(
    booking: FakeBooking,
    tickets: InMemoryTickets,
) -> (Coordinator, Arc<FakeBooking>, Arc<InMemoryTickets>) {
    let booking = Arc::new(booking);
    let tickets = Arc::new(tickets);
    let coordinator = TicketLifecycleCoordinator::new(
        Arc::clone(&booking),
        Arc::clone(&tickets),
        Arc::new(FixedClasses),
    );
    (coordinator, booking, tickets)
}

fn booking_request() -> BookingRequest {
    BookingRequest {
        passenger_id: Some(7),
        train_id: Some(3),
        class_name: Some("Sleeper".to_string()),
        journey_date: Some("2024-05-01".to_string()),
        payment_mode: Some("UPI".to_string()),
    }
}

#[tokio::test]
async fn test_book_returns_pnr_and_fare() {
    let (coordinator, booking, _) = coordinator(FakeBooking::accepting(), InMemoryTickets::default());

    let confirmation = coordinator.book(&booking_request()).await.unwrap();

    assert!(!confirmation.pnr.is_empty());
    assert!(confirmation.fare > Decimal::ZERO);
    assert_eq!(booking.calls(), 1);
}

#[tokio::test]
async fn test_book_normalizes_class_name() {
    let (coordinator, _, _) = coordinator(FakeBooking::accepting(), InMemoryTickets::default());

    let request = BookingRequest {
        class_name: Some(" sleeper ".to_string()),
        ..booking_request()
    };

    // The fake booking asserts it receives the stored spelling
    assert!(coordinator.book(&request).await.is_ok());
}

#[tokio::test]
async fn test_book_missing_fields_never_reach_booking_service() {
    let (coordinator, booking, _) = coordinator(FakeBooking::accepting(), InMemoryTickets::default());

    let request = BookingRequest {
        class_name: None,
        payment_mode: None,
        ..booking_request()
    };

    match coordinator.book(&request).await.unwrap_err() {
        AppError::MissingField(fields) => assert_eq!(fields, "class_name, payment_mode"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(booking.calls(), 0);
}

#[tokio::test]
async fn test_book_unknown_class_is_validation_error() {
    let (coordinator, booking, _) = coordinator(FakeBooking::accepting(), InMemoryTickets::default());

    let request = BookingRequest {
        class_name: Some("Hovercraft".to_string()),
        ..booking_request()
    };

    let err = coordinator.book(&request).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(err.is_validation());
    assert_eq!(booking.calls(), 0);
}

#[tokio::test]
async fn test_book_rejection_carries_cause() {
    let (coordinator, booking, _) = coordinator(
        FakeBooking::rejecting("Train 12951 is not active"),
        InMemoryTickets::default(),
    );

    match coordinator.book(&booking_request()).await.unwrap_err() {
        AppError::BookingFailed(cause) => assert!(cause.contains("not active")),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(booking.calls(), 1);
}

#[tokio::test]
async fn test_preview_fare() {
    let (coordinator, _, _) = coordinator(FakeBooking::accepting(), InMemoryTickets::default());

    let quote = coordinator.preview_fare(3, "SLEEPER", 60).await.unwrap();
    assert_eq!(quote.fare, dec!(300.00));
    assert_eq!(quote.class_name, "Sleeper");

    assert!(matches!(
        coordinator.preview_fare(0, "Sleeper", 7).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        coordinator.preview_fare(3, "  ", 7).await,
        Err(AppError::MissingField(_))
    ));
}

#[tokio::test]
async fn test_cancel_refunds_eighty_percent() {
    let (coordinator, _, tickets) = coordinator(
        FakeBooking::accepting(),
        InMemoryTickets::with_ticket(42, dec!(500.00), TicketStatus::Confirmed),
    );

    let outcome = coordinator.cancel(42).await.unwrap();
    assert_eq!(outcome.refund_amount, dec!(400.00));
    assert_eq!(outcome.cancellation.refund_status, RefundStatus::Pending);

    let state = tickets.snapshot();
    assert_eq!(state.tickets[&42].status, TicketStatus::Cancelled);
    assert_eq!(state.payments[&42], PaymentStatus::Refunded);
    assert_eq!(state.cancellations.len(), 1);
    assert_eq!(state.cancellations[0].ticket_id, 42);
}

#[tokio::test]
async fn test_cancel_twice_fails_and_changes_nothing() {
    let (coordinator, _, tickets) = coordinator(
        FakeBooking::accepting(),
        InMemoryTickets::with_ticket(42, dec!(500.00), TicketStatus::Confirmed),
    );

    coordinator.cancel(42).await.unwrap();
    let after_first = tickets.snapshot();

    let err = coordinator.cancel(42).await.unwrap_err();
    match &err {
        AppError::InvalidTicketState { status, .. } => assert_eq!(status, "Cancelled"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.status_code().as_u16(), 409);

    let after_second = tickets.snapshot();
    assert_eq!(after_second.cancellations.len(), 1);
    assert_eq!(
        after_second.cancellations[0].id,
        after_first.cancellations[0].id
    );
    assert_eq!(after_second.payments[&42], PaymentStatus::Refunded);
}

#[tokio::test]
async fn test_cancel_waiting_ticket_is_invalid_state() {
    let (coordinator, _, tickets) = coordinator(
        FakeBooking::accepting(),
        InMemoryTickets::with_ticket(43, dec!(500.00), TicketStatus::Waiting),
    );

    let err = coordinator.cancel(43).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTicketState { .. }));

    let state = tickets.snapshot();
    assert_eq!(state.tickets[&43].status, TicketStatus::Waiting);
    assert_eq!(state.payments[&43], PaymentStatus::Completed);
    assert!(state.cancellations.is_empty());
}

#[tokio::test]
async fn test_cancel_unknown_ticket_is_not_found() {
    let (coordinator, _, _) = coordinator(FakeBooking::accepting(), InMemoryTickets::default());

    assert!(matches!(
        coordinator.cancel(999).await,
        Err(AppError::TicketNotFound(_))
    ));
    assert!(matches!(
        coordinator.cancel_by_pnr("0000000000").await,
        Err(AppError::TicketNotFound(_))
    ));
}

#[tokio::test]
async fn test_cancel_by_pnr() {
    let (coordinator, _, tickets) = coordinator(
        FakeBooking::accepting(),
        InMemoryTickets::with_ticket(42, dec!(1234.56), TicketStatus::Confirmed),
    );

    let outcome = coordinator.cancel_by_pnr("4000000042").await.unwrap();
    assert_eq!(outcome.ticket_id, 42);
    assert_eq!(outcome.refund_amount, dec!(987.65));
    assert_eq!(
        tickets.snapshot().tickets[&42].status,
        TicketStatus::Cancelled
    );
}

#[tokio::test]
async fn test_failed_cancellation_leaves_everything_unchanged() {
    for step in [FailAt::RecordCancellation, FailAt::RefundPayment, FailAt::Commit] {
        let store = InMemoryTickets::with_ticket(42, dec!(500.00), TicketStatus::Confirmed);
        store.fail_at(step);
        let (coordinator, _, tickets) = coordinator(FakeBooking::accepting(), store);

        let err = coordinator.cancel(42).await.unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)), "step {:?}", step);

        let state = tickets.snapshot();
        assert_eq!(state.tickets[&42].status, TicketStatus::Confirmed, "step {:?}", step);
        assert_eq!(state.payments[&42], PaymentStatus::Completed, "step {:?}", step);
        assert!(state.cancellations.is_empty(), "step {:?}", step);
    }
}

proptest! {
    #[test]
    fn cancel_is_all_or_nothing(paise in 0i64..10_000_000, fail in proptest::option::of(0usize..3)) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let fare = Decimal::new(paise, 2);
            let store = InMemoryTickets::with_ticket(42, fare, TicketStatus::Confirmed);
            if let Some(i) = fail {
                store.fail_at([FailAt::RecordCancellation, FailAt::RefundPayment, FailAt::Commit][i]);
            }
            let (coordinator, _, tickets) = coordinator(FakeBooking::accepting(), store);

            let result = coordinator.cancel(42).await;
            let state = tickets.snapshot();

            let cancelled = state.tickets[&42].status == TicketStatus::Cancelled;
            let refunded = state.payments[&42] == PaymentStatus::Refunded;
            let recorded = state.cancellations.len() == 1;

            prop_assert_eq!(cancelled, refunded);
            prop_assert_eq!(cancelled, recorded);
            prop_assert_eq!(cancelled, result.is_ok());
            if let Ok(outcome) = result {
                prop_assert!((outcome.refund_amount - fare * dec!(0.8)).abs() <= dec!(0.005));
            }
            Ok::<(), TestCaseError>(())
        })?;
    }
}
