//! Ticket lifecycle coordinator
//!
//! Sequences the ticket lifecycle against the store:
//! - Book: validate input, check the fare class, delegate to the booking function
//! - Preview fare: display-only fare through the fare function
//! - Cancel: check the ticket is Confirmed, compute the refund, and apply the
//!   cancellation as one unit of work

use rail_core::{
    models::{
        refund_for, BookingConfirmation, BookingRequest, CancellationOutcome, FareQuote, Ticket,
    },
    traits::{BookingService, FareClassRepository, TicketRepository},
    AppError, AppResult,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Ticket lifecycle coordinator
///
/// Owns the booking collaborator and the repositories it needs. Booking
/// atomicity is provided by the booking function; cancellation atomicity by
/// `TicketRepository::cancel_confirmed`.
pub struct TicketLifecycleCoordinator<B, T, C>
where
    B: BookingService,
    T: TicketRepository,
    C: FareClassRepository,
{
    booking: Arc<B>,
    tickets: Arc<T>,
    classes: Arc<C>,
}

impl<B, T, C> TicketLifecycleCoordinator<B, T, C>
where
    B: BookingService,
    T: TicketRepository,
    C: FareClassRepository,
{
    /// Create a new coordinator
    pub fn new(booking: Arc<B>, tickets: Arc<T>, classes: Arc<C>) -> Self {
        Self {
            booking,
            tickets,
            classes,
        }
    }

    /// Resolve a requested class name to the stored one
    async fn resolve_class(&self, class_name: &str) -> AppResult<String> {
        match self.classes.find_by_name(class_name).await? {
            Some(class) => Ok(class.class_name),
            None => {
                warn!("Rejected unknown fare class '{}'", class_name);
                Err(AppError::Validation(format!(
                    "unknown fare class '{}'",
                    class_name.trim()
                )))
            }
        }
    }

    /// Book a ticket
    ///
    /// All fields are validated before anything is written. The booking
    /// function then creates the ticket and its payment together, or neither.
    ///
    /// # Errors
    ///
    /// - `MissingField` / `Validation` for absent or malformed input
    /// - `BookingFailed` when the store rejects the booking (inactive train,
    ///   unknown passenger, constraint violation)
    #[instrument(skip(self, request))]
    pub async fn book(&self, request: &BookingRequest) -> AppResult<BookingConfirmation> {
        let mut booking = request.validate().map_err(|e| {
            warn!("Rejected booking request: {}", e);
            e
        })?;

        booking.class_name = self.resolve_class(&booking.class_name).await?;

        debug!(
            "Booking passenger {} on train {} ({}) for {}",
            booking.passenger_id, booking.train_id, booking.class_name, booking.journey_date
        );

        let confirmation = self.booking.book(&booking).await?;

        info!(
            "Ticket {} booked: {} seat {}",
            confirmation.pnr,
            confirmation.status,
            confirmation
                .seat_no
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string())
        );

        Ok(confirmation)
    }

    /// Fare the passenger would pay, for display before booking
    #[instrument(skip(self))]
    pub async fn preview_fare(
        &self,
        train_id: i32,
        class_name: &str,
        passenger_id: i32,
    ) -> AppResult<FareQuote> {
        if train_id <= 0 || passenger_id <= 0 {
            return Err(AppError::Validation(
                "train_id and passenger_id must be positive".to_string(),
            ));
        }
        if class_name.trim().is_empty() {
            return Err(AppError::MissingField("class_name".to_string()));
        }

        let class_name = self.resolve_class(class_name).await?;
        let fare = self
            .booking
            .calculate_fare(train_id, &class_name, passenger_id)
            .await?;

        debug!("Fare for {} on train {}: {}", class_name, train_id, fare);

        Ok(FareQuote {
            train_id,
            class_name,
            passenger_id,
            fare,
        })
    }

    /// Cancel a ticket by internal id
    ///
    /// Returns the refund (80% of the fare) together with the cancellation
    /// record. Only Confirmed tickets can be cancelled.
    ///
    /// # Errors
    ///
    /// - `TicketNotFound` if the ticket does not exist
    /// - `InvalidTicketState` if it is Waiting or already Cancelled
    /// - `Persistence` if the cancellation could not be applied; nothing is changed
    #[instrument(skip(self))]
    pub async fn cancel(&self, ticket_id: i64) -> AppResult<CancellationOutcome> {
        let ticket = self
            .tickets
            .find_by_id(ticket_id)
            .await?
            .ok_or_else(|| AppError::TicketNotFound(ticket_id.to_string()))?;

        self.cancel_ticket(ticket).await
    }

    /// Cancel a ticket by PNR
    #[instrument(skip(self))]
    pub async fn cancel_by_pnr(&self, pnr: &str) -> AppResult<CancellationOutcome> {
        let ticket = self
            .tickets
            .find_by_pnr(pnr)
            .await?
            .ok_or_else(|| AppError::TicketNotFound(pnr.trim().to_string()))?;

        self.cancel_ticket(ticket).await
    }

    async fn cancel_ticket(&self, ticket: Ticket) -> AppResult<CancellationOutcome> {
        if !ticket.status.is_cancellable() {
            warn!(
                "Refusing to cancel ticket {} in status {}",
                ticket.pnr, ticket.status
            );
            return Err(AppError::InvalidTicketState {
                pnr: ticket.pnr,
                status: ticket.status.to_string(),
            });
        }

        let refund = refund_for(ticket.fare);
        debug!(
            "Cancelling ticket {}: fare {}, refund {}",
            ticket.pnr, ticket.fare, refund
        );

        let outcome = self.tickets.cancel_confirmed(ticket.id, refund).await?;

        info!(
            "Ticket {} cancelled, refund {} pending",
            outcome.pnr, outcome.refund_amount
        );

        Ok(outcome)
    }
}
