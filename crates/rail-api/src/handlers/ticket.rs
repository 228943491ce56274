//! Ticket handlers
//!
//! Booking and cancellation go through the shared `TicketLifecycleCoordinator`;
//! queries read the repositories directly.

use crate::dto::{
    ApiResponse, FareQuoteRequest, PaginationParams, TicketDetailsResponse, TicketFilterParams,
};
use crate::Coordinator;
use actix_web::{web, HttpResponse};
use rail_core::models::{BookingRequest, TicketFilter};
use rail_core::traits::{PaymentRepository, TicketRepository};
use rail_core::AppError;
use rail_db::{PgPaymentRepository, PgTicketRepository};
use sqlx::PgPool;
use tracing::{debug, instrument, warn};
use validator::Validate;

/// List tickets by PNR, passenger name and journey date range
///
/// GET /api/v1/tickets
#[instrument(skip(pool))]
pub async fn list_tickets(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
    filters: web::Query<TicketFilterParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let filter = TicketFilter::from(filters.into_inner());
    filter.validate()?;

    let repo = PgTicketRepository::new(pool.get_ref().clone());
    let (tickets, total) = repo
        .list_filtered(&filter, query.limit(), query.offset())
        .await?;

    Ok(HttpResponse::Ok().json(query.paginate(tickets, total)))
}

/// Ticket details with payment and cancellation
///
/// GET /api/v1/tickets/pnr/{pnr}
#[instrument(skip(pool))]
pub async fn get_ticket(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let pnr = path.into_inner();
    debug!(%pnr, "Getting ticket details");

    let tickets = PgTicketRepository::new(pool.get_ref().clone());
    let details = tickets
        .find_details_by_pnr(&pnr)
        .await?
        .ok_or_else(|| AppError::TicketNotFound(pnr.clone()))?;

    let ticket_id = details.ticket.id;
    let payments = PgPaymentRepository::new(pool.get_ref().clone());
    let payment = payments.find_by_ticket(ticket_id).await?;
    let cancellation = tickets.find_cancellation(ticket_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(TicketDetailsResponse::new(
        details,
        payment,
        cancellation,
    ))))
}

/// Book a ticket
///
/// POST /api/v1/tickets
#[instrument(skip(coordinator, req))]
pub async fn book_ticket(
    coordinator: web::Data<Coordinator>,
    req: web::Json<BookingRequest>,
) -> Result<HttpResponse, AppError> {
    let confirmation = coordinator.book(&req).await?;
    let message = format!("Ticket booked successfully! PNR: {}", confirmation.pnr);

    Ok(HttpResponse::Created().json(ApiResponse::with_message(confirmation, message)))
}

/// Fare preview for the booking form
///
/// POST /api/v1/tickets/fare
#[instrument(skip(coordinator, req))]
pub async fn preview_fare(
    coordinator: web::Data<Coordinator>,
    req: web::Json<FareQuoteRequest>,
) -> Result<HttpResponse, AppError> {
    let quote = coordinator
        .preview_fare(req.train_id, &req.class_name, req.passenger_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(quote)))
}

/// Cancel a ticket by id
///
/// POST /api/v1/tickets/{id}/cancel
#[instrument(skip(coordinator))]
pub async fn cancel_ticket(
    coordinator: web::Data<Coordinator>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let outcome = coordinator.cancel(path.into_inner()).await?;
    let message = format!(
        "Ticket cancelled successfully! Refund amount: {}",
        outcome.refund_amount
    );

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(outcome, message)))
}

/// Cancel a ticket by PNR
///
/// POST /api/v1/tickets/pnr/{pnr}/cancel
#[instrument(skip(coordinator))]
pub async fn cancel_ticket_by_pnr(
    coordinator: web::Data<Coordinator>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let outcome = coordinator.cancel_by_pnr(&path.into_inner()).await?;
    let message = format!(
        "Ticket cancelled successfully! Refund amount: {}",
        outcome.refund_amount
    );

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(outcome, message)))
}

/// Configure ticket routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tickets")
            .route("", web::get().to(list_tickets))
            .route("", web::post().to(book_ticket))
            .route("/fare", web::post().to(preview_fare))
            .route("/pnr/{pnr}", web::get().to(get_ticket))
            .route("/pnr/{pnr}/cancel", web::post().to(cancel_ticket_by_pnr))
            .route("/{id}/cancel", web::post().to(cancel_ticket)),
    );
}
