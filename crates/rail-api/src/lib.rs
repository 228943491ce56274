//! API layer for the rail reservation backend
//!
//! HTTP handlers and DTOs for passengers, trains, tickets, payments and
//! reports. Handlers build repositories per request from the shared
//! `PgPool`; booking and cancellation go through the shared coordinator.

#![forbid(unsafe_code)]

pub mod dto;
pub mod handlers;

use rail_db::{
    PgBookingService, PgFareClassRepository, PgPool, PgReportRepository, PgTicketRepository,
};
use rail_services::{ReportService, TicketLifecycleCoordinator};
use std::sync::Arc;

// Re-export DTOs (common types)
pub use dto::{ApiResponse, PaginationParams};

// Re-export handler configuration functions
pub use handlers::{
    configure_health, configure_passengers, configure_payments, configure_reference,
    configure_reports, configure_tickets, configure_trains,
};

/// Ticket lifecycle coordinator over the PostgreSQL store
pub type Coordinator =
    TicketLifecycleCoordinator<PgBookingService, PgTicketRepository, PgFareClassRepository>;

/// Report service over the PostgreSQL store
pub type Reports = ReportService<PgReportRepository>;

/// Build the coordinator shared by all workers
pub fn coordinator(pool: &PgPool) -> Coordinator {
    TicketLifecycleCoordinator::new(
        Arc::new(PgBookingService::new(pool.clone())),
        Arc::new(PgTicketRepository::new(pool.clone())),
        Arc::new(PgFareClassRepository::new(pool.clone())),
    )
}

/// Build the report service shared by all workers
pub fn reports(pool: &PgPool, dashboard_days: i64) -> Reports {
    ReportService::new(Arc::new(PgReportRepository::new(pool.clone())), dashboard_days)
}

/// Mount every API route under `/api/v1`
pub fn configure_api(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(
        actix_web::web::scope("/api/v1")
            .configure(configure_health)
            .configure(configure_reports)
            .configure(configure_passengers)
            .configure(configure_trains)
            .configure(configure_reference)
            .configure(configure_tickets)
            .configure(configure_payments),
    );
}
