//! Business logic services for the rail reservation backend
//!
//! This crate contains the services that sit between the HTTP handlers and
//! the repositories:
//!
//! - `TicketLifecycleCoordinator` - booking, fare preview and cancellation
//!   with refund bookkeeping
//! - `ReportService` - dashboard summary and the tabular reports
//!
//! Services are generic over the repository traits of `rail-core`, own their
//! dependencies behind `Arc` and are shared with handlers as `web::Data`.

pub mod reporting;
pub mod ticket_lifecycle;

pub use reporting::ReportService;
pub use ticket_lifecycle::TicketLifecycleCoordinator;

/// Business logic constants
pub mod constants {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    /// Days in the dashboard sales series when not configured
    pub const DEFAULT_DASHBOARD_DAYS: i64 = 7;

    /// Multiplier turning a revenue fraction into a percentage
    pub const PERCENT: Decimal = dec!(100);

    /// Decimal places of report percentages
    pub const PERCENT_SCALE: u32 = 2;
}
