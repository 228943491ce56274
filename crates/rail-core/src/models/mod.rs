//! Domain models for the rail reservation backend
//!
//! This module contains all the core domain models used throughout the application.

pub mod booking;
pub mod cancellation;
pub mod fare_class;
pub mod passenger;
pub mod payment;
pub mod report;
pub mod station;
pub mod ticket;
pub mod train;

pub use booking::{BookingConfirmation, BookingRequest, FareQuote, ValidatedBooking};
pub use cancellation::{refund_for, Cancellation, CancellationOutcome, RefundStatus, REFUND_RATE};
pub use fare_class::FareClass;
pub use passenger::{AgeGroup, Gender, Passenger};
pub use payment::{Payment, PaymentDetails, PaymentFilter, PaymentMode, PaymentStatus, PaymentSummary};
pub use report::{
    CancellationReport, ClassRevenue, ClassRevenueReport, DailyCancellations, DailyCount,
    DailySales, DashboardSummary, DateRange, DemographicsReport, DistributionBucket, Report,
    ReportKind, SalesReport, TrainRevenue, TrainRevenueReport,
};
pub use station::Station;
pub use ticket::{Ticket, TicketDetails, TicketFilter, TicketStatus, TicketSummary};
pub use train::{Train, TrainSummary, TrainType};
