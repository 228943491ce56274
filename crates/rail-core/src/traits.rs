//! Common traits for repositories and services
//!
//! Defines abstractions for database access and the external booking
//! collaborator, implemented against PostgreSQL by `rail-db`.

use crate::error::AppError;
use crate::models::{
    BookingConfirmation, Cancellation, CancellationOutcome, ClassRevenue, DailyCancellations,
    DailyCount, DailySales, DateRange, DistributionBucket, FareClass, Passenger, Payment,
    PaymentDetails, PaymentFilter, PaymentSummary, Station, Ticket, TicketDetails, TicketFilter,
    TicketSummary, Train, TrainRevenue, TrainSummary, ValidatedBooking,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Generic repository trait for CRUD operations
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// Find entity by ID
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, AppError>;

    /// Find all entities with pagination
    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<T>, AppError>;

    /// Count total entities
    async fn count(&self) -> Result<i64, AppError>;

    /// Create a new entity
    async fn create(&self, entity: &T) -> Result<T, AppError>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> Result<T, AppError>;

    /// Delete entity by ID
    async fn delete(&self, id: ID) -> Result<bool, AppError>;
}

/// Passenger repository trait with specialized methods
#[async_trait]
pub trait PassengerRepository: Repository<Passenger, i32> {
    /// Search by first or last name fragment, ordered by id
    async fn search(
        &self,
        name: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Passenger>, i64), AppError>;
}

/// Train repository trait with specialized methods
#[async_trait]
pub trait TrainRepository: Repository<Train, i32> {
    /// Search by train number or name fragment, with station names resolved
    async fn search(
        &self,
        term: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<TrainSummary>, i64), AppError>;

    /// Trains that currently accept bookings
    async fn list_active(&self) -> Result<Vec<TrainSummary>, AppError>;
}

/// Station lookups
#[async_trait]
pub trait StationRepository: Send + Sync {
    /// All stations ordered by name
    async fn list_all(&self) -> Result<Vec<Station>, AppError>;
}

/// Fare class lookups
#[async_trait]
pub trait FareClassRepository: Send + Sync {
    /// All fare classes ordered by fare per km
    async fn list_all(&self) -> Result<Vec<FareClass>, AppError>;

    /// Find a class by name (case-insensitive)
    async fn find_by_name(&self, class_name: &str) -> Result<Option<FareClass>, AppError>;
}

/// Ticket repository trait
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Find ticket by internal id
    async fn find_by_id(&self, id: i64) -> Result<Option<Ticket>, AppError>;

    /// Find ticket by PNR
    async fn find_by_pnr(&self, pnr: &str) -> Result<Option<Ticket>, AppError>;

    /// Ticket with passenger, train and station names
    async fn find_details_by_pnr(&self, pnr: &str) -> Result<Option<TicketDetails>, AppError>;

    /// List tickets matching the filter, journey date descending
    async fn list_filtered(
        &self,
        filter: &TicketFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<TicketSummary>, i64), AppError>;

    /// Cancellation record of a ticket, if it was cancelled
    async fn find_cancellation(&self, ticket_id: i64) -> Result<Option<Cancellation>, AppError>;

    /// Cancel a confirmed ticket as one unit.
    ///
    /// Marks the ticket Cancelled, records a Pending cancellation with
    /// `refund_amount` and marks the linked payment Refunded. Either all three
    /// writes are applied or none are. Returns `InvalidTicketState` if the
    /// ticket is not Confirmed when locked, `Persistence` if the unit fails.
    async fn cancel_confirmed(
        &self,
        ticket_id: i64,
        refund_amount: Decimal,
    ) -> Result<CancellationOutcome, AppError>;
}

/// Payment repository trait
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Payment with its ticket context
    async fn find_details_by_id(&self, id: i64) -> Result<Option<PaymentDetails>, AppError>;

    /// Payment settling a ticket
    async fn find_by_ticket(&self, ticket_id: i64) -> Result<Option<Payment>, AppError>;

    /// List payments matching the filter, newest first
    async fn list_filtered(
        &self,
        filter: &PaymentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PaymentSummary>, i64), AppError>;
}

/// External booking collaborator.
///
/// Computes the fare, allocates a seat or a waiting-list position and creates
/// the ticket and its payment as a single unit.
#[async_trait]
pub trait BookingService: Send + Sync {
    /// Book a ticket; all-or-nothing
    async fn book(&self, booking: &ValidatedBooking) -> Result<BookingConfirmation, AppError>;

    /// Fare the passenger would pay, for display only
    async fn calculate_fare(
        &self,
        train_id: i32,
        class_name: &str,
        passenger_id: i32,
    ) -> Result<Decimal, AppError>;
}

/// Aggregations behind the dashboard and the reports
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Registered passengers
    async fn total_passengers(&self) -> Result<i64, AppError>;

    /// Trains accepting bookings
    async fn active_trains(&self) -> Result<i64, AppError>;

    /// Tickets booked on a day
    async fn tickets_booked_on(&self, day: NaiveDate) -> Result<i64, AppError>;

    /// Completed payment revenue on a day
    async fn completed_revenue_on(&self, day: NaiveDate) -> Result<Decimal, AppError>;

    /// Tickets booked per day, days without bookings omitted
    async fn tickets_per_day(&self, range: DateRange) -> Result<Vec<DailyCount>, AppError>;

    /// Tickets and fare revenue per booking day
    async fn daily_sales(&self, range: DateRange) -> Result<Vec<DailySales>, AppError>;

    /// Completed revenue per train, revenue descending
    async fn revenue_by_train(&self, range: DateRange) -> Result<Vec<TrainRevenue>, AppError>;

    /// Completed revenue per class, revenue descending
    async fn revenue_by_class(&self, range: DateRange) -> Result<Vec<ClassRevenue>, AppError>;

    /// Cancellations and refunds per day
    async fn daily_cancellations(
        &self,
        range: DateRange,
    ) -> Result<Vec<DailyCancellations>, AppError>;

    /// Passengers per age bucket, labelled like `AgeGroup::label`
    async fn age_distribution(&self) -> Result<Vec<DistributionBucket>, AppError>;

    /// Passengers per gender
    async fn gender_distribution(&self) -> Result<Vec<DistributionBucket>, AppError>;
}

/// Pagination parameters
#[derive(Debug, Clone, Default)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 500),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.per_page.max(0))
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };

        Self {
            total,
            page,
            per_page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination() {
        let p = Pagination::new(1, 25);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.limit(), 25);

        let p = Pagination::new(4, 50);
        assert_eq!(p.offset(), 150);
    }

    #[test]
    fn test_pagination_bounds() {
        assert_eq!(Pagination::new(-3, 10).page, 1);
        assert_eq!(Pagination::new(1, 0).per_page, 1);
        assert_eq!(Pagination::new(1, 10_000).per_page, 500);
        assert_eq!(Pagination::new(i64::MAX, 500).offset(), i64::MAX);
    }

    #[test]
    fn test_pagination_meta() {
        assert_eq!(PaginationMeta::new(0, 1, 20).total_pages, 0);
        assert_eq!(PaginationMeta::new(40, 1, 20).total_pages, 2);
        assert_eq!(PaginationMeta::new(41, 1, 20).total_pages, 3);
    }
}
