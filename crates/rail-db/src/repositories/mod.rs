//! Repository implementations
//!
//! This module contains concrete implementations of the repository traits
//! defined in rail-core, using sqlx for PostgreSQL access.

pub mod fare_class_repo;
pub mod passenger_repo;
pub mod payment_repo;
pub mod report_repo;
pub mod station_repo;
pub mod ticket_repo;
pub mod train_repo;

pub use fare_class_repo::PgFareClassRepository;
pub use passenger_repo::PgPassengerRepository;
pub use payment_repo::PgPaymentRepository;
pub use report_repo::PgReportRepository;
pub use station_repo::PgStationRepository;
pub use ticket_repo::PgTicketRepository;
pub use train_repo::PgTrainRepository;
