//! Rail Reservation Database Layer
//!
//! This crate provides PostgreSQL database access and repository implementations
//! for the rail reservation backend. It includes:
//!
//! - Connection pool management with sqlx
//! - Embedded schema migrations, including the booking and fare functions
//! - Repository implementations for all domain entities
//! - The transactional ticket cancellation

pub mod booking;
pub mod pool;
pub mod repositories;

pub use booking::PgBookingService;
pub use pool::{create_pool, run_migrations};
pub use repositories::*;

// Re-export commonly used types
pub use rail_core::{AppError, AppResult};
pub use sqlx::{PgPool, Postgres, Transaction};
