//! Rail Reservation Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the rail reservation backend. It includes:
//!
//! - Domain models (Passenger, Train, Ticket, Payment, Cancellation, reports)
//! - Repository and booking-service traits implemented by `rail-db`
//! - Unified error handling with HTTP response mapping
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use config::AppConfig;
pub use error::AppError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
