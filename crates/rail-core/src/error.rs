//! Unified error handling for the rail reservation backend
//!
//! Every failure in the workspace is expressed as an [`AppError`]. The enum
//! maps onto the four failure kinds of the ticket lifecycle (validation,
//! booking, invalid state, persistence) plus lookup and infrastructure
//! failures, and renders itself as a JSON HTTP response.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Database Errors ====================
    #[error("Database error: {0}")]
    Database(String),

    #[error("Database pool error: {0}")]
    Pool(String),

    /// A multi-step write could not be applied as one unit and was rolled back
    #[error("Persistence error: {0}")]
    Persistence(String),

    // ==================== Ticket Lifecycle Errors ====================
    #[error("Booking failed: {0}")]
    BookingFailed(String),

    #[error("Ticket {pnr} cannot be cancelled in status {status}")]
    InvalidTicketState { pnr: String, status: String },

    #[error("Ticket not found: {0}")]
    TicketNotFound(String),

    #[error("Passenger not found: {0}")]
    PassengerNotFound(String),

    #[error("Train not found: {0}")]
    TrainNotFound(String),

    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    // ==================== Validation Errors ====================
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    // ==================== Resource Errors ====================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    // ==================== Internal Errors ====================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation(_) | AppError::InvalidInput(_) | AppError::MissingField(_) => {
                StatusCode::BAD_REQUEST
            }

            // 404 Not Found
            AppError::TicketNotFound(_)
            | AppError::PassengerNotFound(_)
            | AppError::TrainNotFound(_)
            | AppError::PaymentNotFound(_)
            | AppError::NotFound(_) => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::InvalidTicketState { .. }
            | AppError::Conflict(_)
            | AppError::AlreadyExists(_) => StatusCode::CONFLICT,

            // 422 Unprocessable Entity
            AppError::BookingFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,

            // 500 Internal Server Error
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database_error",
            AppError::Pool(_) => "pool_error",
            AppError::Persistence(_) => "persistence_error",
            AppError::BookingFailed(_) => "booking_failed",
            AppError::InvalidTicketState { .. } => "invalid_ticket_state",
            AppError::TicketNotFound(_) => "ticket_not_found",
            AppError::PassengerNotFound(_) => "passenger_not_found",
            AppError::TrainNotFound(_) => "train_not_found",
            AppError::PaymentNotFound(_) => "payment_not_found",
            AppError::Validation(_) => "validation_error",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::MissingField(_) => "missing_field",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::AlreadyExists(_) => "already_exists",
            AppError::Internal(_) => "internal_error",
            AppError::Config(_) => "config_error",
            AppError::Serialization(_) => "serialization_error",
        }
    }

    /// True for the caller-side failures that are rejected before any write
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::InvalidInput(_) | AppError::MissingField(_)
        )
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = json!({
            "error": self.error_code(),
            "message": self.to_string(),
            "status": status.as_u16(),
        });

        HttpResponse::build(status).json(body)
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}
