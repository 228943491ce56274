//! Booking request and confirmation
//!
//! A booking request arrives with every field optional so that all missing
//! fields can be reported at once. Validation turns it into a
//! [`ValidatedBooking`] before anything is sent to the booking function.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::payment::PaymentMode;
use super::ticket::TicketStatus;
use crate::error::AppError;
use crate::AppResult;

/// Raw booking input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub passenger_id: Option<i32>,
    pub train_id: Option<i32>,
    pub class_name: Option<String>,
    /// Calendar date, `YYYY-MM-DD`
    pub journey_date: Option<String>,
    pub payment_mode: Option<String>,
}

/// Booking input that passed local validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedBooking {
    pub passenger_id: i32,
    pub train_id: i32,
    pub class_name: String,
    pub journey_date: NaiveDate,
    pub payment_mode: PaymentMode,
}

impl BookingRequest {
    /// Check presence and shape of every field.
    ///
    /// Missing fields are reported together as one `MissingField` error;
    /// malformed values produce `Validation`.
    pub fn validate(&self) -> AppResult<ValidatedBooking> {
        let class_name = self
            .class_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let journey_date = self
            .journey_date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let payment_mode = self
            .payment_mode
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let mut missing = Vec::new();
        if self.passenger_id.is_none() {
            missing.push("passenger_id");
        }
        if self.train_id.is_none() {
            missing.push("train_id");
        }
        if class_name.is_none() {
            missing.push("class_name");
        }
        if journey_date.is_none() {
            missing.push("journey_date");
        }
        if payment_mode.is_none() {
            missing.push("payment_mode");
        }

        let (
            Some(passenger_id),
            Some(train_id),
            Some(class_name),
            Some(journey_date),
            Some(payment_mode),
        ) = (
            self.passenger_id,
            self.train_id,
            class_name,
            journey_date,
            payment_mode,
        )
        else {
            return Err(AppError::MissingField(missing.join(", ")));
        };

        if passenger_id <= 0 {
            return Err(AppError::Validation(format!(
                "passenger_id must be positive, got {}",
                passenger_id
            )));
        }
        if train_id <= 0 {
            return Err(AppError::Validation(format!(
                "train_id must be positive, got {}",
                train_id
            )));
        }

        let journey_date = NaiveDate::parse_from_str(journey_date, "%Y-%m-%d").map_err(|_| {
            AppError::Validation(format!(
                "journey_date must be YYYY-MM-DD, got '{}'",
                journey_date
            ))
        })?;

        let payment_mode = PaymentMode::from_str(payment_mode).ok_or_else(|| {
            AppError::Validation(format!("unsupported payment mode '{}'", payment_mode))
        })?;

        Ok(ValidatedBooking {
            passenger_id,
            train_id,
            class_name: class_name.to_string(),
            journey_date,
            payment_mode,
        })
    }
}

/// Result of a successful booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub ticket_id: i64,
    pub pnr: String,
    pub fare: Decimal,
    /// Confirmed with a seat, or Waiting
    pub status: TicketStatus,
    pub seat_no: Option<i32>,
    pub coach_no: Option<String>,
}

/// Display-only fare preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareQuote {
    pub train_id: i32,
    pub class_name: String,
    pub passenger_id: i32,
    pub fare: Decimal,
}
