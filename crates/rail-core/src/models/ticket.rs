//! Ticket model
//!
//! A ticket is created by the booking function, either with a seat
//! (Confirmed) or without one (Waiting). The only transition this backend
//! performs itself is `Confirmed -> Cancelled`; waiting-list promotion and
//! waiting-list cancellation are driven by the store.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::report::DateRange;
use crate::AppResult;

/// Ticket status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TicketStatus {
    /// Seat and coach allocated
    #[default]
    Confirmed,
    /// On the waiting list, no seat allocated
    Waiting,
    /// Cancelled; terminal
    Cancelled,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketStatus::Confirmed => write!(f, "Confirmed"),
            TicketStatus::Waiting => write!(f, "Waiting"),
            TicketStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl TicketStatus {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "confirmed" => Some(TicketStatus::Confirmed),
            "waiting" => Some(TicketStatus::Waiting),
            "cancelled" => Some(TicketStatus::Cancelled),
            _ => None,
        }
    }

    /// Allowed status transitions
    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        matches!(
            (self, next),
            (TicketStatus::Confirmed, TicketStatus::Cancelled)
                | (TicketStatus::Waiting, TicketStatus::Confirmed)
                | (TicketStatus::Waiting, TicketStatus::Cancelled)
        )
    }

    /// Only confirmed tickets can be cancelled through the coordinator
    pub fn is_cancellable(&self) -> bool {
        matches!(self, TicketStatus::Confirmed)
    }

    /// Check if ticket reached its terminal state
    pub fn is_final(&self) -> bool {
        matches!(self, TicketStatus::Cancelled)
    }
}

/// Ticket entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Internal identifier
    pub id: i64,

    /// Passenger Name Record, the public ticket identifier
    pub pnr: String,

    pub passenger_id: i32,

    pub train_id: i32,

    /// Fare class name (e.g. "Sleeper")
    pub class_name: String,

    pub journey_date: NaiveDate,

    pub source_station_id: i32,

    pub destination_station_id: i32,

    /// Allocated seat, `None` while on the waiting list
    pub seat_no: Option<i32>,

    /// Allocated coach, `None` while on the waiting list
    pub coach_no: Option<String>,

    /// Amount charged after concession
    pub fare: Decimal,

    /// Concession deducted from the base fare
    pub concession_amount: Decimal,

    pub status: TicketStatus,

    pub booked_at: DateTime<Utc>,
}

impl Ticket {
    /// Check if the ticket has no seat allocated
    pub fn is_waiting_list(&self) -> bool {
        self.seat_no.is_none()
    }

    /// Seat/coach label, or "Waiting List" when unallocated
    pub fn seat_label(&self) -> String {
        match (self.seat_no, self.coach_no.as_deref()) {
            (Some(seat), Some(coach)) => format!("{}/{}", seat, coach),
            (Some(seat), None) => seat.to_string(),
            _ => "Waiting List".to_string(),
        }
    }
}

impl Default for Ticket {
    fn default() -> Self {
        Self {
            id: 0,
            pnr: String::new(),
            passenger_id: 0,
            train_id: 0,
            class_name: String::new(),
            journey_date: NaiveDate::default(),
            source_station_id: 0,
            destination_station_id: 0,
            seat_no: None,
            coach_no: None,
            fare: Decimal::ZERO,
            concession_amount: Decimal::ZERO,
            status: TicketStatus::Confirmed,
            booked_at: Utc::now(),
        }
    }
}

/// Ticket listing row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketSummary {
    pub id: i64,
    pub pnr: String,
    pub passenger_name: String,
    pub train_name: String,
    pub class_name: String,
    pub journey_date: NaiveDate,
    pub status: TicketStatus,
    pub fare: Decimal,
}

/// Ticket with passenger, train and station details resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketDetails {
    pub ticket: Ticket,
    pub passenger_name: String,
    pub passenger_age: i32,
    pub passenger_gender: String,
    pub train_number: String,
    pub train_name: String,
    pub source_station: String,
    pub destination_station: String,
}

/// Ticket search filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    /// PNR fragment
    pub pnr: Option<String>,

    /// First or last name fragment
    pub passenger_name: Option<String>,

    /// Journey date range start (inclusive)
    pub journey_from: Option<NaiveDate>,

    /// Journey date range end (inclusive)
    pub journey_to: Option<NaiveDate>,
}

impl TicketFilter {
    /// Validate the journey date range, which must be complete or absent
    pub fn validate(&self) -> AppResult<Option<DateRange>> {
        DateRange::optional(self.journey_from, self.journey_to)
    }
}
