//! Ticket DTOs
//!
//! Booking requests reuse `rail_core::models::BookingRequest` directly so that
//! missing fields reach the coordinator and are reported together.

use chrono::NaiveDate;
use rail_core::models::{Cancellation, Payment, TicketDetails, TicketFilter};
use serde::{Deserialize, Serialize};

/// Fare preview request
#[derive(Debug, Clone, Deserialize)]
pub struct FareQuoteRequest {
    pub train_id: i32,
    pub class_name: String,
    pub passenger_id: i32,
}

/// Ticket filter query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketFilterParams {
    /// PNR fragment
    pub pnr: Option<String>,
    /// Passenger first or last name fragment
    pub passenger_name: Option<String>,
    /// Journey date range start
    pub from: Option<NaiveDate>,
    /// Journey date range end
    pub to: Option<NaiveDate>,
}

impl From<TicketFilterParams> for TicketFilter {
    fn from(p: TicketFilterParams) -> Self {
        let non_blank = |v: Option<String>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };

        Self {
            pnr: non_blank(p.pnr),
            passenger_name: non_blank(p.passenger_name),
            journey_from: p.from,
            journey_to: p.to,
        }
    }
}

/// Full ticket view: ticket details with its payment and cancellation
#[derive(Debug, Clone, Serialize)]
pub struct TicketDetailsResponse {
    #[serde(flatten)]
    pub details: TicketDetails,
    /// Seat/coach, or "Waiting List"
    pub seat_label: String,
    pub payment: Option<Payment>,
    pub cancellation: Option<Cancellation>,
}

impl TicketDetailsResponse {
    pub fn new(
        details: TicketDetails,
        payment: Option<Payment>,
        cancellation: Option<Cancellation>,
    ) -> Self {
        Self {
            seat_label: details.ticket.seat_label(),
            details,
            payment,
            cancellation,
        }
    }
}
