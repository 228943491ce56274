//! Cancellation model and refund policy
//!
//! Cancelling a confirmed ticket refunds 80% of its fare. The remaining 20%
//! is the cancellation charge; it does not depend on how close the journey is.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction of the fare returned on cancellation (0.80)
pub const REFUND_RATE: Decimal = Decimal::from_parts(80, 0, 0, false, 2);

/// Refund owed for a fare, rounded to currency precision
pub fn refund_for(fare: Decimal) -> Decimal {
    (fare * REFUND_RATE).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Refund settlement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RefundStatus {
    #[default]
    Pending,
    Processed,
}

impl fmt::Display for RefundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefundStatus::Pending => write!(f, "Pending"),
            RefundStatus::Processed => write!(f, "Processed"),
        }
    }
}

impl RefundStatus {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(RefundStatus::Pending),
            "processed" => Some(RefundStatus::Processed),
            _ => None,
        }
    }
}

/// Cancellation record, at most one per ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cancellation {
    pub id: i64,
    pub ticket_id: i64,
    pub cancelled_at: DateTime<Utc>,
    pub refund_amount: Decimal,
    pub refund_status: RefundStatus,
}

/// What a successful cancellation returns to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancellationOutcome {
    pub ticket_id: i64,
    pub pnr: String,
    pub refund_amount: Decimal,
    pub cancellation: Cancellation,
}
