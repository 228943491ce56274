//! Payment model
//!
//! Each ticket has exactly one payment, created by the booking function in
//! the same unit as the ticket and marked Refunded when the ticket is
//! cancelled.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::report::DateRange;
use crate::AppResult;

/// Accepted payment modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMode {
    #[serde(rename = "Credit Card", alias = "CreditCard")]
    CreditCard,
    #[serde(rename = "Debit Card", alias = "DebitCard")]
    DebitCard,
    #[serde(rename = "Net Banking", alias = "NetBanking")]
    NetBanking,
    #[serde(rename = "UPI", alias = "Upi")]
    Upi,
    Wallet,
    Cash,
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMode::CreditCard => "Credit Card",
            PaymentMode::DebitCard => "Debit Card",
            PaymentMode::NetBanking => "Net Banking",
            PaymentMode::Upi => "UPI",
            PaymentMode::Wallet => "Wallet",
            PaymentMode::Cash => "Cash",
        };
        f.write_str(label)
    }
}

impl PaymentMode {
    /// Parse from string; accepts "Credit Card", "CreditCard", "credit_card", ...
    pub fn from_str(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "creditcard" => Some(PaymentMode::CreditCard),
            "debitcard" => Some(PaymentMode::DebitCard),
            "netbanking" => Some(PaymentMode::NetBanking),
            "upi" => Some(PaymentMode::Upi),
            "wallet" => Some(PaymentMode::Wallet),
            "cash" => Some(PaymentMode::Cash),
            _ => None,
        }
    }
}

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "Pending"),
            PaymentStatus::Completed => write!(f, "Completed"),
            PaymentStatus::Failed => write!(f, "Failed"),
            PaymentStatus::Refunded => write!(f, "Refunded"),
        }
    }
}

impl PaymentStatus {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(PaymentStatus::Pending),
            "completed" => Some(PaymentStatus::Completed),
            "failed" => Some(PaymentStatus::Failed),
            "refunded" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }

    /// Completed payments are the only ones counted as revenue
    pub fn counts_as_revenue(&self) -> bool {
        matches!(self, PaymentStatus::Completed)
    }
}

/// Payment entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,

    /// Ticket this payment settles (one-to-one)
    pub ticket_id: i64,

    pub amount: Decimal,

    pub payment_mode: PaymentMode,

    pub status: PaymentStatus,

    /// Gateway or counter transaction reference
    pub transaction_id: String,

    pub transacted_at: DateTime<Utc>,
}

/// Payment listing row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub id: i64,
    pub pnr: String,
    pub amount: Decimal,
    pub payment_mode: PaymentMode,
    pub status: PaymentStatus,
    pub transacted_at: DateTime<Utc>,
    pub transaction_id: String,
}

/// Payment with the ticket context it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub payment: Payment,
    pub pnr: String,
    pub passenger_name: String,
    pub train_name: String,
    pub class_name: String,
    pub journey_date: NaiveDate,
}

/// Payment search filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentFilter {
    /// Transaction date range start (inclusive)
    pub from: Option<NaiveDate>,

    /// Transaction date range end (inclusive)
    pub to: Option<NaiveDate>,

    /// `None` means all statuses
    pub status: Option<PaymentStatus>,
}

impl PaymentFilter {
    /// Validate the transaction date range, which must be complete or absent
    pub fn validate(&self) -> AppResult<Option<DateRange>> {
        DateRange::optional(self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_mode_parsing() {
        assert_eq!(PaymentMode::from_str("UPI"), Some(PaymentMode::Upi));
        assert_eq!(PaymentMode::from_str("Credit Card"), Some(PaymentMode::CreditCard));
        assert_eq!(PaymentMode::from_str("CreditCard"), Some(PaymentMode::CreditCard));
        assert_eq!(PaymentMode::from_str("net_banking"), Some(PaymentMode::NetBanking));
        assert_eq!(PaymentMode::from_str("cheque"), None);
        assert_eq!(PaymentMode::from_str(""), None);
    }

    #[test]
    fn test_payment_mode_serde_uses_display_names() {
        let json = serde_json::to_string(&PaymentMode::NetBanking).unwrap();
        assert_eq!(json, "\"Net Banking\"");

        let parsed: PaymentMode = serde_json::from_str("\"DebitCard\"").unwrap();
        assert_eq!(parsed, PaymentMode::DebitCard);
    }

    #[test]
    fn test_payment_status() {
        assert_eq!(PaymentStatus::from_str("refunded"), Some(PaymentStatus::Refunded));
        assert!(PaymentStatus::Completed.counts_as_revenue());
        assert!(!PaymentStatus::Refunded.counts_as_revenue());
    }
}
