//! Payment DTOs

use chrono::NaiveDate;
use rail_core::models::{PaymentFilter, PaymentStatus};
use rail_core::{AppError, AppResult};
use serde::Deserialize;

/// Payment filter query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentFilterParams {
    /// Transaction date range start
    pub from: Option<NaiveDate>,
    /// Transaction date range end
    pub to: Option<NaiveDate>,
    /// Payment status, or "All"
    pub status: Option<String>,
}

impl PaymentFilterParams {
    /// Convert into a repository filter; unknown statuses are rejected
    pub fn to_filter(&self) -> AppResult<PaymentFilter> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) if s.eq_ignore_ascii_case("all") => None,
            Some(s) => Some(PaymentStatus::from_str(s).ok_or_else(|| {
                AppError::Validation(format!("unknown payment status '{}'", s))
            })?),
        };

        Ok(PaymentFilter {
            from: self.from,
            to: self.to,
            status,
        })
    }
}
