//! Report DTOs

use chrono::NaiveDate;
use rail_core::models::{DateRange, ReportKind};
use rail_core::{AppError, AppResult};
use serde::Deserialize;

/// Report query parameters
///
/// `kind` accepts the dashboard titles ("Revenue by Train") as well as
/// snake_case names (`revenue_by_train`).
#[derive(Debug, Clone, Deserialize)]
pub struct ReportParams {
    pub kind: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ReportParams {
    /// Parsed report kind
    pub fn kind(&self) -> AppResult<ReportKind> {
        ReportKind::from_str(&self.kind)
            .ok_or_else(|| AppError::Validation(format!("unknown report '{}'", self.kind)))
    }

    /// Date range, if both ends were given
    pub fn range(&self) -> AppResult<Option<DateRange>> {
        DateRange::optional(self.from, self.to)
    }
}

/// Dashboard query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardParams {
    /// Reference day; today when absent
    pub date: Option<NaiveDate>,
}
