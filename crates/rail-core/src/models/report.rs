//! Reporting models
//!
//! Rows aggregated by the store and the report documents assembled from them
//! for the dashboard and the reports screen.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AppError;
use crate::AppResult;

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `from > to`
    pub fn new(from: NaiveDate, to: NaiveDate) -> AppResult<Self> {
        if from > to {
            return Err(AppError::Validation(format!(
                "date range is inverted: {} > {}",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    /// Build a range from optional ends; both or neither must be present
    pub fn optional(from: Option<NaiveDate>, to: Option<NaiveDate>) -> AppResult<Option<Self>> {
        match (from, to) {
            (Some(from), Some(to)) => Self::new(from, to).map(Some),
            (None, None) => Ok(None),
            _ => Err(AppError::Validation(
                "date range needs both from and to".to_string(),
            )),
        }
    }

    /// Number of days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    /// Every date of the range in ascending order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let from = self.from;
        (0..self.days()).filter_map(move |i| from.checked_add_signed(chrono::Duration::days(i)))
    }
}

/// Report selectable on the reports screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    DailySales,
    RevenueByTrain,
    RevenueByClass,
    Cancellations,
    Demographics,
}

impl ReportKind {
    /// Parse either the dashboard title or the snake_case name
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(' ', "_").as_str() {
            "daily_ticket_sales" | "daily_sales" => Some(ReportKind::DailySales),
            "revenue_by_train" => Some(ReportKind::RevenueByTrain),
            "revenue_by_class" => Some(ReportKind::RevenueByClass),
            "cancellation_analysis" | "cancellations" => Some(ReportKind::Cancellations),
            "passenger_demographics" | "demographics" => Some(ReportKind::Demographics),
            _ => None,
        }
    }

    /// Whether the report is restricted to a date range
    pub fn needs_date_range(&self) -> bool {
        !matches!(self, ReportKind::Demographics)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self {
            ReportKind::DailySales => "Daily Ticket Sales",
            ReportKind::RevenueByTrain => "Revenue by Train",
            ReportKind::RevenueByClass => "Revenue by Class",
            ReportKind::Cancellations => "Cancellation Analysis",
            ReportKind::Demographics => "Passenger Demographics",
        };
        f.write_str(title)
    }
}

/// Ticket count for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

/// Tickets booked and fare revenue for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub tickets: i64,
    pub revenue: Decimal,
}

/// Completed revenue for one train
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainRevenue {
    pub train_name: String,
    pub tickets: i64,
    pub revenue: Decimal,
}

/// Completed revenue for one fare class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRevenue {
    pub class_name: String,
    pub tickets: i64,
    pub revenue: Decimal,
    /// Share of the report's total revenue, in percent (2 dp)
    #[serde(default)]
    pub share_percent: Decimal,
}

/// Cancellations and refunds for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCancellations {
    pub date: NaiveDate,
    pub cancellations: i64,
    pub refund_amount: Decimal,
}

/// Count of passengers in one bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionBucket {
    pub label: String,
    pub count: i64,
}

/// Dashboard quick stats and chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_passengers: i64,
    pub active_trains: i64,
    pub tickets_today: i64,
    pub revenue_today: Decimal,
    /// Tickets booked per day, oldest first, zero-filled
    pub sales_by_day: Vec<DailyCount>,
    pub revenue_by_class_today: Vec<ClassRevenue>,
}

/// Daily ticket sales report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub range: DateRange,
    pub rows: Vec<DailySales>,
    pub total_tickets: i64,
    pub total_revenue: Decimal,
}

/// Revenue by train report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainRevenueReport {
    pub range: DateRange,
    pub rows: Vec<TrainRevenue>,
    pub total_tickets: i64,
    pub total_revenue: Decimal,
}

/// Revenue by class report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRevenueReport {
    pub range: DateRange,
    pub rows: Vec<ClassRevenue>,
    pub total_tickets: i64,
    pub total_revenue: Decimal,
}

/// Cancellation analysis report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancellationReport {
    pub range: DateRange,
    pub rows: Vec<DailyCancellations>,
    pub total_cancellations: i64,
    pub total_refund: Decimal,
}

/// Passenger demographics report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicsReport {
    pub age_groups: Vec<DistributionBucket>,
    pub genders: Vec<DistributionBucket>,
    pub total_passengers: i64,
}

/// Any generated report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum Report {
    DailySales(SalesReport),
    RevenueByTrain(TrainRevenueReport),
    RevenueByClass(ClassRevenueReport),
    Cancellations(CancellationReport),
    Demographics(DemographicsReport),
}

impl Report {
    /// Kind of this report
    pub fn kind(&self) -> ReportKind {
        match self {
            Report::DailySales(_) => ReportKind::DailySales,
            Report::RevenueByTrain(_) => ReportKind::RevenueByTrain,
            Report::RevenueByClass(_) => ReportKind::RevenueByClass,
            Report::Cancellations(_) => ReportKind::Cancellations,
            Report::Demographics(_) => ReportKind::Demographics,
        }
    }
}
