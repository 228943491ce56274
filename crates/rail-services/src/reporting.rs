//! Reporting service
//!
//! Aggregation happens in SQL; this service validates ranges, fills gaps,
//! orders buckets and sums the totals shown under each report.

use chrono::{Duration, NaiveDate};
use rail_core::{
    models::{
        AgeGroup, CancellationReport, ClassRevenue, ClassRevenueReport, DailyCount,
        DashboardSummary, DateRange, DemographicsReport, DistributionBucket, Report, ReportKind,
        SalesReport, TrainRevenueReport,
    },
    traits::ReportRepository,
    AppError, AppResult,
};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::constants::{DEFAULT_DASHBOARD_DAYS, PERCENT, PERCENT_SCALE};

/// Report service
pub struct ReportService<R: ReportRepository> {
    repo: Arc<R>,
    dashboard_days: i64,
}

impl<R: ReportRepository> ReportService<R> {
    /// Create a new report service; non-positive `dashboard_days` falls back to the default
    pub fn new(repo: Arc<R>, dashboard_days: i64) -> Self {
        let dashboard_days = if dashboard_days > 0 {
            dashboard_days
        } else {
            DEFAULT_DASHBOARD_DAYS
        };

        Self {
            repo,
            dashboard_days,
        }
    }

    /// Dashboard quick stats and charts as of `today`
    #[instrument(skip(self))]
    pub async fn dashboard(&self, today: NaiveDate) -> AppResult<DashboardSummary> {
        let first_day = today
            .checked_sub_signed(Duration::days(self.dashboard_days - 1))
            .ok_or_else(|| {
                warn!("Dashboard requested for out-of-range date {}", today);
                AppError::Validation(format!(
                    "date {} is too early for a {}-day dashboard",
                    today, self.dashboard_days
                ))
            })?;
        let trend_range = DateRange::new(first_day, today)?;
        let today_range = DateRange::new(today, today)?;

        let (passengers, trains, tickets_today, revenue_today, per_day, by_class) = tokio::try_join!(
            self.repo.total_passengers(),
            self.repo.active_trains(),
            self.repo.tickets_booked_on(today),
            self.repo.completed_revenue_on(today),
            self.repo.tickets_per_day(trend_range),
            self.repo.revenue_by_class(today_range),
        )?;

        let (revenue_by_class_today, _) = with_shares(by_class);

        Ok(DashboardSummary {
            total_passengers: passengers,
            active_trains: trains,
            tickets_today,
            revenue_today,
            sales_by_day: zero_fill(trend_range, per_day),
            revenue_by_class_today,
        })
    }

    /// Generate a report; every kind except demographics needs a range
    #[instrument(skip(self))]
    pub async fn generate(&self, kind: ReportKind, range: Option<DateRange>) -> AppResult<Report> {
        debug!("Generating {} report", kind);

        match kind {
            ReportKind::Demographics => Ok(Report::Demographics(self.demographics().await?)),
            ReportKind::DailySales => Ok(Report::DailySales(
                self.daily_sales(require_range(kind, range)?).await?,
            )),
            ReportKind::RevenueByTrain => Ok(Report::RevenueByTrain(
                self.revenue_by_train(require_range(kind, range)?).await?,
            )),
            ReportKind::RevenueByClass => Ok(Report::RevenueByClass(
                self.revenue_by_class(require_range(kind, range)?).await?,
            )),
            ReportKind::Cancellations => Ok(Report::Cancellations(
                self.cancellations(require_range(kind, range)?).await?,
            )),
        }
    }

    /// Tickets and fare revenue per booking day
    #[instrument(skip(self))]
    pub async fn daily_sales(&self, range: DateRange) -> AppResult<SalesReport> {
        let rows = self.repo.daily_sales(range).await?;

        Ok(SalesReport {
            range,
            total_tickets: rows.iter().map(|r| r.tickets).sum(),
            total_revenue: rows.iter().map(|r| r.revenue).sum(),
            rows,
        })
    }

    /// Completed revenue per train
    #[instrument(skip(self))]
    pub async fn revenue_by_train(&self, range: DateRange) -> AppResult<TrainRevenueReport> {
        let rows = self.repo.revenue_by_train(range).await?;

        Ok(TrainRevenueReport {
            range,
            total_tickets: rows.iter().map(|r| r.tickets).sum(),
            total_revenue: rows.iter().map(|r| r.revenue).sum(),
            rows,
        })
    }

    /// Completed revenue per class with each class's share
    #[instrument(skip(self))]
    pub async fn revenue_by_class(&self, range: DateRange) -> AppResult<ClassRevenueReport> {
        let (rows, total_revenue) = with_shares(self.repo.revenue_by_class(range).await?);

        Ok(ClassRevenueReport {
            range,
            total_tickets: rows.iter().map(|r| r.tickets).sum(),
            total_revenue,
            rows,
        })
    }

    /// Cancellations and refunds per day
    #[instrument(skip(self))]
    pub async fn cancellations(&self, range: DateRange) -> AppResult<CancellationReport> {
        let rows = self.repo.daily_cancellations(range).await?;

        Ok(CancellationReport {
            range,
            total_cancellations: rows.iter().map(|r| r.cancellations).sum(),
            total_refund: rows.iter().map(|r| r.refund_amount).sum(),
            rows,
        })
    }

    /// Age and gender distribution of registered passengers
    #[instrument(skip(self))]
    pub async fn demographics(&self) -> AppResult<DemographicsReport> {
        let (ages, genders, total_passengers) = tokio::try_join!(
            self.repo.age_distribution(),
            self.repo.gender_distribution(),
            self.repo.total_passengers(),
        )?;

        Ok(DemographicsReport {
            age_groups: order_age_buckets(ages),
            genders,
            total_passengers,
        })
    }
}

fn require_range(kind: ReportKind, range: Option<DateRange>) -> AppResult<DateRange> {
    range.ok_or_else(|| {
        warn!("{} report requested without a date range", kind);
        AppError::Validation(format!("{} needs a from and to date", kind))
    })
}

/// One entry per day of `range`, zero where the store returned nothing
pub fn zero_fill(range: DateRange, rows: Vec<DailyCount>) -> Vec<DailyCount> {
    let counts: HashMap<NaiveDate, i64> = rows.into_iter().map(|r| (r.date, r.count)).collect();

    range
        .dates()
        .map(|date| DailyCount {
            date,
            count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// Fill in each row's share of the total revenue; returns the total too
pub fn with_shares(mut rows: Vec<ClassRevenue>) -> (Vec<ClassRevenue>, Decimal) {
    let total: Decimal = rows.iter().map(|r| r.revenue).sum();

    for row in &mut rows {
        row.share_percent = if total.is_zero() {
            Decimal::ZERO
        } else {
            (row.revenue * PERCENT / total)
                .round_dp_with_strategy(PERCENT_SCALE, RoundingStrategy::MidpointAwayFromZero)
        };
    }

    (rows, total)
}

/// Age buckets in display order with empty buckets included
pub fn order_age_buckets(rows: Vec<DistributionBucket>) -> Vec<DistributionBucket> {
    let mut counts: HashMap<String, i64> = rows.into_iter().map(|b| (b.label, b.count)).collect();

    let mut ordered: Vec<DistributionBucket> = AgeGroup::ALL
        .iter()
        .map(|group| DistributionBucket {
            label: group.label().to_string(),
            count: counts.remove(group.label()).unwrap_or(0),
        })
        .collect();

    // Labels the store produced that are not known buckets stay visible at the end
    let mut unknown: Vec<DistributionBucket> = counts
        .into_iter()
        .map(|(label, count)| DistributionBucket { label, count })
        .collect();
    unknown.sort_by(|a, b| a.label.cmp(&b.label));
    ordered.extend(unknown);

    ordered
}
