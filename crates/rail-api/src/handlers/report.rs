//! Report handlers

use crate::dto::{ApiResponse, DashboardParams, ReportParams};
use crate::Reports;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use rail_core::AppError;
use tracing::{debug, instrument};

/// Dashboard quick stats and charts
///
/// GET /api/v1/dashboard
#[instrument(skip(reports))]
pub async fn get_dashboard(
    reports: web::Data<Reports>,
    query: web::Query<DashboardParams>,
) -> Result<HttpResponse, AppError> {
    let today = query.date.unwrap_or_else(|| Utc::now().date_naive());
    debug!(%today, "Building dashboard");

    let summary = reports.dashboard(today).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}

/// Generate one of the tabular reports
///
/// GET /api/v1/reports?kind=revenue_by_train&from=2024-05-01&to=2024-05-31
#[instrument(skip(reports))]
pub async fn generate_report(
    reports: web::Data<Reports>,
    query: web::Query<ReportParams>,
) -> Result<HttpResponse, AppError> {
    let kind = query.kind()?;
    let report = reports.generate(kind, query.range()?).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(report)))
}

/// Configure report and dashboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(get_dashboard))
        .route("/reports", web::get().to(generate_report));
}
