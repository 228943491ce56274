//! Payment handlers

use crate::dto::{ApiResponse, PaginationParams, PaymentFilterParams};
use actix_web::{web, HttpResponse};
use rail_core::traits::PaymentRepository;
use rail_core::AppError;
use rail_db::PgPaymentRepository;
use sqlx::PgPool;
use tracing::{instrument, warn};
use validator::Validate;

/// List payments by transaction date range and status
///
/// GET /api/v1/payments
#[instrument(skip(pool))]
pub async fn list_payments(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
    filters: web::Query<PaymentFilterParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let filter = filters.to_filter()?;
    filter.validate()?;

    let repo = PgPaymentRepository::new(pool.get_ref().clone());
    let (payments, total) = repo
        .list_filtered(&filter, query.limit(), query.offset())
        .await?;

    Ok(HttpResponse::Ok().json(query.paginate(payments, total)))
}

/// GET /api/v1/payments/{id}
#[instrument(skip(pool))]
pub async fn get_payment(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let repo = PgPaymentRepository::new(pool.get_ref().clone());
    let details = repo
        .find_details_by_id(id)
        .await?
        .ok_or_else(|| AppError::PaymentNotFound(id.to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(details)))
}

/// Configure payment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::get().to(list_payments))
            .route("/{id}", web::get().to(get_payment)),
    );
}
