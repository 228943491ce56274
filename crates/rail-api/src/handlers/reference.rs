//! Station and fare class listings

use crate::dto::{ApiResponse, FareClassResponse, StationResponse};
use actix_web::{web, HttpResponse};
use rail_core::traits::{FareClassRepository, StationRepository};
use rail_core::AppError;
use rail_db::{PgFareClassRepository, PgStationRepository};
use sqlx::PgPool;
use tracing::instrument;

/// GET /api/v1/stations
#[instrument(skip(pool))]
pub async fn list_stations(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let repo = PgStationRepository::new(pool.get_ref().clone());
    let stations: Vec<StationResponse> = repo
        .list_all()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(stations)))
}

/// GET /api/v1/classes
#[instrument(skip(pool))]
pub async fn list_classes(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let repo = PgFareClassRepository::new(pool.get_ref().clone());
    let classes: Vec<FareClassResponse> = repo
        .list_all()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(classes)))
}

/// Configure station and class routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/stations", web::get().to(list_stations))
        .route("/classes", web::get().to(list_classes));
}
