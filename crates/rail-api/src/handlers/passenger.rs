//! Passenger handlers
//!
//! HTTP handlers for passenger management endpoints.

use crate::dto::{
    ApiResponse, PaginationParams, PassengerRequest, PassengerResponse, PassengerSearchParams,
};
use actix_web::{web, HttpResponse};
use rail_core::traits::{PassengerRepository, Repository};
use rail_core::AppError;
use rail_db::PgPassengerRepository;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// List passengers, optionally filtered by name
///
/// GET /api/v1/passengers
#[instrument(skip(pool))]
pub async fn list_passengers(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
    search: web::Query<PassengerSearchParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let repo = PgPassengerRepository::new(pool.get_ref().clone());
    let (passengers, total) = repo
        .search(search.name.as_deref(), query.limit(), query.offset())
        .await?;

    let data: Vec<PassengerResponse> = passengers.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(query.paginate(data, total)))
}

/// Get a passenger by ID
///
/// GET /api/v1/passengers/{id}
#[instrument(skip(pool))]
pub async fn get_passenger(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    debug!(id, "Getting passenger");

    let repo = PgPassengerRepository::new(pool.get_ref().clone());
    let passenger = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::PassengerNotFound(id.to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(PassengerResponse::from(passenger))))
}

/// Register a passenger
///
/// POST /api/v1/passengers
#[instrument(skip(pool, req))]
pub async fn create_passenger(
    pool: web::Data<PgPool>,
    req: web::Json<PassengerRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Passenger validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let repo = PgPassengerRepository::new(pool.get_ref().clone());
    let created = repo.create(&req.to_passenger(0)?).await?;

    info!(id = created.id, "Passenger registered");

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        PassengerResponse::from(created),
        "Passenger added successfully",
    )))
}

/// Update a passenger
///
/// PUT /api/v1/passengers/{id}
#[instrument(skip(pool, req))]
pub async fn update_passenger(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
    req: web::Json<PassengerRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    req.validate().map_err(|e| {
        warn!(id, "Passenger validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let repo = PgPassengerRepository::new(pool.get_ref().clone());
    let updated = repo.update(&req.to_passenger(id)?).await?;

    info!(id, "Passenger updated");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        PassengerResponse::from(updated),
        "Passenger updated successfully",
    )))
}

/// Delete a passenger without tickets
///
/// DELETE /api/v1/passengers/{id}
#[instrument(skip(pool))]
pub async fn delete_passenger(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let repo = PgPassengerRepository::new(pool.get_ref().clone());
    if !repo.delete(id).await? {
        return Err(AppError::PassengerNotFound(id.to_string()));
    }

    info!(id, "Passenger deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Configure passenger routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/passengers")
            .route("", web::get().to(list_passengers))
            .route("", web::post().to(create_passenger))
            .route("/{id}", web::get().to(get_passenger))
            .route("/{id}", web::put().to(update_passenger))
            .route("/{id}", web::delete().to(delete_passenger)),
    );
}
