//! Train handlers

use crate::dto::{ApiResponse, PaginationParams, TrainRequest, TrainSearchParams};
use actix_web::{web, HttpResponse};
use rail_core::traits::{Repository, TrainRepository};
use rail_core::AppError;
use rail_db::PgTrainRepository;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// List or search trains with origin and destination names
///
/// GET /api/v1/trains
#[instrument(skip(pool))]
pub async fn list_trains(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
    search: web::Query<TrainSearchParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let repo = PgTrainRepository::new(pool.get_ref().clone());
    let (trains, total) = repo
        .search(search.q.as_deref(), query.limit(), query.offset())
        .await?;

    Ok(HttpResponse::Ok().json(query.paginate(trains, total)))
}

/// Trains open for booking
///
/// GET /api/v1/trains/active
#[instrument(skip(pool))]
pub async fn list_active_trains(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let repo = PgTrainRepository::new(pool.get_ref().clone());
    let trains = repo.list_active().await?;

    debug!(count = trains.len(), "Listed active trains");
    Ok(HttpResponse::Ok().json(ApiResponse::success(trains)))
}

/// GET /api/v1/trains/{id}
#[instrument(skip(pool))]
pub async fn get_train(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let repo = PgTrainRepository::new(pool.get_ref().clone());
    let train = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::TrainNotFound(id.to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(train)))
}

/// POST /api/v1/trains
#[instrument(skip(pool, req))]
pub async fn create_train(
    pool: web::Data<PgPool>,
    req: web::Json<TrainRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Train validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let repo = PgTrainRepository::new(pool.get_ref().clone());
    let created = repo.create(&req.to_train(0)?).await?;

    info!(id = created.id, number = %created.train_number, "Train added");

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        created,
        "Train added successfully",
    )))
}

/// PUT /api/v1/trains/{id}
#[instrument(skip(pool, req))]
pub async fn update_train(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
    req: web::Json<TrainRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    req.validate().map_err(|e| {
        warn!(id, "Train validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let repo = PgTrainRepository::new(pool.get_ref().clone());
    let updated = repo.update(&req.to_train(id)?).await?;

    info!(id, "Train updated");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        updated,
        "Train updated successfully",
    )))
}

/// DELETE /api/v1/trains/{id}
#[instrument(skip(pool))]
pub async fn delete_train(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let repo = PgTrainRepository::new(pool.get_ref().clone());
    if !repo.delete(id).await? {
        return Err(AppError::TrainNotFound(id.to_string()));
    }

    info!(id, "Train deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Configure train routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/trains")
            .route("", web::get().to(list_trains))
            .route("", web::post().to(create_train))
            .route("/active", web::get().to(list_active_trains))
            .route("/{id}", web::get().to(get_train))
            .route("/{id}", web::put().to(update_train))
            .route("/{id}", web::delete().to(delete_train)),
    );
}
