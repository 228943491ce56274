//! Health check

use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use tracing::warn;

/// Health check endpoint; reports the database as unavailable when it does not answer
///
/// GET /api/v1/health
pub async fn health_check(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "service": "rail-reservation",
            "database": "up",
            "version": env!("CARGO_PKG_VERSION"),
        })),
        Err(e) => {
            warn!("Health check could not reach the database: {}", e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "degraded",
                "service": "rail-reservation",
                "database": "down",
                "version": env!("CARGO_PKG_VERSION"),
            }))
        }
    }
}

/// Configure the health route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
