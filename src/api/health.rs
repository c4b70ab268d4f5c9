use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub database: String,
    pub timestamp: i64,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let database_ok = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            log::warn!("⚠️ Health check: database unreachable: {}", e);
            false
        }
    };

    let body = HealthResponse {
        status: if database_ok { "healthy" } else { "degraded" }.to_string(),
        service: "favorite-movies".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if database_ok { "up" } else { "down" }.to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    };

    if database_ok {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
