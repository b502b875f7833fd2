// Route exports
pub mod recruiters;
pub mod reviews;

use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::core::RatingWorkflow;
use crate::models::{ApiResponse, HealthResponse};
use crate::services::{RecruiterStore, ReviewStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub recruiters: Arc<dyn RecruiterStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub workflow: RatingWorkflow,
    pub recent_limit: i64,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .configure(recruiters::configure)
                .configure(reviews::configure),
        );
}

async fn index() -> impl Responder {
    HttpResponse::Ok().body("Hello from api")
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.recruiters.health_check().await.unwrap_or(false);

    let database = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(ApiResponse::ok(HealthResponse {
        database: database.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    }))
}
