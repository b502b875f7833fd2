use actix_web::{web, HttpResponse};
use std::collections::HashMap;
use uuid::Uuid;

use crate::core::{binder, validation};
use crate::error::ApiError;
use crate::models::{ApiResponse, GetReviewsParams, ReviewPayload};
use crate::routes::AppState;

/// Configure review routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/reviews")
            .route(web::post().to(add_review))
            .route(web::get().to(get_recruiter_reviews)),
    )
    .route("/reviews/recent", web::get().to(get_recent_reviews));
}

/// Submit a review and fold its score into the recruiter's rating
///
/// POST /api/v1/reviews
///
/// Request body:
/// ```json
/// {
///   "recruiterId": "uuid",
///   "rating": 0,
///   "description": "string"
/// }
/// ```
async fn add_review(
    state: web::Data<AppState>,
    payload: web::Json<ReviewPayload>,
) -> Result<HttpResponse, ApiError> {
    let submitted = state.workflow.submit(&payload).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(submitted.review)))
}

/// Reviews for one recruiter, newest first
///
/// GET /api/v1/reviews?recruiterId={uuid}&limit={n}
async fn get_recruiter_reviews(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, ApiError> {
    let params: GetReviewsParams = binder::bind(&query)?;
    validation::check(&params)?;

    tracing::info!("Getting recruiter reviews for {}", params.recruiter_id);

    // Unparsable ids surface as 500, matching what the backend returns for them
    let recruiter_id = Uuid::parse_str(&params.recruiter_id)
        .map_err(|e| ApiError::internal(format!("error parsing uuid {}: {e}", params.recruiter_id)))?;

    let reviews = state
        .reviews
        .list_for_recruiter(recruiter_id, params.limit)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(reviews)))
}

/// Most recent reviews across all recruiters
///
/// GET /api/v1/reviews/recent
async fn get_recent_reviews(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let reviews = state
        .reviews
        .list_most_recent(state.recent_limit)
        .await
        .map_err(ApiError::internal)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(reviews)))
}
