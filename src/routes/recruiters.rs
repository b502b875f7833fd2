use actix_web::{web, HttpRequest, HttpResponse};
use std::collections::HashMap;
use uuid::Uuid;

use crate::core::{binder, validation};
use crate::error::ApiError;
use crate::models::{ApiResponse, GetRecruiterParams, RecruiterPayload};
use crate::routes::AppState;

/// Configure recruiter routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/recruiter", web::get().to(get_recruiter))
        .route("/recruiter/{id}", web::get().to(get_recruiter_by_id))
        .route("/add-recruiter", web::post().to(add_recruiter));
}

/// Search recruiters
///
/// GET /api/v1/recruiter?search={term}&url={bool}
///
/// With `url=true` the term is matched against handles, names and
/// employers. With `url=false` it must be an exact profile handle.
async fn get_recruiter(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let params: GetRecruiterParams = binder::bind(&query)?;
    validation::check(&params)?;

    let peer = req.peer_addr().map(|a| a.to_string()).unwrap_or_default();

    let found = if params.url {
        state.recruiters.search(&params.search).await
    } else {
        state
            .recruiters
            .find_by_handle(&params.search)
            .await
            .map(|r| vec![r])
    };

    match found {
        Ok(recruiters) => {
            tracing::info!("Recruiter search '{}' returned {} results", params.search, recruiters.len());
            Ok(HttpResponse::Ok().json(ApiResponse::ok(recruiters)))
        }
        Err(e) if e.is_not_found() => {
            tracing::info!(
                "No recruiter for '{}' (requested by {}), client may offer to create one",
                params.search,
                peer
            );
            Err(ApiError::NotFound)
        }
        Err(e) => Err(e.into()),
    }
}

/// Get a single verified recruiter
///
/// GET /api/v1/recruiter/{id}
async fn get_recruiter_by_id(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let raw = path.into_inner();
    if raw.trim().is_empty() {
        return Err(ApiError::BadRequest("missing id".to_string()));
    }

    // A malformed id is reported as an internal error, the same way the
    // backend would reject it
    let id = Uuid::parse_str(&raw).map_err(|e| ApiError::internal(format!("invalid recruiter id {raw}: {e}")))?;

    let recruiter = state.recruiters.find_by_id(id).await?;

    tracing::info!("Getting recruiter {}, id: {}", recruiter.name, recruiter.id);

    Ok(HttpResponse::Ok().json(ApiResponse::ok(recruiter)))
}

/// Register a new (unverified) recruiter
///
/// POST /api/v1/add-recruiter
///
/// Request body:
/// ```json
/// {
///   "name": "string",
///   "firstName": "string",
///   "lastName": "string",
///   "linkedin": "string",
///   "jobTitle": "string",
///   "currentCompany": "string"
/// }
/// ```
async fn add_recruiter(
    state: web::Data<AppState>,
    payload: web::Json<RecruiterPayload>,
) -> Result<HttpResponse, ApiError> {
    if let Err(failure) = validation::check(&*payload) {
        tracing::info!("Validation failed for add_recruiter: {}", failure);
        return Err(failure.into());
    }

    state.recruiters.create(&payload).await?;

    tracing::info!("Added recruiter {} ({})", payload.name, payload.linkedin);

    Ok(HttpResponse::Created().json(ApiResponse::ok_empty()))
}
