//! HTTP handler functions for the emergency reporting API.

use actix_web::{HttpResponse, web};
use saarthi_area::alerts::cluster_by_area;
use saarthi_area::assign_areas;
use saarthi_report::summary::summarize;
use saarthi_report::{ReportError, ReportInput};
use saarthi_server_models::{
    ApiHealth, ReportsQueryParams, ReverseGeocodeRequest, StatusUpdateRequest, SubmitReportRequest,
    SubmitReportResponse,
};
use saarthi_store::StoreError;

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/reports`
///
/// Runs the full submission pipeline: validation, classification,
/// optional reverse geocoding, persistence, and reporter history.
pub async fn submit_report(
    state: web::Data<AppState>,
    body: web::Json<SubmitReportRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    let input = ReportInput {
        location: body.location,
        description: body.description,
        detected_coords: body.detected_coords,
        auto_detected: body.auto_detected,
        user_id: body.user_id,
        user_name: body.user_name,
    };

    match saarthi_report::submit_report(&state.resolver, state.store.as_ref(), &input).await {
        Ok(id) => HttpResponse::Ok().json(SubmitReportResponse { id }),
        Err(ReportError::Validation(e)) => {
            HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
        Err(e) => {
            log::error!("Failed to submit report: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to submit report"
            }))
        }
    }
}

/// `GET /api/reports`
///
/// Lists reports newest first, optionally restricted to one reporter via
/// the `userId` query parameter.
pub async fn list_reports(
    state: web::Data<AppState>,
    params: web::Query<ReportsQueryParams>,
) -> HttpResponse {
    let result = match params.user_id.as_deref() {
        Some(user_id) => state.store.list_user_emergencies(user_id).await,
        None => state.store.list_emergencies().await,
    };

    match result {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => {
            log::error!("Failed to list reports: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to list reports"
            }))
        }
    }
}

/// `GET /api/reports/{id}`
pub async fn get_report(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    match state.store.get_emergency(&id).await {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("No record with id {id}")
        })),
        Err(e) => {
            log::error!("Failed to fetch report {id}: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch report"
            }))
        }
    }
}

/// `POST /api/reports/{id}/status`
pub async fn update_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<StatusUpdateRequest>,
) -> HttpResponse {
    let id = path.into_inner();
    match state.store.update_status(&id, body.status).await {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(e @ StoreError::NotFound { .. }) => {
            HttpResponse::NotFound().json(serde_json::json!({ "error": e.to_string() }))
        }
        Err(e) => {
            log::error!("Failed to update status for report {id}: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to update report status"
            }))
        }
    }
}

/// `GET /api/alerts`
///
/// The map marker view: one alert per named area, clustered over the
/// current report list.
pub async fn alerts(state: web::Data<AppState>) -> HttpResponse {
    match state.store.list_emergencies().await {
        Ok(records) => {
            let assignments = assign_areas(&records);
            HttpResponse::Ok().json(cluster_by_area(&records, &assignments))
        }
        Err(e) => {
            log::error!("Failed to build alerts: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to build alerts"
            }))
        }
    }
}

/// `GET /api/summary`
pub async fn summary(state: web::Data<AppState>) -> HttpResponse {
    match state.store.list_emergencies().await {
        Ok(records) => HttpResponse::Ok().json(summarize(&records)),
        Err(e) => {
            log::error!("Failed to summarize reports: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to summarize reports"
            }))
        }
    }
}

/// `POST /api/geocode/reverse`
///
/// Resolves a coordinate to a human-readable address. Never fails: the
/// resolver degrades from cache to provider to the built-in gazetteer.
pub async fn reverse_geocode(
    state: web::Data<AppState>,
    body: web::Json<ReverseGeocodeRequest>,
) -> HttpResponse {
    let address = state.resolver.resolve_address(body.lat, body.lng).await;
    HttpResponse::Ok().json(address)
}
