use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

use crate::app_state::AppState;
use crate::errors::StoreError;
use crate::models::{
    ReportDraft, ReportListResponse, ReportStats, ReportStatus, UpdateStatusRequest, WasteReport,
};

/// POST /api/v1/reports
#[utoipa::path(
    post,
    path = "/api/v1/reports",
    request_body = ReportDraft,
    responses(
        (status = 201, description = "Report created", body = WasteReport),
        (status = 400, description = "Draft failed validation")
    )
)]
pub async fn create_report(
    State(state): State<AppState>,
    Json(draft): Json<ReportDraft>,
) -> Result<(StatusCode, Json<WasteReport>), (StatusCode, String)> {
    match state.store.create_report(draft) {
        Ok(report) => {
            tracing::info!("created report {} token={}", report.id, report.token);
            Ok((StatusCode::CREATED, Json(report)))
        }
        Err(e) => Err(reject(e)),
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Restrict the listing to one lifecycle status.
    status: Option<ReportStatus>,
}

/// GET /api/v1/reports
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    params(ListParams),
    responses((status = 200, description = "Reports, newest first", body = ReportListResponse))
)]
pub async fn list_reports(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<ReportListResponse> {
    let reports = match params.status {
        Some(status) => state.store.list_by_status(status),
        None => state.store.list_all(),
    };
    let count = reports.len();
    Json(ReportListResponse { reports, count })
}

/// GET /api/v1/reports/stats
#[utoipa::path(
    get,
    path = "/api/v1/reports/stats",
    responses((status = 200, description = "Counts per status", body = ReportStats))
)]
pub async fn get_report_stats(State(state): State<AppState>) -> Json<ReportStats> {
    Json(state.store.stats())
}

/// GET /api/v1/reports/track/{token}
#[utoipa::path(
    get,
    path = "/api/v1/reports/track/{token}",
    params(("token" = String, Path, description = "Tracking code, exact match")),
    responses(
        (status = 200, description = "The tracked report", body = WasteReport),
        (status = 404, description = "Unknown token")
    )
)]
pub async fn get_report_by_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<WasteReport>, (StatusCode, String)> {
    match state.store.get_by_token(&token) {
        Some(report) => Ok(Json(report)),
        None => Err((
            StatusCode::NOT_FOUND,
            format!("no report found for token {}", token),
        )),
    }
}

/// POST /api/v1/reports/{id}/status
#[utoipa::path(
    post,
    path = "/api/v1/reports/{id}/status",
    params(("id" = String, Path, description = "Report id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated report", body = WasteReport),
        (status = 400, description = "Resolution photo missing"),
        (status = 404, description = "Unknown report id"),
        (status = 409, description = "Transition not allowed from the current status")
    )
)]
pub async fn update_report_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<WasteReport>, (StatusCode, String)> {
    match state
        .store
        .update_status(&id, request.status, request.resolved_image_url)
    {
        Ok(report) => {
            tracing::info!("report {} moved to {}", report.id, report.status);
            Ok(Json(report))
        }
        Err(e) => Err(reject(e)),
    }
}

fn reject(e: StoreError) -> (StatusCode, String) {
    let status = match &e {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::InvalidTransition { .. } => StatusCode::CONFLICT,
        _ => StatusCode::BAD_REQUEST,
    };
    tracing::warn!("report operation rejected: {}", e);
    (status, e.to_string())
}
