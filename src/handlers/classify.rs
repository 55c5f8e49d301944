use axum::{extract::State, response::Json};
use base64::Engine as _;

use crate::app_state::AppState;
use crate::models::{ClassificationResult, ClassifyRequest};

/// POST /api/v1/classify
///
/// Always answers 200 with a usable result: an undecodable payload or an
/// unavailable classifier yields the manual-entry fallback instead of an
/// error, so the capture flow is never blocked.
#[utoipa::path(
    post,
    path = "/api/v1/classify",
    request_body = ClassifyRequest,
    responses(
        (status = 200, description = "Best-effort classification", body = ClassificationResult)
    )
)]
pub async fn classify_image(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> Json<ClassificationResult> {
    // Capture front-ends send data URLs; keep only the payload.
    let raw = match request.image.split_once(',') {
        Some((_, data)) => data,
        None => request.image.as_str(),
    };
    let bytes = match base64::engine::general_purpose::STANDARD.decode(raw.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("could not decode image payload: {}", e);
            return Json(ClassificationResult::fallback());
        }
    };
    let mime_type = request.mime_type.as_deref().unwrap_or("image/jpeg");
    Json(state.classifier.classify(&bytes, mime_type).await)
}
