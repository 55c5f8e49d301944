use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::models::{
    ClassificationResult, ClassifyRequest, HealthResponse, Location, ReportDraft,
    ReportListResponse, ReportStats, ReportStatus, UpdateStatusRequest, WasteCategory, WasteReport,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::reports::create_report,
        crate::handlers::reports::list_reports,
        crate::handlers::reports::get_report_stats,
        crate::handlers::reports::get_report_by_token,
        crate::handlers::reports::update_report_status,
        crate::handlers::classify::classify_image,
    ),
    components(
        schemas(
            WasteReport,
            WasteCategory,
            ReportStatus,
            Location,
            ReportDraft,
            UpdateStatusRequest,
            ReportListResponse,
            ReportStats,
            ClassifyRequest,
            ClassificationResult,
            HealthResponse
        )
    ),
    tags(
        (name = "report-tracker", description = "Citizen waste reports and their lifecycle")
    )
)]
pub struct ApiDoc;

pub fn routes() -> SwaggerUi {
    let openapi = ApiDoc::openapi();
    SwaggerUi::new("/api/v1/docs").url("/api/v1/openapi.json", openapi)
}
