use crate::errors::ApiError;
use crate::services::reorder::{ReorderAnalysisRequest, ReorderReport, ReorderService};
use crate::ApiResponse;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Router,
};

// Trait for reorder handler state that provides access to the reorder service
pub trait ReorderHandlerState: Clone + Send + Sync + 'static {
    fn reorder_service(&self) -> &ReorderService;
}

pub fn reorder_router<S>() -> Router<S>
where
    S: ReorderHandlerState,
{
    Router::new().route("/analysis", post(run_analysis::<S>))
}

/// Run a reorder analysis for a batch of item identifiers
///
/// Accepts catalog ids, SKUs, UPCs, or scanned barcodes in any mix and
/// returns purchase recommendations sorted most-urgent-first. Tokens that
/// match nothing are reported in `unmatched_identifiers` rather than
/// failing the batch.
#[utoipa::path(
    post,
    path = "/api/v1/reorder/analysis",
    request_body = ReorderAnalysisRequest,
    responses(
        (status = 200, description = "Analysis report", body = crate::ApiResponse<crate::services::reorder::ReorderReport>,
            headers(
                ("X-Request-Id" = String, description = "Unique request identifier"),
            )
        ),
        (status = 400, description = "Bad request", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
        (status = 503, description = "Event store unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "Reorder"
)]
pub async fn run_analysis<S>(
    State(state): State<S>,
    Json(request): Json<ReorderAnalysisRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    S: ReorderHandlerState,
{
    let report: ReorderReport = state.reorder_service().analyze(request).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(report))))
}
