//! HTTP route handlers for Axum.

use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use crate::{
    api::types::{AnalyzeRequest, ErrorDto},
    pipeline::{AnalysisError, AnalysisReport},
};

use super::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorDto>)>;

pub async fn health() -> &'static str {
    "ok"
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<AnalysisReport> {
    state
        .pipeline
        .analyze(&request.wine)
        .await
        .map(Json)
        .map_err(|err| {
            let status = status_for(&err);
            if status.is_server_error() {
                warn!(wine = %request.wine, %err, "analysis request failed");
            }
            (
                status,
                Json(ErrorDto {
                    error: err.to_string(),
                    stage: err.stage().to_string(),
                }),
            )
        })
}

fn status_for(err: &AnalysisError) -> StatusCode {
    match err {
        AnalysisError::EmptyWineName => StatusCode::BAD_REQUEST,
        AnalysisError::NoReviewsFound => StatusCode::NOT_FOUND,
        AnalysisError::Scoring(_) => StatusCode::BAD_GATEWAY,
        AnalysisError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
