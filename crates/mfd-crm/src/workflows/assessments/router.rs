use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::{AssessmentId, AssessmentSubmission};
use super::repository::{FrameworkStore, RepositoryError, SubmissionRepository};
use super::service::{AssessmentServiceError, RiskAssessmentService};
use crate::scoring::Answers;

/// Body accepted by the scoring preview endpoint.
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub config: Value,
    #[serde(default)]
    pub answers: Answers,
}

/// Router builder exposing assessment intake, lookup, and scoring preview.
pub fn assessment_router<F, R>(service: Arc<RiskAssessmentService<F, R>>) -> Router
where
    F: FrameworkStore + 'static,
    R: SubmissionRepository + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(submit_handler::<F, R>))
        .route(
            "/api/v1/assessments/:assessment_id",
            get(status_handler::<F, R>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/rescore",
            post(rescore_handler::<F, R>),
        )
        .route(
            "/api/v1/distributors/:distributor_id/leads/:lead_id/assessments",
            get(history_handler::<F, R>),
        )
        .route("/api/v1/scoring/preview", post(preview_handler::<F, R>))
        .with_state(service)
}

fn error_response(error: AssessmentServiceError) -> Response {
    let status = match &error {
        AssessmentServiceError::Intake(_) | AssessmentServiceError::Scoring(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AssessmentServiceError::FrameworkNotFound(_)
        | AssessmentServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AssessmentServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = match &error {
        AssessmentServiceError::Scoring(scoring) => json!({
            "error": scoring.to_string(),
            "kind": scoring.kind(),
        }),
        other => json!({ "error": other.to_string() }),
    };

    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_handler<F, R>(
    State(service): State<Arc<RiskAssessmentService<F, R>>>,
    axum::Json(submission): axum::Json<AssessmentSubmission>,
) -> Response
where
    F: FrameworkStore + 'static,
    R: SubmissionRepository + 'static,
{
    match service.submit(submission) {
        Ok(record) => (StatusCode::ACCEPTED, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<F, R>(
    State(service): State<Arc<RiskAssessmentService<F, R>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    F: FrameworkStore + 'static,
    R: SubmissionRepository + 'static,
{
    match service.get(&AssessmentId(assessment_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rescore_handler<F, R>(
    State(service): State<Arc<RiskAssessmentService<F, R>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    F: FrameworkStore + 'static,
    R: SubmissionRepository + 'static,
{
    match service.rescore(&AssessmentId(assessment_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn history_handler<F, R>(
    State(service): State<Arc<RiskAssessmentService<F, R>>>,
    Path((distributor_id, lead_id)): Path<(String, String)>,
) -> Response
where
    F: FrameworkStore + 'static,
    R: SubmissionRepository + 'static,
{
    match service.history(&distributor_id, &lead_id) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|record| record.status_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn preview_handler<F, R>(
    State(service): State<Arc<RiskAssessmentService<F, R>>>,
    axum::Json(request): axum::Json<PreviewRequest>,
) -> Response
where
    F: FrameworkStore + 'static,
    R: SubmissionRepository + 'static,
{
    match service.preview(&request.config, &request.answers) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}
