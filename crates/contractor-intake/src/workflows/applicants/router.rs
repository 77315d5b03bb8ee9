use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::json;

use super::domain::{ApplicationSubmission, CandidateId};
use super::enrichment::CandidateEnricher;
use super::repository::{ApplicantFilter, CandidateRepository, RepositoryError, ShortlistPublisher};
use super::service::{ApplicantIntakeService, ApplicantServiceError};

type SharedService<R, P, E> = Arc<ApplicantIntakeService<R, P, E>>;

/// Router builder exposing HTTP endpoints for intake, evaluation, enrichment, and statistics.
pub fn applicant_router<R, P, E>(service: SharedService<R, P, E>) -> Router
where
    R: CandidateRepository + 'static,
    P: ShortlistPublisher + 'static,
    E: CandidateEnricher + 'static,
{
    Router::new()
        .route(
            "/api/v1/applicants",
            post(submit_handler::<R, P, E>).get(list_handler::<R, P, E>),
        )
        .route(
            "/api/v1/applicants/:candidate_id",
            get(status_handler::<R, P, E>).put(replace_handler::<R, P, E>),
        )
        .route(
            "/api/v1/applicants/:candidate_id/evaluate",
            post(evaluate_handler::<R, P, E>),
        )
        .route(
            "/api/v1/applicants/:candidate_id/enrich",
            post(enrich_handler::<R, P, E>),
        )
        .route(
            "/api/v1/shortlist/statistics",
            get(statistics_handler::<R, P, E>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R, P, E>(
    State(service): State<SharedService<R, P, E>>,
    axum::Json(submission): axum::Json<ApplicationSubmission>,
) -> Response
where
    R: CandidateRepository + 'static,
    P: ShortlistPublisher + 'static,
    E: CandidateEnricher + 'static,
{
    match service.submit(submission) {
        Ok(record) => (StatusCode::ACCEPTED, axum::Json(record.status_view())).into_response(),
        Err(ApplicantServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "applicant already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(&other),
    }
}

pub(crate) async fn list_handler<R, P, E>(
    State(service): State<SharedService<R, P, E>>,
    Query(filter): Query<ApplicantFilter>,
) -> Response
where
    R: CandidateRepository + 'static,
    P: ShortlistPublisher + 'static,
    E: CandidateEnricher + 'static,
{
    match service.list(&filter) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|record| record.status_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(other) => error_response(&other),
    }
}

pub(crate) async fn status_handler<R, P, E>(
    State(service): State<SharedService<R, P, E>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: CandidateRepository + 'static,
    P: ShortlistPublisher + 'static,
    E: CandidateEnricher + 'static,
{
    let id = CandidateId(candidate_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(other) => error_response(&other),
    }
}

/// Body is the candidate's compressed JSON, metadata included.
pub(crate) async fn replace_handler<R, P, E>(
    State(service): State<SharedService<R, P, E>>,
    Path(candidate_id): Path<String>,
    body: String,
) -> Response
where
    R: CandidateRepository + 'static,
    P: ShortlistPublisher + 'static,
    E: CandidateEnricher + 'static,
{
    let id = CandidateId(candidate_id);
    match service.apply_compressed(&id, &body) {
        Ok(update) => {
            let payload = json!({
                "candidate_id": id,
                "changed": update.changed,
                "status": update.record.status,
                "integrity": update.integrity,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(&other),
    }
}

pub(crate) async fn evaluate_handler<R, P, E>(
    State(service): State<SharedService<R, P, E>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: CandidateRepository + 'static,
    P: ShortlistPublisher + 'static,
    E: CandidateEnricher + 'static,
{
    let id = CandidateId(candidate_id);
    match service.evaluate(&id, Utc::now()) {
        Ok(outcome) => {
            let payload = json!({
                "candidate_id": outcome.candidate_id,
                "status": outcome.verdict.label(),
                "total_years": outcome.total_years,
                "tier_one_companies": outcome.tier_one_companies,
                "criteria": outcome.criteria,
                "summary": outcome.summary(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(&other),
    }
}

pub(crate) async fn enrich_handler<R, P, E>(
    State(service): State<SharedService<R, P, E>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: CandidateRepository + 'static,
    P: ShortlistPublisher + 'static,
    E: CandidateEnricher + 'static,
{
    let id = CandidateId(candidate_id);
    match service.enrich(&id, Utc::now()) {
        Ok(outcome) => {
            let record = outcome.record();
            let payload = json!({
                "candidate_id": id,
                "skipped": outcome.was_skipped(),
                "summary": record.enrichment.summary,
                "score": record.enrichment.score,
                "issues": record.enrichment.issues,
                "follow_ups": record.enrichment.follow_ups,
                "enriched_at": record.enriched_at,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(&other),
    }
}

pub(crate) async fn statistics_handler<R, P, E>(
    State(service): State<SharedService<R, P, E>>,
) -> Response
where
    R: CandidateRepository + 'static,
    P: ShortlistPublisher + 'static,
    E: CandidateEnricher + 'static,
{
    match service.statistics() {
        Ok(statistics) => (StatusCode::OK, axum::Json(statistics)).into_response(),
        Err(other) => error_response(&other),
    }
}

fn error_response(error: &ApplicantServiceError) -> Response {
    let status = match error {
        ApplicantServiceError::Compression(_) => StatusCode::BAD_REQUEST,
        ApplicantServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ApplicantServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ApplicantServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ApplicantServiceError::NotEvaluated(_) => StatusCode::CONFLICT,
        ApplicantServiceError::Enrichment(_) | ApplicantServiceError::Publish(_) => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
