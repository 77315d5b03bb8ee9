use crate::infra::{applicant_from_value, deserialize_optional_date, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{NaiveDate, Utc};
use contractor_intake::error::AppError;
use contractor_intake::workflows::applicants::{
    applicant_router, ApplicantIntakeService, CandidateEnricher, CandidateId, CandidateRepository,
    CriterionResult, ExperienceYears, IntakeGuard, ShortlistPublisher,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Stateless eligibility check over an applicant in the compressed layout. `metadata` is
/// optional and version-checked when present.
#[derive(Debug, Deserialize)]
pub(crate) struct EligibilityRequest {
    #[serde(flatten)]
    pub(crate) applicant: serde_json::Map<String, serde_json::Value>,
    /// Evaluation date; defaults to today (UTC).
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EligibilityResponse {
    pub(crate) status: &'static str,
    pub(crate) total_years: ExperienceYears,
    pub(crate) tier_one_companies: Vec<String>,
    pub(crate) criteria: Vec<CriterionResult>,
    pub(crate) summary: String,
    pub(crate) evaluated_on: NaiveDate,
}

pub(crate) fn with_applicant_routes<R, P, E>(
    service: Arc<ApplicantIntakeService<R, P, E>>,
) -> axum::Router
where
    R: CandidateRepository + 'static,
    P: ShortlistPublisher + 'static,
    E: CandidateEnricher + 'static,
{
    applicant_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/eligibility",
            axum::routing::post(eligibility_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn eligibility_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<EligibilityRequest>,
) -> Result<Json<EligibilityResponse>, AppError> {
    let EligibilityRequest { applicant, today } = payload;
    let now = Utc::now();
    let today = today.unwrap_or_else(|| now.date_naive());

    let submission = applicant_from_value(serde_json::Value::Object(applicant))?;
    let profile = IntakeGuard.profile_from_submission(
        submission,
        CandidateId("adhoc".to_string()),
        now,
    )?;
    let outcome = state.evaluator.evaluate(&profile, today);

    Ok(Json(EligibilityResponse {
        status: outcome.verdict.label(),
        summary: outcome.summary(),
        total_years: outcome.total_years,
        tier_one_companies: outcome.tier_one_companies,
        criteria: outcome.criteria,
        evaluated_on: today,
    }))
}
