use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::workflows::applicants::compression::compress;
use crate::workflows::applicants::router::submit_handler;
use crate::workflows::applicants::{ApplicantIntakeService, ShortlistCriteria};

fn post_json(uri: &str, body: &impl serde::Serialize) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serializable")))
        .expect("request")
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

#[tokio::test]
async fn submit_handler_returns_conflict_on_duplicate() {
    let service = Arc::new(ApplicantIntakeService::new(
        Arc::new(ConflictRepository),
        Arc::new(MemoryPublisher::default()),
        Arc::new(FixedEnricher::default()),
        ShortlistCriteria::default(),
    ));

    let response = submit_handler::<ConflictRepository, MemoryPublisher, FixedEnricher>(
        State(service),
        axum::Json(shortlisted_submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn submit_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(ApplicantIntakeService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryPublisher::default()),
        Arc::new(FixedEnricher::default()),
        ShortlistCriteria::default(),
    ));

    let response = submit_handler::<UnavailableRepository, MemoryPublisher, FixedEnricher>(
        State(service),
        axum::Json(shortlisted_submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn submit_route_accepts_payloads() {
    let (service, _, _, _) = build_service();
    let router = applicant_router_with_service(service);

    let response = router
        .oneshot(post_json("/api/v1/applicants", &shortlisted_submission()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["full_name"], "Lena Fischer");
    assert_eq!(body["evaluation_summary"], "pending evaluation");
    assert!(body.get("score").is_none());
}

#[tokio::test]
async fn submit_route_rejects_guard_violations() {
    let (service, _, _, _) = build_service();
    let router = applicant_router_with_service(service);
    let mut submission = shortlisted_submission();
    submission.salary.minimum_rate = 500.0;

    let response = router
        .oneshot(post_json("/api/v1/applicants", &submission))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.contains("exceeds preferred rate")));
}

#[tokio::test]
async fn unknown_candidate_returns_not_found() {
    let (service, _, _, _) = build_service();
    let router = applicant_router_with_service(service);

    for request in [
        get("/api/v1/applicants/cand-404"),
        post_empty("/api/v1/applicants/cand-404/evaluate"),
        post_empty("/api/v1/applicants/cand-404/enrich"),
    ] {
        let response = router.clone().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = read_json_body(response).await;
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn evaluate_then_enrich_through_routes() {
    let (service, _, publisher, _) = build_service();
    let record = service.submit(shortlisted_submission()).expect("submit");
    let router = applicant_router_with_service(service);
    let id = record.id().0.clone();

    let response = router
        .clone()
        .oneshot(post_empty(&format!("/api/v1/applicants/{id}/evaluate")))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "shortlisted");
    assert_eq!(body["total_years"], json!(5.0));
    assert_eq!(body["criteria"].as_array().map(Vec::len), Some(3));
    assert_eq!(publisher.leads().len(), 1);

    let response = router
        .clone()
        .oneshot(post_empty(&format!("/api/v1/applicants/{id}/enrich")))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["skipped"], false);
    assert_eq!(body["score"], 8);

    let response = router
        .oneshot(get(&format!("/api/v1/applicants/{id}")))
        .await
        .expect("response");
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "shortlisted");
    assert_eq!(body["score"], 8);
    assert!(body["evaluation_summary"]
        .as_str()
        .is_some_and(|summary| summary.ends_with("Final Status: SHORTLISTED")));
}

#[tokio::test]
async fn enrich_before_evaluate_is_a_conflict() {
    let (service, _, _, _) = build_service();
    let record = service.submit(shortlisted_submission()).expect("submit");
    let router = applicant_router_with_service(service);

    let response = router
        .oneshot(post_empty(&format!(
            "/api/v1/applicants/{}/enrich",
            record.id()
        )))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn list_route_applies_query_filters() {
    let (service, _, _, _) = build_service();
    service.submit(shortlisted_submission()).expect("submit");
    let mut other = junior_submission();
    other.personal.full_name = "Marcus Hale".to_string();
    service.submit(other).expect("submit");
    service.evaluate_pending(now()).expect("batch");
    let router = applicant_router_with_service(service);

    let response = router
        .clone()
        .oneshot(get("/api/v1/applicants?status=rejected"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let names: Vec<_> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|view| view["full_name"].clone())
        .collect();
    assert_eq!(names, vec![json!("Marcus Hale")]);

    let response = router
        .oneshot(get("/api/v1/applicants?q=stripe"))
        .await
        .expect("response");
    let body = read_json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["full_name"], "Lena Fischer");
}

#[tokio::test]
async fn statistics_route_reports_rates() {
    let (service, _, _, _) = build_service();
    service.submit(shortlisted_submission()).expect("submit");
    service.submit(junior_submission()).expect("submit");
    service.evaluate_pending(now()).expect("batch");
    let router = applicant_router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/shortlist/statistics"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["total_applicants"], 2);
    assert_eq!(body["total_shortlisted"], 1);
    assert_eq!(body["shortlist_rate"], json!(50.0));
    assert_eq!(body["leads_created"], 1);
}

fn put_text(uri: &str, body: String) -> Request<Body> {
    Request::put(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("request")
}

#[tokio::test]
async fn replace_route_applies_compressed_profile() {
    let (service, _, _, _) = build_service();
    let record = service.submit(shortlisted_submission()).expect("submit");
    service.evaluate(record.id(), now()).expect("evaluate");
    let router = applicant_router_with_service(service);
    let uri = format!("/api/v1/applicants/{}", record.id());

    let mut payload: serde_json::Value =
        serde_json::from_str(&compress(&record.profile, now()).expect("compress"))
            .expect("compressed json");
    payload["salary"]["availability"] = json!(35.0);
    let response = router
        .clone()
        .oneshot(put_text(&uri, payload.to_string()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["changed"], true);
    assert_eq!(body["status"], "pending");
    assert_eq!(
        body["integrity"],
        json!({"personal": true, "experience": true, "salary": true})
    );

    payload["metadata"]["version"] = json!("9.9");
    let response = router
        .clone()
        .oneshot(put_text(&uri, payload.to_string()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    payload["metadata"]["version"] = json!("1.0");
    let response = router
        .oneshot(put_text("/api/v1/applicants/cand-404", payload.to_string()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
