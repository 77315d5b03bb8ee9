use crate::cli::ServeArgs;
use crate::infra::{
    build_enricher, AppState, InMemoryCandidateRepository, InMemoryShortlistPublisher,
};
use crate::routes::with_applicant_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use contractor_intake::config::AppConfig;
use contractor_intake::error::AppError;
use contractor_intake::telemetry;
use contractor_intake::workflows::applicants::{ApplicantIntakeService, EligibilityEvaluator};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let criteria = config.screening.criteria.clone();
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        evaluator: Arc::new(EligibilityEvaluator::new(criteria.clone())),
    };

    let repository = Arc::new(InMemoryCandidateRepository::default());
    let publisher = Arc::new(InMemoryShortlistPublisher::default());
    let enricher = Arc::new(build_enricher(&config.screening, None));
    let applicant_service = Arc::new(ApplicantIntakeService::new(
        repository, publisher, enricher, criteria,
    ));

    let app = with_applicant_routes(applicant_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "contractor intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
