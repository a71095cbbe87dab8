use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryFrameworkStore, InMemorySubmissionRepository};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mfd_crm::config::AppConfig;
use mfd_crm::error::AppError;
use mfd_crm::telemetry;
use mfd_crm::workflows::assessments::RiskAssessmentService;
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
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let frameworks = Arc::new(InMemoryFrameworkStore::load(
        config.scoring.frameworks_path.as_deref(),
    )?);
    info!(frameworks = ?frameworks.codes(), "scoring frameworks available");

    let repository = Arc::new(InMemorySubmissionRepository::default());
    let assessment_service = Arc::new(RiskAssessmentService::new(frameworks, repository));

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "risk profiling service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
