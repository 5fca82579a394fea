use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::app_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use learncomms::audio::AudioCache;
use learncomms::audit::QaAuditService;
use learncomms::config::AppConfig;
use learncomms::error::AppError;
use learncomms::provider::OpenAiProvider;
use learncomms::speech::SpeechScoreService;
use learncomms::telemetry;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
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
    config.provider.require_api_key()?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));

    let provider: Arc<dyn learncomms::provider::GenerativeProvider> =
        Arc::new(OpenAiProvider::new(config.provider.clone()));
    let audio = AudioCache::open(&config.audio)?;

    let app_state = AppState {
        provider: provider.clone(),
        audits: Arc::new(QaAuditService::new(provider.clone())),
        speech: Arc::new(SpeechScoreService::new(provider)),
        audio,
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        audits_served: Arc::new(AtomicU64::new(0)),
    };

    let app = app_router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "communication training backend ready");

    axum::serve(listener, app).await?;
    Ok(())
}
