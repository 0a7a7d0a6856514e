use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryApplicantStore};
use crate::routes::with_applicant_routes;
use awesome_applicant::applicants::{connection_pool, ApplicantService, PgApplicantStore};
use awesome_applicant::config::AppConfig;
use awesome_applicant::error::AppError;
use awesome_applicant::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    // The pool lives exactly as long as the server; handlers only see it through the service.
    let (routes, pool) = if args.in_memory {
        warn!("serving from process memory; applicants are lost on shutdown");
        let store = Arc::new(InMemoryApplicantStore::default());
        (with_applicant_routes(Arc::new(ApplicantService::new(store))), None)
    } else {
        let pool = connection_pool(&config.database);
        let store = Arc::new(PgApplicantStore::new(pool.clone()));
        (
            with_applicant_routes(Arc::new(ApplicantService::new(store))),
            Some(pool),
        )
    };

    let app = routes
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "applicant service ready");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(readiness_flag))
        .await;

    if let Some(pool) = pool {
        pool.close().await;
        info!("connection pool closed");
    }

    served?;
    info!("applicant service stopped");
    Ok(())
}

async fn shutdown_signal(readiness: Arc<AtomicBool>) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    readiness.store(false, Ordering::Release);
    info!("shutdown signal received, draining connections");
}
