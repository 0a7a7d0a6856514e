use awesome_applicant::applicants::{connection_pool, run_migrations};
use awesome_applicant::config::AppConfig;
use awesome_applicant::error::AppError;
use awesome_applicant::telemetry;
use tracing::info;

pub(crate) async fn run() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let pool = connection_pool(&config.database);
    let outcome = run_migrations(&pool).await;
    pool.close().await;
    outcome?;

    info!(database = %config.database, "applicant schema is up to date");
    Ok(())
}
