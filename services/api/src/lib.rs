mod cli;
mod infra;
mod migrate;
mod routes;
mod server;

use awesome_applicant::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
