mod cli;
mod infra;
mod routes;
mod scoring;
mod server;

use mfd_crm::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
