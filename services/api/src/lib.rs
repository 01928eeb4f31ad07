mod cli;
mod infra;
mod report;
mod routes;
mod server;

use rapture_gauge::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
