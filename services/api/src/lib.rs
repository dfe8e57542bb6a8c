mod cli;
mod commands;
mod infra;
mod quiz;
mod routes;
mod server;

use disability_intake::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
