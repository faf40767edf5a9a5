mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use fair_tenant::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
