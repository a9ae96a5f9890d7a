mod assess;
mod cli;
mod infra;
mod routes;
mod server;

use diy_assess::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
