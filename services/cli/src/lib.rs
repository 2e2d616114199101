mod cli;
mod commands;
mod infra;

use steps::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
